pub mod cli;
pub mod error;
pub mod goc;
pub mod model;
pub mod profile;
pub mod registry;
pub mod resolve;
