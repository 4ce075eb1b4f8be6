use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoclensError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The aggregation server is up but has not recorded any coverage yet.
    /// Callers should surface this as guidance ("exercise the instrumented
    /// program, then refresh"), not as a failure.
    #[error("no coverage profiles recorded yet; exercise the instrumented program and retry")]
    NoProfiles,

    #[error("profile fetch failed: {0}")]
    Fetch(String),

    #[error("{0}")]
    Other(String),
}

impl GoclensError {
    /// True for the distinguished "server has no data yet" condition.
    pub fn is_no_profiles(&self) -> bool {
        matches!(self, GoclensError::NoProfiles)
    }
}

pub type Result<T> = std::result::Result<T, GoclensError>;
