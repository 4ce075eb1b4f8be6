//! Acquisition of raw profile text from a coverage aggregation server.
//!
//! The core never talks to the network itself; it consumes whatever text a
//! [`ProfileSource`] hands it. The stock implementation shells out to the
//! `goc` CLI, which in turn talks to the aggregation endpoint.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{GoclensError, Result};

/// A source for obtaining raw coverage profile text.
pub trait ProfileSource {
    /// Fetch the profile. May block; callers run this off any
    /// interaction-handling thread and guard against overlapping cycles.
    fn fetch_profile(&self) -> Result<String>;
}

/// Profile text read from a file on disk (e.g. a saved `goc profile` dump).
pub struct FileProfile {
    pub path: PathBuf,
}

impl ProfileSource for FileProfile {
    fn fetch_profile(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Profile fetched by running `goc profile --center=<url>`.
pub struct GocClient {
    pub center_url: String,
    /// Working directory for the subprocess, usually the workspace root.
    pub workdir: Option<PathBuf>,
}

impl GocClient {
    pub fn new(center_url: impl Into<String>) -> Self {
        Self {
            center_url: center_url.into(),
            workdir: None,
        }
    }

    #[must_use]
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }
}

impl ProfileSource for GocClient {
    fn fetch_profile(&self) -> Result<String> {
        log::info!("fetching coverage profile from {}", self.center_url);

        let mut command = Command::new("goc");
        command
            .arg("profile")
            .arg(format!("--center={}", self.center_url));
        if let Some(workdir) = &self.workdir {
            command.current_dir(workdir);
        }

        let output = command.output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        classify_exit(output.status.success(), &stderr)?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Map a `goc profile` exit status to our error taxonomy. A failure whose
/// stderr mentions "no profiles" means the server simply has no data yet,
/// which is a distinguished, recoverable condition.
fn classify_exit(success: bool, stderr: &str) -> Result<()> {
    if success {
        return Ok(());
    }
    if stderr.to_lowercase().contains("no profiles") {
        return Err(GoclensError::NoProfiles);
    }
    Err(GoclensError::Fetch(stderr.trim().to_string()))
}
