//! Transcript logging for chat sessions.
//!
//! When enabled, user questions and completed answers are appended to a
//! plain-text file, one blank-line-separated record each.

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct TranscriptLog {
    path: Option<PathBuf>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the transcript at a file, verifying it is writable before
    /// committing to the path. Records are appended, so an existing
    /// transcript grows rather than being replaced.
    pub fn enable(&mut self, path: impl Into<PathBuf>) -> io::Result<String> {
        let path = path.into();
        OpenOptions::new().create(true).append(true).open(&path)?;
        let confirmation = format!("Logging enabled to: {}", path.display());
        self.path = Some(path);
        Ok(confirmation)
    }

    /// Append one record and a blank separator line. Does nothing until a
    /// transcript file has been set.
    pub fn record(&self, content: &str) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{content}")?;
        writeln!(file)?;
        Ok(())
    }

    pub fn status(&self) -> String {
        match &self.path {
            Some(path) => format!("active ({})", path.display()),
            None => "disabled".to_string(),
        }
    }
}
