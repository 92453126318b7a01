//! Camera control module.
//!
//! Captures photos and timed videos, converts recordings to MP4 and
//! cleans up the records folder.

mod raspi;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use raspi::RaspiCamera;

/// Message returned by a successful purge.
pub const PURGE_SUCCESS: &str = "The records have been deleted";

/// Errors raised while driving the camera hardware.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {output}")]
    Capture {
        program: String,
        status: String,
        output: String,
    },

    #[error("Records folder error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a recording.
///
/// A conversion failure is reported through `error` rather than as an
/// `Err`, so the caller can forward it to the chat as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResult {
    /// Path of the converted video.
    pub name: PathBuf,

    /// Failure report, if the recording could not be converted.
    pub error: Option<String>,
}

impl RecordResult {
    #[must_use]
    pub fn success(name: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(name: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Camera peripheral used by the command handlers.
///
/// Calls may take as long as the capture itself.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Captures a still photo and returns its path.
    async fn take_photo(&self) -> Result<PathBuf, CameraError>;

    /// Records video for `duration_secs` seconds, then converts it to MP4.
    async fn start_recording(&self, duration_secs: u64) -> Result<RecordResult, CameraError>;

    /// Deletes every file in the records folder and describes the outcome.
    async fn purge_records(&self) -> String;
}

/// Formats a failed external operation for the chat.
pub(crate) fn failure_report(cmd: &str, output: &str) -> String {
    format!("FAIL:\ncmd:{cmd}\noutput:{output}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_result_constructors() {
        assert!(RecordResult::success("a.mp4").is_ok());

        let failed = RecordResult::failure("a.mp4", "FAIL");
        assert!(!failed.is_ok());
        assert_eq!(failed.error.as_deref(), Some("FAIL"));
    }

    #[test]
    fn test_failure_report_format() {
        assert_eq!(
            failure_report("MP4Box -add a b", "boom"),
            "FAIL:\ncmd:MP4Box -add a b\noutput:boom"
        );
    }
}
