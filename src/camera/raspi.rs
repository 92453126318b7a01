//! Raspberry Pi camera driven through its command-line tools.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{Camera, CameraError, PURGE_SUCCESS, RecordResult, failure_report};
use crate::config::CameraConfig;

/// Camera backed by `raspistill`, `raspivid` and `MP4Box`.
#[derive(Debug)]
pub struct RaspiCamera {
    config: CameraConfig,
    sequence: AtomicU64,
}

impl RaspiCamera {
    /// Creates a camera that writes into `config.records_dir`.
    #[must_use]
    pub const fn new(config: CameraConfig) -> Self {
        Self {
            config,
            sequence: AtomicU64::new(0),
        }
    }

    /// Builds `<prefix><HHMMSSmmm-YYYYMMDD>-<n>.<extension>`.
    ///
    /// The per-camera counter keeps names unique within the same millisecond.
    fn record_path(&self, prefix: &str, extension: &str) -> PathBuf {
        let stamp = chrono::Local::now().format("%H%M%S%3f-%Y%m%d");
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.config
            .records_dir
            .join(format!("{prefix}{stamp}-{n}.{extension}"))
    }

    fn resolution_args(&self) -> [OsString; 4] {
        [
            "-w".into(),
            self.config.width.to_string().into(),
            "-h".into(),
            self.config.height.to_string().into(),
        ]
    }

    /// Runs a capture program and fails unless it exits successfully.
    async fn capture(&self, program: &str, args: &[OsString]) -> Result<(), CameraError> {
        let output = run(program, args).await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CameraError::Capture {
                program: program.to_owned(),
                status: output.status.to_string(),
                output: combined_output(&output),
            })
        }
    }

    /// Wraps the raw H.264 stream into an MP4 container.
    ///
    /// Returns a failure report instead of an error.
    async fn convert_h264_to_mp4(&self, h264: &Path, mp4: &Path) -> Option<String> {
        let program = &self.config.converter_program;
        let cmd = format!("{program} -add {} {}", h264.display(), mp4.display());
        let args: [OsString; 3] = ["-add".into(), h264.into(), mp4.into()];

        match run(program, &args).await {
            Ok(output) if output.status.success() => None,
            Ok(output) => {
                warn!("Conversion failed: {}", output.status);
                Some(failure_report(&cmd, &combined_output(&output)))
            }
            Err(e) => {
                warn!("Conversion failed: {}", e);
                Some(failure_report(&cmd, &e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Camera for RaspiCamera {
    async fn take_photo(&self) -> Result<PathBuf, CameraError> {
        tokio::fs::create_dir_all(&self.config.records_dir).await?;

        let photo = self.record_path("photo", "jpeg");
        info!("Taking photo: {}", photo.display());

        let mut args: Vec<OsString> = vec!["-o".into(), photo.clone().into()];
        args.extend(self.resolution_args());

        self.capture(&self.config.photo_program, &args).await?;
        Ok(photo)
    }

    async fn start_recording(&self, duration_secs: u64) -> Result<RecordResult, CameraError> {
        tokio::fs::create_dir_all(&self.config.records_dir).await?;

        let h264 = self.record_path("vid-", "h264");
        let mp4 = h264.with_extension("mp4");
        info!("Recording {}s of video: {}", duration_secs, h264.display());

        let mut args: Vec<OsString> = vec![
            "-o".into(),
            h264.clone().into(),
            "-t".into(),
            duration_secs.saturating_mul(1000).to_string().into(),
        ];
        args.extend(self.resolution_args());

        self.capture(&self.config.video_program, &args).await?;
        debug!("Recording finished, converting to {}", mp4.display());

        Ok(match self.convert_h264_to_mp4(&h264, &mp4).await {
            None => RecordResult::success(mp4),
            Some(error) => RecordResult::failure(mp4, error),
        })
    }

    async fn purge_records(&self) -> String {
        let dir = &self.config.records_dir;
        info!("Purging records in {}", dir.display());

        match remove_files(dir).await {
            Ok(count) => {
                info!("Deleted {} record(s)", count);
                PURGE_SUCCESS.to_owned()
            }
            Err(e) => {
                warn!("Failed to purge records: {}", e);
                failure_report(&format!("purge {}", dir.display()), &e.to_string())
            }
        }
    }
}

async fn run(program: &str, args: &[OsString]) -> Result<Output, CameraError> {
    debug!("Running {} {:?}", program, args);

    Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| CameraError::Spawn {
            program: program.to_owned(),
            source,
        })
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Deletes the regular files directly inside `dir`, returning how many were removed.
async fn remove_files(dir: &Path) -> std::io::Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut removed = 0;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            tokio::fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }

    Ok(removed)
}
