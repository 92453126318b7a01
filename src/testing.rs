//! In-memory collaborators for unit tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::camera::{Camera, CameraError, RecordResult};
use crate::telegram::{ChatId, Transport, TransportError};

/// One outbound call captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
    },
    Photo {
        chat_id: ChatId,
        file: PathBuf,
        caption: String,
    },
    Video {
        chat_id: ChatId,
        file: PathBuf,
        caption: String,
    },
}

impl Sent {
    pub fn text(chat_id: i64, text: &str) -> Self {
        Self::Text {
            chat_id: ChatId(chat_id),
            text: text.to_owned(),
        }
    }
}

/// Transport that records every call instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    failing: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, sent: Sent) -> Result<(), TransportError> {
        if self.failing {
            return Err(TransportError::Request("network down".to_owned()));
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        self.push(Sent::Text {
            chat_id,
            text: text.to_owned(),
        })
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        file: &Path,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.push(Sent::Photo {
            chat_id,
            file: file.to_path_buf(),
            caption: caption.to_owned(),
        })
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        file: &Path,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.push(Sent::Video {
            chat_id,
            file: file.to_path_buf(),
            caption: caption.to_owned(),
        })
    }
}

/// Camera returning canned results and remembering requested durations.
pub struct ScriptedCamera {
    record: RecordResult,
    purge: String,
    photos: Mutex<usize>,
    durations: Mutex<Vec<u64>>,
}

impl ScriptedCamera {
    pub fn new(record: RecordResult) -> Self {
        Self {
            record,
            purge: crate::camera::PURGE_SUCCESS.to_owned(),
            photos: Mutex::new(0),
            durations: Mutex::new(Vec::new()),
        }
    }

    pub fn photos_taken(&self) -> usize {
        *self.photos.lock().unwrap()
    }

    pub fn durations(&self) -> Vec<u64> {
        self.durations.lock().unwrap().clone()
    }
}

impl Default for ScriptedCamera {
    fn default() -> Self {
        Self::new(RecordResult::success("records/vid-test.mp4"))
    }
}

#[async_trait]
impl Camera for ScriptedCamera {
    async fn take_photo(&self) -> Result<PathBuf, CameraError> {
        *self.photos.lock().unwrap() += 1;
        Ok(PathBuf::from("records/photo-test.jpeg"))
    }

    async fn start_recording(&self, duration_secs: u64) -> Result<RecordResult, CameraError> {
        self.durations.lock().unwrap().push(duration_secs);
        Ok(self.record.clone())
    }

    async fn purge_records(&self) -> String {
        self.purge.clone()
    }
}
