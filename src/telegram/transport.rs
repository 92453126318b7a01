//! Transport abstraction used by the reply adapter.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Identity of a Telegram chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat the message was sent from.
    pub chat_id: ChatId,

    /// Message text.
    pub text: String,
}

impl InboundMessage {
    #[must_use]
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// Errors raised while sending a reply.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("No active chat to reply to")]
    NoActiveChat,

    #[error("Flood wait required: {0} seconds")]
    FloodWait(u32),

    #[error("Failed to read media file {path}: {reason}")]
    Media { path: String, reason: String },

    #[error("Request failed: {0}")]
    Request(String),
}

/// Outbound side of the chat transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a plain text message.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError>;

    /// Uploads a photo with a caption.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        file: &Path,
        caption: &str,
    ) -> Result<(), TransportError>;

    /// Uploads a video with a caption.
    async fn send_video(
        &self,
        chat_id: ChatId,
        file: &Path,
        caption: &str,
    ) -> Result<(), TransportError>;
}
