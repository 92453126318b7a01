//! Outbound replies addressed to the current session chat.

use std::path::Path;

use tracing::debug;

use super::registry::HandlerRegistry;
use super::session::SessionState;
use crate::camera::RecordResult;
use crate::telegram::{ChatId, Transport, TransportError};

/// What a handler gets to work with while it runs.
pub struct HandlerContext<'a> {
    /// Shared session state. Handlers may read and mutate it freely.
    pub session: &'a mut SessionState,

    transport: &'a dyn Transport,
    registry: &'a HandlerRegistry,
}

impl<'a> HandlerContext<'a> {
    /// Creates a context for one handler invocation.
    pub fn new(
        session: &'a mut SessionState,
        transport: &'a dyn Transport,
        registry: &'a HandlerRegistry,
    ) -> Self {
        Self {
            session,
            transport,
            registry,
        }
    }

    /// Returns the tokens currently registered, sorted.
    #[must_use]
    pub fn commands(&self) -> Vec<&str> {
        self.registry.tokens()
    }

    /// Returns a reply adapter aimed at the session's current chat.
    #[must_use]
    pub fn reply(&self) -> ReplyAdapter<'_> {
        ReplyAdapter::new(self.transport, self.session.chat_id())
    }
}

/// Thin wrapper that sends text and media to one chat.
pub struct ReplyAdapter<'a> {
    transport: &'a dyn Transport,
    chat_id: Option<ChatId>,
}

impl<'a> ReplyAdapter<'a> {
    /// Creates an adapter sending to `chat_id` through `transport`.
    pub fn new(transport: &'a dyn Transport, chat_id: Option<ChatId>) -> Self {
        Self { transport, chat_id }
    }

    fn destination(&self) -> Result<ChatId, TransportError> {
        self.chat_id.ok_or(TransportError::NoActiveChat)
    }

    /// Sends a text message.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active chat or the send fails.
    pub async fn send_text(&self, text: impl AsRef<str>) -> Result<(), TransportError> {
        let chat_id = self.destination()?;
        self.transport.send_text(chat_id, text.as_ref()).await
    }

    /// Sends a photo with a caption.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active chat or the upload fails.
    pub async fn send_photo(&self, file: &Path, caption: &str) -> Result<(), TransportError> {
        let chat_id = self.destination()?;
        self.transport.send_photo(chat_id, file, caption).await
    }

    /// Sends the recorded video, or its error text if the recording failed.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active chat or the send fails.
    pub async fn send_video_or_error(
        &self,
        record: &RecordResult,
        caption: &str,
    ) -> Result<(), TransportError> {
        let chat_id = self.destination()?;

        match &record.error {
            None => self.transport.send_video(chat_id, &record.name, caption).await,
            Some(error) => {
                debug!("Recording failed, sending error text instead of video");
                self.transport.send_text(chat_id, error).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::testing::{RecordingTransport, Sent};

    #[tokio::test]
    async fn test_send_text_uses_session_chat() {
        let transport = RecordingTransport::new();
        let mut session = SessionState::new();
        session.set_chat_id(ChatId(7));

        let registry = HandlerRegistry::new();
        let ctx = HandlerContext::new(&mut session, &transport, &registry);
        ctx.reply().send_text("hello").await.unwrap();

        assert_eq!(transport.sent(), vec![Sent::text(7, "hello")]);
    }

    #[tokio::test]
    async fn test_send_photo() {
        let transport = RecordingTransport::new();
        let reply = ReplyAdapter::new(&transport, Some(ChatId(3)));

        reply.send_photo(Path::new("p.jpeg"), "photo").await.unwrap();

        assert_eq!(
            transport.sent(),
            vec![Sent::Photo {
                chat_id: ChatId(3),
                file: PathBuf::from("p.jpeg"),
                caption: "photo".to_owned(),
            }]
        );
    }

    #[tokio::test]
    async fn test_send_video_without_error() {
        let transport = RecordingTransport::new();
        let reply = ReplyAdapter::new(&transport, Some(ChatId(1)));

        reply
            .send_video_or_error(&RecordResult::success("a.mp4"), "video")
            .await
            .unwrap();

        assert_eq!(
            transport.sent(),
            vec![Sent::Video {
                chat_id: ChatId(1),
                file: PathBuf::from("a.mp4"),
                caption: "video".to_owned(),
            }]
        );
    }

    #[tokio::test]
    async fn test_send_video_with_error_sends_text_only() {
        let transport = RecordingTransport::new();
        let reply = ReplyAdapter::new(&transport, Some(ChatId(1)));

        reply
            .send_video_or_error(&RecordResult::failure("a.mp4", "FAIL"), "video")
            .await
            .unwrap();

        assert_eq!(transport.sent(), vec![Sent::text(1, "FAIL")]);
    }

    #[tokio::test]
    async fn test_no_active_chat() {
        let transport = RecordingTransport::new();
        let reply = ReplyAdapter::new(&transport, None);

        let err = reply.send_text("lost").await.unwrap_err();
        assert!(matches!(err, TransportError::NoActiveChat));
        assert!(transport.sent().is_empty());
    }
}
