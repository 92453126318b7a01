//! Session state shared between the dispatcher and command handlers.

use crate::telegram::ChatId;

/// Process-wide session record.
///
/// There is one instance per running bot, not one per chat: `chat_id` always
/// names the sender of the most recent message.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Sender of the most recent message.
    chat_id: Option<ChatId>,

    /// Whether camera commands are currently accepted.
    is_listening: bool,

    /// Raw text of the most recent message, replaced by its token once parsed.
    last_command: Option<String>,
}

impl SessionState {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chat of the most recent message, if any.
    #[must_use]
    pub const fn chat_id(&self) -> Option<ChatId> {
        self.chat_id
    }

    /// Records the chat replies should go to.
    pub fn set_chat_id(&mut self, chat_id: ChatId) {
        self.chat_id = Some(chat_id);
    }

    /// Returns whether camera commands are accepted.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.is_listening
    }

    /// Enables or disables camera commands.
    pub fn set_listening(&mut self, listening: bool) {
        self.is_listening = listening;
    }

    /// Returns the most recent command, if any.
    #[must_use]
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Replaces the most recent command.
    pub fn set_last_command(&mut self, command: impl Into<String>) {
        self.last_command = Some(command.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = SessionState::new();
        assert!(session.chat_id().is_none());
        assert!(!session.is_listening());
        assert!(session.last_command().is_none());
    }

    #[test]
    fn test_chat_id_is_overwritten() {
        let mut session = SessionState::new();
        session.set_chat_id(ChatId(1));
        session.set_chat_id(ChatId(2));
        assert_eq!(session.chat_id(), Some(ChatId(2)));
    }

    #[test]
    fn test_toggle_listening() {
        let mut session = SessionState::new();
        session.set_listening(true);
        assert!(session.is_listening());
        session.set_listening(false);
        assert!(!session.is_listening());
    }
}
