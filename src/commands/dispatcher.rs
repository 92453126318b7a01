//! Per-message command dispatch.
//!
//! Each inbound message goes through the same steps:
//! 1. Record the sender as the session chat (overwriting the previous one)
//! 2. Record the raw text as the last command
//! 3. Parse the text into a token and arguments
//! 4. Run the first handler registered for the token, if any
//!
//! Only the first registered handler ever runs for a token. Handler errors
//! are returned to the caller untouched.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::grammar::{MalformedCommand, ParsedCommand};
use super::registry::{HandlerError, HandlerRegistry};
use super::reply::HandlerContext;
use super::session::SessionState;
use crate::telegram::{InboundMessage, Transport};

/// Outcome of routing one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// A handler was invoked.
    Matched,
    /// No handler is registered for the token.
    Unmatched,
}

/// Reasons a message could not be fully processed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Malformed(#[from] MalformedCommand),

    #[error("Handler for {token} failed: {source}")]
    Handler {
        token: String,
        #[source]
        source: HandlerError,
    },
}

/// Routes inbound messages to registered handlers.
pub struct Dispatcher {
    registry: HandlerRegistry,
    session: SessionState,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    /// Creates a dispatcher with an empty session.
    #[must_use]
    pub fn new(registry: HandlerRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            session: SessionState::new(),
            transport,
        }
    }

    /// Returns the session state.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Returns the session state for modification.
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Returns the handler registry.
    #[must_use]
    pub const fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Returns the transport replies are sent through.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Processes one inbound message.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Malformed`] if the text has no leading command,
    /// or [`DispatchError::Handler`] if the invoked handler fails.
    pub async fn on_message(
        &mut self,
        message: &InboundMessage,
    ) -> Result<DispatchResult, DispatchError> {
        debug!("Message from chat {}: {:?}", message.chat_id, message.text);

        self.session.set_chat_id(message.chat_id);
        self.session.set_last_command(message.text.as_str());

        let ParsedCommand { token, args } = ParsedCommand::parse(&message.text)?;
        self.session.set_last_command(token.as_str());

        let Some(handler) = self.registry.lookup(&token).first() else {
            debug!("No handler registered for {}", token);
            return Ok(DispatchResult::Unmatched);
        };

        debug!("Invoking handler for {} with {} argument(s)", token, args.len());

        let mut ctx = HandlerContext::new(
            &mut self.session,
            self.transport.as_ref(),
            &self.registry,
        );
        handler
            .call(&mut ctx, &args)
            .await
            .map_err(|source| DispatchError::Handler { token, source })?;

        Ok(DispatchResult::Matched)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
