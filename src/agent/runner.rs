//! Command loop runner.
//!
//! Messages are handled strictly one after another:
//! 1. Receive the next message from the channel
//! 2. Dispatch it, waiting for the handler (and any capture) to finish
//! 3. Turn failures into log lines and, where useful, a chat reply
//!
//! A slow recording therefore holds back every message queued behind it.

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::commands::{DispatchError, DispatchResult, Dispatcher};
use crate::telegram::{ChatId, InboundMessage};

/// Messages that can be sent to the command loop.
#[derive(Debug, Clone)]
pub enum AgentMessage {
    /// A text message received from a chat.
    Inbound(InboundMessage),
    /// Stop the loop.
    Shutdown,
}

/// Single consumer of inbound messages.
pub struct CommandLoop {
    dispatcher: Dispatcher,

    /// Whether malformed commands get a "not understood" reply.
    reply_on_malformed: bool,
}

impl CommandLoop {
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            reply_on_malformed: true,
        }
    }

    /// Sets whether malformed commands are answered.
    #[must_use]
    pub const fn with_reply_on_malformed(mut self, reply: bool) -> Self {
        self.reply_on_malformed = reply;
        self
    }

    /// Runs until [`AgentMessage::Shutdown`] arrives or every sender is dropped.
    ///
    /// Returns the dispatcher so its final state can be inspected.
    pub async fn run(mut self, mut rx: mpsc::Receiver<AgentMessage>) -> Dispatcher {
        info!("Command loop started");

        while let Some(msg) = rx.recv().await {
            match msg {
                AgentMessage::Inbound(message) => {
                    self.process(&message).await;
                }
                AgentMessage::Shutdown => {
                    info!("Command loop shutting down");
                    break;
                }
            }
        }

        self.dispatcher
    }

    /// Dispatches one message and applies the failure policy.
    ///
    /// Returns `None` when the message could not be processed.
    pub async fn process(&mut self, message: &InboundMessage) -> Option<DispatchResult> {
        match self.dispatcher.on_message(message).await {
            Ok(DispatchResult::Matched) => {
                info!("Handled {:?} from chat {}", message.text, message.chat_id);
                Some(DispatchResult::Matched)
            }
            Ok(DispatchResult::Unmatched) => {
                debug!("Ignoring unknown command {:?}", message.text);
                Some(DispatchResult::Unmatched)
            }
            Err(DispatchError::Malformed(e)) => {
                warn!("{}", e);
                if self.reply_on_malformed {
                    self.notify(message.chat_id, &format!("Command not understood: {}", e.text))
                        .await;
                }
                None
            }
            Err(DispatchError::Handler { token, source }) => {
                error!("Handler for {} failed: {}", token, source);
                self.notify(message.chat_id, &format!("Command failed: {source}"))
                    .await;
                None
            }
        }
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.dispatcher.transport().send_text(chat_id, text).await {
            warn!("Failed to notify chat {}: {}", chat_id, e);
        }
    }
}

impl std::fmt::Debug for CommandLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLoop")
            .field("reply_on_malformed", &self.reply_on_malformed)
            .finish_non_exhaustive()
    }
}
