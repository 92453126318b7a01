//! Telegram Bot API client.

use std::path::Path;

use async_trait::async_trait;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::payloads::{SendPhotoSetters, SendVideoSetters};
use teloxide::requests::{Requester, ResponseResult};
use teloxide::types::{ChatId as TgChatId, InputFile, Message, Update};
use teloxide::{Bot, RequestError, dptree};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::transport::{ChatId, InboundMessage, Transport, TransportError};
use crate::agent::AgentMessage;
use crate::config::TelegramConfig;

impl From<RequestError> for TransportError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::RetryAfter(seconds) => Self::FloodWait(seconds.seconds()),
            other => Self::Request(other.to_string()),
        }
    }
}

impl From<ChatId> for TgChatId {
    fn from(chat_id: ChatId) -> Self {
        Self(chat_id.0)
    }
}

/// Telegram bot backed by the Bot API.
#[derive(Clone)]
pub struct TelegramBot {
    bot: Bot,
}

impl TelegramBot {
    /// Creates the client and checks the token against `getMe`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or Telegram is unreachable.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, TransportError> {
        info!(
            "Connecting to Telegram with token {}...",
            mask_token(&config.bot_token)
        );

        let bot = Bot::new(&config.bot_token);
        let me = bot.get_me().await?;

        info!(
            "Connected to Telegram as @{}",
            me.user.username.as_deref().unwrap_or("unknown")
        );

        Ok(Self { bot })
    }

    /// Long-polls updates and forwards every text message to the command loop.
    ///
    /// Returns once Ctrl+C is received.
    pub async fn listen(&self, tx: mpsc::Sender<AgentMessage>) {
        let schema = Update::filter_message().endpoint(forward_message);

        teloxide::dispatching::Dispatcher::builder(self.bot.clone(), schema)
            .dependencies(dptree::deps![tx])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn ensure_readable(file: &Path) -> Result<(), TransportError> {
        tokio::fs::metadata(file)
            .await
            .map(|_| ())
            .map_err(|e| TransportError::Media {
                path: file.display().to_string(),
                reason: e.to_string(),
            })
    }
}

async fn forward_message(msg: Message, tx: mpsc::Sender<AgentMessage>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        debug!("Ignoring non-text message in chat {}", msg.chat.id);
        return Ok(());
    };

    let inbound = InboundMessage::new(ChatId(msg.chat.id.0), text);
    if tx.send(AgentMessage::Inbound(inbound)).await.is_err() {
        warn!("Command loop has stopped, dropping message");
    }

    Ok(())
}

#[async_trait]
impl Transport for TelegramBot {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        self.bot.send_message(TgChatId::from(chat_id), text).await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        file: &Path,
        caption: &str,
    ) -> Result<(), TransportError> {
        Self::ensure_readable(file).await?;
        debug!("Uploading photo {}", file.display());

        self.bot
            .send_photo(TgChatId::from(chat_id), InputFile::file(file.to_path_buf()))
            .caption(caption)
            .await?;
        Ok(())
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        file: &Path,
        caption: &str,
    ) -> Result<(), TransportError> {
        Self::ensure_readable(file).await?;
        debug!("Uploading video {}", file.display());

        self.bot
            .send_video(TgChatId::from(chat_id), InputFile::file(file.to_path_buf()))
            .caption(caption)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot").finish_non_exhaustive()
    }
}

/// Masks a bot token for logging (keeps the bot id before the colon).
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{bot_id}:****"),
        _ => "****".to_owned(),
    }
}
