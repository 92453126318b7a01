//! Telegram transport module.
//!
//! Receives text messages from chats and sends text, photo and video
//! replies back through the Bot API.

mod client;
mod transport;

pub use client::TelegramBot;
pub use transport::{ChatId, InboundMessage, Transport, TransportError};
