//! Configuration module for the camera bot.
//!
//! Handles loading and validation of the camera settings file and of
//! the environment-driven bot and Telegram settings.

mod camera;
mod settings;

pub use camera::{CameraConfig, ValidationError};
pub use settings::{BotSettings, ConfigError, TelegramConfig};
