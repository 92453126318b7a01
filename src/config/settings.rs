//! Application settings and Telegram configuration.

use serde::{Deserialize, Serialize};

/// Telegram Bot API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by @BotFather.
    pub bot_token: String,
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub const fn new(bot_token: String) -> Self {
        Self { bot_token }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TG_BOT_TOKEN` to be set.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from any key/value source, e.g. a parsed `.env` map.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = get("TG_BOT_TOKEN").ok_or(ConfigError::MissingEnvVar("TG_BOT_TOKEN"))?;

        if bot_token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        Ok(Self::new(bot_token))
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"****")
            .finish()
    }
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Capacity of the channel between the update listener and the command loop.
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    /// Whether unparseable commands get a "not understood" reply.
    #[serde(default = "default_reply_on_malformed")]
    pub reply_on_malformed: bool,
}

const fn default_queue_size() -> usize {
    32
}

const fn default_reply_on_malformed() -> bool {
    true
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            queue_size: default_queue_size(),
            reply_on_malformed: default_reply_on_malformed(),
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates bot settings from any key/value source, falling back to
    /// defaults for missing or unparseable values.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            queue_size: get("MESSAGE_QUEUE_SIZE")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&size| size > 0)
                .unwrap_or_else(default_queue_size),
            reply_on_malformed: get("REPLY_ON_MALFORMED")
                .and_then(|s| parse_bool(&s))
                .unwrap_or_else(default_reply_on_malformed),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Bot token is empty")]
    EmptyToken,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BotSettings::default();
        assert_eq!(settings.queue_size, 32);
        assert!(settings.reply_on_malformed);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_telegram_config_missing_token() {
        let err = TelegramConfig::from_lookup(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("TG_BOT_TOKEN")));
    }

    #[test]
    fn test_telegram_config_blank_token() {
        let err = TelegramConfig::from_lookup(vars(&[("TG_BOT_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyToken));
    }

    #[test]
    fn test_telegram_config_reads_token() {
        let config = TelegramConfig::from_lookup(vars(&[("TG_BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(config.bot_token, "123:abc");
    }

    #[test]
    fn test_settings_defaults_when_unset() {
        let settings = BotSettings::from_lookup(vars(&[]));
        assert_eq!(settings.queue_size, 32);
        assert!(settings.reply_on_malformed);
    }

    #[test]
    fn test_settings_reject_bad_queue_size() {
        for raw in ["0", "abc", "-4", ""] {
            let settings = BotSettings::from_lookup(vars(&[("MESSAGE_QUEUE_SIZE", raw)]));
            assert_eq!(settings.queue_size, 32, "queue size {raw:?}");
        }
    }

    #[test]
    fn test_settings_read_values() {
        let settings = BotSettings::from_lookup(vars(&[
            ("MESSAGE_QUEUE_SIZE", " 8 "),
            ("REPLY_ON_MALFORMED", "false"),
        ]));
        assert_eq!(settings.queue_size, 8);
        assert!(!settings.reply_on_malformed);
    }

    #[test]
    fn test_settings_ignore_unknown_bool() {
        let settings = BotSettings::from_lookup(vars(&[("REPLY_ON_MALFORMED", "sometimes")]));
        assert!(settings.reply_on_malformed);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" OFF "), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_telegram_config_debug_hides_token() {
        let config = TelegramConfig::new("123:secret".to_owned());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
    }
}
