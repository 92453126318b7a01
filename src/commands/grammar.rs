//! Command text grammar.
//!
//! A command is a `/word` at the very start of the message, optionally
//! followed anywhere by `key=value` fragments. Only the values are kept,
//! in the order they appear: `/record delay=30` yields `("/record", ["30"])`.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[allow(clippy::expect_used)]
static COMMAND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\w+").expect("Failed to compile command regex"));

#[allow(clippy::expect_used)]
static ARGUMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=(\w+)").expect("Failed to compile argument regex"));

/// The message text does not start with a `/word` command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed command: \"{text}\"")]
pub struct MalformedCommand {
    /// The text that failed to parse.
    pub text: String,
}

/// A command token together with its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Canonical token, e.g. `/record`. Compared case-sensitively.
    pub token: String,

    /// Argument values in left-to-right order. Empty when none were given.
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Parses raw message text.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCommand`] if the text does not begin with `/word`.
    pub fn parse(text: &str) -> Result<Self, MalformedCommand> {
        let args = ARGUMENT_REGEX
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .collect();

        let token = COMMAND_REGEX
            .find(text)
            .map(|m| m.as_str().to_owned())
            .ok_or_else(|| MalformedCommand {
                text: text.to_owned(),
            })?;

        Ok(Self { token, args })
    }
}
