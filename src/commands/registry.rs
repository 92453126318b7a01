//! Handler registry: command tokens bound to handlers.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use super::reply::HandlerContext;
use crate::camera::CameraError;
use crate::telegram::TransportError;

/// Faults raised inside command handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Reply failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Camera failed: {0}")]
    Camera(#[from] CameraError),

    #[error("Invalid argument '{value}': {reason}")]
    InvalidArgument { value: String, reason: String },
}

pub type HandlerResult = Result<(), HandlerError>;

/// Logic bound to a command token.
///
/// `args` holds the extracted argument values in order; it is empty when the
/// message carried none.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: &mut HandlerContext<'_>, args: &[String]) -> HandlerResult;
}

/// Maps command tokens to handlers, in registration order.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Vec<Box<dyn Handler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the list for `token`.
    ///
    /// Registering the same handler twice keeps both entries.
    pub fn register(&mut self, token: impl Into<String>, handler: impl Handler + 'static) {
        self.handlers
            .entry(token.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Returns the handlers for `token`, or an empty slice if it is unknown.
    #[must_use]
    pub fn lookup(&self, token: &str) -> &[Box<dyn Handler>] {
        self.handlers
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns every registered token, sorted.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    /// Returns the number of registered tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no token has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("tokens", &self.tokens())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl Handler for Noop {
        async fn call(&self, _ctx: &mut HandlerContext<'_>, _args: &[String]) -> HandlerResult {
            Ok(())
        }
    }

    #[test]
    fn test_lookup_unknown_token_is_empty() {
        let registry = HandlerRegistry::new();
        assert!(registry.lookup("/missing").is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_appends() {
        let mut registry = HandlerRegistry::new();
        registry.register("/photo", Noop);
        registry.register("/photo", Noop);
        registry.register("/record", Noop);

        assert_eq!(registry.lookup("/photo").len(), 2);
        assert_eq!(registry.lookup("/record").len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = HandlerRegistry::new();
        registry.register("/photo", Noop);
        assert!(registry.lookup("/Photo").is_empty());
    }

    #[test]
    fn test_tokens_sorted() {
        let mut registry = HandlerRegistry::new();
        registry.register("/status", Noop);
        registry.register("/help", Noop);
        registry.register("/photo", Noop);
        assert_eq!(registry.tokens(), vec!["/help", "/photo", "/status"]);
    }
}
