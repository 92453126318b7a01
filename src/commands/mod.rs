//! Command handling module.
//!
//! Parses chat text into commands, keeps the handler registry and the
//! session state, and dispatches each message to its handler.

mod dispatcher;
mod grammar;
pub mod handlers;
mod registry;
mod reply;
mod session;

pub use dispatcher::{DispatchError, DispatchResult, Dispatcher};
pub use grammar::{MalformedCommand, ParsedCommand};
pub use registry::{Handler, HandlerError, HandlerRegistry, HandlerResult};
pub use reply::{HandlerContext, ReplyAdapter};
pub use session::SessionState;
