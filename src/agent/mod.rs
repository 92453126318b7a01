//! Command loop module.
//!
//! Owns the dispatcher and feeds it inbound messages one at a time.

mod runner;

pub use runner::{AgentMessage, CommandLoop};
