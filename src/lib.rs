//! Camera Control Bot Library
//!
//! A Telegram bot for remote control of a Raspberry Pi camera.
//!
//! This crate provides the core functionality for:
//! - Parsing chat commands such as `/record delay=30`
//! - Dispatching commands to registered handlers
//! - Capturing photos and timed videos with the camera
//! - Sending text, photo and video replies through Telegram

pub mod agent;
pub mod camera;
pub mod commands;
pub mod config;
pub mod telegram;

#[cfg(test)]
mod testing;
