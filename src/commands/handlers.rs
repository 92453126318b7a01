//! Camera commands registered at startup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::registry::{Handler, HandlerError, HandlerRegistry, HandlerResult};
use super::reply::HandlerContext;
use crate::camera::Camera;
use crate::config::CameraConfig;

/// Reply sent when a camera command arrives before `/start`.
pub const NOT_LISTENING: &str = "Bot is not listening. Send /start first.";

/// Usage and description of the built-in commands, keyed by token.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("/start", "/start", "Start listening for camera commands"),
    ("/stop", "/stop", "Stop listening for camera commands"),
    ("/photo", "/photo", "Take a photo"),
    (
        "/record",
        "/record delay=<sec>",
        "Record a video (default length if no delay)",
    ),
    ("/purge", "/purge", "Delete all photos and videos"),
    ("/status", "/status", "Show the bot status"),
    ("/help", "/help", "Show this help message"),
];

/// Registers every camera command.
pub fn register_defaults(
    registry: &mut HandlerRegistry,
    camera: &Arc<dyn Camera>,
    config: &CameraConfig,
) {
    registry.register("/start", StartCommand);
    registry.register("/stop", StopCommand);
    registry.register("/photo", PhotoCommand::new(Arc::clone(camera)));
    registry.register(
        "/record",
        RecordCommand::new(
            Arc::clone(camera),
            config.default_record_secs,
            config.max_record_secs,
        ),
    );
    registry.register("/purge", PurgeCommand::new(Arc::clone(camera)));
    registry.register("/status", StatusCommand);
    registry.register("/help", HelpCommand);
}

/// `/start`: begin accepting camera commands.
pub struct StartCommand;

#[async_trait]
impl Handler for StartCommand {
    async fn call(&self, ctx: &mut HandlerContext<'_>, _args: &[String]) -> HandlerResult {
        ctx.session.set_listening(true);
        info!("Listening enabled");
        ctx.reply().send_text("Bot start").await?;
        Ok(())
    }
}

/// `/stop`: stop accepting camera commands.
pub struct StopCommand;

#[async_trait]
impl Handler for StopCommand {
    async fn call(&self, ctx: &mut HandlerContext<'_>, _args: &[String]) -> HandlerResult {
        ctx.session.set_listening(false);
        info!("Listening disabled");
        ctx.reply().send_text("Bot stop").await?;
        Ok(())
    }
}

/// `/photo`: capture and send a still.
pub struct PhotoCommand {
    camera: Arc<dyn Camera>,
}

impl PhotoCommand {
    #[must_use]
    pub fn new(camera: Arc<dyn Camera>) -> Self {
        Self { camera }
    }
}

#[async_trait]
impl Handler for PhotoCommand {
    async fn call(&self, ctx: &mut HandlerContext<'_>, _args: &[String]) -> HandlerResult {
        if !ctx.session.is_listening() {
            ctx.reply().send_text(NOT_LISTENING).await?;
            return Ok(());
        }

        let photo = self.camera.take_photo().await?;
        ctx.reply().send_photo(&photo, "photo").await?;
        Ok(())
    }
}

/// `/record [delay=<sec>]`: record a video and send it.
pub struct RecordCommand {
    camera: Arc<dyn Camera>,
    default_secs: u64,
    max_secs: u64,
}

impl RecordCommand {
    #[must_use]
    pub fn new(camera: Arc<dyn Camera>, default_secs: u64, max_secs: u64) -> Self {
        Self {
            camera,
            default_secs,
            max_secs,
        }
    }

    /// Resolves the recording length from the first argument.
    fn duration(&self, args: &[String]) -> Result<u64, HandlerError> {
        let Some(raw) = args.first() else {
            return Ok(self.default_secs);
        };

        let invalid = |reason: String| HandlerError::InvalidArgument {
            value: raw.clone(),
            reason,
        };

        let secs: u64 = raw
            .parse()
            .map_err(|_| invalid("delay must be a whole number of seconds".to_owned()))?;

        if secs == 0 {
            return Err(invalid("delay must be at least 1 second".to_owned()));
        }
        if secs > self.max_secs {
            return Err(invalid(format!(
                "delay must not exceed {} seconds",
                self.max_secs
            )));
        }

        Ok(secs)
    }
}

#[async_trait]
impl Handler for RecordCommand {
    async fn call(&self, ctx: &mut HandlerContext<'_>, args: &[String]) -> HandlerResult {
        if !ctx.session.is_listening() {
            ctx.reply().send_text(NOT_LISTENING).await?;
            return Ok(());
        }

        let secs = self.duration(args)?;
        ctx.reply()
            .send_text(format!("Recording {secs}s of video..."))
            .await?;

        let record = self.camera.start_recording(secs).await?;
        ctx.reply().send_video_or_error(&record, "video").await?;
        Ok(())
    }
}

/// `/purge`: delete stored records.
pub struct PurgeCommand {
    camera: Arc<dyn Camera>,
}

impl PurgeCommand {
    #[must_use]
    pub fn new(camera: Arc<dyn Camera>) -> Self {
        Self { camera }
    }
}

#[async_trait]
impl Handler for PurgeCommand {
    async fn call(&self, ctx: &mut HandlerContext<'_>, _args: &[String]) -> HandlerResult {
        let result = self.camera.purge_records().await;
        ctx.reply().send_text(result).await?;
        Ok(())
    }
}

/// `/status`: report the session state.
pub struct StatusCommand;

#[async_trait]
impl Handler for StatusCommand {
    async fn call(&self, ctx: &mut HandlerContext<'_>, _args: &[String]) -> HandlerResult {
        let listening = if ctx.session.is_listening() {
            "▶ Listening"
        } else {
            "⏸ Idle"
        };

        let message = format!(
            "Status: {listening}\n\
             Last command: {}",
            ctx.session.last_command().unwrap_or("none"),
        );

        ctx.reply().send_text(message).await?;
        Ok(())
    }
}

/// `/help`: list the registered commands.
pub struct HelpCommand;

#[async_trait]
impl Handler for HelpCommand {
    async fn call(&self, ctx: &mut HandlerContext<'_>, _args: &[String]) -> HandlerResult {
        let text = help_text(&ctx.commands());
        ctx.reply().send_text(text).await?;
        Ok(())
    }
}

/// Formats one line per token. Tokens without a known description are listed bare.
fn help_text(tokens: &[&str]) -> String {
    let mut lines = vec!["Available commands:".to_owned()];
    lines.extend(tokens.iter().map(|token| {
        COMMANDS
            .iter()
            .find(|(known, _, _)| known == token)
            .map_or_else(
                || (*token).to_owned(),
                |(_, usage, description)| format!("{usage} - {description}"),
            )
    }));
    lines.join("\n")
}
