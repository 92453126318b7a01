//! Camera Control Bot - Main Entry Point
//!
//! A Telegram bot that takes photos and records videos with a
//! Raspberry Pi camera on command.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use camera_control_bot::agent::{AgentMessage, CommandLoop};
use camera_control_bot::camera::{Camera, RaspiCamera};
use camera_control_bot::commands::{Dispatcher, HandlerRegistry, handlers};
use camera_control_bot::config::{BotSettings, CameraConfig, TelegramConfig};
use camera_control_bot::telegram::{TelegramBot, Transport};

/// Telegram bot for remote camera control.
#[derive(Parser, Debug)]
#[command(name = "camera_bot")]
#[command(about = "Take photos and record videos from a Telegram chat")]
#[command(version)]
struct Args {
    /// Path to the camera JSON configuration file.
    #[arg(short, long, default_value = "camera.json")]
    config: String,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Generate an example configuration file and exit.
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Handle example config generation
    if args.generate_config {
        return generate_example_config();
    }

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load configurations
    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;

    let bot_settings = BotSettings::from_env_with_defaults();

    let camera_config = CameraConfig::load_or_default(&args.config)
        .context("Failed to load camera configuration")?;

    camera_config
        .validate()
        .context("Camera configuration validation failed")?;

    info!(
        "Camera configured (records: {}, default recording: {}s, max: {}s)",
        camera_config.records_dir.display(),
        camera_config.default_record_secs,
        camera_config.max_record_secs
    );

    // Connect to Telegram
    let bot = TelegramBot::connect(&tg_config)
        .await
        .context("Failed to connect to Telegram")?;

    let camera: Arc<dyn Camera> = Arc::new(RaspiCamera::new(camera_config.clone()));
    let transport: Arc<dyn Transport> = Arc::new(bot.clone());

    let mut registry = HandlerRegistry::new();
    handlers::register_defaults(&mut registry, &camera, &camera_config);
    info!("Registered commands: {}", registry.tokens().join(", "));

    let command_loop = CommandLoop::new(Dispatcher::new(registry, transport))
        .with_reply_on_malformed(bot_settings.reply_on_malformed);

    // Create command channel
    let (tx, rx) = mpsc::channel::<AgentMessage>(bot_settings.queue_size);

    // Spawn command loop task
    let loop_handle = tokio::spawn(async move {
        command_loop.run(rx).await;
    });

    info!("Bot is running. Use Ctrl+C to stop.");

    // Blocks until Ctrl+C
    bot.listen(tx.clone()).await;

    // Cleanup
    info!("Shutting down...");
    let _ = tx.send(AgentMessage::Shutdown).await;
    let _ = loop_handle.await;

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Generates an example configuration file.
fn generate_example_config() -> Result<()> {
    let example = CameraConfig::example();
    example.save_to_file("camera.example.json")?;

    println!("✓ Example configuration written to: camera.example.json");
    println!("\nTo use this bot:");
    println!("1. Copy camera.example.json to camera.json");
    println!("2. Adjust the records folder and capture settings");
    println!("3. Create a .env file with TG_BOT_TOKEN");
    println!("4. Run: camera_bot");

    Ok(())
}
