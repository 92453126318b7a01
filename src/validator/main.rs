//! Standalone validator for camera configuration files.
//!
//! This tool validates JSON configuration files for the camera bot,
//! checking capture programs, resolution and recording durations.

use std::process::ExitCode;

use clap::Parser;

use camera_control_bot::config::CameraConfig;

/// Camera configuration validator.
#[derive(Parser, Debug)]
#[command(name = "validate_camera_config")]
#[command(about = "Validates camera configuration files for the Telegram camera bot")]
#[command(version)]
struct Args {
    /// Path to the JSON configuration file to validate.
    #[arg(short, long, default_value = "camera.json")]
    file: String,

    /// Generate an example configuration file at the specified path.
    #[arg(long)]
    generate_example: Option<String>,

    /// Show the resolved settings.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(output_path) = args.generate_example {
        return generate_example(&output_path);
    }

    validate_config(&args.file, args.verbose)
}

fn generate_example(output_path: &str) -> ExitCode {
    match CameraConfig::example().save_to_file(output_path) {
        Ok(()) => {
            println!("✓ Example configuration written to: {output_path}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to write example file: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate_config(path: &str, verbose: bool) -> ExitCode {
    println!("Validating: {path}\n");

    let config = match CameraConfig::load_from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if verbose {
        println!("Records folder:   {}", config.records_dir.display());
        println!("Photo program:    {}", config.photo_program);
        println!("Video program:    {}", config.video_program);
        println!("Converter:        {}", config.converter_program);
        println!("Resolution:       {}x{}", config.width, config.height);
        println!(
            "Recording:        {}s default, {}s max\n",
            config.default_record_secs, config.max_record_secs
        );
    }

    let errors: Vec<_> = config
        .validate_all()
        .into_iter()
        .filter_map(Result::err)
        .collect();

    if errors.is_empty() {
        println!("✓ Configuration is valid!");
        ExitCode::SUCCESS
    } else {
        for e in &errors {
            println!("  ✗ Error: {e}");
        }
        println!("\n✗ Validation failed: {} error(s)", errors.len());
        ExitCode::FAILURE
    }
}
