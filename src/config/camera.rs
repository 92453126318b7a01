//! Camera configuration and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during camera configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Program for {role} is empty")]
    EmptyProgram { role: &'static str },

    #[error("Invalid resolution: {width}x{height} (both must be > 0)")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Default recording duration must be > 0 seconds")]
    ZeroDuration,

    #[error("Default recording duration {default_secs}s exceeds the maximum of {max_secs}s")]
    DurationAboveMax { default_secs: u64, max_secs: u64 },

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Camera settings loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CameraConfig {
    /// Folder where photos and videos are written.
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,

    /// Still capture program (`raspistill`).
    #[serde(default = "default_photo_program")]
    pub photo_program: String,

    /// Video capture program (`raspivid`).
    #[serde(default = "default_video_program")]
    pub video_program: String,

    /// H.264 to MP4 converter (`MP4Box`).
    #[serde(default = "default_converter_program")]
    pub converter_program: String,

    /// Capture width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Capture height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Recording length used when `/record` has no `delay=` argument.
    #[serde(default = "default_record_secs")]
    pub default_record_secs: u64,

    /// Longest recording a chat may request.
    #[serde(default = "default_max_record_secs")]
    pub max_record_secs: u64,
}

fn default_records_dir() -> PathBuf {
    PathBuf::from("records")
}

fn default_photo_program() -> String {
    "raspistill".to_owned()
}

fn default_video_program() -> String {
    "raspivid".to_owned()
}

fn default_converter_program() -> String {
    "MP4Box".to_owned()
}

const fn default_width() -> u32 {
    1280
}

const fn default_height() -> u32 {
    720
}

const fn default_record_secs() -> u64 {
    60
}

const fn default_max_record_secs() -> u64 {
    600 // 10 minutes
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            records_dir: default_records_dir(),
            photo_program: default_photo_program(),
            video_program: default_video_program(),
            converter_program: default_converter_program(),
            width: default_width(),
            height: default_height(),
            default_record_secs: default_record_secs(),
            max_record_secs: default_max_record_secs(),
        }
    }
}

impl CameraConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Loads configuration from a JSON file, falling back to defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_all().into_iter().find_map(Result::err).map_or(Ok(()), Err)
    }

    /// Runs every check and returns one result per check.
    #[must_use]
    pub fn validate_all(&self) -> Vec<Result<(), ValidationError>> {
        let programs = [
            ("photo capture", &self.photo_program),
            ("video capture", &self.video_program),
            ("conversion", &self.converter_program),
        ];

        let mut results: Vec<_> = programs
            .into_iter()
            .map(|(role, program)| {
                if program.trim().is_empty() {
                    Err(ValidationError::EmptyProgram { role })
                } else {
                    Ok(())
                }
            })
            .collect();

        results.push(if self.width == 0 || self.height == 0 {
            Err(ValidationError::InvalidResolution {
                width: self.width,
                height: self.height,
            })
        } else {
            Ok(())
        });

        results.push(if self.default_record_secs == 0 {
            Err(ValidationError::ZeroDuration)
        } else if self.default_record_secs > self.max_record_secs {
            Err(ValidationError::DurationAboveMax {
                default_secs: self.default_record_secs,
                max_secs: self.max_record_secs,
            })
        } else {
            Ok(())
        });

        results
    }

    /// Creates an example configuration for users to reference.
    #[must_use]
    pub fn example() -> Self {
        Self {
            records_dir: PathBuf::from("/home/pi/records"),
            default_record_secs: 30,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CameraConfig::default().validate().is_ok());
        assert!(CameraConfig::example().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CameraConfig = serde_json::from_str(r#"{"width": 640}"#).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 720);
        assert_eq!(config.video_program, "raspivid");
        assert_eq!(config.default_record_secs, 60);
    }

    #[test]
    fn test_validation_empty_program() {
        let config = CameraConfig {
            converter_program: "  ".to_owned(),
            ..CameraConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyProgram { role: "conversion" })
        ));
    }

    #[test]
    fn test_validation_zero_resolution() {
        let config = CameraConfig {
            height: 0,
            ..CameraConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_validation_durations() {
        let zero = CameraConfig {
            default_record_secs: 0,
            ..CameraConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ValidationError::ZeroDuration)));

        let too_long = CameraConfig {
            default_record_secs: 120,
            max_record_secs: 60,
            ..CameraConfig::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(ValidationError::DurationAboveMax { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camera.json");

        let config = CameraConfig::example();
        config.save_to_file(&path).unwrap();

        assert_eq!(CameraConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CameraConfig::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, CameraConfig::default());
    }
}
