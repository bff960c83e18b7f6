/// Configuration system

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::TweenSettings;
use crate::projection::{Camera, Light};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        check_format(path)?;
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save configuration to a `.toml` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        check_format(path)?;
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

fn check_format(path: &Path) -> Result<(), ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(()),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Everything a scene host reads at startup; missing sections keep their
/// defaults
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub animation: TweenSettings,
    pub camera: Camera,
    pub light: Light,
}

impl Config for SceneConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionMode;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SceneConfig::from_toml_str(
            r#"
            [animation]
            frame_rate = 30

            [camera]
            yaw = 15.0
            mode = "orthographic"
            "#,
        )
        .unwrap();

        assert_eq!(config.animation.frame_rate, 30);
        assert_eq!(config.animation.final_frame, TweenSettings::default().final_frame);
        assert_eq!(config.camera.yaw, 15.0);
        assert_eq!(config.camera.mode, ProjectionMode::Orthographic);
        assert_eq!(config.camera.position, Camera::default().position);
        assert_eq!(config.light, Light::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SceneConfig::default();
        config.camera.position = [1.0, 2.0, -3.5];
        config.light.position = [0.0, 1.0, 0.0, 0.0];

        let text = config.to_toml_string().unwrap();
        let parsed = SceneConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("lane3d-config-{}.toml", std::process::id()));
        let mut config = SceneConfig::default();
        config.animation.final_frame = 90;

        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.animation.final_frame, 90);
    }

    #[test]
    fn test_unsupported_format() {
        let result = SceneConfig::default().save_to_file("scene.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
        assert!(matches!(
            SceneConfig::load_from_file("scene.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        let result = SceneConfig::from_toml_str("[animation]\nframe_rate = \"fast\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
