//! Engine configuration
//!
//! Serde-backed configuration loadable from TOML. Every field defaults, so
//! partial files work and `EngineConfig::default()` runs headless tests
//! without any file at all.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width in pixels
    pub width: u32,

    /// Window height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ember Engine Application".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Clear color for the geometry pass (RGBA)
    pub clear_color: [f32; 4],

    /// Live-entity bound for the world
    pub max_entities: usize,

    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,

    /// Near clip plane distance
    pub z_near: f32,

    /// Far clip plane distance
    pub z_far: f32,

    /// Path of the geometry vertex shader source
    pub vertex_shader: String,

    /// Path of the geometry fragment shader source
    pub fragment_shader: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.02, 0.02, 0.05, 1.0],
            max_entities: crate::ecs::MAX_ENTITIES,
            fov_y_degrees: 60.0,
            z_near: 0.1,
            z_far: 256.0,
            vertex_shader: "shaders/geometry.vert".to_string(),
            fragment_shader: "shaders/geometry.frag".to_string(),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Renderer settings
    pub renderer: RendererConfig,
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [window]
            title = "Demo"
            width = 1920

            [renderer]
            max_entities = 128
            "#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.renderer.max_entities, 128);
        assert_eq!(config.renderer.fov_y_degrees, 60.0);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_toml_str("window = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
