//! Configuration system
//!
//! Runtime settings for containers and scenes, loadable from TOML or RON files.

pub use serde::{Serialize, Deserialize};

use crate::foundation::time::DEFAULT_MINIMAL_FRAMERATE;

/// Default number of destroyed instances kept per object type for recycling
pub const DEFAULT_RECYCLE_POOL_CAPACITY: usize = 128;

/// Default scale of the camera area used for culling
pub const DEFAULT_CULLING_SCALE: f32 = 2.0;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        Self::load_from_str(path, &contents)
    }

    /// Parse configuration from a string, picking the format from the file extension
    fn load_from_str(path: &str, contents: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings of an instance container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Maximum number of recycled instances kept per object type
    pub recycle_pool_capacity: usize,

    /// Keep 0 as the default Z order of every layer (projects made before
    /// default Z orders were computed from the initial instances)
    pub use_deprecated_zero_as_default_z_order: bool,

    /// Scale applied to camera extents when computing culling rectangles.
    /// The default of 2 leaves a margin around the view for effects drawn
    /// outside an instance's box.
    pub culling_scale: f32,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            recycle_pool_capacity: DEFAULT_RECYCLE_POOL_CAPACITY,
            use_deprecated_zero_as_default_z_order: false,
            culling_scale: DEFAULT_CULLING_SCALE,
        }
    }
}

impl Config for ContainerConfig {}

/// Settings of a runtime scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Width of the game resolution, in pixels
    pub viewport_width: f32,

    /// Height of the game resolution, in pixels
    pub viewport_height: f32,

    /// Frames slower than this rate are clamped to `1000 / minimal_framerate` ms
    pub minimal_framerate: f64,

    /// Settings of the scene's instance container
    pub container: ContainerConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            minimal_framerate: DEFAULT_MINIMAL_FRAMERATE,
            container: ContainerConfig::default(),
        }
    }
}

impl Config for SceneConfig {}
