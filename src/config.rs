//! Configuration file.
//!
//! Every section has defaults, so a config file only needs the keys it
//! changes. A missing file is the same as an empty one.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::easing::Easing;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "cube.toml";

/// Error produced when loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("unable to read {}: {source}", path.display())]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The file is not valid TOML or has the wrong shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level config file contents.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct CubeConfig {
    /// Turn animation timing
    pub animation: AnimationConfig,
    /// Scene object naming and layout
    pub scene: SceneConfig,
}

impl CubeConfig {
    /// Parses a config from TOML source.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a config file. A missing file yields the default config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Loads a config file, falling back to defaults if it cannot be loaded.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using default config");
            Self::default()
        })
    }
}

/// Timing of a single turn animation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Number of eased frames in one turn, before the final snap.
    pub frames: u32,
    /// Delay between frames, in milliseconds.
    pub frame_delay_ms: u64,
    /// Timing function applied to turn progress.
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 50,
            frame_delay_ms: 16,
            easing: Easing::default(),
        }
    }
}

impl AnimationConfig {
    /// Delay between frames.
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

/// How engine names map onto scene objects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Appended to every piece and face name to get its scene object name.
    pub name_suffix: String,
    /// Distance between adjacent slot centers, in scene units.
    pub piece_spacing: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name_suffix: "f".to_string(),
            piece_spacing: 1.0,
        }
    }
}

impl SceneConfig {
    /// Returns the scene object name for a piece or face name.
    pub fn object_name(&self, name: &str) -> String {
        format!("{name}{}", self.name_suffix)
    }
}
