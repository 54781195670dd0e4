// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

pub const CONFIG_PREFIX: &str = "cosmic-lock";
pub const CONFIG_FILE: &str = "config.ron";

/// How the background image is placed onto each output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    /// Scale both axes independently to cover the output exactly.
    Stretch,
    /// Keep the aspect ratio and cover the whole output, cropping overflow.
    Fill,
    /// Keep the aspect ratio and show the whole image, letterboxing if needed.
    #[default]
    Fit,
    /// Draw the image unscaled in the middle of the output.
    Center,
    /// Repeat the image unscaled from the top-left corner.
    Tile,
}

impl ScalingMode {
    pub const ALL: [ScalingMode; 5] = [
        ScalingMode::Stretch,
        ScalingMode::Fill,
        ScalingMode::Fit,
        ScalingMode::Center,
        ScalingMode::Tile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalingMode::Stretch => "stretch",
            ScalingMode::Fill => "fill",
            ScalingMode::Fit => "fit",
            ScalingMode::Center => "center",
            ScalingMode::Tile => "tile",
        }
    }
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported scaling mode: {0}")]
pub struct UnknownScalingMode(pub String);

impl FromStr for ScalingMode {
    type Err = UnknownScalingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownScalingMode(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub image: Option<PathBuf>,
    pub scaling: ScalingMode,
}

impl LockConfig {
    /// Loads `config.ron` from the XDG config directories, falling back to
    /// defaults if there is no such file.
    pub fn load() -> Result<LockConfig, ConfigError> {
        let path = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX)
            .ok()
            .and_then(|dirs| dirs.find_config_file(CONFIG_FILE));
        match path {
            Some(path) => LockConfig::load_from(&path),
            None => Ok(LockConfig::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<LockConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
