// SPDX-License-Identifier: GPL-3.0-only

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use cosmic_lock_config::{LockConfig, ScalingMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cosmic-lock", version, about = "Locks the screen of a wayland session")]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Display the given png image
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Scaling mode: stretch, fill, fit, center, tile
    #[arg(short, long, value_name = "MODE", conflicts_with = "tiling")]
    pub scaling: Option<ScalingMode>,

    /// Same as --scaling=tile
    #[arg(short, long)]
    pub tiling: bool,

    /// Show the version number and quit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

/// What the lock screen shows, after merging arguments and config.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub image: PathBuf,
    pub scaling: ScalingMode,
}

impl Args {
    pub fn resolve(self, config: LockConfig) -> Result<Settings> {
        let scaling = if self.tiling {
            ScalingMode::Tile
        } else {
            self.scaling.unwrap_or(config.scaling)
        };
        let image = self
            .image
            .or(config.image)
            .ok_or_else(|| anyhow!("No image specified!"))?;
        Ok(Settings { image, scaling })
    }
}
