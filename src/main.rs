// SPDX-License-Identifier: GPL-3.0-only

use anyhow::{Context, Result};
use clap::Parser;
use cosmic_lock_config::LockConfig;
use tracing::{error, info};

mod auth;
mod backend;
mod cli;
mod image;
mod lock;
mod logger;
mod render;
mod scaling;
mod secret;
mod session;
mod wayland;

use crate::{auth::AuthGate, session::Session, wayland::WaylandBackend};

fn main() {
    let args = cli::Args::parse();

    if let Err(err) = logger::init_logger() {
        eprintln!("Failed to initialize logger: {:?}", err);
    }

    info!("Cosmic lock starting up!");

    if let Err(err) = run(args) {
        error!("{:?}", err);
        std::process::exit(1);
    }
}

fn run(args: cli::Args) -> Result<()> {
    let config = LockConfig::load().context("Failed to load configuration")?;
    let settings = args.resolve(config)?;

    let gate = AuthGate::for_current_user(auth::PamOracle)
        .context("Failed to look up the user to authenticate")?;
    let image = image::load_image(&settings.image)
        .with_context(|| format!("Failed to load background {}", settings.image.display()))?;

    let backend = WaylandBackend::connect()?;
    let mut session = Session::new(backend, gate);
    session
        .paint(&image, settings.scaling)
        .context("Failed to paint the lock screen")?;
    drop(image);

    session.run()?;
    info!("Unlocked");
    Ok(())
}
