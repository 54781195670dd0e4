// SPDX-License-Identifier: GPL-3.0-only

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logger() -> Result<()> {
    let level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    let journald = tracing_journald::layer();
    let (journald_layer, journald_err) = match journald {
        Ok(layer) => (Some(layer), None),
        Err(err) => (None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(journald_layer)
        .try_init()?;

    if let Some(err) = journald_err {
        debug!(?err, "Journald is not available");
    }

    log_panics::init();

    Ok(())
}
