// SPDX-License-Identifier: GPL-3.0-only

use crate::{
    backend::{BackendError, LockBackend},
    render::{self, RenderError},
    scaling,
};
use cosmic_lock_config::ScalingMode;
use tiny_skia::Pixmap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Nothing has been drawn yet.
    Unarmed,
    /// Every output shows the background, the compositor does not know yet.
    Painting,
    /// Every surface has been announced as its output's lock surface.
    Armed,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("Lock handshake step out of order, currently {0:?}")]
    OutOfOrder(LockState),
    #[error("No outputs to lock")]
    NoOutputs,
    #[error("Failed to render output {output}")]
    Render {
        output: usize,
        #[source]
        source: RenderError,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Sequences painting and lock-surface announcement.
///
/// Steps can only be taken in order and each only once, so no surface is
/// handed to the compositor before every output shows the background.
#[derive(Debug)]
pub struct LockHandshake {
    state: LockState,
}

impl LockHandshake {
    pub fn new() -> LockHandshake {
        LockHandshake {
            state: LockState::Unarmed,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == LockState::Armed
    }

    /// Renders `image` onto every output and presents the result.
    pub fn paint_all<B: LockBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        image: &Pixmap,
        mode: ScalingMode,
    ) -> Result<(), LockError> {
        if self.state != LockState::Unarmed {
            return Err(LockError::OutOfOrder(self.state));
        }
        let outputs = backend.outputs().to_vec();
        if outputs.is_empty() {
            return Err(LockError::NoOutputs);
        }

        self.state = LockState::Painting;
        for (index, output) in outputs.iter().enumerate() {
            let transform = scaling::compute(
                output.width,
                output.height,
                image.width(),
                image.height(),
                mode,
            );
            debug!(
                output = output.name.as_deref().unwrap_or("unknown"),
                global = output.id,
                ?transform,
                "Painting {}x{}",
                output.width,
                output.height
            );
            let frame = render::paint(output.width, output.height, image, transform)
                .map_err(|source| LockError::Render {
                    output: index,
                    source,
                })?;
            backend.present(index, &frame)?;
        }
        Ok(())
    }

    /// Announces every surface as a lock surface. Does nothing once armed.
    pub fn arm<B: LockBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), LockError> {
        match self.state {
            LockState::Armed => return Ok(()),
            LockState::Unarmed => return Err(LockError::OutOfOrder(self.state)),
            LockState::Painting => {}
        }

        for index in 0..backend.outputs().len() {
            backend.announce_lock_surface(index)?;
        }
        self.state = LockState::Armed;
        info!("Session locked on {} outputs", backend.outputs().len());
        Ok(())
    }
}

impl Default for LockHandshake {
    fn default() -> Self {
        LockHandshake::new()
    }
}
