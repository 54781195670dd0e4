// SPDX-License-Identifier: GPL-3.0-only

use crate::{
    auth::{AuthError, AuthGate, Oracle, Verdict},
    backend::{scrub, Key, KeyEvent, LockBackend},
    lock::{LockError, LockHandshake, LockState},
    secret::SecretBuffer,
};
use anyhow::{Context, Result};
use cosmic_lock_config::ScalingMode;
use tiny_skia::Pixmap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Unlock,
}

/// State of one lock session: owns the display backend, the lock handshake,
/// the credential being typed and the gate that checks it.
pub struct Session<B: LockBackend, O: Oracle> {
    backend: B,
    handshake: LockHandshake,
    secret: SecretBuffer,
    gate: AuthGate<O>,
}

impl<B: LockBackend, O: Oracle> Session<B, O> {
    pub fn new(backend: B, gate: AuthGate<O>) -> Session<B, O> {
        Session {
            backend,
            handshake: LockHandshake::new(),
            secret: SecretBuffer::new(),
            gate,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.handshake.is_armed()
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Draws the background on every output.
    pub fn paint(&mut self, image: &Pixmap, mode: ScalingMode) -> Result<(), LockError> {
        self.handshake.paint_all(&mut self.backend, image, mode)
    }

    /// Pumps events until the user authenticates.
    ///
    /// The first dispatch arms the lock. Returns `Ok` only on a successful
    /// unlock; every error is fatal.
    pub fn run(&mut self) -> Result<()> {
        if self.handshake.state() == LockState::Unarmed {
            return Err(LockError::OutOfOrder(LockState::Unarmed).into());
        }

        let mut events = Vec::new();
        loop {
            self.backend
                .dispatch(&mut events)
                .context("Event dispatch failed")?;

            let control = self.handle_batch(&events);
            scrub(&mut events);
            if control? == Control::Unlock {
                return Ok(());
            }

            if !self.is_locked() {
                self.handshake
                    .arm(&mut self.backend)
                    .context("Failed to lock outputs")?;
            }
        }
    }

    fn handle_batch(&mut self, events: &[KeyEvent]) -> Result<Control, AuthError> {
        for event in events {
            if self.handle_key(*event)? == Control::Unlock {
                return Ok(Control::Unlock);
            }
        }
        Ok(Control::Continue)
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> Result<Control, AuthError> {
        if !event.pressed {
            return Ok(Control::Continue);
        }

        match event.key {
            Key::Commit => match self.gate.authenticate(&mut self.secret)? {
                Verdict::Accepted => {
                    info!("Authenticated as {}", self.gate.user());
                    Ok(Control::Unlock)
                }
                Verdict::Rejected => Ok(Control::Continue),
            },
            Key::Char(ch) => {
                if !self.secret.append(ch) && ch != '\0' {
                    debug!(
                        "Secret buffer is full ({} bytes), dropping input",
                        self.secret.capacity()
                    );
                }
                Ok(Control::Continue)
            }
            Key::Other => Ok(Control::Continue),
        }
    }
}
