// SPDX-License-Identifier: GPL-3.0-only

use crate::wayland::{protocols::lock::lock::Lock, WaylandState};
use wayland_client::{
    delegate_noop,
    protocol::{wl_buffer::WlBuffer, wl_output::WlOutput, wl_surface::WlSurface},
};

/// The surface covering one output while the session is locked.
#[derive(Debug)]
pub struct LockSurface {
    surface: WlSurface,
    output: WlOutput,
    buffer: Option<WlBuffer>,
}

impl LockSurface {
    pub fn new(surface: WlSurface, output: WlOutput) -> LockSurface {
        LockSurface {
            surface,
            output,
            buffer: None,
        }
    }

    /// Attaches `buffer` and commits, replacing any earlier frame.
    pub fn attach(&mut self, buffer: WlBuffer, width: u32, height: u32) {
        self.surface.attach(Some(&buffer), 0, 0);
        self.surface.damage_buffer(0, 0, width as i32, height as i32);
        self.surface.commit();
        if let Some(old) = self.buffer.replace(buffer) {
            old.destroy();
        }
    }

    pub fn is_presented(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn announce(&self, lock: &Lock) {
        lock.set_lock_surface(&self.output, &self.surface);
    }
}

impl Drop for LockSurface {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
        self.surface.destroy();
    }
}

// the lock interface has no events
delegate_noop!(WaylandState: Lock);
