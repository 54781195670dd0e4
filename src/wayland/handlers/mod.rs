// SPDX-License-Identifier: GPL-3.0-only

use super::WaylandState;
use wayland_client::{
    delegate_noop,
    protocol::{
        wl_buffer::WlBuffer, wl_compositor::WlCompositor, wl_shm::WlShm, wl_shm_pool::WlShmPool,
        wl_surface::WlSurface,
    },
};

pub mod keyboard;
pub mod output;
pub mod registry;
pub mod seat;
pub mod session_lock;

delegate_noop!(WaylandState: WlCompositor);
delegate_noop!(WaylandState: WlShmPool);
delegate_noop!(WaylandState: ignore WlShm);
// buffers stay attached for the whole session, releases don't matter
delegate_noop!(WaylandState: ignore WlBuffer);
delegate_noop!(WaylandState: ignore WlSurface);
