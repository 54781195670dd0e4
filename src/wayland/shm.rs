// SPDX-License-Identifier: GPL-3.0-only

use super::WaylandState;
use crate::render;
use std::{io::Write, os::fd::AsFd};
use tiny_skia::Pixmap;
use wayland_client::{
    protocol::{wl_buffer::WlBuffer, wl_shm, wl_shm::WlShm},
    QueueHandle,
};

/// Copies `frame` into an anonymous file and wraps it in a `wl_buffer`.
pub fn create_buffer(
    shm: &WlShm,
    qh: &QueueHandle<WaylandState>,
    frame: &Pixmap,
) -> std::io::Result<WlBuffer> {
    let data = render::argb8888(frame);
    let mut file = tempfile::tempfile()?;
    file.write_all(&data)?;
    file.flush()?;

    let (width, height) = (frame.width() as i32, frame.height() as i32);
    let pool = shm.create_pool(file.as_fd(), data.len() as i32, qh, ());
    let buffer = pool.create_buffer(
        0,
        width,
        height,
        width * 4,
        wl_shm::Format::Argb8888,
        qh,
        (),
    );
    // the buffer keeps the pool's memory alive
    pool.destroy();
    Ok(buffer)
}
