// SPDX-License-Identifier: GPL-3.0-only

use crate::wayland::WaylandState;
use wayland_client::{
    protocol::wl_output::{self, WlOutput},
    Connection, Dispatch, QueueHandle, WEnum,
};

/// A bound `wl_output` and what the compositor told us about it.
#[derive(Debug)]
pub struct Output {
    pub global: u32,
    pub wl_output: WlOutput,
    pub name: Option<String>,
    pub mode: Option<(i32, i32)>,
}

impl Output {
    pub fn new(global: u32, wl_output: WlOutput) -> Output {
        Output {
            global,
            wl_output,
            name: None,
            mode: None,
        }
    }

    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("#{}", self.global))
    }

    /// Current mode in pixels, if it is usable.
    pub fn size(&self) -> Option<(u32, u32)> {
        match self.mode {
            Some((width, height)) if width > 0 && height > 0 => Some((width as u32, height as u32)),
            _ => None,
        }
    }
}

impl Dispatch<WlOutput, u32> for WaylandState {
    fn event(
        state: &mut Self,
        _wl_output: &WlOutput,
        event: wl_output::Event,
        global: &u32,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        let Some(output) = state.outputs.iter_mut().find(|o| o.global == *global) else {
            return;
        };

        match event {
            wl_output::Event::Mode {
                flags: WEnum::Value(flags),
                width,
                height,
                ..
            } if flags.contains(wl_output::Mode::Current) => {
                output.mode = Some((width, height));
            }
            wl_output::Event::Name { name } => {
                output.name = Some(name);
            }
            _ => {}
        }
    }
}
