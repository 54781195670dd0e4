// SPDX-License-Identifier: GPL-3.0-only

use crate::{
    backend::{Key, KeyEvent},
    wayland::WaylandState,
};
use std::os::fd::OwnedFd;
use tracing::{debug, warn};
use wayland_client::{
    protocol::wl_keyboard::{self, WlKeyboard},
    Connection, Dispatch, QueueHandle, WEnum,
};
use xkbcommon::xkb;

/// Keymap and modifier state of the seat's keyboard.
pub struct Xkb {
    context: xkb::Context,
    state: Option<xkb::State>,
}

impl Xkb {
    pub fn new() -> Xkb {
        Xkb {
            context: xkb::Context::new(xkb::CONTEXT_NO_FLAGS),
            state: None,
        }
    }

    fn load_keymap(&mut self, fd: OwnedFd, size: u32) {
        // SAFETY: the compositor hands us a keymap fd of at least `size` bytes
        let keymap = unsafe {
            xkb::Keymap::new_from_fd(
                &self.context,
                fd,
                size as usize,
                xkb::KEYMAP_FORMAT_TEXT_V1,
                xkb::KEYMAP_COMPILE_NO_FLAGS,
            )
        };
        match keymap {
            Ok(Some(keymap)) => {
                self.state = Some(xkb::State::new(&keymap));
                debug!("Loaded keymap");
            }
            Ok(None) => warn!("Compositor sent an invalid keymap"),
            Err(err) => warn!(?err, "Failed to read keymap"),
        }
    }

    fn update_modifiers(&mut self, depressed: u32, latched: u32, locked: u32, group: u32) {
        if let Some(state) = self.state.as_mut() {
            state.update_mask(depressed, latched, locked, 0, 0, group);
        }
    }

    /// Translates a wayland key code. `None` until a keymap arrived.
    fn key(&self, key: u32) -> Option<Key> {
        let state = self.state.as_ref()?;
        let keycode = xkb::Keycode::new(key + 8);
        Some(classify(
            state.key_get_one_sym(keycode),
            state.key_get_utf32(keycode),
        ))
    }
}

impl Default for Xkb {
    fn default() -> Self {
        Xkb::new()
    }
}

pub fn classify(sym: xkb::Keysym, code_point: u32) -> Key {
    if sym == xkb::Keysym::Return || sym == xkb::Keysym::KP_Enter {
        return Key::Commit;
    }
    match char::from_u32(code_point) {
        Some(ch) if ch != '\0' => Key::Char(ch),
        _ => Key::Other,
    }
}

impl Dispatch<WlKeyboard, ()> for WaylandState {
    fn event(
        state: &mut Self,
        _keyboard: &WlKeyboard,
        event: wl_keyboard::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_keyboard::Event::Keymap { format, fd, size } => match format {
                WEnum::Value(wl_keyboard::KeymapFormat::XkbV1) => {
                    state.xkb.load_keymap(fd, size)
                }
                other => warn!(?other, "Unsupported keymap format"),
            },
            wl_keyboard::Event::Key {
                key,
                state: key_state,
                ..
            } => {
                let pressed = matches!(key_state, WEnum::Value(wl_keyboard::KeyState::Pressed));
                if let Some(key) = state.xkb.key(key) {
                    state.pending_keys.push(KeyEvent::new(pressed, key));
                }
            }
            wl_keyboard::Event::Modifiers {
                mods_depressed,
                mods_latched,
                mods_locked,
                group,
                ..
            } => {
                state
                    .xkb
                    .update_modifiers(mods_depressed, mods_latched, mods_locked, group);
            }
            _ => {}
        }
    }
}
