// SPDX-License-Identifier: GPL-3.0-only

use crate::wayland::WaylandState;
use tracing::debug;
use wayland_client::{
    protocol::wl_seat::{self, WlSeat},
    Connection, Dispatch, Proxy, QueueHandle, WEnum,
};

impl Dispatch<WlSeat, ()> for WaylandState {
    fn event(
        state: &mut Self,
        seat: &WlSeat,
        event: wl_seat::Event,
        _data: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let wl_seat::Event::Capabilities {
            capabilities: WEnum::Value(capabilities),
        } = event
        else {
            return;
        };

        let has_keyboard = capabilities.contains(wl_seat::Capability::Keyboard);
        if has_keyboard && state.keyboard.is_none() {
            debug!("Seat gained a keyboard");
            state.keyboard = Some(seat.get_keyboard(qh, ()));
        } else if !has_keyboard {
            if let Some(keyboard) = state.keyboard.take() {
                debug!("Seat lost its keyboard");
                if keyboard.version() >= 3 {
                    keyboard.release();
                }
            }
        }
    }
}
