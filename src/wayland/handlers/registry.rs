// SPDX-License-Identifier: GPL-3.0-only

use crate::wayland::WaylandState;
use tracing::{debug, warn};
use wayland_client::{
    globals::GlobalListContents,
    protocol::wl_registry::{self, WlRegistry},
    Connection, Dispatch, QueueHandle,
};

impl Dispatch<WlRegistry, GlobalListContents> for WaylandState {
    fn event(
        _state: &mut Self,
        _registry: &WlRegistry,
        event: wl_registry::Event,
        _data: &GlobalListContents,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global {
                name, interface, ..
            } if interface == "wl_output" => {
                warn!(name, "Output appeared after locking, it will not be covered");
            }
            wl_registry::Event::GlobalRemove { name } => {
                debug!(name, "Global removed");
            }
            _ => {}
        }
    }
}
