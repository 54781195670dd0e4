// SPDX-License-Identifier: GPL-3.0-only

use crate::backend::{scrub, BackendError, KeyEvent, LockBackend, OutputInfo};
use tiny_skia::Pixmap;
use tracing::{debug, info};
use wayland_client::{
    globals::{registry_queue_init, BindError},
    protocol::{
        wl_compositor::WlCompositor, wl_keyboard::WlKeyboard, wl_output::WlOutput,
        wl_seat::WlSeat, wl_shm::WlShm,
    },
    Connection, EventQueue,
};

use self::{
    handlers::{keyboard::Xkb, output::Output, session_lock::LockSurface},
    protocols::lock::lock::Lock,
};

pub mod handlers;
pub mod protocols;
mod shm;

/// State touched by the event handlers while dispatching.
#[derive(Default)]
pub struct WaylandState {
    outputs: Vec<Output>,
    keyboard: Option<WlKeyboard>,
    xkb: Xkb,
    pending_keys: Vec<KeyEvent>,
}

pub struct WaylandBackend {
    conn: Connection,
    queue: EventQueue<WaylandState>,
    state: WaylandState,
    lock: Lock,
    shm: WlShm,
    _compositor: WlCompositor,
    _seat: WlSeat,
    surfaces: Vec<LockSurface>,
    outputs: Vec<OutputInfo>,
}

fn bind_error(interface: &'static str) -> impl FnOnce(BindError) -> BackendError {
    move |source| match source {
        BindError::NotPresent => BackendError::MissingGlobal(interface),
        source => BackendError::Bind { interface, source },
    }
}

impl WaylandBackend {
    /// Connects to the compositor and creates one surface per output.
    ///
    /// The lock extension is bound first, so a compositor without it is
    /// rejected before any output is bound.
    pub fn connect() -> Result<WaylandBackend, BackendError> {
        let conn = Connection::connect_to_env()?;
        let (globals, mut queue) = registry_queue_init::<WaylandState>(&conn)?;
        let qh = queue.handle();

        let lock: Lock = globals.bind(&qh, 1..=1, ()).map_err(bind_error("lock"))?;
        let compositor: WlCompositor = globals
            .bind(&qh, 4..=5, ())
            .map_err(bind_error("wl_compositor"))?;
        let shm: WlShm = globals.bind(&qh, 1..=1, ()).map_err(bind_error("wl_shm"))?;
        let seat: WlSeat = globals.bind(&qh, 1..=7, ()).map_err(bind_error("wl_seat"))?;

        let mut state = WaylandState::default();
        let output_globals: Vec<(u32, u32)> = globals.contents().with_list(|list| {
            list.iter()
                .filter(|global| global.interface == "wl_output")
                .map(|global| (global.name, global.version))
                .collect()
        });
        let registry = globals.registry();
        for (name, version) in output_globals {
            let wl_output: WlOutput = registry.bind(name, version.min(4), &qh, name);
            state.outputs.push(Output::new(name, wl_output));
        }
        // modes, names and seat capabilities
        queue.roundtrip(&mut state)?;

        let mut surfaces = Vec::with_capacity(state.outputs.len());
        let mut outputs = Vec::with_capacity(state.outputs.len());
        for output in &state.outputs {
            let (width, height) = output
                .size()
                .ok_or_else(|| BackendError::NoMode(output.label()))?;
            debug!(output = output.label(), width, height, "Creating surface");
            surfaces.push(LockSurface::new(
                compositor.create_surface(&qh, ()),
                output.wl_output.clone(),
            ));
            outputs.push(OutputInfo {
                id: output.global,
                name: output.name.clone(),
                width,
                height,
            });
        }
        info!("Connected to the compositor, {} outputs", outputs.len());

        Ok(WaylandBackend {
            conn,
            queue,
            state,
            lock,
            shm,
            _compositor: compositor,
            _seat: seat,
            surfaces,
            outputs,
        })
    }
}

impl LockBackend for WaylandBackend {
    fn outputs(&self) -> &[OutputInfo] {
        &self.outputs
    }

    fn present(&mut self, output: usize, frame: &Pixmap) -> Result<(), BackendError> {
        let surface = self
            .surfaces
            .get_mut(output)
            .ok_or(BackendError::UnknownOutput(output))?;
        let buffer = shm::create_buffer(&self.shm, &self.queue.handle(), frame)?;
        surface.attach(buffer, frame.width(), frame.height());
        self.conn.flush().map_err(BackendError::Flush)
    }

    fn announce_lock_surface(&mut self, output: usize) -> Result<(), BackendError> {
        let surface = self
            .surfaces
            .get(output)
            .ok_or(BackendError::UnknownOutput(output))?;
        if !surface.is_presented() {
            return Err(BackendError::NotPresented(output));
        }
        surface.announce(&self.lock);
        self.conn.flush().map_err(BackendError::Flush)
    }

    fn dispatch(&mut self, events: &mut Vec<KeyEvent>) -> Result<(), BackendError> {
        self.queue.blocking_dispatch(&mut self.state)?;
        events.append(&mut self.state.pending_keys);
        scrub(&mut self.state.pending_keys);
        Ok(())
    }
}
