// SPDX-License-Identifier: GPL-3.0-only

use tiny_skia::Pixmap;
use wayland_client::{
    backend::WaylandError,
    globals::{BindError, GlobalError},
    ConnectError, DispatchError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    /// Registry name of the output global.
    pub id: u32,
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Submits the entered secret.
    Commit,
    Char(char),
    /// Anything without a printable code point (modifiers, arrows, ...).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub pressed: bool,
    pub key: Key,
}

impl KeyEvent {
    pub fn new(pressed: bool, key: Key) -> KeyEvent {
        KeyEvent { pressed, key }
    }

    #[cfg(test)]
    pub fn pressed(key: Key) -> KeyEvent {
        KeyEvent::new(true, key)
    }

    pub fn released(key: Key) -> KeyEvent {
        KeyEvent::new(false, key)
    }
}

/// Overwrites every slot of `events`, spare capacity included, and empties it.
///
/// Key events carry typed characters of the secret, so a consumed buffer
/// must not keep them around in memory it still owns.
pub fn scrub(events: &mut Vec<KeyEvent>) {
    let blank = KeyEvent::released(Key::Other);
    events.clear();
    events.resize(events.capacity(), blank);
    for slot in events.iter_mut() {
        // SAFETY: `slot` is a valid, aligned and initialized element
        unsafe { std::ptr::write_volatile(slot, blank) };
    }
    events.clear();
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to connect to the wayland display")]
    Connect(#[from] ConnectError),
    #[error("Failed to retrieve wayland globals")]
    Globals(#[from] GlobalError),
    #[error("cosmic-lock requires the compositor to support the {0} extension")]
    MissingGlobal(&'static str),
    #[error("Failed to bind {interface}")]
    Bind {
        interface: &'static str,
        #[source]
        source: BindError,
    },
    #[error("Failed to create surfaces: output {0} has no current mode")]
    NoMode(String),
    #[error("No such output: {0}")]
    UnknownOutput(usize),
    #[error("Output {0} has nothing drawn on it yet")]
    NotPresented(usize),
    #[error("Failed to create shared memory buffer")]
    Buffer(#[from] std::io::Error),
    #[error("Lost connection to the wayland display")]
    Disconnected(#[from] DispatchError),
    #[error("Failed to send requests to the wayland display")]
    Flush(#[source] WaylandError),
}

/// Everything the lock session needs from the display server.
///
/// Outputs are addressed by their index in `outputs()`; every output owns
/// exactly one surface for the lifetime of the backend.
pub trait LockBackend {
    fn outputs(&self) -> &[OutputInfo];

    /// Attaches a finished frame to the output's surface and commits it.
    fn present(&mut self, output: usize, frame: &Pixmap) -> Result<(), BackendError>;

    /// Tells the compositor that the output's surface is its lock surface.
    fn announce_lock_surface(&mut self, output: usize) -> Result<(), BackendError>;

    /// Blocks until at least one event was dispatched, appending any key
    /// events to `events`.
    fn dispatch(&mut self, events: &mut Vec<KeyEvent>) -> Result<(), BackendError>;
}


#[cfg(test)]
mod tests {
    use super::{testing::stale_chars, *};

    #[test]
    fn scrub_overwrites_consumed_slots() {
        let mut events: Vec<KeyEvent> = "hunter2"
            .chars()
            .map(|ch| KeyEvent::pressed(Key::Char(ch)))
            .collect();
        events.push(KeyEvent::pressed(Key::Commit));
        let capacity = events.capacity();

        let consumed: Vec<KeyEvent> = events.drain(..).collect();
        assert_eq!(consumed.len(), 8);
        scrub(&mut events);

        assert!(events.is_empty());
        assert_eq!(events.capacity(), capacity);
        assert_eq!(stale_chars(&events), 0);
    }

    #[test]
    fn scrub_after_append_clears_the_source() {
        let mut pending = vec![KeyEvent::pressed(Key::Char('x')); 4];
        let mut events = Vec::new();
        events.append(&mut pending);
        scrub(&mut pending);

        assert_eq!(stale_chars(&pending), 0);
        assert_eq!(events.len(), 4);
    }
}
