// SPDX-License-Identifier: GPL-3.0-only

#![allow(non_upper_case_globals, non_camel_case_types, unused_imports, clippy::all)]

pub mod lock {
    use wayland_client;
    use wayland_client::protocol::*;

    pub mod __interfaces {
        use wayland_client::backend as wayland_backend;
        use wayland_client::protocol::__interfaces::*;
        wayland_scanner::generate_interfaces!("resources/protocols/lock.xml");
    }
    use self::__interfaces::*;

    wayland_scanner::generate_client_code!("resources/protocols/lock.xml");
}
