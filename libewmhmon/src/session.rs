//! `Session` owns the connection to the X server for the lifetime of the monitor. On connect it
//! interns the atoms the monitor needs and creates a small unmapped sentinel window whose only
//! purpose is to be the destination of the shutdown wake message.
use std::sync::Arc;

use tracing::{debug, trace};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{
            Atom, ChangeWindowAttributesAux, ConnectionExt as _, CreateWindowAux, EventMask, Window, WindowClass,
        },
        Event,
    },
    rust_connection::RustConnection,
};

use crate::{
    atoms::AtomCollection,
    server::{PropertyValue, WindowServer},
    WatchResult,
};

/// Session provides the live X11 side of the monitor
pub struct Session {
    conn: Arc<RustConnection>, // x11 connection
    atoms: AtomCollection,     // atom cache
    root: Window,              // root window id
    sentinel: Window,          // wake message destination
}

impl Session {
    /// Connect to the X server named by the environment, resolve atoms and create the sentinel
    /// window. Failure here is fatal for the monitor.
    pub fn connect() -> WatchResult<Self> {
        let (conn, screen) = x11rb::connect(None)?;
        let (root, visual) = {
            let screen = &conn.setup().roots[screen];
            (screen.root, screen.root_visual)
        };

        let atoms = AtomCollection::new(&conn)?.reply()?;
        let sentinel = Session::create_sentinel_window(&conn, root, visual)?;

        debug!("connect: screen: {}, root: {}, sentinel: {}", screen, root, sentinel);
        Ok(Session { conn: Arc::new(conn), atoms, root, sentinel })
    }

    // The core protocol rejects zero sized windows so the sentinel is 1x1 and never mapped
    fn create_sentinel_window(conn: &RustConnection, root: Window, visual: u32) -> WatchResult<Window> {
        let win = conn.generate_id()?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            win,
            root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &CreateWindowAux::new(),
        )?
        .check()?;
        Ok(win)
    }

    /// Shared handle to the connection for the shutdown bridge
    pub fn connection(&self) -> Arc<RustConnection> {
        self.conn.clone()
    }

    /// Destroy the sentinel window and release the connection
    pub fn close(self) -> WatchResult<()> {
        self.conn.destroy_window(self.sentinel)?;
        self.conn.flush()?;
        debug!("close: sentinel: {}", self.sentinel);
        Ok(())
    }
}

impl WindowServer for Session {
    fn atoms(&self) -> &AtomCollection {
        &self.atoms
    }

    fn root(&self) -> Window {
        self.root
    }

    fn sentinel(&self) -> Window {
        self.sentinel
    }

    fn get_property(&self, win: Window, property: Atom, type_: Atom, long_length: u32) -> WatchResult<PropertyValue> {
        let reply = self.conn.get_property(false, win, property, type_, 0, long_length)?.reply()?;
        trace!("get_property: id: {}, property: {}, type: {}, len: {}", win, property, reply.type_, reply.value_len);
        Ok(reply.into())
    }

    fn subscribe(&self, win: Window) -> WatchResult<()> {
        // Errors for windows that are already gone come back later as error events
        let aux = ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE);
        self.conn.change_window_attributes(win, &aux)?;
        self.conn.flush()?;
        trace!("subscribe: id: {}", win);
        Ok(())
    }

    fn wait_for_event(&self) -> WatchResult<Event> {
        Ok(self.conn.wait_for_event()?)
    }
}
