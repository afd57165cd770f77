//! Turns SIGINT, SIGHUP and SIGTERM into a wake message on the X event queue.
//!
//! The monitor spends its life blocked waiting for X events so a signal can't interrupt it
//! directly. Instead the signals are blocked on every thread and a dedicated thread waits for them
//! synchronously. On the first one it sends a client message addressed to the sentinel window
//! through the shared connection and flushes, which is the only thing it ever does with the
//! connection. The monitor sees the message like any other event and stops.
use std::{sync::Arc, thread};

use nix::sys::signal::{SigSet, Signal};
use tracing::{debug, info, warn};
use x11rb::{
    connection::Connection,
    protocol::xproto::{AtomEnum, ClientMessageEvent, ConnectionExt as _, EventMask, Window},
    rust_connection::RustConnection,
};

use crate::WatchResult;

/// Signals that ask the monitor to terminate
pub const SHUTDOWN_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGHUP, Signal::SIGTERM];

/// ShutdownBridge holds the blocked signal set until it is armed with a connection
pub struct ShutdownBridge {
    mask: SigSet,
}

impl ShutdownBridge {
    /// Block the shutdown signals on the calling thread. Call this before any other thread is
    /// spawned so that every thread inherits the mask, and only once the sentinel window exists
    /// since a blocked signal can no longer interrupt a hanging connect. Signals arriving from here
    /// on stay pending until the bridge is armed.
    pub fn block() -> WatchResult<Self> {
        let mut mask = SigSet::empty();
        for sig in SHUTDOWN_SIGNALS {
            mask.add(sig);
        }
        mask.thread_block()?;
        debug!("shutdown: blocked: {:?}", SHUTDOWN_SIGNALS);
        Ok(Self { mask })
    }

    /// Spawn the thread that waits for a shutdown signal and then wakes the event loop by sending
    /// a message to the sentinel window. Only the first signal is acted upon.
    ///
    /// ### Arguments
    /// * `conn` - connection shared with the event loop
    /// * `sentinel` - window the wake message is addressed to
    pub fn arm(self, conn: Arc<RustConnection>, sentinel: Window) -> WatchResult<thread::JoinHandle<()>> {
        let mask = self.mask;
        let handle = thread::Builder::new().name("shutdown-bridge".to_owned()).spawn(move || match mask.wait() {
            Ok(sig) => {
                info!("shutdown: received {:?}", sig);
                if let Err(e) = send_wake(conn.as_ref(), sentinel) {
                    warn!("shutdown: failed to send wake message: {}", e);
                }
            },
            Err(e) => warn!("shutdown: waiting for signals failed: {}", e),
        })?;
        Ok(handle)
    }
}

/// Build the wake message for the given sentinel window
pub fn wake_message(sentinel: Window) -> ClientMessageEvent {
    ClientMessageEvent::new(32, sentinel, AtomEnum::NONE, [0u32; 5])
}

/// Send the wake message to the sentinel window. With an empty event mask the server delivers
/// the event to the client that created the window, which is us.
pub fn send_wake<C: Connection>(conn: &C, sentinel: Window) -> WatchResult<()> {
    conn.send_event(false, sentinel, EventMask::NO_EVENT, wake_message(sentinel))?;
    conn.flush()?;
    debug!("send_wake: sentinel: {}", sentinel);
    Ok(())
}
