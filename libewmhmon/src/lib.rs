//! `libewmhmon` watches the
//! [Extended Window Manager Hints (EWMH)](https://specifications.freedesktop.org/wm-spec/latest/)
//! properties that EWMH compatible window managers maintain and reports changes to them as a line
//! oriented event stream.
//!
//! [Root Window Properties](https://specifications.freedesktop.org/wm-spec/latest/ar01s03.html)
//! The window manager keeps `_NET_CLIENT_LIST` and `_NET_ACTIVE_WINDOW` up to date on the root
//! window and every client names itself with `_NET_WM_NAME` or the older `WM_NAME`. `libewmhmon`
//! subscribes to property changes on the root window and on every managed window and turns them
//! into `initial_title`, `initial_focus`, `title_changed`, `new_window`, `removed_window` and
//! `focus_changed` lines.
//!
//! `ewmhmon` wires a `Session`, a `ShutdownBridge` and a `Monitor` together writing to stdout;
//! however the `Monitor` runs against anything implementing `WindowServer` and any writer.
mod atoms;
mod error;
mod model;
pub mod monitor;
pub mod server;
pub mod session;
pub mod shutdown;
#[cfg(test)]
mod testing;
pub mod title;
pub mod window;
pub use atoms::AtomCollection;
pub use error::*;
pub use model::*;
pub use monitor::{Monitor, MonitorState};
pub use server::{PropertyValue, WindowServer};
pub use session::Session;
pub use shutdown::ShutdownBridge;
pub use title::{DecodedTitle, Title};
pub use window::WindowRegistry;

/// All essential symbols in a simple consumable form
///
/// ### Examples
/// ```
/// use libewmhmon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::*;
}

/// Connect to the X server and monitor it, writing events to stdout until a shutdown signal
/// arrives. Must be called before the process spawns any threads.
///
/// ### Examples
/// ```ignore
/// libewmhmon::watch().unwrap();
/// ```
pub fn watch() -> WatchResult<()> {
    // Signals keep their default action until there is a sentinel window to wake
    let session = Session::connect()?;
    ShutdownBridge::block()?.arm(session.connection(), session.sentinel())?;

    let stdout = std::io::stdout();
    Monitor::new(&session, stdout.lock()).run()?;
    session.close()
}
