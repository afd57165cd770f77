//! `Monitor` is the event loop. It performs a startup scan of the managed windows then blocks on
//! the X event queue translating property change notifications on the root window and the tracked
//! windows into output lines:
//!
//! ```text
//! <event_kind> 0x<window id as 8 hex digits> <title>
//! ```
//!
//! The loop ends when the wake message sent by the shutdown bridge to the sentinel window arrives.
use std::io::Write;

use tracing::{debug, info, trace, warn};
use x11rb::protocol::{
    xproto::{ClientMessageEvent, PropertyNotifyEvent},
    Event,
};

use crate::{
    server::WindowServer,
    title::resolve_title,
    window::{active_window, snapshot, WindowRegistry},
    Delta, EventKind, FocusState, Report, WatchResult, CAPACITY_WARNING,
};

/// Lifecycle of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Initializing,
    Running,
    Terminating,
}

// What to do after handling a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Terminate,
}

/// Monitor owns the window registry and the focus state and writes every observed change to its
/// output as a single flushed line.
pub struct Monitor<'a, S: WindowServer, W: Write> {
    server: &'a S,
    out: W,
    registry: WindowRegistry,
    focus: FocusState,
    state: MonitorState,
}

impl<'a, S: WindowServer, W: Write> Monitor<'a, S, W> {
    pub fn new(server: &'a S, out: W) -> Self {
        Self::with_registry(server, out, WindowRegistry::default())
    }

    /// Create a monitor using the given, usually empty, registry
    pub fn with_registry(server: &'a S, out: W, registry: WindowRegistry) -> Self {
        Self { server, out, registry, focus: FocusState::default(), state: MonitorState::Initializing }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    /// Run the startup scan and then process events until the wake message arrives. Only a broken
    /// connection or output stream ends the loop with an error.
    pub fn run(&mut self) -> WatchResult<()> {
        self.start()?;
        while self.state == MonitorState::Running {
            let event = self.server.wait_for_event()?;
            self.handle(event)?;
        }
        info!("monitor: terminated");
        Ok(())
    }

    /// Subscribe to the root window and report the initial titles and focus
    pub fn start(&mut self) -> WatchResult<()> {
        let server = self.server;
        server.subscribe(server.root())?;

        self.focus = match active_window(server) {
            Ok(win) => FocusState::from_raw(win),
            Err(e) => {
                debug!("start: active window unavailable: {}", e);
                FocusState::default()
            },
        };
        let windows = match snapshot(server, self.registry.capacity()) {
            Ok(windows) => windows,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("start: client list unavailable: {}", e);
                vec![]
            },
        };

        for win in self.registry.seed(&windows) {
            if let Err(e) = server.subscribe(win) {
                warn!("start: subscribe: id: {}, {}", win, e);
            }
            let title = match resolve_title(server, win) {
                Ok(title) => title,
                Err(e) => {
                    debug!("start: no title: id: {}, {}", win, e);
                    continue;
                },
            };
            if self.focus.window() == Some(win) {
                self.emit(&Report::new(EventKind::InitialTitle, win, title.clone()))?;
                self.emit(&Report::new(EventKind::InitialFocus, win, title))?;
            } else {
                self.emit(&Report::new(EventKind::InitialTitle, win, title))?;
            }
        }
        if self.registry.is_empty() {
            debug!("start: no managed windows");
        } else if self.registry.is_full() {
            self.warn_capacity()?;
        }

        debug!("start: tracking {} windows, focus: {:?}", self.registry.len(), self.focus.window());
        self.state = MonitorState::Running;
        Ok(())
    }

    /// Handle a single event from the X server
    pub fn handle(&mut self, event: Event) -> WatchResult<()> {
        let flow = match event {
            Event::PropertyNotify(e) => self.on_property(e)?,
            Event::ClientMessage(e) => self.on_client_message(e),
            Event::Error(e) => {
                // Usually a window that went away before a request on it was processed
                debug!("handle: x11 error: {:?}", e.error_kind);
                Flow::Continue
            },
            _ => Flow::Continue,
        };
        if flow == Flow::Terminate {
            self.state = MonitorState::Terminating;
        }
        Ok(())
    }

    fn on_client_message(&self, e: ClientMessageEvent) -> Flow {
        if e.window == self.server.sentinel() {
            info!("monitor: wake message received, terminating");
            Flow::Terminate
        } else {
            trace!("on_client_message: ignored: win: {}", e.window);
            Flow::Continue
        }
    }

    fn on_property(&mut self, e: PropertyNotifyEvent) -> WatchResult<Flow> {
        let server = self.server;
        let atoms = server.atoms();
        trace!("on_property: win: {}, atom: {}", e.window, atoms.name_of(e.atom));

        if e.atom == atoms._NET_WM_NAME && self.registry.contains(e.window) {
            match resolve_title(server, e.window) {
                Ok(title) => self.emit(&Report::new(EventKind::TitleChanged, e.window, title))?,
                Err(e) => debug!("on_property: title unavailable: {}", e),
            }
        } else if e.window == server.root() && e.atom == atoms._NET_CLIENT_LIST {
            self.on_client_list()?;
        } else if e.window == server.root() && e.atom == atoms._NET_ACTIVE_WINDOW {
            self.on_active_window()?;
        }
        Ok(Flow::Continue)
    }

    fn on_client_list(&mut self) -> WatchResult<()> {
        let server = self.server;
        let windows = match snapshot(server, self.registry.capacity()) {
            Ok(windows) => windows,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!("on_client_list: client list unavailable: {}", e);
                return Ok(());
            },
        };

        match self.registry.reconcile(&windows) {
            Delta::Added(win) => {
                if let Err(e) = server.subscribe(win) {
                    warn!("on_client_list: subscribe: id: {}, {}", win, e);
                }
                match resolve_title(server, win) {
                    Ok(title) => self.emit(&Report::new(EventKind::NewWindow, win, title))?,
                    Err(e) => debug!("on_client_list: no title: id: {}, {}", win, e),
                }
            },
            Delta::Removed(win) => self.emit(&Report::untitled(EventKind::RemovedWindow, win))?,
            Delta::Unchanged => {},
        }

        if self.registry.is_full() {
            self.warn_capacity()?;
        }
        Ok(())
    }

    fn on_active_window(&mut self) -> WatchResult<()> {
        let server = self.server;
        self.focus = match active_window(server) {
            Ok(win) => FocusState::from_raw(win),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!("on_active_window: active window unavailable: {}", e);
                return Ok(());
            },
        };

        let report = match self.focus.window().map(|win| (win, resolve_title(server, win))) {
            Some((win, Ok(title))) => Report::new(EventKind::FocusChanged, win, title),
            _ => Report::untitled(EventKind::FocusChanged, x11rb::NONE),
        };
        self.emit(&report)
    }

    fn warn_capacity(&mut self) -> WatchResult<()> {
        warn!("monitor: tracking {} windows, further windows are not tracked", self.registry.len());
        writeln!(self.out, "{}", CAPACITY_WARNING)?;
        self.out.flush()?;
        Ok(())
    }

    fn emit(&mut self, report: &Report) -> WatchResult<()> {
        writeln!(self.out, "{}", report)?;
        self.out.flush()?;
        Ok(())
    }
}
