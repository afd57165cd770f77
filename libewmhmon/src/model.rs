use std::fmt;

use x11rb::protocol::xproto::Window;

use crate::title::Title;

/// Maximum number of windows the registry will track individually
pub const MAX_NUM_WINDOWS: usize = 256;

/// Maximum number of characters kept from a window title
pub const MAX_TITLE_LENGTH: usize = 256;

/// Line written when the registry has no room left for more windows
pub const CAPACITY_WARNING: &str = "warning: at the window limit, things might be wonky from here on out";

/// EventKind identifies each kind of line the monitor writes to its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    InitialTitle,
    InitialFocus,
    TitleChanged,
    NewWindow,
    RemovedWindow,
    FocusChanged,
}

// Implement format! support
impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self {
            EventKind::InitialTitle => "initial_title",
            EventKind::InitialFocus => "initial_focus",
            EventKind::TitleChanged => "title_changed",
            EventKind::NewWindow => "new_window",
            EventKind::RemovedWindow => "removed_window",
            EventKind::FocusChanged => "focus_changed",
        };
        write!(f, "{}", kind)
    }
}

/// Report is a single observed change as it is written to the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: EventKind,
    pub window: Window,
    pub title: Title,
}

impl Report {
    pub fn new(kind: EventKind, window: Window, title: Title) -> Self {
        Self { kind, window, title }
    }

    /// Report without a title, used for removed windows and for losing focus entirely
    pub fn untitled(kind: EventKind, window: Window) -> Self {
        Self { kind, window, title: Title::empty() }
    }
}

// Implement format! support
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} 0x{:08x} {}", self.kind, self.window, self.title)
    }
}

/// Delta is the outcome of reconciling the registry against a fresh client list. At most one
/// window is ever reported per reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    Added(Window),
    Removed(Window),
    Unchanged,
}

/// FocusState holds the last known focused window, `None` when nothing has focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState(Option<Window>);

impl FocusState {
    /// Build from a raw `_NET_ACTIVE_WINDOW` value where zero means no window
    pub fn from_raw(win: Window) -> Self {
        if win == x11rb::NONE {
            FocusState(None)
        } else {
            FocusState(Some(win))
        }
    }

    pub fn window(&self) -> Option<Window> {
        self.0
    }
}
