use x11rb::protocol::{
    xproto::{Atom, GetPropertyReply, Window},
    Event,
};

use crate::{atoms::AtomCollection, WatchResult};

/// Owned copy of a property value as returned by the X server. The reply buffer is released as
/// soon as this value is built, whichever branch the caller takes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyValue {
    pub type_: Atom,
    pub format: u8,
    pub value: Vec<u8>,
}

impl PropertyValue {
    pub fn new(type_: Atom, format: u8, value: Vec<u8>) -> Self {
        Self { type_, format, value }
    }

    /// Build a 32bit formatted value e.g. a WINDOW[] list
    pub fn from_u32s(type_: Atom, values: &[u32]) -> Self {
        let value = values.iter().flat_map(|x| x.to_ne_bytes()).collect();
        Self { type_, format: 32, value }
    }

    /// True when the property does not exist on the window
    pub fn is_absent(&self) -> bool {
        self.type_ == x11rb::NONE
    }

    /// Iterate the value as 32bit items, `None` when the property isn't 32bit formatted
    pub fn value32(&self) -> Option<impl Iterator<Item = u32> + '_> {
        if self.format != 32 {
            return None;
        }
        Some(self.value.chunks_exact(4).map(|x| u32::from_ne_bytes(x.try_into().unwrap_or([0; 4]))))
    }
}

impl From<GetPropertyReply> for PropertyValue {
    fn from(reply: GetPropertyReply) -> Self {
        Self { type_: reply.type_, format: reply.format, value: reply.value }
    }
}

/// WindowServer is everything the monitor needs from the X server. `Session` implements it over a
/// live connection.
pub trait WindowServer {
    /// Atoms resolved during setup
    fn atoms(&self) -> &AtomCollection;

    /// Root window of the default screen
    fn root(&self) -> Window;

    /// Window that only exists to receive the shutdown wake message
    fn sentinel(&self) -> Window;

    /// Read up to `long_length` 32bit units of the given property
    fn get_property(&self, win: Window, property: Atom, type_: Atom, long_length: u32)
        -> WatchResult<PropertyValue>;

    /// Ask to be told about property changes on the given window
    fn subscribe(&self, win: Window) -> WatchResult<()>;

    /// Block until the next event arrives
    fn wait_for_event(&self) -> WatchResult<Event>;
}
