//! In memory X server used to drive the monitor in tests
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
    io,
};

use x11rb::{
    errors::ConnectionError,
    protocol::{
        xproto::{Atom, AtomEnum, ClientMessageEvent, Property, PropertyNotifyEvent, Window, PROPERTY_NOTIFY_EVENT},
        Event,
    },
};

use crate::{
    atoms::AtomCollection,
    server::{PropertyValue, WindowServer},
    WatchError, WatchResult,
};

pub const ROOT: Window = 0x100;
pub const SENTINEL: Window = 0x200;

pub fn atoms() -> AtomCollection {
    AtomCollection {
        _NET_CLIENT_LIST: 300,
        _NET_ACTIVE_WINDOW: 301,
        WM_NAME: AtomEnum::WM_NAME.into(),
        _NET_WM_NAME: 302,
        UTF8_STRING: 303,
        COMPOUND_TEXT: 304,
        STRING: AtomEnum::STRING.into(),
    }
}

pub fn property_notify(win: Window, atom: Atom) -> Event {
    Event::PropertyNotify(PropertyNotifyEvent {
        response_type: PROPERTY_NOTIFY_EVENT,
        sequence: 0,
        window: win,
        atom,
        time: 0,
        state: Property::NEW_VALUE,
    })
}

pub fn client_message(win: Window) -> Event {
    Event::ClientMessage(ClientMessageEvent::new(32, win, AtomEnum::NONE, [0u32; 5]))
}

#[derive(Default)]
pub struct FakeServer {
    atoms: Option<AtomCollection>,
    properties: RefCell<HashMap<(Window, Atom), PropertyValue>>,
    events: RefCell<VecDeque<Event>>,
    subscribed: RefCell<Vec<Window>>,
    failing: RefCell<HashSet<Window>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self { atoms: Some(atoms()), ..Default::default() }
    }

    pub fn set_property(&self, win: Window, property: Atom, value: PropertyValue) {
        self.properties.borrow_mut().insert((win, property), value);
    }

    pub fn set_title(&self, win: Window, title: &str) {
        let atoms = atoms();
        self.set_property(win, atoms._NET_WM_NAME, PropertyValue::new(atoms.UTF8_STRING, 8, title.as_bytes().to_vec()));
    }

    pub fn set_client_list(&self, windows: &[Window]) {
        let atoms = atoms();
        self.set_property(ROOT, atoms._NET_CLIENT_LIST, PropertyValue::from_u32s(AtomEnum::WINDOW.into(), windows));
    }

    pub fn set_active(&self, win: Window) {
        let atoms = atoms();
        self.set_property(ROOT, atoms._NET_ACTIVE_WINDOW, PropertyValue::from_u32s(AtomEnum::WINDOW.into(), &[win]));
    }

    /// Make every property read on the given window fail
    pub fn fail_window(&self, win: Window) {
        self.failing.borrow_mut().insert(win);
    }

    pub fn push_event(&self, event: Event) {
        self.events.borrow_mut().push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn subscribed(&self) -> Vec<Window> {
        self.subscribed.borrow().clone()
    }
}

impl WindowServer for FakeServer {
    fn atoms(&self) -> &AtomCollection {
        self.atoms.as_ref().expect("fake server built without atoms")
    }

    fn root(&self) -> Window {
        ROOT
    }

    fn sentinel(&self) -> Window {
        SENTINEL
    }

    fn get_property(&self, win: Window, property: Atom, type_: Atom, long_length: u32) -> WatchResult<PropertyValue> {
        if self.failing.borrow().contains(&win) {
            return Err(WatchError::PropertyNotFound(format!("{} on {}", property, win)).into());
        }
        let value = match self.properties.borrow().get(&(win, property)) {
            Some(x) => x.clone(),
            None => return Ok(PropertyValue::default()),
        };

        // Type mismatches return the actual type but no data just like the X server
        if type_ != u32::from(AtomEnum::ANY) && value.type_ != type_ {
            return Ok(PropertyValue::new(value.type_, value.format, vec![]));
        }
        let max = long_length as usize * 4;
        let mut value = value;
        value.value.truncate(max);
        Ok(value)
    }

    fn subscribe(&self, win: Window) -> WatchResult<()> {
        self.subscribed.borrow_mut().push(win);
        Ok(())
    }

    fn wait_for_event(&self) -> WatchResult<Event> {
        match self.events.borrow_mut().pop_front() {
            Some(event) => Ok(event),
            None => {
                let err = io::Error::new(io::ErrorKind::UnexpectedEof, "no more events");
                Err(ConnectionError::IoError(err).into())
            },
        }
    }
}
