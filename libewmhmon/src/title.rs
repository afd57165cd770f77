//! Window title lookup and decoding.
//!
//! Titles are read from `_NET_WM_NAME` first and `WM_NAME` second. `STRING` and `UTF8_STRING`
//! values are decoded as text while `COMPOUND_TEXT` and anything else are replaced with a fixed
//! message so the window still shows up with something readable.
use std::fmt;

use tracing::{debug, trace};
use x11rb::protocol::xproto::{Atom, AtomEnum, Window};

use crate::{
    atoms::AtomCollection, server::WindowServer, WatchError, WatchResult, MAX_TITLE_LENGTH,
};

/// Text substituted for titles encoded as COMPOUND_TEXT
pub const COMPOUND_TEXT_TITLE: &str = "Error: COMPOUND TEXT Encoded Title";

/// Text substituted for titles in any encoding other than STRING, UTF8_STRING or COMPOUND_TEXT
pub const UNKNOWN_ENCODING_TITLE: &str = "Error: Unknown Title Encoding";

// Title property reads are limited to this many 32bit units
const TITLE_LONG_LENGTH: u32 = MAX_TITLE_LENGTH as u32;

/// Outcome of decoding a title property based on its declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedTitle {
    Text(String),
    CompoundText,
    UnknownEncoding(Atom),
}

impl DecodedTitle {
    /// Decode the raw bytes of a name property according to its type atom
    pub fn decode(atoms: &AtomCollection, type_: Atom, bytes: &[u8]) -> Self {
        match type_ {
            _ if type_ == atoms.STRING || type_ == atoms.UTF8_STRING => {
                // Anything after an embedded NUL isn't part of the title
                let end = bytes.iter().position(|x| *x == 0).unwrap_or(bytes.len());
                DecodedTitle::Text(String::from_utf8_lossy(&bytes[..end]).into_owned())
            },
            _ if type_ == atoms.COMPOUND_TEXT => DecodedTitle::CompoundText,
            _ => DecodedTitle::UnknownEncoding(type_),
        }
    }
}

/// Title is a window title holding at most `MAX_TITLE_LENGTH` characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Create a title from the given text, truncating at `MAX_TITLE_LENGTH` characters
    pub fn new(text: &str) -> Self {
        match text.char_indices().nth(MAX_TITLE_LENGTH) {
            Some((end, _)) => Title(text[..end].to_owned()),
            None => Title(text.to_owned()),
        }
    }

    pub fn empty() -> Self {
        Title(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<DecodedTitle> for Title {
    fn from(decoded: DecodedTitle) -> Self {
        match decoded {
            DecodedTitle::Text(text) => Title::new(&text),
            DecodedTitle::CompoundText => Title::new(COMPOUND_TEXT_TITLE),
            DecodedTitle::UnknownEncoding(_) => Title::new(UNKNOWN_ENCODING_TITLE),
        }
    }
}

// Implement format! support
impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fetch the raw title property of the given window. `_NET_WM_NAME` is tried first then `WM_NAME`,
/// the first with a non empty value wins.
///
/// ### Arguments
/// * `server` - X server to read the properties from
/// * `win` - id of the window to read the title of
pub fn fetch_title<S: WindowServer>(server: &S, win: Window) -> WatchResult<DecodedTitle> {
    let atoms = server.atoms();
    for property in [atoms._NET_WM_NAME, atoms.WM_NAME] {
        let reply = server.get_property(win, property, AtomEnum::ANY.into(), TITLE_LONG_LENGTH)?;
        if !reply.value.is_empty() {
            trace!("fetch_title: id: {}, using {}", win, atoms.name_of(property));
            return Ok(DecodedTitle::decode(atoms, reply.type_, &reply.value));
        }
    }
    Err(WatchError::PropertyNotFound("_NET_WM_NAME/WM_NAME".to_owned()).into())
}

/// Resolve the title of the given window. Failure means the title is unavailable, which callers
/// must not confuse with an empty title.
///
/// ### Arguments
/// * `server` - X server to read the properties from
/// * `win` - id of the window to read the title of
pub fn resolve_title<S: WindowServer>(server: &S, win: Window) -> WatchResult<Title> {
    let decoded = fetch_title(server, win)?;
    if let DecodedTitle::UnknownEncoding(type_) = decoded {
        debug!("resolve_title: id: {}, unknown encoding: {}", win, type_);
    }
    Ok(decoded.into())
}
