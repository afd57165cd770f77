use std::error::Error as StdError;
use std::fmt;

/// `WatchResult<T>` provides a simplified result type with a common error type
pub type WatchResult<T> = std::result::Result<T, ErrorWrapper>;

/// WatchError defines all the internal errors that `libewmhmon` might return
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum WatchError {
    InvalidPropertyFormat(String, u8),
    PropertyNotFound(String),
}
impl std::error::Error for WatchError {}
impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WatchError::InvalidPropertyFormat(ref prop, format) => {
                write!(f, "property {} has unexpected format {}", prop, format)
            },
            WatchError::PropertyNotFound(ref err) => write!(f, "property {} was not found", err),
        }
    }
}

/// ErrorWrapper provides wrapper around all the underlying library dependencys that `libewmhmon`
/// uses such that we can easily surface all errors in a single easy way.
#[derive(Debug)]
pub enum ErrorWrapper {
    Watch(WatchError),

    // std::io::Error
    Io(std::io::Error),

    // nix errors
    Signal(nix::Error),

    // x11rb errors
    Connect(x11rb::errors::ConnectError),
    Connection(x11rb::errors::ConnectionError),
    Reply(x11rb::errors::ReplyError),
    ReplyOrId(x11rb::errors::ReplyOrIdError),
}
impl ErrorWrapper {
    /// Fatal errors mean the X server connection is unusable and the monitor can't continue.
    /// Everything else is a failed read that only costs the dependent event.
    pub fn is_fatal(&self) -> bool {
        match *self {
            ErrorWrapper::Watch(_) => false,
            ErrorWrapper::Io(_) => true,
            ErrorWrapper::Signal(_) => true,
            ErrorWrapper::Connect(_) => true,
            ErrorWrapper::Connection(_) => true,
            ErrorWrapper::Reply(ref err) => matches!(err, x11rb::errors::ReplyError::ConnectionError(_)),
            ErrorWrapper::ReplyOrId(_) => true,
        }
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.as_ref().is::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_ref().downcast_ref::<T>()
    }
}
impl StdError for ErrorWrapper {}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorWrapper::Watch(ref err) => write!(f, "{}", err),
            ErrorWrapper::Io(ref err) => write!(f, "{}", err),
            ErrorWrapper::Signal(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connect(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connection(ref err) => write!(f, "{}", err),
            ErrorWrapper::Reply(ref err) => write!(f, "{}", err),
            ErrorWrapper::ReplyOrId(ref err) => write!(f, "{}", err),
        }
    }
}

impl AsRef<dyn StdError> for ErrorWrapper {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        match *self {
            ErrorWrapper::Watch(ref err) => err,
            ErrorWrapper::Io(ref err) => err,
            ErrorWrapper::Signal(ref err) => err,
            ErrorWrapper::Connect(ref err) => err,
            ErrorWrapper::Connection(ref err) => err,
            ErrorWrapper::Reply(ref err) => err,
            ErrorWrapper::ReplyOrId(ref err) => err,
        }
    }
}

impl From<WatchError> for ErrorWrapper {
    fn from(err: WatchError) -> ErrorWrapper {
        ErrorWrapper::Watch(err)
    }
}

impl From<std::io::Error> for ErrorWrapper {
    fn from(err: std::io::Error) -> ErrorWrapper {
        ErrorWrapper::Io(err)
    }
}

impl From<nix::Error> for ErrorWrapper {
    fn from(err: nix::Error) -> ErrorWrapper {
        ErrorWrapper::Signal(err)
    }
}

// x11rb errors
//--------------------------------------------------------------------------------------------------
impl From<x11rb::errors::ConnectError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectError) -> ErrorWrapper {
        ErrorWrapper::Connect(err)
    }
}

impl From<x11rb::errors::ConnectionError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectionError) -> ErrorWrapper {
        ErrorWrapper::Connection(err)
    }
}

impl From<x11rb::errors::ReplyError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyError) -> ErrorWrapper {
        ErrorWrapper::Reply(err)
    }
}

impl From<x11rb::errors::ReplyOrIdError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyOrIdError) -> ErrorWrapper {
        ErrorWrapper::ReplyOrId(err)
    }
}
