//! `ewmhmon` watches an [Extended Window Manager Hints (EWMH)](https://specifications.freedesktop.org/wm-spec/latest/)
//! compatible window manager and prints a line to stdout every time a managed window appears,
//! disappears, changes its title or receives focus. It is meant to be read by shell scripts and
//! status bars that need to follow window activity live.
//!
//! ## Output
//! Each line is `<event> 0x<window id> <title>` and is flushed as soon as it is written.
//! ```text
//! initial_title 0x01a00003 Terminal
//! initial_focus 0x01a00003 Terminal
//! new_window 0x02200007 Editor
//! focus_changed 0x02200007 Editor
//! title_changed 0x02200007 Editor - notes.txt
//! removed_window 0x01a00003
//! ```
//!
//! ## Command line examples
//!
//! ### Follow focus changes
//! ```bash
//! ewmhmon | grep --line-buffered '^focus_changed'
//! ```
//!
//! SIGINT, SIGHUP and SIGTERM stop the monitor cleanly with a zero exit status.
use clap::{crate_description, crate_version, Command};
use gory::*;
use libewmhmon::ErrorWrapper;
use witcher::prelude::*;

fn cli() -> Command {
    Command::new("ewmhmon").about(crate_description!()).version(crate_version!())
}

fn init_logging() {
    // stdout carries the event stream so diagnostics go to stderr only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .init();
}

// Connection failures happen before any event is written, everything else ends a running monitor
fn describe(err: &ErrorWrapper) -> String {
    match err {
        ErrorWrapper::Connect(_) => format!("could not connect to X server: {}", err),
        _ => format!("lost the X server: {}", err),
    }
}

fn report<T>(res: std::result::Result<T, ErrorWrapper>) -> Result<T> {
    match res {
        Ok(x) => Ok(x),
        Err(e) => {
            let msg = describe(&e);
            Err(e).wrap(&msg)
        },
    }
}

fn run() -> Result<()> {
    report(libewmhmon::watch())
}

fn main() {
    cli().get_matches();
    init_logging();

    if let Err(err) = run() {
        eprintln!("{} {}", "error:".red(), err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libewmhmon::WatchError;

    #[test]
    fn test_describe() {
        let err = ErrorWrapper::Connect(x11rb::errors::ConnectError::UnknownError);
        assert!(describe(&err).starts_with("could not connect to X server: "));

        let err: ErrorWrapper = WatchError::PropertyNotFound("_NET_CLIENT_LIST".to_owned()).into();
        assert_eq!(describe(&err), "lost the X server: property _NET_CLIENT_LIST was not found");
    }

    #[test]
    fn test_report() {
        assert!(report(Ok::<u32, ErrorWrapper>(7)).is_ok());

        let err = ErrorWrapper::Connect(x11rb::errors::ConnectError::UnknownError);
        assert!(report::<()>(Err(err)).is_err());
    }
}
