use tracing::{debug, trace};
use x11rb::protocol::xproto::{AtomEnum, Window};

use crate::{server::WindowServer, Delta, WatchError, WatchResult, MAX_NUM_WINDOWS};

/// Read the window manager's client list from the root window, limited to `capacity` windows.
/// A missing `_NET_CLIENT_LIST` reads as an empty list.
///
/// ### Arguments
/// * `server` - X server to read the property from
/// * `capacity` - maximum number of windows to return
pub fn snapshot<S: WindowServer>(server: &S, capacity: usize) -> WatchResult<Vec<Window>> {
    // Defined as: _NET_CLIENT_LIST, WINDOW[]/32
    let atoms = server.atoms();
    let reply = server.get_property(server.root(), atoms._NET_CLIENT_LIST, AtomEnum::WINDOW.into(), capacity as u32)?;
    if reply.is_absent() {
        return Ok(vec![]);
    }
    let windows: Vec<Window> = reply
        .value32()
        .ok_or_else(|| WatchError::InvalidPropertyFormat("_NET_CLIENT_LIST".to_owned(), reply.format))?
        .take(capacity)
        .collect();
    trace!("snapshot: windows: {:?}", windows);
    Ok(windows)
}

/// Get the active window id, zero when the window manager reports no active window
pub fn active_window<S: WindowServer>(server: &S) -> WatchResult<Window> {
    // Defined as: _NET_ACTIVE_WINDOW, WINDOW/32
    let reply = server.get_property(server.root(), server.atoms()._NET_ACTIVE_WINDOW, AtomEnum::WINDOW.into(), 1)?;
    if reply.is_absent() {
        return Ok(x11rb::NONE);
    }
    let win = reply
        .value32()
        .ok_or_else(|| WatchError::InvalidPropertyFormat("_NET_ACTIVE_WINDOW".to_owned(), reply.format))?
        .next()
        .unwrap_or(x11rb::NONE);
    debug!("active_window: id: {}", win);
    Ok(win)
}

/// WindowRegistry is the monitor's view of the managed windows in the order they were discovered.
/// It only changes when reconciled against a fresh client list and never holds more than its
/// capacity.
#[derive(Debug, Clone)]
pub struct WindowRegistry {
    windows: Vec<Window>,
    capacity: usize,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        WindowRegistry::with_capacity(MAX_NUM_WINDOWS)
    }
}

impl WindowRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { windows: Vec::with_capacity(capacity), capacity }
    }

    /// Seed the registry from the startup client list. Duplicates are skipped and anything past
    /// capacity is dropped. Returns the windows that were accepted.
    pub fn seed(&mut self, windows: &[Window]) -> Vec<Window> {
        let mut added = vec![];
        for &win in windows {
            if self.is_full() {
                break;
            }
            if !self.contains(win) {
                self.windows.push(win);
                added.push(win);
            }
        }
        added
    }

    /// Compare the registry against the authoritative client list and apply at most one change.
    ///
    /// The first window in `current` that isn't tracked is added and reported. Only when nothing
    /// was added is the first tracked window missing from `current` removed and reported. Any
    /// further differences stay unreported until a later call. While the registry is full no
    /// addition is possible and only removals are looked for.
    ///
    /// ### Arguments
    /// * `current` - the client list as just read from the root window
    pub fn reconcile(&mut self, current: &[Window]) -> Delta {
        if !self.is_full() {
            if let Some(&win) = current.iter().find(|x| !self.contains(**x)) {
                self.windows.push(win);
                debug!("reconcile: added: {}", win);
                return Delta::Added(win);
            }
        }

        if let Some(i) = self.windows.iter().position(|x| !current.contains(x)) {
            let win = self.windows.remove(i);
            debug!("reconcile: removed: {}", win);
            return Delta::Removed(win);
        }

        Delta::Unchanged
    }

    pub fn contains(&self, win: Window) -> bool {
        self.windows.contains(&win)
    }

    pub fn is_full(&self) -> bool {
        self.windows.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::PropertyValue;
    use crate::testing::{FakeServer, ROOT};

    fn registry(windows: &[Window]) -> WindowRegistry {
        let mut reg = WindowRegistry::default();
        reg.seed(windows);
        reg
    }

    #[test]
    fn test_reconcile_addition() {
        let mut reg = registry(&[1]);
        assert_eq!(reg.reconcile(&[1, 2]), Delta::Added(2));
        assert_eq!(reg.windows(), &[1, 2]);
        assert_eq!(reg.reconcile(&[1, 2]), Delta::Unchanged);
    }

    #[test]
    fn test_reconcile_removal_keeps_order() {
        let mut reg = registry(&[1, 2, 3]);
        assert_eq!(reg.reconcile(&[1, 3]), Delta::Removed(2));
        assert_eq!(reg.windows(), &[1, 3]);

        let mut reg = registry(&[1, 2]);
        assert_eq!(reg.reconcile(&[2]), Delta::Removed(1));
        assert_eq!(reg.windows(), &[2]);
    }

    #[test]
    fn test_reconcile_reports_one_addition_per_call() {
        // Several windows appearing at once are surfaced one call at a time
        let mut reg = registry(&[1]);
        assert_eq!(reg.reconcile(&[1, 2, 3]), Delta::Added(2));
        assert_eq!(reg.windows(), &[1, 2]);
        assert_eq!(reg.reconcile(&[1, 2, 3]), Delta::Added(3));
        assert_eq!(reg.reconcile(&[1, 2, 3]), Delta::Unchanged);
    }

    #[test]
    fn test_reconcile_prefers_addition_over_removal() {
        let mut reg = registry(&[1, 2]);
        assert_eq!(reg.reconcile(&[2, 3]), Delta::Added(3));
        assert_eq!(reg.windows(), &[1, 2, 3]);
        assert_eq!(reg.reconcile(&[2, 3]), Delta::Removed(1));
        assert_eq!(reg.windows(), &[2, 3]);
    }

    #[test]
    fn test_reconcile_at_most_one_change() {
        let lists: [&[Window]; 6] = [&[1, 2, 3, 4], &[], &[5, 6], &[6, 7, 8, 1], &[8], &[2, 4, 6, 8, 10]];
        let mut reg = WindowRegistry::with_capacity(4);
        for list in lists.iter() {
            for _ in 0..12 {
                let before = reg.windows().to_vec();
                let delta = reg.reconcile(list);
                let after = reg.windows().to_vec();
                match delta {
                    Delta::Added(win) => {
                        assert_eq!(after.len(), before.len() + 1);
                        assert_eq!(after.last(), Some(&win));
                    },
                    Delta::Removed(win) => {
                        assert_eq!(after.len() + 1, before.len());
                        assert!(!after.contains(&win));
                    },
                    Delta::Unchanged => assert_eq!(after, before),
                }
                assert!(reg.len() <= reg.capacity());
            }
        }
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut reg = WindowRegistry::with_capacity(2);
        assert_eq!(reg.seed(&[1, 2, 3]), vec![1, 2]);
        assert!(reg.is_full());
        assert_eq!(reg.reconcile(&[1, 2, 3]), Delta::Unchanged);
        assert_eq!(reg.len(), 2);

        // Room frees up once something goes away
        assert_eq!(reg.reconcile(&[2, 3]), Delta::Removed(1));
        assert_eq!(reg.reconcile(&[2, 3]), Delta::Added(3));
        assert_eq!(reg.windows(), &[2, 3]);
    }

    #[test]
    fn test_seed_skips_duplicates() {
        let mut reg = WindowRegistry::default();
        assert_eq!(reg.seed(&[1, 2, 1, 3]), vec![1, 2, 3]);
        assert_eq!(reg.windows(), &[1, 2, 3]);
    }

    #[test]
    fn test_snapshot() {
        let server = FakeServer::new();
        assert_eq!(snapshot(&server, MAX_NUM_WINDOWS).unwrap(), Vec::<Window>::new());

        server.set_client_list(&[1, 2, 3]);
        assert_eq!(snapshot(&server, MAX_NUM_WINDOWS).unwrap(), vec![1, 2, 3]);
        assert_eq!(snapshot(&server, 2).unwrap(), vec![1, 2]);

        server.fail_window(ROOT);
        assert!(snapshot(&server, MAX_NUM_WINDOWS).is_err());
    }

    #[test]
    fn test_snapshot_bad_format() {
        let server = FakeServer::new();
        let atoms = *server.atoms();
        server.set_property(ROOT, atoms._NET_CLIENT_LIST, PropertyValue::new(AtomEnum::WINDOW.into(), 8, vec![1, 2]));
        let err = snapshot(&server, MAX_NUM_WINDOWS).unwrap_err();
        assert_eq!(
            err.downcast_ref::<WatchError>(),
            Some(&WatchError::InvalidPropertyFormat("_NET_CLIENT_LIST".to_owned(), 8))
        );
    }

    #[test]
    fn test_active_window() {
        let server = FakeServer::new();
        assert_eq!(active_window(&server).unwrap(), 0);
        server.set_active(7);
        assert_eq!(active_window(&server).unwrap(), 7);
    }
}
