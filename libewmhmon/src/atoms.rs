// Atoms interned once at startup and never changed afterwards. All of them are requested in a
// single pipelined round of InternAtom requests and the replies collected together.
x11rb::atom_manager! {
    pub AtomCollection: AtomCollectionCookie {
        _NET_CLIENT_LIST,
        _NET_ACTIVE_WINDOW,
        WM_NAME,
        _NET_WM_NAME,
        UTF8_STRING,
        COMPOUND_TEXT,
        STRING,
    }
}

impl AtomCollection {
    /// Name of the given atom if it is one of ours, used for logging
    pub fn name_of(&self, atom: u32) -> &'static str {
        match atom {
            _ if atom == self._NET_CLIENT_LIST => "_NET_CLIENT_LIST",
            _ if atom == self._NET_ACTIVE_WINDOW => "_NET_ACTIVE_WINDOW",
            _ if atom == self.WM_NAME => "WM_NAME",
            _ if atom == self._NET_WM_NAME => "_NET_WM_NAME",
            _ if atom == self.UTF8_STRING => "UTF8_STRING",
            _ if atom == self.COMPOUND_TEXT => "COMPOUND_TEXT",
            _ if atom == self.STRING => "STRING",
            _ => "<other>",
        }
    }
}
