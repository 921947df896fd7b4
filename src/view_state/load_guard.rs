//! Stale-result protection for asynchronous loads.
//!
//! Every load takes a [`LoadTicket`] before its request goes out. When the
//! response arrives the ticket is checked against the guard: a newer load
//! or an unmount in between makes the ticket stale and the result is
//! dropped. The request itself is not cancelled.

/// Generation stamp issued when a load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generation counter owned by one view.
#[derive(Debug, Clone)]
pub struct LoadGuard {
    generation: u64,
    mounted: bool,
}

impl Default for LoadGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadGuard {
    /// A mounted guard with no load in flight.
    pub fn new() -> Self {
        Self {
            generation: 0,
            mounted: true,
        }
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        LoadTicket {
            generation: self.generation,
        }
    }

    /// True if a result carrying `ticket` may still be applied.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.mounted && ticket.generation == self.generation
    }

    /// The view went away; every outstanding ticket becomes stale.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// The view is shown again. Tickets issued before the unmount stay stale.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ticket_is_current() {
        let mut guard = LoadGuard::new();
        let ticket = guard.begin();
        assert!(guard.is_current(ticket));
    }

    #[test]
    fn test_newer_load_supersedes_older() {
        let mut guard = LoadGuard::new();
        let first = guard.begin();
        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_unmount_invalidates_outstanding_ticket() {
        let mut guard = LoadGuard::new();
        let ticket = guard.begin();
        guard.unmount();
        assert!(!guard.is_current(ticket));
        assert!(!guard.is_mounted());
    }

    #[test]
    fn test_remount_does_not_revive_old_ticket() {
        let mut guard = LoadGuard::new();
        let ticket = guard.begin();
        guard.unmount();
        guard.mount();
        assert!(!guard.is_current(ticket));
        let fresh = guard.begin();
        assert!(guard.is_current(fresh));
    }
}
