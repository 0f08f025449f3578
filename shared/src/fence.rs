//! Generation counter that keeps late async responses from overwriting the
//! result of a newer request.
//!
//! Every trigger takes a [`RequestTicket`]; when the response arrives it is
//! applied only if the ticket is still the latest one. Closing a view bumps the
//! generation so anything still in flight is ignored for good. Ordering is by
//! trigger, not by completion.

/// Proof of which trigger a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Raw generation value captured at trigger time.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Monotonic generation token owned by one detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFence {
    generation: u64,
}

impl RequestFence {
    /// Fresh fence at generation zero.
    pub const fn new() -> Self {
        Self {
            generation: 0,
        }
    }

    /// Start a request, superseding every earlier ticket.
    pub fn begin(&mut self) -> RequestTicket {
        self.generation = self.generation.wrapping_add(1);
        RequestTicket(self.generation)
    }

    /// Supersede every outstanding ticket without starting a request.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether `ticket` still belongs to the latest trigger.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.generation == ticket.0
    }

    /// Current generation value.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(RequestFence::new().generation(), 0);
        assert_eq!(RequestFence::default(), RequestFence::new());
    }

    #[test]
    fn latest_trigger_wins() {
        let mut fence = RequestFence::new();
        let first = fence.begin();
        let second = fence.begin();

        assert!(!fence.is_current(first));
        assert!(fence.is_current(second));
    }

    #[test]
    fn single_trigger_stays_current() {
        let mut fence = RequestFence::new();
        let only = fence.begin();
        assert!(fence.is_current(only));
        assert_eq!(only.generation(), 1);
    }

    #[test]
    fn invalidate_retires_pending_ticket() {
        let mut fence = RequestFence::new();
        let pending = fence.begin();
        fence.invalidate();
        assert!(!fence.is_current(pending));

        let next = fence.begin();
        assert!(fence.is_current(next));
        assert!(!fence.is_current(pending));
    }
}
