//! Interrupt-to-main-loop signalling.
//!
//! A GPIO edge callback must not touch the bus: it only marks the flag, and
//! the main polling loop performs the status-register read that identifies
//! the event. `EventFlag` is the whole contract between the two contexts.

use core::sync::atomic::{AtomicBool, Ordering};

/// One-shot event flag set from interrupt context and consumed by the main
/// loop.
#[derive(Debug, Default)]
pub struct EventFlag {
    raised: AtomicBool,
}

impl EventFlag {
    /// Creates a lowered flag. `const` so flags can live in `static`s
    /// shared with an interrupt handler.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raises the flag. Safe to call from interrupt context.
    pub fn signal(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consumes the flag, returning whether it was raised. Each signal is
    /// observed at most once.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Reads the flag without consuming it.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_signal_is_consumed_exactly_once() {
        let flag = EventFlag::new();
        assert!(!flag.take());

        flag.signal();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn repeated_signals_before_a_take_collapse_into_one() {
        let flag = EventFlag::new();
        flag.signal();
        flag.signal();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
