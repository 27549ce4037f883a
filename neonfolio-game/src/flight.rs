//! Drop-if-busy guard for collapsing duplicate triggers (double clicks,
//! repeated key events) into a single XP award.
//!
//! A call that finds the flag set is dropped, never queued. Clones share the
//! flag so an event handler can hold one handle while the host holds another.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    busy: Rc<Cell<bool>>,
}

impl SingleFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag. `None` means another call is in flight.
    #[must_use]
    pub fn try_begin(&self) -> Option<FlightGuard> {
        if self.busy.replace(true) {
            return None;
        }
        Some(FlightGuard {
            busy: Rc::clone(&self.busy),
        })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Run `f` unless busy; returns `None` when the call was dropped.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let _guard = self.try_begin()?;
        Some(f())
    }
}

/// Releases the flag on drop, including during unwinding.
#[derive(Debug)]
pub struct FlightGuard {
    busy: Rc<Cell<bool>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}
