//! Time sources for the countdown presenter.
//!
//! The presenter never reads the wall clock directly. It asks an injected
//! [`Clock`] for the current epoch second on every render, which lets tests
//! drive time forward deterministically with a [`ManualClock`] instead of
//! sleeping.
//!
//! ```rust
//! use bubbletea_countdown::clock::{Clock, ManualClock};
//!
//! let clock = ManualClock::new(1_700_000_000);
//! clock.advance(5);
//! assert_eq!(clock.now(), 1_700_000_005);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// A source of the current time, in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current epoch second.
    fn now(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
///
/// Share it with a presenter through an `Arc` and keep a second handle in
/// the test to advance it between ticks.
pub struct ManualClock {
    current: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: i64) -> Self {
        Self {
            current: AtomicI64::new(start),
        }
    }

    /// Jumps to an absolute epoch second.
    pub fn set(&self, now: i64) {
        self.current.store(now, Ordering::SeqCst);
    }

    /// Moves the clock by `seconds`. Negative values move it backwards.
    pub fn advance(&self, seconds: i64) {
        self.current.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.current.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &self.now())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now(), 100);

        clock.advance(25);
        assert_eq!(clock.now(), 125);

        clock.advance(-200);
        assert_eq!(clock.now(), -75);

        clock.set(42);
        assert_eq!(clock.now(), 42);
    }

    #[test]
    fn test_manual_clock_shared_through_arc() {
        let clock = Arc::new(ManualClock::new(0));
        let as_dyn: Arc<dyn Clock> = clock.clone();

        clock.advance(10);
        assert_eq!(as_dyn.now(), 10);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now() > 1_577_836_800);
    }
}
