use std::cell::Cell;
use std::time::Duration;

use web_time::Instant;

/// Zero-based monotonic time source.
///
/// Each session owns its clock; nothing is installed globally.
pub trait Clock: 'static {
    fn now(&self) -> Duration;
}

/// Wall clock measured from the moment it was created.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A test clock you can drive deterministically.
#[derive(Default)]
pub struct TestClock {
    t: Cell<Duration>,
}

impl TestClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, t: Duration) {
        self.t.set(t);
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Duration {
        self.t.get()
    }
}

/// Milliseconds as a `Duration`; keeps test and config code terse.
pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
