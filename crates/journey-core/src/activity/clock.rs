use std::cell::Cell;

use crate::calendar::DateKey;

/// Source of "today" for the engine.
pub trait Clock {
    fn today(&self) -> DateKey;
}

/// The local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        DateKey::today()
    }
}

/// A settable day, for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock(Cell<DateKey>);

impl FixedClock {
    pub fn new(today: DateKey) -> Self {
        Self(Cell::new(today))
    }

    pub fn set(&self, today: DateKey) {
        self.0.set(today);
    }

    pub fn advance_days(&self, n: i64) {
        self.0.set(self.0.get().add_days(n));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.0.get()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn today(&self) -> DateKey {
        (**self).today()
    }
}
