//! Statically allocated, create-once timer storage.
//!
//! A `TimerSlot<T>` is a `static` that starts empty and is filled exactly once
//! during startup. Interrupt handlers look the instance up through the slot,
//! so an overflow that fires before instantiation finds nothing and is dropped
//! instead of touching uninitialized state.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};
use static_cell::StaticCell;

/// Process-wide home for one timer instance.
///
/// # Example
///
/// ```
/// use flextick_core::clock::MonotonicClock;
/// use flextick_core::mock::MockTickSource;
/// use flextick_core::slot::TimerSlot;
/// use flextick_core::tick::TickSpec;
///
/// static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 1_000));
/// static CLOCK: TimerSlot<MonotonicClock<&'static MockTickSource>> = TimerSlot::new();
///
/// assert!(CLOCK.instance().is_none());
/// let clock = CLOCK.instantiate(|| MonotonicClock::new(&SOURCE));
/// assert!(core::ptr::eq(clock, CLOCK.instance().unwrap()));
/// ```
pub struct TimerSlot<T: 'static> {
    storage: StaticCell<T>,
    instance: Mutex<Cell<Option<&'static T>>>,
}

impl<T: 'static> TimerSlot<T> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            storage: StaticCell::new(),
            instance: Mutex::new(Cell::new(None)),
        }
    }

    /// Creates the instance if the slot is empty and returns it.
    ///
    /// Idempotent: `make` only runs on the first call. Later calls return the
    /// existing instance with its state untouched.
    ///
    /// Runs `make` inside a critical section. Call it from the single startup
    /// path, before the matching overflow interrupt is enabled.
    pub fn instantiate<F>(&'static self, make: F) -> &'static T
    where
        F: FnOnce() -> T,
    {
        critical_section::with(|cs| {
            let published = self.instance.borrow(cs);
            if let Some(existing) = published.get() {
                return existing;
            }
            let created: &'static T = self.storage.init(make());
            published.set(Some(created));
            created
        })
    }

    /// Returns the instance, or `None` if `instantiate` was never called.
    pub fn instance(&self) -> Option<&'static T> {
        critical_section::with(|cs| self.instance_in(cs))
    }

    /// Same as [`instance`](Self::instance) under a critical section the
    /// caller already holds.
    pub fn instance_in(&self, cs: CriticalSection<'_>) -> Option<&'static T> {
        self.instance.borrow(cs).get()
    }

    /// Returns `true` once the slot holds an instance.
    pub fn is_instantiated(&self) -> bool {
        self.instance().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MonotonicClock;
    use crate::mock::MockTickSource;
    use crate::tick::{TickSource, TickSpec};

    type MockClock = MonotonicClock<&'static MockTickSource>;

    #[test]
    fn empty_until_instantiated() {
        static SLOT: TimerSlot<u32> = TimerSlot::new();
        assert!(SLOT.instance().is_none());
        assert!(!SLOT.is_instantiated());

        assert_eq!(*SLOT.instantiate(|| 7), 7);
        assert!(SLOT.is_instantiated());
        assert_eq!(SLOT.instance().copied(), Some(7));
    }

    #[test]
    fn second_instantiate_is_noop() {
        static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 1_000));
        static OTHER: MockTickSource = MockTickSource::new(TickSpec::new(2_000, 500));
        static SLOT: TimerSlot<MockClock> = TimerSlot::new();

        let first = SLOT.instantiate(|| MonotonicClock::new(&SOURCE));
        critical_section::with(|cs| first.on_overflow(cs));

        let mut ran = false;
        let second = SLOT.instantiate(|| {
            ran = true;
            MonotonicClock::new(&OTHER)
        });

        assert!(!ran);
        assert!(core::ptr::eq(first, second));
        assert_eq!(critical_section::with(|cs| second.base_ticks(cs)), 1_000);
        assert_eq!(second.source().spec(), TickSpec::new(1_000, 1_000));
    }
}
