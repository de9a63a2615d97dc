//! Overflow interrupt servicing.
//!
//! Every overflow ISR does the same four steps, in this order:
//!
//! 1. enter a critical section
//! 2. run the timer's overflow handler, if the timer has been instantiated
//! 3. clear the hardware overflow flag, exactly once, whether or not step 2 ran
//! 4. leave the critical section, restoring the previous interrupt state
//!
//! The flag is cleared after the handler so that a wrap cannot be lost or
//! double counted while the handler is still running.

use critical_section::CriticalSection;

use crate::slot::TimerSlot;
use crate::tick::OverflowFlag;

/// A timer that reacts to hardware counter overflows.
pub trait OverflowHandler {
    /// Handles one overflow. Called from the ISR with a critical section held.
    fn on_overflow(&self, cs: CriticalSection<'_>);
}

/// Services one overflow interrupt for the timer stored in `slot`.
///
/// Returns `true` if the event was delivered to an instance, `false` if the
/// slot was still empty and the event was dropped. A dropped event loses one
/// period of clock base; startup must not enable the interrupt before the
/// slot is instantiated.
pub fn service_overflow<T, F>(slot: &TimerSlot<T>, flag: &F) -> bool
where
    T: OverflowHandler + 'static,
    F: OverflowFlag + ?Sized,
{
    critical_section::with(|cs| {
        let delivered = match slot.instance_in(cs) {
            Some(timer) => {
                timer.on_overflow(cs);
                true
            }
            None => false,
        };
        flag.clear_overflow();
        delivered
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MonotonicClock;
    use crate::mock::MockTickSource;
    use crate::tick::{TickSource, TickSpec};

    type MockClock = MonotonicClock<&'static MockTickSource>;

    #[test]
    fn dropped_before_instantiation_but_flag_cleared() {
        static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 1_000));
        static SLOT: TimerSlot<MockClock> = TimerSlot::new();

        SOURCE.raise_overflow();
        assert!(!service_overflow(&SLOT, &SOURCE));
        assert!(!SOURCE.overflow_pending());
        assert_eq!(SOURCE.clear_count(), 1);
        assert!(SLOT.instance().is_none());
    }

    #[test]
    fn delivered_once_per_event() {
        static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 1_000));
        static SLOT: TimerSlot<MockClock> = TimerSlot::new();

        let clock = SLOT.instantiate(|| MonotonicClock::new(&SOURCE));
        for _ in 0..3 {
            SOURCE.raise_overflow();
            assert!(service_overflow(&SLOT, &SOURCE));
        }

        assert_eq!(SOURCE.clear_count(), 3);
        assert!(!SOURCE.overflow_pending());
        assert_eq!(
            critical_section::with(|cs| clock.base_ticks(cs)),
            3 * SOURCE.spec().max_ticks as u64
        );
    }

    #[test]
    fn handler_sees_flag_still_raised() {
        struct FlagProbe {
            source: &'static MockTickSource,
            seen_pending: core::cell::Cell<Option<bool>>,
        }

        // SAFETY: only touched from this test's thread
        unsafe impl Sync for FlagProbe {}

        impl OverflowHandler for FlagProbe {
            fn on_overflow(&self, _cs: CriticalSection<'_>) {
                self.seen_pending.set(Some(self.source.overflow_pending()));
            }
        }

        static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 1_000));
        static SLOT: TimerSlot<FlagProbe> = TimerSlot::new();

        let probe = SLOT.instantiate(|| FlagProbe {
            source: &SOURCE,
            seen_pending: core::cell::Cell::new(None),
        });
        SOURCE.raise_overflow();
        service_overflow(&SLOT, &SOURCE);

        assert_eq!(probe.seen_pending.get(), Some(true));
        assert!(!SOURCE.overflow_pending());
    }
}
