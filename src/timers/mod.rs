//! Process-wide timers
//!
//! This module wires the core clock and deadline timer to their interrupt
//! handlers and exposes them to the rest of the firmware.
//!
//! # Startup Order
//!
//! 1. Configure the counters (overflow interrupts still disabled)
//! 2. Instantiate both timer slots
//! 3. Enable the overflow interrupts
//!
//! An overflow delivered before step 2 would be dropped and the clock would
//! silently lose one period, so `init` performs the steps in this order and
//! nothing else enables the interrupts.

#[cfg(feature = "teensy")]
mod teensy;

#[cfg(feature = "teensy")]
pub use teensy::{
    ftm0_isr, ftm1_isr, init, init_with, stats_counter, DeadlineClock, HighPrecisionClock,
    DEADLINE_TIMER, HIGH_PRECISION_TIMER,
};

use flextick_core::{
    service_overflow, DeadlineTimer, MonotonicClock, OverflowFlag, OverflowHandler, TickSource,
    TimerSlot,
};

/// Handles to the instantiated timers.
///
/// Returned by `init`; holding one proves both timers exist, so callers never
/// have to check for an empty slot.
pub struct Timers<S: 'static> {
    /// High-precision monotonic clock
    pub clock: &'static MonotonicClock<S>,
    /// Deadline timer
    pub deadline: &'static DeadlineTimer<S>,
}

impl<S: 'static> Clone for Timers<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static> Copy for Timers<S> {}

impl<S: TickSource + 'static> Timers<S> {
    /// Current time of the high-precision clock in microseconds.
    pub fn now_us(&self) -> u64 {
        self.clock.read_us()
    }

    /// Arms the deadline timer at an absolute time on its own time base.
    pub fn arm_deadline_at(&self, deadline_us: u64) {
        critical_section::with(|cs| self.deadline.set_next_deadline_us(cs, deadline_us));
    }

    /// Arms the deadline timer `delay_us` after its current time.
    ///
    /// The current time is read and the deadline stored under one critical
    /// section, so no overflow can slip in between. Returns the absolute
    /// deadline that was armed.
    pub fn arm_deadline_in(&self, delay_us: u64) -> u64 {
        critical_section::with(|cs| {
            let deadline_us = self.deadline.read_us_in(cs) + delay_us;
            self.deadline.set_next_deadline_us(cs, deadline_us);
            deadline_us
        })
    }
}

/// Body of an overflow interrupt handler.
///
/// Services the event for `slot` and clears `flag`; logs a warning when the
/// event is dropped because the slot is still empty.
pub fn overflow_isr<T, F>(slot: &TimerSlot<T>, flag: &F, name: &str)
where
    T: OverflowHandler + 'static,
    F: OverflowFlag + ?Sized,
{
    if !service_overflow(slot, flag) {
        crate::log_warn!("{} overflow before timer instantiation, event dropped", name);
    }
}

/// Run-time statistics counter for the RTOS.
///
/// Returns the low 32 bits of the extended tick count of the clock in `slot`,
/// or 0 before the clock is instantiated.
pub fn runtime_stats_counter<S>(slot: &TimerSlot<MonotonicClock<S>>) -> u32
where
    S: TickSource + 'static,
{
    critical_section::with(|cs| {
        slot.instance_in(cs)
            .map(|clock| clock.stats_ticks(cs))
            .unwrap_or(0)
    })
}
