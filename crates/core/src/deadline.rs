//! One-shot deadline timer driven by counter overflows.
//!
//! `DeadlineTimer` keeps its own monotonic base on an independent tick source
//! and checks a single armed deadline once per overflow. When the rounded
//! current time reaches the deadline, the dispatch queue is notified and the
//! slot is emptied.
//!
//! # Resolution
//!
//! The deadline is only observed at overflow boundaries, so a notification
//! arrives between zero and one overflow period after the deadline (see
//! [`TickSpec::overflow_period_us`](crate::tick::TickSpec::overflow_period_us)).
//! The check rounds the current time to the nearest microsecond instead of
//! truncating, which pulls a boundary case into the earlier period.
//!
//! # State
//!
//! ```text
//! Empty --set_next_deadline_us--> Armed --on_overflow (now >= deadline)--> Empty
//!                                   ^                                        |
//!                                   +-----------set_next_deadline_us---------+
//! ```

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::clock::MonotonicClock;
use crate::dispatch::DispatchQueue;
use crate::isr::OverflowHandler;
use crate::tick::TickSource;

/// Deadline slot state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineState {
    /// No deadline pending; overflows never notify
    Empty,
    /// A deadline is pending at the given absolute time (microseconds)
    Armed(u64),
}

/// Single-deadline timer bound to one dispatch queue for its lifetime.
pub struct DeadlineTimer<S> {
    clock: MonotonicClock<S>,
    next_deadline_us: Mutex<Cell<Option<u64>>>,
    queue: &'static dyn DispatchQueue,
}

impl<S: TickSource> DeadlineTimer<S> {
    /// Creates a timer with an empty deadline slot.
    ///
    /// The timer never owns `queue`; the queue must stay valid while the
    /// overflow interrupt is enabled, which `'static` guarantees.
    pub const fn new(source: S, queue: &'static dyn DispatchQueue) -> Self {
        Self {
            clock: MonotonicClock::new(source),
            next_deadline_us: Mutex::new(Cell::new(None)),
            queue,
        }
    }

    /// Returns the underlying tick source.
    pub fn source(&self) -> &S {
        self.clock.source()
    }

    /// Arms the deadline at absolute time `deadline_us`, replacing any
    /// pending one.
    ///
    /// The critical-section token is the proof that the overflow handler
    /// cannot run concurrently with this write.
    pub fn set_next_deadline_us(&self, cs: CriticalSection<'_>, deadline_us: u64) {
        self.next_deadline_us.borrow(cs).set(Some(deadline_us));
    }

    /// Pending deadline, if any.
    pub fn pending_deadline_us(&self, cs: CriticalSection<'_>) -> Option<u64> {
        self.next_deadline_us.borrow(cs).get()
    }

    /// Current state of the deadline slot.
    pub fn state(&self, cs: CriticalSection<'_>) -> DeadlineState {
        match self.pending_deadline_us(cs) {
            Some(deadline) => DeadlineState::Armed(deadline),
            None => DeadlineState::Empty,
        }
    }

    /// Reads this timer's current time in microseconds (truncated).
    pub fn read_us(&self) -> u64 {
        self.clock.read_us()
    }

    /// Same as [`read_us`](Self::read_us) under a caller-held critical section.
    pub fn read_us_in(&self, cs: CriticalSection<'_>) -> u64 {
        self.clock.read_us_in(cs)
    }

    /// Reads the current time without taking a critical section.
    ///
    /// # Safety
    ///
    /// Same contract as [`MonotonicClock::read_us_from_isr`]: the caller must be
    /// this timer's overflow ISR or run with that interrupt excluded.
    pub unsafe fn read_us_from_isr(&self) -> u64 {
        // SAFETY: forwarded caller contract
        unsafe { self.clock.read_us_from_isr() }
    }

    /// Accumulated base in ticks.
    pub fn base_ticks(&self, cs: CriticalSection<'_>) -> u64 {
        self.clock.base_ticks(cs)
    }

    /// Handles one hardware overflow.
    ///
    /// Advances the base, recomputes the rounded current time and, if an armed
    /// deadline has been reached, empties the slot and notifies the queue.
    /// Nothing is re-armed; the caller must set a new deadline for another
    /// notification. The deadline timer has no overflow callback.
    pub fn on_overflow(&self, cs: CriticalSection<'_>) {
        self.clock.advance_base(cs);

        let slot = self.next_deadline_us.borrow(cs);
        let Some(deadline) = slot.get() else {
            return;
        };

        let now = self.clock.serviced_read_us_rounded(cs);
        if now >= deadline {
            slot.set(None);
            self.queue.deadline_ready();
        }
    }
}

impl<S: TickSource> OverflowHandler for DeadlineTimer<S> {
    fn on_overflow(&self, cs: CriticalSection<'_>) {
        DeadlineTimer::on_overflow(self, cs)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
