//! Mock tick source for host testing.
//!
//! `MockTickSource` stands in for a hardware counter: tests set or advance the
//! raw count and observe how often the overflow flag was cleared. All state is
//! atomic so a mock can live in a `static` and be shared with a timer slot.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::tick::{OverflowFlag, TickSource, TickSpec};

/// Controllable counter implementing both `TickSource` and `OverflowFlag`.
///
/// # Example
///
/// ```
/// use flextick_core::mock::MockTickSource;
/// use flextick_core::tick::{OverflowFlag, TickSource, TickSpec};
///
/// let source = MockTickSource::new(TickSpec::new(1_000, 1_000));
/// assert_eq!(source.advance(1_250), 1);
/// assert_eq!(source.raw_ticks(), 250);
/// assert!(source.overflow_pending());
/// ```
#[derive(Debug)]
pub struct MockTickSource {
    spec: TickSpec,
    raw: AtomicU32,
    pending: AtomicBool,
    clears: AtomicU32,
}

impl MockTickSource {
    /// Creates a mock counter at raw count 0 with the flag clear.
    pub const fn new(spec: TickSpec) -> Self {
        Self {
            spec,
            raw: AtomicU32::new(0),
            pending: AtomicBool::new(false),
            clears: AtomicU32::new(0),
        }
    }

    /// Sets the live counter value.
    ///
    /// Values at or above `max_ticks` are reduced modulo the period.
    pub fn set_raw(&self, raw: u32) {
        self.raw.store(raw % self.spec.max_ticks, Ordering::SeqCst);
    }

    /// Advances the counter by `ticks`, wrapping at `max_ticks`.
    ///
    /// Raises the overflow flag if at least one wrap happened and returns the
    /// number of wraps. The caller is responsible for delivering one overflow
    /// event per wrap.
    pub fn advance(&self, ticks: u64) -> u64 {
        let max = self.spec.max_ticks as u64;
        let total = self.raw.load(Ordering::SeqCst) as u64 + ticks;
        let wraps = total / max;
        self.raw.store((total % max) as u32, Ordering::SeqCst);
        if wraps > 0 {
            self.pending.store(true, Ordering::SeqCst);
        }
        wraps
    }

    /// Raises the overflow flag without moving the counter.
    pub fn raise_overflow(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Number of times `clear_overflow` has been called.
    pub fn clear_count(&self) -> u32 {
        self.clears.load(Ordering::SeqCst)
    }
}

impl TickSource for MockTickSource {
    fn spec(&self) -> TickSpec {
        self.spec
    }

    fn raw_ticks(&self) -> u32 {
        self.raw.load(Ordering::SeqCst)
    }
}

impl OverflowFlag for MockTickSource {
    fn overflow_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    fn clear_overflow(&self) {
        self.pending.store(false, Ordering::SeqCst);
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
