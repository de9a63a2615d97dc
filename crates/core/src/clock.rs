//! Overflow-extended monotonic microsecond clock.
//!
//! A narrow hardware counter wraps every `max_ticks` ticks. `MonotonicClock`
//! extends it to a 64-bit tick count by adding `max_ticks` to a software base
//! on every overflow interrupt, and converts `base + raw` to microseconds.
//!
//! # Concurrency
//!
//! `base_ticks` lives in a `critical_section::Mutex`. It is only written by
//! [`MonotonicClock::on_overflow`], which runs inside the overflow ISR with a
//! critical section held. Readers in task context go through
//! [`MonotonicClock::read_us`], which takes the critical section so the
//! `(base, raw)` pair is never torn by the ISR.
//!
//! A read can still land between a counter wrap and its ISR, because the ISR
//! is held off by the reader's own critical section or by another one. The
//! read then checks the overflow flag and, if a wrap is pending, counts it
//! itself. `base_ticks` and the flag stay owned by the ISR. At most one
//! unserviced wrap is accounted for; the overflow interrupt must not be held
//! off for a full counter period.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::isr::OverflowHandler;
use crate::tick::TickSource;

/// Optional hook run at the end of every overflow.
#[derive(Debug, Clone, Copy, Default)]
struct OverflowCallback {
    handler: Option<fn()>,
    enabled: bool,
}

/// Monotonic microsecond clock over a wrapping tick source.
///
/// # Example
///
/// ```
/// use flextick_core::clock::MonotonicClock;
/// use flextick_core::mock::MockTickSource;
/// use flextick_core::tick::TickSpec;
///
/// // 1 ns ticks, wraps every 1000 ticks (1 us)
/// let source = MockTickSource::new(TickSpec::new(1_000, 1_000));
/// let clock = MonotonicClock::new(&source);
///
/// critical_section::with(|cs| {
///     clock.on_overflow(cs);
///     clock.on_overflow(cs);
/// });
/// source.set_raw(500);
/// assert_eq!(clock.read_us(), 2);
/// ```
pub struct MonotonicClock<S> {
    source: S,
    base_ticks: Mutex<Cell<u64>>,
    /// Set while `on_overflow` runs: the pending flag is already in the base
    servicing: Mutex<Cell<bool>>,
    callback: Mutex<Cell<OverflowCallback>>,
}

impl<S: TickSource> MonotonicClock<S> {
    /// Creates a clock with `base_ticks = 0`.
    ///
    /// This is a const fn, allowing static initialization.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            base_ticks: Mutex::new(Cell::new(0)),
            servicing: Mutex::new(Cell::new(false)),
            callback: Mutex::new(Cell::new(OverflowCallback {
                handler: None,
                enabled: false,
            })),
        }
    }

    /// Returns the underlying tick source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reads the current time in microseconds.
    ///
    /// Takes a critical section for the duration of the composite read. A wrap
    /// whose interrupt has not run yet is counted, so the result never drops
    /// back by a counter period.
    pub fn read_us(&self) -> u64 {
        critical_section::with(|cs| self.read_us_in(cs))
    }

    /// Reads the current time in microseconds under a critical section the
    /// caller already holds.
    pub fn read_us_in(&self, cs: CriticalSection<'_>) -> u64 {
        self.source.spec().ticks_to_us(self.extended_ticks(cs))
    }

    /// Reads the current time in microseconds without taking a critical section.
    ///
    /// # Safety
    ///
    /// The caller must be the overflow ISR of this clock's tick source, or
    /// otherwise run with that interrupt excluded. Called from task context
    /// with the overflow interrupt live, the read races `on_overflow` and may
    /// observe a torn `(base, raw)` pair.
    pub unsafe fn read_us_from_isr(&self) -> u64 {
        // SAFETY: exclusion of the only mutator is guaranteed by the caller
        let cs = unsafe { CriticalSection::new() };
        self.read_us_in(cs)
    }

    /// Accumulated base in ticks.
    pub fn base_ticks(&self, cs: CriticalSection<'_>) -> u64 {
        self.base_ticks.borrow(cs).get()
    }

    /// Low 32 bits of the extended tick count.
    ///
    /// Intended as the run-time statistics counter an RTOS samples on every
    /// context switch; wrapping is expected by such consumers.
    pub fn stats_ticks(&self, cs: CriticalSection<'_>) -> u32 {
        self.extended_ticks(cs) as u32
    }

    /// Registers a function to run at the end of every overflow.
    ///
    /// Replaces any previously registered callback. The enabled state is left
    /// unchanged, so a freshly registered callback does not run until
    /// [`set_overflow_callback_enabled`](Self::set_overflow_callback_enabled)
    /// turns it on. The callback runs in interrupt context and must not block.
    pub fn register_overflow_callback(&self, handler: fn()) {
        critical_section::with(|cs| {
            let cell = self.callback.borrow(cs);
            let mut callback = cell.get();
            callback.handler = Some(handler);
            cell.set(callback);
        });
    }

    /// Enables or disables the registered overflow callback.
    pub fn set_overflow_callback_enabled(&self, enabled: bool) {
        critical_section::with(|cs| {
            let cell = self.callback.borrow(cs);
            let mut callback = cell.get();
            callback.enabled = enabled;
            cell.set(callback);
        });
    }

    /// Handles one hardware overflow: `base_ticks += max_ticks`, then runs
    /// the overflow callback if one is registered and enabled.
    ///
    /// Must be called exactly once per counter wrap, from the overflow ISR,
    /// before the overflow flag is cleared. Reads made by the callback do not
    /// count the wrap being serviced a second time.
    pub fn on_overflow(&self, cs: CriticalSection<'_>) {
        let servicing = self.servicing.borrow(cs);
        servicing.set(true);
        self.advance_base(cs);

        let callback = self.callback.borrow(cs).get();
        if let (Some(handler), true) = (callback.handler, callback.enabled) {
            handler();
        }
        servicing.set(false);
    }

    /// Adds one counter period to the base. No callback.
    pub(crate) fn advance_base(&self, cs: CriticalSection<'_>) {
        let base = self.base_ticks.borrow(cs);
        base.set(base.get() + self.source.spec().max_ticks as u64);
    }

    /// Rounded current time from inside the overflow handler, after
    /// [`advance_base`](Self::advance_base) already counted the pending wrap.
    pub(crate) fn serviced_read_us_rounded(&self, cs: CriticalSection<'_>) -> u64 {
        let ticks = self.base_ticks.borrow(cs).get() + self.source.raw_ticks() as u64;
        self.source.spec().ticks_to_us_rounded(ticks)
    }

    fn extended_ticks(&self, cs: CriticalSection<'_>) -> u64 {
        let base = self.base_ticks.borrow(cs).get();
        let raw = self.source.raw_ticks();
        if self.servicing.borrow(cs).get() || !self.source.overflow_pending() {
            return base + raw as u64;
        }
        // Wrapped before the flag was sampled: re-read so the count is post-wrap
        let raw = self.source.raw_ticks();
        base + self.source.spec().max_ticks as u64 + raw as u64
    }
}

impl<S: TickSource> OverflowHandler for MonotonicClock<S> {
    fn on_overflow(&self, cs: CriticalSection<'_>) {
        MonotonicClock::on_overflow(self, cs)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
