//! Tick source abstraction for narrow, wrapping hardware counters.
//!
//! This module provides the `TickSource` and `OverflowFlag` traits that the
//! clock and deadline timer are generic over, plus the `TickSpec` descriptor
//! and its tick-to-microsecond conversions.
//!
//! # Design
//!
//! - Conversions go through a 128-bit picosecond intermediate so the product
//!   `picos_per_tick * ticks` cannot overflow for any `u64` tick count
//! - Hardware implementations live in the firmware crate
//! - `MockTickSource` (see [`crate::mock`]) is always available for host testing

/// Picoseconds per microsecond.
pub const PICOS_PER_MICRO: u64 = 1_000_000;

/// Static description of a hardware tick source.
///
/// One `TickSpec` exists per counter instance and does not change after the
/// counter is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSpec {
    /// Duration of one counter increment in picoseconds
    pub picos_per_tick: u64,

    /// Number of ticks in one full counter period.
    ///
    /// The counter wraps to zero (and raises its overflow flag) after this
    /// many increments, so raw readings are always `< max_ticks`.
    pub max_ticks: u32,
}

impl TickSpec {
    /// Creates a new descriptor.
    pub const fn new(picos_per_tick: u64, max_ticks: u32) -> Self {
        Self {
            picos_per_tick,
            max_ticks,
        }
    }

    /// Converts an extended tick count to microseconds, truncating.
    #[inline]
    pub const fn ticks_to_us(&self, ticks: u64) -> u64 {
        let picos = self.picos_per_tick as u128 * ticks as u128;
        (picos / PICOS_PER_MICRO as u128) as u64
    }

    /// Converts an extended tick count to microseconds, rounding half up.
    #[inline]
    pub const fn ticks_to_us_rounded(&self, ticks: u64) -> u64 {
        let picos = self.picos_per_tick as u128 * ticks as u128;
        ((picos + (PICOS_PER_MICRO / 2) as u128) / PICOS_PER_MICRO as u128) as u64
    }

    /// Duration of one full counter period in microseconds (truncated).
    ///
    /// This is also the worst-case lateness of a deadline notification.
    #[inline]
    pub const fn overflow_period_us(&self) -> u64 {
        self.ticks_to_us(self.max_ticks as u64)
    }
}

/// Live view of a free-running hardware counter.
///
/// Every wrapping counter also exposes its overflow flag, so readers can tell
/// whether a wrap is still waiting for its interrupt.
pub trait TickSource: OverflowFlag {
    /// Returns the descriptor of this counter.
    fn spec(&self) -> TickSpec;

    /// Reads the live counter register.
    fn raw_ticks(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn spec(&self) -> TickSpec {
        (**self).spec()
    }

    fn raw_ticks(&self) -> u32 {
        (**self).raw_ticks()
    }
}

/// Hardware overflow indicator of a tick source.
///
/// Implementations must guarantee that after `clear_overflow` returns the flag
/// reads `false` until the counter wraps again, whatever the hardware's
/// clearing protocol (write-one-to-clear, read-then-write-zero, ...).
pub trait OverflowFlag {
    /// Returns `true` if the counter has wrapped since the flag was last cleared.
    fn overflow_pending(&self) -> bool;

    /// Clears the overflow indicator.
    fn clear_overflow(&self);
}

impl<T: OverflowFlag + ?Sized> OverflowFlag for &T {
    fn overflow_pending(&self) -> bool {
        (**self).overflow_pending()
    }

    fn clear_overflow(&self) {
        (**self).clear_overflow()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
