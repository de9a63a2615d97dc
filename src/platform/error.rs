//! Platform error types
//!
//! This module defines error types for timer setup. Only configuration is
//! fallible; programming the counters, reading the clock and servicing
//! overflows never fail.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// Timer configuration rejected
    Timer(TimerError),
    /// A configuration value could not be parsed
    InvalidConfig,
}

/// Timer-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// Prescaler is not a power of two in 1..=128
    InvalidPrescaler,
    /// Bus clock frequency is zero
    ZeroBusClock,
    /// Counter modulo is zero (counter would never advance)
    ZeroModulo,
}

impl From<TimerError> for PlatformError {
    fn from(e: TimerError) -> Self {
        PlatformError::Timer(e)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Timer(e) => write!(f, "Timer error: {}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidPrescaler => {
                write!(f, "prescaler must be a power of two between 1 and 128")
            }
            TimerError::ZeroBusClock => write!(f, "bus clock frequency must be non-zero"),
            TimerError::ZeroModulo => write!(f, "counter modulo must be non-zero"),
        }
    }
}

#[cfg(feature = "teensy")]
impl defmt::Format for PlatformError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PlatformError::Timer(e) => defmt::write!(f, "Timer error: {}", e),
            PlatformError::InvalidConfig => defmt::write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "teensy")]
impl defmt::Format for TimerError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TimerError::InvalidPrescaler => defmt::write!(f, "invalid prescaler"),
            TimerError::ZeroBusClock => defmt::write!(f, "zero bus clock"),
            TimerError::ZeroModulo => defmt::write!(f, "zero modulo"),
        }
    }
}
