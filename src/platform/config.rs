//! FlexTimer configuration
//!
//! Build-time settings (see `build.rs`) are baked in as environment strings
//! and parsed and validated once at startup by [`TimerConfig::from_build_env`].

use flextick_core::tick::{TickSpec, PICOS_PER_MICRO};

use crate::platform::error::{PlatformError, Result, TimerError};

/// Picoseconds per second
const PICOS_PER_SECOND: u64 = PICOS_PER_MICRO * 1_000_000;

/// Configuration of one FlexTimer counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtmConfig {
    /// Bus clock feeding the FTM module (Hz)
    pub bus_clock_hz: u32,
    /// Clock divider (1, 2, 4, ..., 128)
    pub prescale: u8,
    /// Terminal count; the counter runs 0..=modulo and then wraps
    pub modulo: u16,
}

impl FtmConfig {
    /// Creates a validated counter configuration.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer` if the bus clock is zero, the prescaler
    /// is not a power of two in 1..=128, or the modulo is zero.
    pub fn new(bus_clock_hz: u32, prescale: u8, modulo: u16) -> Result<Self> {
        if bus_clock_hz == 0 {
            return Err(TimerError::ZeroBusClock.into());
        }
        if !prescale.is_power_of_two() || prescale > 128 {
            return Err(TimerError::InvalidPrescaler.into());
        }
        if modulo == 0 {
            return Err(TimerError::ZeroModulo.into());
        }

        Ok(Self {
            bus_clock_hz,
            prescale,
            modulo,
        })
    }

    /// Value of the 3-bit PS field in FTMx_SC (divide by 2^PS).
    pub fn prescale_bits(&self) -> u32 {
        self.prescale.trailing_zeros()
    }

    /// Tick descriptor for this configuration.
    ///
    /// The tick period is rounded to the nearest picosecond, so clocks that do
    /// not divide 10^12 evenly (60 MHz: 16666.67 ps) drift by under 0.5 ps
    /// per tick.
    pub fn tick_spec(&self) -> TickSpec {
        let bus = self.bus_clock_hz as u64;
        let numerator = PICOS_PER_SECOND * self.prescale as u64;
        let picos_per_tick = (numerator + bus / 2) / bus;
        TickSpec::new(picos_per_tick, self.modulo as u32 + 1)
    }
}

/// Configuration of both timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// High-precision clock counter (FTM0)
    pub clock: FtmConfig,
    /// Deadline counter (FTM1)
    pub deadline: FtmConfig,
}

impl TimerConfig {
    /// Builds the configuration from the values baked in by `build.rs`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if a value does not parse, or a
    /// `PlatformError::Timer` validation error.
    pub fn from_build_env() -> Result<Self> {
        Self::from_strs(
            env!("FLEXTICK_BUS_CLOCK_HZ"),
            (
                env!("FLEXTICK_CLOCK_PRESCALE"),
                env!("FLEXTICK_CLOCK_MODULO"),
            ),
            (
                env!("FLEXTICK_DEADLINE_PRESCALE"),
                env!("FLEXTICK_DEADLINE_MODULO"),
            ),
        )
    }

    /// Parses `(prescale, modulo)` pairs for both counters sharing one bus clock.
    pub fn from_strs(bus_clock_hz: &str, clock: (&str, &str), deadline: (&str, &str)) -> Result<Self> {
        let bus_clock_hz = parse(bus_clock_hz)?;
        Ok(Self {
            clock: FtmConfig::new(bus_clock_hz, parse(clock.0)?, parse(clock.1)?)?,
            deadline: FtmConfig::new(bus_clock_hz, parse(deadline.0)?, parse(deadline.1)?)?,
        })
    }
}

fn parse<T: core::str::FromStr>(value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PlatformError::InvalidConfig)
}
