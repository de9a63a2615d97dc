//! Teensy 3.5/3.6 timer wiring
//!
//! FTM0 drives the high-precision clock, FTM1 the deadline timer. The two
//! interrupt handlers are exported by symbol name for the board's vector
//! table.

use flextick_core::{DeadlineTimer, DispatchQueue, MonotonicClock, TickSource, TimerSlot};

use super::{overflow_isr, runtime_stats_counter, Timers};
use crate::platform::kinetis::{FlexTimer, FtmInstance};
use crate::platform::{Result, TimerConfig};

/// Monotonic clock on FTM0
pub type HighPrecisionClock = MonotonicClock<FlexTimer>;

/// Deadline timer on FTM1
pub type DeadlineClock = DeadlineTimer<FlexTimer>;

/// Global high-precision clock, empty until [`init`]
pub static HIGH_PRECISION_TIMER: TimerSlot<HighPrecisionClock> = TimerSlot::new();

/// Global deadline timer, empty until [`init`]
pub static DEADLINE_TIMER: TimerSlot<DeadlineClock> = TimerSlot::new();

/// Initializes both timers from the build-time configuration.
///
/// # Errors
///
/// Returns the configuration error if the build-time settings are invalid.
/// No hardware is touched in that case.
pub fn init(queue: &'static dyn DispatchQueue) -> Result<Timers<FlexTimer>> {
    let config = TimerConfig::from_build_env().map_err(|e| {
        crate::log_error!("Timer configuration rejected: {}", e);
        e
    })?;
    Ok(init_with(&config, queue))
}

/// Initializes both timers with an explicit configuration.
///
/// Must run once, before interrupts are globally enabled. Later calls return
/// the existing timers without touching the hardware (reprogramming a running
/// counter would make the clock jump).
pub fn init_with(config: &TimerConfig, queue: &'static dyn DispatchQueue) -> Timers<FlexTimer> {
    if let (Some(clock), Some(deadline)) = (
        HIGH_PRECISION_TIMER.instance(),
        DEADLINE_TIMER.instance(),
    ) {
        crate::log_debug!("Timers already initialized");
        return Timers { clock, deadline };
    }

    let clock_source = FlexTimer::configure(FtmInstance::Ftm0, &config.clock);
    let deadline_source = FlexTimer::configure(FtmInstance::Ftm1, &config.deadline);

    let clock = HIGH_PRECISION_TIMER.instantiate(|| MonotonicClock::new(clock_source));
    let deadline = DEADLINE_TIMER.instantiate(|| DeadlineTimer::new(deadline_source, queue));

    // Only now may overflows be delivered
    clock.source().enable_overflow_interrupt();
    deadline.source().enable_overflow_interrupt();

    let clock_spec = clock.source().spec();
    let deadline_spec = deadline.source().spec();
    crate::log_info!(
        "FTM0 clock: {} ps/tick, {} us/overflow",
        clock_spec.picos_per_tick,
        clock_spec.overflow_period_us()
    );
    crate::log_info!(
        "FTM1 deadline: {} ps/tick, {} us resolution",
        deadline_spec.picos_per_tick,
        deadline_spec.overflow_period_us()
    );

    Timers { clock, deadline }
}

/// Run-time statistics counter backed by the FTM0 clock.
pub fn stats_counter() -> u32 {
    runtime_stats_counter(&HIGH_PRECISION_TIMER)
}

/// FTM0 overflow interrupt handler
#[no_mangle]
pub extern "C" fn ftm0_isr() {
    overflow_isr(&HIGH_PRECISION_TIMER, &FtmInstance::Ftm0, "FTM0");
}

/// FTM1 overflow interrupt handler
#[no_mangle]
pub extern "C" fn ftm1_isr() {
    overflow_isr(&DEADLINE_TIMER, &FtmInstance::Ftm1, "FTM1");
}
