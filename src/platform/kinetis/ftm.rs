//! Kinetis FlexTimer (FTM) tick source
//!
//! Drives FTM0/FTM1 on the MK64/MK66 (Teensy 3.5/3.6) as free-running 16-bit
//! up-counters clocked from the bus clock. Each module wraps at its modulo and
//! raises TOF, which fires the overflow interrupt when TOIE is set.
//!
//! # Register Access
//!
//! Registers are accessed with volatile reads and writes at fixed addresses.
//! Nothing else in the firmware may touch FTM0/FTM1.

use core::ptr::{read_volatile, write_volatile};

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;
use flextick_core::tick::{OverflowFlag, TickSource, TickSpec};

use crate::platform::config::FtmConfig;

/// SIM clock gating control register 6
const SIM_SCGC6: usize = 0x4004_803C;

/// Status and control
const FTM_SC: usize = 0x00;
/// Counter
const FTM_CNT: usize = 0x04;
/// Modulo
const FTM_MOD: usize = 0x08;
/// Counter initial value
const FTM_CNTIN: usize = 0x4C;
/// Features mode selection
const FTM_MODE: usize = 0x54;

/// SC: timer overflow flag
const SC_TOF: u32 = 1 << 7;
/// SC: timer overflow interrupt enable
const SC_TOIE: u32 = 1 << 6;
/// SC: clock source = system (bus) clock
const SC_CLKS_SYSTEM: u32 = 0b01 << 3;
/// SC: prescale field mask
const SC_PS_MASK: u32 = 0b111;

/// MODE: write protection disable
const MODE_WPDIS: u32 = 1 << 2;

/// FlexTimer module selector.
///
/// Also serves as the overflow flag handle used by the interrupt handlers,
/// which must clear TOF even when no timer has been instantiated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtmInstance {
    /// FTM0, high-precision clock
    Ftm0,
    /// FTM1, deadline timer
    Ftm1,
}

impl FtmInstance {
    const fn base(self) -> usize {
        match self {
            FtmInstance::Ftm0 => 0x4003_8000,
            FtmInstance::Ftm1 => 0x4003_9000,
        }
    }

    const fn clock_gate(self) -> u32 {
        match self {
            FtmInstance::Ftm0 => 1 << 24,
            FtmInstance::Ftm1 => 1 << 25,
        }
    }

    /// NVIC interrupt line (MK64/MK66 numbering)
    const fn irq(self) -> FtmIrq {
        match self {
            FtmInstance::Ftm0 => FtmIrq(42),
            FtmInstance::Ftm1 => FtmIrq(43),
        }
    }

    fn read(self, offset: usize) -> u32 {
        // SAFETY: fixed, aligned FTM register address; reads have no side effects
        unsafe { read_volatile((self.base() + offset) as *const u32) }
    }

    fn write(self, offset: usize, value: u32) {
        // SAFETY: fixed, aligned FTM register address owned by this module
        unsafe { write_volatile((self.base() + offset) as *mut u32, value) }
    }
}

impl OverflowFlag for FtmInstance {
    fn overflow_pending(&self) -> bool {
        self.read(FTM_SC) & SC_TOF != 0
    }

    fn clear_overflow(&self) {
        // TOF clears by reading it as 1, then writing 0
        let sc = self.read(FTM_SC);
        if sc & SC_TOF != 0 {
            self.write(FTM_SC, sc & !SC_TOF);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FtmIrq(u16);

// SAFETY: 42 and 43 are the FTM0/FTM1 lines of the MK64/MK66 vector table
unsafe impl InterruptNumber for FtmIrq {
    fn number(self) -> u16 {
        self.0
    }
}

/// Running FlexTimer counter.
#[derive(Debug, Clone, Copy)]
pub struct FlexTimer {
    instance: FtmInstance,
    spec: TickSpec,
}

impl FlexTimer {
    /// Starts `instance` as a free-running counter.
    ///
    /// Enables the module clock, stops the counter, programs CNTIN = 0 and
    /// MOD = `config.modulo`, resets CNT and restarts it from the bus clock
    /// with the configured prescaler. The overflow interrupt stays disabled;
    /// see [`enable_overflow_interrupt`](Self::enable_overflow_interrupt).
    pub fn configure(instance: FtmInstance, config: &FtmConfig) -> Self {
        // SAFETY: read-modify-write of the clock gate register during single-threaded startup
        unsafe {
            let scgc6 = read_volatile(SIM_SCGC6 as *const u32);
            write_volatile(SIM_SCGC6 as *mut u32, scgc6 | instance.clock_gate());
        }

        instance.write(FTM_SC, 0);
        instance.write(FTM_MODE, instance.read(FTM_MODE) | MODE_WPDIS);
        instance.write(FTM_CNTIN, 0);
        instance.write(FTM_MOD, config.modulo as u32);
        // Any write to CNT loads CNTIN
        instance.write(FTM_CNT, 0);
        instance.clear_overflow();
        instance.write(
            FTM_SC,
            SC_CLKS_SYSTEM | (config.prescale_bits() & SC_PS_MASK),
        );

        Self {
            instance,
            spec: config.tick_spec(),
        }
    }

    /// Module this counter runs on.
    pub fn instance(&self) -> FtmInstance {
        self.instance
    }

    /// Sets TOIE and unmasks the module's NVIC line.
    ///
    /// Call only after the timer slot for this counter is instantiated.
    pub fn enable_overflow_interrupt(&self) {
        // Writing TOF back as 1 has no effect, so a pending overflow survives
        let sc = self.instance.read(FTM_SC);
        self.instance.write(FTM_SC, sc | SC_TOIE);
        // SAFETY: the handler for this line only touches its own timer slot
        unsafe { NVIC::unmask(self.instance.irq()) };
    }
}

impl TickSource for FlexTimer {
    fn spec(&self) -> TickSpec {
        self.spec
    }

    fn raw_ticks(&self) -> u32 {
        self.instance.read(FTM_CNT) & 0xFFFF
    }
}

impl OverflowFlag for FlexTimer {
    fn overflow_pending(&self) -> bool {
        self.instance.overflow_pending()
    }

    fn clear_overflow(&self) {
        self.instance.clear_overflow()
    }
}
