//! Deadline notification signal
//!
//! `DeadlineSignal` is the dispatch queue handed to the deadline timer. The
//! overflow ISR signals it; an async task in thread mode waits on it and runs
//! the deferred work outside interrupt context.
//!
//! # Usage
//!
//! ```ignore
//! static DEADLINE_SIGNAL: DeadlineSignal = DeadlineSignal::new();
//!
//! let timers = flextick::timers::init(&DEADLINE_SIGNAL)?;
//!
//! #[embassy_executor::task]
//! async fn deadline_task() {
//!     loop {
//!         DEADLINE_SIGNAL.wait().await;
//!         // run whatever was scheduled for this deadline
//!     }
//! }
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use flextick_core::dispatch::DispatchQueue;

/// Interrupt-safe "deadline reached" signal.
///
/// Repeated notifications before the waiter runs coalesce into one wake-up;
/// [`notifications`](Self::notifications) still counts every one of them.
pub struct DeadlineSignal {
    signal: Signal<CriticalSectionRawMutex, ()>,
    notifications: AtomicU32,
}

impl DeadlineSignal {
    /// Creates an unsignaled instance.
    ///
    /// This is a const fn, allowing static initialization.
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            notifications: AtomicU32::new(0),
        }
    }

    /// Waits until the next deadline notification.
    pub async fn wait(&self) {
        self.signal.wait().await
    }

    /// Consumes a pending notification without waiting.
    ///
    /// Returns `true` if one was pending.
    pub fn try_take(&self) -> bool {
        self.signal.try_take().is_some()
    }

    /// Returns `true` if a notification is pending.
    pub fn is_signaled(&self) -> bool {
        self.signal.signaled()
    }

    /// Total number of notifications received.
    pub fn notifications(&self) -> u32 {
        self.notifications.load(Ordering::Relaxed)
    }
}

impl Default for DeadlineSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchQueue for DeadlineSignal {
    fn deadline_ready(&self) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
        self.signal.signal(());
    }
}
