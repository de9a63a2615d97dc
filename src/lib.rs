#![cfg_attr(not(test), no_std)]

//! flextick - Overflow-extended microsecond clock and deadline timer for
//! Kinetis FlexTimer firmware (Teensy 3.5/3.6)
//!
//! This library wires the platform-agnostic timers of `flextick_core` to the
//! FTM hardware and its overflow interrupts.

// Re-export the pure timer logic
pub use flextick_core as timer_core;

// Platform abstraction layer (register access, configuration, errors)
pub mod platform;

// Logging macros
pub mod core;

// Deadline notification signal for async tasks
pub mod dispatch;

// Global timers and interrupt handlers
pub mod timers;

pub use dispatch::DeadlineSignal;
pub use timers::Timers;
