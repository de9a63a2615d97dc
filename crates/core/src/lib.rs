//! flextick_core - Pure no_std timer logic for overflow-extended hardware counters
//!
//! This crate contains the platform-agnostic half of the firmware timers:
//! everything that can be tested on the host without register access.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Hardware counters injected via traits
//! - **Static storage**: Timers live in `static` slots, no heap
//!
//! # Modules
//!
//! - [`tick`]: Tick source traits and tick-to-microsecond conversion
//! - [`clock`]: Monotonic microsecond clock extended across counter wraps
//! - [`deadline`]: One-shot deadline timer notifying a dispatch queue
//! - [`dispatch`]: Dispatch queue collaborator trait
//! - [`slot`]: Create-once static storage for timer instances
//! - [`isr`]: Overflow interrupt servicing routine
//! - [`mock`]: Mock tick source for host testing

#![no_std]

pub mod clock;
pub mod deadline;
pub mod dispatch;
pub mod isr;
pub mod mock;
pub mod slot;
pub mod tick;

pub use clock::MonotonicClock;
pub use deadline::{DeadlineState, DeadlineTimer};
pub use dispatch::{DispatchQueue, MockDispatchQueue};
pub use isr::{service_overflow, OverflowHandler};
pub use mock::MockTickSource;
pub use slot::TimerSlot;
pub use tick::{OverflowFlag, TickSource, TickSpec, PICOS_PER_MICRO};
