//! Platform abstraction layer
//!
//! This module provides hardware access for the supported microcontrollers.
//! All register-level code is isolated here.

pub mod config;
pub mod error;

// Platform implementations (feature-gated)
#[cfg(feature = "teensy")]
pub mod kinetis;

// Re-export commonly used types
pub use config::{FtmConfig, TimerConfig};
pub use error::{PlatformError, Result, TimerError};
