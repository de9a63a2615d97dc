//! Core firmware infrastructure
//!
//! Cross-cutting services shared by the timer wiring and application code.

pub mod logging;
