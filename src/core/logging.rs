//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (teensy): Uses defmt
//! - Host tests: Uses println!
//! - Host non-test: No-op (arguments are still type-checked)
//!
//! The macros are safe to use from interrupt context on the embedded target;
//! defmt encodes lazily and does not allocate.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "teensy")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "teensy"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(feature = "teensy"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "teensy")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "teensy"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "teensy"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "teensy")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "teensy"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(feature = "teensy"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "teensy")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "teensy"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "teensy"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "teensy")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(not(feature = "teensy"), test))]
        println!("[TRACE] {}", format!($($arg)*));

        #[cfg(all(not(feature = "teensy"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}
