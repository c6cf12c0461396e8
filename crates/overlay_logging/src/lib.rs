#![deny(missing_docs)]
//! Shared logging utilities for the overlay workspace.
//!
//! Every `overlay_*` macro forwards to the `log` facade and prefixes the
//! message with the scan pass currently running on this thread, so that the
//! lines emitted by one reconciliation pass can be grouped when reading a log.

use std::cell::Cell;

thread_local! {
    /// Scan pass counter for the current thread. Zero means "outside any scan".
    static SCAN_PASS: Cell<u64> = const { Cell::new(0) };
}

/// Records the scan pass that subsequent log lines on this thread belong to.
/// The page controller calls this once at the start of every pass.
pub fn set_scan_pass(pass: u64) {
    SCAN_PASS.with(|v| v.set(pass));
}

/// Returns the scan pass recorded for the current thread, or 0 if none was set.
pub fn scan_pass() -> u64 {
    SCAN_PASS.with(|v| v.get())
}

/// Logs a trace-level message stamped with the current scan pass.
#[macro_export]
macro_rules! overlay_trace {
    ($($arg:tt)*) => {{
        log::trace!("[pass {}] {}", $crate::scan_pass(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message stamped with the current scan pass.
#[macro_export]
macro_rules! overlay_debug {
    ($($arg:tt)*) => {{
        log::debug!("[pass {}] {}", $crate::scan_pass(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message stamped with the current scan pass.
#[macro_export]
macro_rules! overlay_info {
    ($($arg:tt)*) => {{
        log::info!("[pass {}] {}", $crate::scan_pass(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message stamped with the current scan pass.
#[macro_export]
macro_rules! overlay_warn {
    ($($arg:tt)*) => {{
        log::warn!("[pass {}] {}", $crate::scan_pass(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message stamped with the current scan pass.
#[macro_export]
macro_rules! overlay_error {
    ($($arg:tt)*) => {{
        log::error!("[pass {}] {}", $crate::scan_pass(), format_args!($($arg)*));
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from every test: a second initialization is silently ignored.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
