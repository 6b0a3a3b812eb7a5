#![deny(missing_docs)]
//! Shared logging utilities for the job tracker workspace.
//!
//! This crate provides the `tracker_*` logging macros used across the
//! codebase and a minimal test initializer for the global logger. Every line
//! is prefixed with the page-load sequence number of the current thread so
//! that output from consecutive page loads can be told apart.

use std::cell::Cell;

thread_local! {
    /// Sequence number of the page load currently being handled on this thread.
    static PAGE_LOAD: Cell<u64> = const { Cell::new(0) };
}

/// Records the sequence number of the page load handled on this thread.
/// Called once per page load by the session runtime.
pub fn set_page_load(seq: u64) {
    PAGE_LOAD.with(|v| v.set(seq));
}

/// Returns the page-load sequence number for the current thread, or 0 before
/// the first page load.
pub fn page_load() -> u64 {
    PAGE_LOAD.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current page load.
#[macro_export]
macro_rules! tracker_trace {
    ($($arg:tt)*) => {{
        log::trace!("[page {}] {}", $crate::page_load(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current page load.
#[macro_export]
macro_rules! tracker_debug {
    ($($arg:tt)*) => {{
        log::debug!("[page {}] {}", $crate::page_load(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current page load.
#[macro_export]
macro_rules! tracker_info {
    ($($arg:tt)*) => {{
        log::info!("[page {}] {}", $crate::page_load(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current page load.
#[macro_export]
macro_rules! tracker_warn {
    ($($arg:tt)*) => {{
        log::warn!("[page {}] {}", $crate::page_load(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current page load.
#[macro_export]
macro_rules! tracker_error {
    ($($arg:tt)*) => {{
        log::error!("[page {}] {}", $crate::page_load(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
