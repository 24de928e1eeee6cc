//! Conditional logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! The render path runs on every frame, so per-pass logging is compiled in
//! but switched off per module unless someone is chasing a bug there.
//!
//! Usage:
//! ```ignore
//! const ENABLE_LOGS: bool = false;
//!
//! use crate::{log_debug, log_warn};
//!
//! log_debug!("coalesced {} intervals into {} blocks", n, blocks.len());
//! ```

/// Conditional trace logging. The calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::trace!($($arg)*);
        }
    };
}

/// Conditional debug logging. The calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// Conditional info logging. The calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional warn logging. The calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}
