//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system for tests, ignoring double-init
///
/// Concurrency tests run in parallel and each may try to install the
/// logger; only the first succeeds.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
