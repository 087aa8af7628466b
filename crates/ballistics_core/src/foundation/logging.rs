//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Library code only emits through the `log` facade; binaries call this once.
pub fn init() {
    env_logger::init();
}
