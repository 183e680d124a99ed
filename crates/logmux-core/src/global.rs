//! Process-wide logger slot
//!
//! Libraries that cannot thread a [`Logger`] through their call graph use
//! the global one. Nothing is installed until [`init_logger`] runs.

use crate::config::LoggerConfig;
use crate::logger::Logger;
use parking_lot::RwLock;

static GLOBAL: RwLock<Option<Logger>> = parking_lot::const_rwlock(None);

/// Install a new global logger and return a handle to it
///
/// A previously installed logger is shut down first.
pub fn init_logger(config: LoggerConfig) -> Logger {
    let logger = Logger::init(config);
    let previous = GLOBAL.write().replace(logger.clone());
    if let Some(previous) = previous {
        previous.uninit();
    }
    logger
}

/// Shut down and remove the global logger, if any
pub fn uninit_logger() {
    let previous = GLOBAL.write().take();
    if let Some(previous) = previous {
        previous.uninit();
    }
}

/// The global logger, if one is installed
pub fn logger() -> Option<Logger> {
    GLOBAL.read().clone()
}
