//! Stream-style record builder
//!
//! ```
//! use logmux_core::{LogLevel, Logger, LoggerConfig};
//!
//! let logger = Logger::init(LoggerConfig::default().with_console(false));
//! logger
//!     .stream("media", LogLevel::Warning)
//!     .put("dropped ")
//!     .put(3)
//!     .put(" frames");
//! ```
//!
//! A stream for a disabled level never allocates and ignores everything
//! put into it.

use crate::logger::Logger;
use logmux_core_types::LogLevel;
use std::fmt::{self, Display, Write as _};

/// Accumulates one message and sends it when dropped or finished
pub struct LogStream<'a> {
    logger: &'a Logger,
    domain: &'a str,
    level: LogLevel,
    buffer: Option<String>,
}

impl<'a> LogStream<'a> {
    pub(crate) fn new(logger: &'a Logger, domain: &'a str, level: LogLevel) -> Self {
        let enabled = (level != LogLevel::Debug || cfg!(debug_assertions))
            && logger.level_enabled(domain, level);
        Self {
            logger,
            domain,
            level,
            buffer: enabled.then(String::new),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.buffer.is_some()
    }

    /// Append the display form of `value`
    pub fn put(mut self, value: impl Display) -> Self {
        if let Some(buffer) = self.buffer.as_mut() {
            let _ = write!(buffer, "{value}");
        }
        self
    }

    /// Send the record now
    pub fn finish(mut self) {
        self.send();
    }

    fn send(&mut self) {
        if let Some(message) = self.buffer.take() {
            self.logger.emit(self.domain, self.level, message);
        }
    }
}

impl fmt::Write for LogStream<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.push_str(s);
        }
        Ok(())
    }
}

impl Drop for LogStream<'_> {
    fn drop(&mut self) {
        self.send();
    }
}
