//! Formatting macros
//!
//! Every macro checks the filter before touching its format arguments, so
//! arguments of a disabled call are never evaluated. The level macros use
//! the calling crate's package name as the domain unless one is given with
//! `domain = "..."`.
//!
//! ```
//! use logmux_core::{message, warning, LogLevel, Logger, LoggerConfig};
//!
//! let logger = Logger::init(LoggerConfig::default().with_console(false));
//! warning!(logger, "queue depth {}", 12);
//! message!(logger, domain = "media", "decoder ready");
//! logmux_core::log!(logger, "net", LogLevel::Error, "link {} down", "eth0");
//! ```
//!
//! `debug!` compiles to nothing in release builds.

/// Log at an explicit domain and level
#[macro_export]
macro_rules! log {
    ($logger:expr, $domain:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let domain: &str = $domain;
        let level: $crate::LogLevel = $level;
        if logger.level_enabled(domain, level) {
            logger.logv(domain, level, format_args!($($arg)+));
        }
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, domain = $domain:expr, $($arg:tt)+) => {
        if cfg!(debug_assertions) {
            $crate::log!($logger, $domain, $crate::LogLevel::Debug, $($arg)+)
        }
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::debug!($logger, domain = env!("CARGO_PKG_NAME"), $($arg)+)
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, domain = $domain:expr, $($arg:tt)+) => {
        $crate::log!($logger, $domain, $crate::LogLevel::Trace, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, env!("CARGO_PKG_NAME"), $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! message {
    ($logger:expr, domain = $domain:expr, $($arg:tt)+) => {
        $crate::log!($logger, $domain, $crate::LogLevel::Message, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, env!("CARGO_PKG_NAME"), $crate::LogLevel::Message, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, domain = $domain:expr, $($arg:tt)+) => {
        $crate::log!($logger, $domain, $crate::LogLevel::Warning, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, env!("CARGO_PKG_NAME"), $crate::LogLevel::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, domain = $domain:expr, $($arg:tt)+) => {
        $crate::log!($logger, $domain, $crate::LogLevel::Error, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, env!("CARGO_PKG_NAME"), $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at `Fatal`, then abort or panic as configured
#[macro_export]
macro_rules! fatal {
    ($logger:expr, domain = $domain:expr, $($arg:tt)+) => {
        $crate::log!($logger, $domain, $crate::LogLevel::Fatal, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, env!("CARGO_PKG_NAME"), $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Open a [`LogStream`](crate::LogStream) for the calling crate's domain
///
/// ```
/// use logmux_core::{slog, LogLevel, Logger, LoggerConfig};
///
/// let logger = Logger::init(LoggerConfig::default().with_console(false));
/// slog!(logger, LogLevel::Error).put("bytes=").put(512);
/// ```
#[macro_export]
macro_rules! slog {
    ($logger:expr, domain = $domain:expr, $level:expr) => {
        $logger.stream($domain, $level)
    };
    ($logger:expr, $level:expr) => {
        $logger.stream(env!("CARGO_PKG_NAME"), $level)
    };
}
