//! logmux core
//!
//! Domain-scoped severity filtering, thread-local tags, a handler registry
//! with a rotating file handler, and optional delivery through a single
//! designated output thread.
//!
//! ```
//! use logmux_core::{error, tags, LogHandler, LogLevel, Logger, LoggerConfig};
//!
//! let logger = Logger::init(LoggerConfig::default().with_console(false));
//! logger.add_handler(&LogHandler::from_fn(|record, _| {
//!     println!("{}", record.format_line());
//! }));
//!
//! let _request = tags::scoped("request", "req-42");
//! error!(logger, domain = "storage", "write failed after {} retries", 3);
//! logger.flush();
//! ```

pub mod config;
pub mod facade;
pub mod filter;
pub mod global;
pub mod handler;
pub mod logger;
pub mod registry;
pub mod stream;
pub mod tags;

pub use config::{FatalAction, FileConfig, LoggerConfig};
pub use global::{init_logger, logger, uninit_logger};
pub use handler::{
    ConsoleSink, DestroyFn, FileSink, HandlerId, LogFn, LogHandler, LogSink, TracingSink, UserData,
};
pub use logger::Logger;
pub use stream::LogStream;
pub use tags::{TagGuard, TagSnapshot};

pub use logmux_core_types::{LevelMask, LogLevel, LogRecord};
pub use logmux_errors::{LogError, LogErrorKind, Result};
