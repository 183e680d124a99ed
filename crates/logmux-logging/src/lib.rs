//! Diagnostics facility for logmux
//!
//! logmux routes application logs to its own handlers. What the library
//! itself has to say (rotations, reopen requests, dropped lines, misuse of
//! the output thread) goes through `tracing` instead, via this crate:
//!
//! - Single initialization point via `init(profile)` for binaries
//! - Structured operation macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use logmux_logging::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

#[doc(hidden)]
pub mod __private {
    pub use logmux_core_types::schema;
    pub use logmux_errors::LogError;
    pub use tracing;
}
