//! Core types shared across logmux facilities
//!
//! This crate provides foundational types used by the error facility,
//! the diagnostics facility and the logger itself:
//!
//! - **Levels**: `LogLevel` severities and composable `LevelMask` sets
//! - **Records**: `LogRecord`, the rendered event every handler receives
//! - **Schema constants**: Canonical field keys, event and operation names

pub mod level;
pub mod record;
pub mod schema;

pub use level::{LevelMask, LogLevel, ParseLevelError};
pub use record::LogRecord;
