//! Canonical schema constants for diagnostics
//!
//! These constants keep the library's own `tracing` diagnostics consistent.
//! The `log_op_*!` macros spell the field keys literally; readers of the
//! events use these names.

// Field keys
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_DOMAIN: &str = "domain";
pub const FIELD_PATH: &str = "path";

// Error fields
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_DOMAIN: &str = "err_domain";
pub const FIELD_ERR_PATH: &str = "err_path";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Operation names
pub const OP_FILE_OPEN: &str = "file_open";
pub const OP_FILE_WRITE: &str = "file_write";
pub const OP_FILE_ROTATE: &str = "file_rotate";
pub const OP_FILE_REOPEN: &str = "file_reopen";
pub const OP_FLUSH: &str = "flush";
pub const OP_UNINIT: &str = "uninit";
