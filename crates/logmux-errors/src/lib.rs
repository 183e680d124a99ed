//! Error facility for logmux
//!
//! Logging entry points never report errors to their callers. Errors only
//! surface at the fallible edges: configuration loading, level parsing and
//! the file handler internals. This crate provides:
//!
//! - **`LogErrorKind`**: stable taxonomy with `ERR_*` codes
//! - **`LogError`**: canonical structured error, built with `with_*` helpers
//! - **`LogFault`**: concrete faults that convert into `LogError`

use logmux_core_types::ParseLevelError;
use std::path::Path;
use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable by tests and by tools
/// that parse diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorKind {
    // Configuration
    InvalidLevel,
    InvalidConfig,

    // File handler
    FileOpen,
    FileRotate,
    FileWrite,

    // Output thread
    WrongThread,

    // Configuration file access
    Io,
}

impl LogErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorKind::InvalidLevel => "ERR_INVALID_LEVEL",
            LogErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            LogErrorKind::FileOpen => "ERR_FILE_OPEN",
            LogErrorKind::FileRotate => "ERR_FILE_ROTATE",
            LogErrorKind::FileWrite => "ERR_FILE_WRITE",
            LogErrorKind::WrongThread => "ERR_WRONG_THREAD",
            LogErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct LogError {
    kind: LogErrorKind,
    op: Option<String>,
    domain: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<LogError>>,
}

impl LogError {
    /// Create a new error with the specified kind
    pub fn new(kind: LogErrorKind) -> Self {
        Self {
            kind,
            op: None,
            domain: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add log domain context
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: LogError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> LogErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&LogError> {
        self.source.as_deref()
    }

    /// Structured JSON form used by the CLI for machine-readable failures
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "op": self.op,
            "domain": self.domain,
            "path": self.path,
            "message": self.message,
            "source": self.source.as_ref().map(|s| s.to_json()),
        })
    }
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, " (domain: {})", domain)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Concrete faults raised inside logmux
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LogFault {
    /// A level name did not parse
    #[error("Unknown log level: {value}")]
    InvalidLevel { value: String },

    /// Configuration content was rejected
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Configuration file could not be read
    #[error("Cannot read configuration {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    /// Log file could not be opened or created
    #[error("Cannot open log file {path}: {reason}")]
    FileOpen { path: String, reason: String },

    /// Log file could not be archived during rotation
    #[error("Cannot rotate log file {path}: {reason}")]
    FileRotate { path: String, reason: String },

    /// A line could not be written to the log file
    #[error("Cannot write log file {path}: {reason}")]
    FileWrite { path: String, reason: String },

    /// Flush was requested away from the designated output thread
    #[error("Flush called outside the designated log output thread")]
    FlushOffThread,
}

impl From<LogFault> for LogError {
    fn from(fault: LogFault) -> Self {
        let message = fault.to_string();
        match fault {
            LogFault::InvalidLevel { .. } => LogError::new(LogErrorKind::InvalidLevel)
                .with_op("parse_level")
                .with_message(message),

            LogFault::InvalidConfig { .. } => LogError::new(LogErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(message),

            LogFault::ConfigRead { path, .. } => LogError::new(LogErrorKind::Io)
                .with_op("load_config")
                .with_path(path)
                .with_message(message),

            LogFault::FileOpen { path, .. } => LogError::new(LogErrorKind::FileOpen)
                .with_op(logmux_core_types::schema::OP_FILE_OPEN)
                .with_path(path)
                .with_message(message),

            LogFault::FileRotate { path, .. } => LogError::new(LogErrorKind::FileRotate)
                .with_op(logmux_core_types::schema::OP_FILE_ROTATE)
                .with_path(path)
                .with_message(message),

            LogFault::FileWrite { path, .. } => LogError::new(LogErrorKind::FileWrite)
                .with_op(logmux_core_types::schema::OP_FILE_WRITE)
                .with_path(path)
                .with_message(message),

            LogFault::FlushOffThread => LogError::new(LogErrorKind::WrongThread)
                .with_op(logmux_core_types::schema::OP_FLUSH)
                .with_message(message),
        }
    }
}

impl From<ParseLevelError> for LogError {
    fn from(err: ParseLevelError) -> Self {
        LogFault::InvalidLevel {
            value: err.input().to_string(),
        }
        .into()
    }
}
