//! Log record type
//!
//! A record is rendered once per accepted event and shared by every
//! handler that receives it.

use crate::level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::thread;

/// One accepted log event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Time the record was created
    pub timestamp: DateTime<Utc>,
    /// Subsystem the event belongs to
    pub domain: String,
    pub level: LogLevel,
    /// Fully rendered message
    pub message: String,
    /// Current tag values of the emitting thread
    pub tags: Vec<String>,
    /// Name of the emitting thread, when it has one
    pub thread: Option<String>,
}

impl LogRecord {
    pub fn new(domain: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            domain: domain.into(),
            level,
            message: message.into(),
            tags: Vec::new(),
            thread: thread::current().name().map(str::to_string),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Render the record as one text line, without the trailing newline
    ///
    /// Layout: `YYYY-MM-DD HH:MM:SS:mmm domain-level-[tag tag] message`.
    /// The tag block is omitted when the record carries no tags.
    pub fn format_line(&self) -> String {
        let stamp = self.timestamp.format("%Y-%m-%d %H:%M:%S:%3f");
        if self.tags.is_empty() {
            format!("{} {}-{}-{}", stamp, self.domain, self.level, self.message)
        } else {
            format!(
                "{} {}-{}-[{}] {}",
                stamp,
                self.domain,
                self.level,
                self.tags.join(" "),
                self.message
            )
        }
    }
}
