use super::{LogSink, UserData};
use logmux_core_types::{LogLevel, LogRecord};

/// Forwards records to the active `tracing` subscriber
///
/// Levels map as Debug→DEBUG, Trace→TRACE, Message→INFO, Warning→WARN,
/// and Error/Fatal→ERROR. Every event uses the `logmux` target and
/// carries the record's domain and tags as fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &LogRecord, _user_data: Option<&UserData>) {
        let domain = record.domain.as_str();
        let joined = record.tags.join(" ");
        let tags = joined.as_str();
        let message = record.message.as_str();
        match record.level {
            LogLevel::Debug => tracing::debug!(target: "logmux", domain, tags, "{message}"),
            LogLevel::Trace => tracing::trace!(target: "logmux", domain, tags, "{message}"),
            LogLevel::Message => tracing::info!(target: "logmux", domain, tags, "{message}"),
            LogLevel::Warning => tracing::warn!(target: "logmux", domain, tags, "{message}"),
            LogLevel::Error | LogLevel::Fatal => {
                tracing::error!(target: "logmux", domain, tags, fatal = record.level == LogLevel::Fatal, "{message}")
            }
        }
    }
}
