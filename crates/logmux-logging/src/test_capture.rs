//! In-memory capture of logmux diagnostics
//!
//! Tests install the capture layer with [`init_test_capture`] and then
//! query events by operation. The fields the library emits (`op`, `event`,
//! `path`, `domain`, `duration_ms` and the `err_*` context) have typed
//! accessors on [`CapturedEvent`]; anything else is reachable through
//! [`CapturedEvent::field`].

use logmux_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DOMAIN, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_DOMAIN, FIELD_ERR_PATH, FIELD_EVENT, FIELD_OP, FIELD_PATH,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One diagnostic event as seen by the capture layer
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    /// Name of the emitting thread, if it had one
    pub thread: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    /// `start`, `end` or `end_error`
    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn err_code(&self) -> Option<&str> {
        self.field(FIELD_ERR_CODE)
    }

    pub fn err_domain(&self) -> Option<&str> {
        self.field(FIELD_ERR_DOMAIN)
    }

    pub fn err_path(&self) -> Option<&str> {
        self.field(FIELD_ERR_PATH)
    }

    pub fn path(&self) -> Option<&str> {
        self.field(FIELD_PATH)
    }

    pub fn domain(&self) -> Option<&str> {
        self.field(FIELD_DOMAIN)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.field(FIELD_DURATION_MS)?.parse().ok()
    }

    pub fn is_start(&self) -> bool {
        self.event() == Some(EVENT_START)
    }

    pub fn is_end(&self) -> bool {
        self.event() == Some(EVENT_END)
    }

    pub fn is_error(&self) -> bool {
        self.event() == Some(EVENT_END_ERROR)
    }
}

#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    events: Buffer,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            thread: std::thread::current().name().map(str::to_string),
            fields: visitor.0,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Shared view of every captured event
///
/// The buffer is process-wide, so queries should pin something unique to
/// the test: a path, a domain or a thread name.
#[derive(Clone)]
pub struct TestCapture {
    events: Buffer,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events emitted for operation `op`, in emission order
    pub fn for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.iter().filter(|e| e.op() == Some(op)).cloned().collect())
            .unwrap_or_default()
    }

    /// Count events of `op` that match `predicate`
    pub fn count_op<F>(&self, op: &str, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.for_op(op).iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics if no event of `op` has the given event name.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen = self.for_op(op);
        assert!(
            seen.iter().any(|e| e.event() == Some(event)),
            "Expected event op={} event={} not found among {} events for that op",
            op,
            event,
            seen.len()
        );
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer on first use and return the shared handle
///
/// ```
/// use logmux_logging::log_op_start;
/// use logmux_logging::test_capture::init_test_capture;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_rotate", path = "/tmp/doc.log");
/// let starts = capture.count_op("doc_rotate", |e| e.path() == Some("/tmp/doc.log"));
/// assert_eq!(starts, 1);
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let events = Buffer::default();
            let layer = CaptureLayer {
                events: events.clone(),
            };
            let _ = tracing_subscriber::registry().with(layer).try_init();
            TestCapture { events }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(fields: &[(&str, &str)]) -> CapturedEvent {
        CapturedEvent {
            level: Level::ERROR,
            target: "logmux_core::handler::file".to_string(),
            thread: None,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_typed_accessors_read_emitted_fields() {
        let e = event(&[
            ("op", "file_write"),
            ("event", "end_error"),
            ("err_code", "ERR_FILE_OPEN"),
            ("domain", "media"),
            ("duration_ms", "12"),
        ]);

        assert!(e.is_error());
        assert!(!e.is_end());
        assert_eq!(e.err_code(), Some("ERR_FILE_OPEN"));
        assert_eq!(e.domain(), Some("media"));
        assert_eq!(e.duration_ms(), Some(12));
        assert_eq!(e.path(), None);
    }

    #[test]
    fn test_non_numeric_duration_is_none() {
        let e = event(&[("duration_ms", "soon")]);
        assert_eq!(e.duration_ms(), None);
    }
}
