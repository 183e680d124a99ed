//! Log handlers
//!
//! A handler pairs a [`LogSink`] (where records go) with registry metadata:
//! an optional domain restriction, opaque user data, and an optional
//! destroy callback that runs once when the handler leaves its logger.

mod console;
mod file;
mod tracing_bridge;

pub use console::{ConsoleSink, LogFn};
pub use file::FileSink;
pub use tracing_bridge::TracingSink;

use logmux_core_types::LogRecord;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque value handed back to a handler on every call
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Called once with the handler when it is removed or its logger shuts down
pub type DestroyFn = Box<dyn FnOnce(&LogHandler) + Send>;

/// Destination for log records
///
/// `write` may be called from any thread and must not assume exclusive
/// access; implementations guard their own state.
pub trait LogSink: Send + Sync {
    fn write(&self, record: &LogRecord, user_data: Option<&UserData>);

    /// Push buffered output to its destination
    fn flush(&self) {}

    /// Ask the sink to reopen its output on the next flush
    fn request_reopen(&self) {}
}

struct FnSink<F>(F);

impl<F> LogSink for FnSink<F>
where
    F: Fn(&LogRecord, Option<&UserData>) + Send + Sync,
{
    fn write(&self, record: &LogRecord, user_data: Option<&UserData>) {
        (self.0)(record, user_data)
    }
}

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique handler identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler-{}", self.0)
    }
}

struct HandlerInner {
    id: HandlerId,
    sink: Arc<dyn LogSink>,
    domain: RwLock<Option<String>>,
    user_data: RwLock<Option<UserData>>,
    destroy: Mutex<Option<DestroyFn>>,
}

/// A registered (or registrable) destination
///
/// Cloning is cheap and yields the same handler: clones compare equal and
/// share domain, user data and sink.
#[derive(Clone)]
pub struct LogHandler {
    inner: Arc<HandlerInner>,
}

impl LogHandler {
    /// Wrap a sink
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self::from_sink(Arc::new(sink))
    }

    /// Wrap a shared sink, keeping access to it through the `Arc`
    pub fn from_sink(sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner: Arc::new(HandlerInner {
                id: HandlerId(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed)),
                sink,
                domain: RwLock::new(None),
                user_data: RwLock::new(None),
                destroy: Mutex::new(None),
            }),
        }
    }

    /// Build a handler from a callback
    ///
    /// ```
    /// use logmux_core::LogHandler;
    ///
    /// let handler = LogHandler::from_fn(|record, _| {
    ///     assert!(!record.domain.is_empty());
    /// });
    /// handler.set_domain(Some("media"));
    /// ```
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn(&LogRecord, Option<&UserData>) + Send + Sync + 'static,
    {
        Self::new(FnSink(callback))
    }

    /// Build a handler from a callback, destroy hook and user data
    pub fn create<F>(callback: F, destroy: Option<DestroyFn>, user_data: Option<UserData>) -> Self
    where
        F: Fn(&LogRecord, Option<&UserData>) + Send + Sync + 'static,
    {
        let handler = Self::from_fn(callback);
        *handler.inner.destroy.lock() = destroy;
        *handler.inner.user_data.write() = user_data;
        handler
    }

    /// Rotating file handler writing `dir/name`
    ///
    /// `max_size` of zero disables rotation.
    pub fn file(max_size: u64, dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::new(FileSink::new(max_size, dir, name))
    }

    pub fn id(&self) -> HandlerId {
        self.inner.id
    }

    /// Restrict the handler to one domain, or accept every domain with `None`
    pub fn set_domain(&self, domain: Option<&str>) {
        *self.inner.domain.write() = domain.map(str::to_string);
    }

    pub fn domain(&self) -> Option<String> {
        self.inner.domain.read().clone()
    }

    pub fn set_user_data(&self, user_data: Option<UserData>) {
        *self.inner.user_data.write() = user_data;
    }

    pub fn user_data(&self) -> Option<UserData> {
        self.inner.user_data.read().clone()
    }

    /// Replace the destroy callback
    pub fn set_destroy(&self, destroy: impl FnOnce(&LogHandler) + Send + 'static) {
        *self.inner.destroy.lock() = Some(Box::new(destroy));
    }

    /// Ask the sink to reopen its output; takes effect on the next flush
    pub fn request_reopen(&self) {
        self.inner.sink.request_reopen();
    }

    pub(crate) fn accepts(&self, domain: &str) -> bool {
        match self.inner.domain.read().as_deref() {
            Some(wanted) => wanted == domain,
            None => true,
        }
    }

    pub(crate) fn handle(&self, record: &LogRecord) {
        let user_data = self.user_data();
        self.inner.sink.write(record, user_data.as_ref());
    }

    pub(crate) fn flush(&self) {
        self.inner.sink.flush();
    }

    /// Run the destroy callback if it has not run yet
    pub(crate) fn destroy(&self) {
        let destroy = self.inner.destroy.lock().take();
        if let Some(destroy) = destroy {
            destroy(self);
        }
    }
}

impl PartialEq for LogHandler {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for LogHandler {}

impl fmt::Debug for LogHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandler")
            .field("id", &self.inner.id)
            .field("domain", &*self.inner.domain.read())
            .field("has_user_data", &self.inner.user_data.read().is_some())
            .finish()
    }
}
