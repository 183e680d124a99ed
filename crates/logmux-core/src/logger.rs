//! Logger context
//!
//! A [`Logger`] owns the severity filter, the handler registry, the
//! built-in console handler, and the output queue. Clones share one
//! context; the context shuts down on [`Logger::uninit`] or when the last
//! clone is dropped.
//!
//! # Output thread
//!
//! With no output thread designated, records are delivered on the thread
//! that logs them. Once a thread is designated with
//! [`Logger::set_log_thread`], records from any other thread are queued
//! and delivered only when the designated thread logs or calls
//! [`Logger::flush`]. Fatal records are never queued.

use crate::config::{FatalAction, LoggerConfig};
use crate::filter::LevelFilter;
use crate::handler::{ConsoleSink, LogFn, LogHandler};
use crate::registry::HandlerRegistry;
use crate::stream::LogStream;
use crate::tags;
use crossbeam_channel::{Receiver, Sender};
use logmux_core_types::schema::{OP_FLUSH, OP_UNINIT};
use logmux_core_types::{LevelMask, LogLevel, LogRecord};
use logmux_errors::LogFault;
use logmux_logging::{log_op_end, log_op_error};
use parking_lot::RwLock;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Instant;

struct LoggerInner {
    filter: LevelFilter,
    registry: HandlerRegistry,
    console: Arc<ConsoleSink>,
    console_handler: LogHandler,
    log_thread: RwLock<Option<ThreadId>>,
    queue_tx: Sender<LogRecord>,
    queue_rx: Receiver<LogRecord>,
    fatal_action: FatalAction,
    active: AtomicBool,
}

impl LoggerInner {
    fn route(&self, record: LogRecord) {
        let designated = *self.log_thread.read();
        match designated {
            None => {
                // Records queued under an earlier designation go first.
                self.drain_queue();
                self.registry.dispatch(&record);
            }
            Some(owner) if owner == thread::current().id() => {
                self.drain_queue();
                self.registry.dispatch(&record);
            }
            Some(_) => {
                // Both channel ends live in this struct, so send cannot fail.
                let _ = self.queue_tx.send(record);
            }
        }
    }

    fn drain_queue(&self) -> usize {
        let mut drained = 0;
        while let Ok(record) = self.queue_rx.try_recv() {
            self.registry.dispatch(&record);
            drained += 1;
        }
        drained
    }

    fn deliver_fatal(&self, record: LogRecord) {
        self.drain_queue();
        self.registry.dispatch(&record);
        self.registry.flush_all();
        match self.fatal_action {
            FatalAction::Abort => std::process::abort(),
            FatalAction::Panic => panic!(
                "fatal log record in domain '{}': {}",
                record.domain, record.message
            ),
        }
    }

    fn shutdown(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        let started = Instant::now();
        let drained = self.drain_queue();
        self.registry.flush_all();
        let handlers = self.registry.close();
        let removed = handlers.len();
        for handler in handlers {
            handler.destroy();
        }
        log_op_end!(
            OP_UNINIT,
            duration_ms = started.elapsed().as_millis() as u64,
            drained = drained as u64,
            handlers = removed as u64
        );
    }
}

impl Drop for LoggerInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Handle to a logging context
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Build a context from `config`
    ///
    /// Installs the console handler when `config.console` is set and a
    /// rotating file handler when `config.file` is present.
    pub fn init(config: LoggerConfig) -> Self {
        let filter = LevelFilter::new(config.default_mask());
        for (domain, level) in &config.domains {
            filter.set_level(Some(domain.as_str()), *level);
        }

        let console = Arc::new(ConsoleSink::new());
        let console_handler = LogHandler::from_sink(console.clone());
        let registry = HandlerRegistry::new();
        if config.console {
            registry.add(console_handler.clone());
        }
        if let Some(file) = &config.file {
            registry.add(LogHandler::file(file.max_size, file.dir.clone(), file.name.clone()));
        }

        let (queue_tx, queue_rx) = crossbeam_channel::unbounded();
        Self {
            inner: Arc::new(LoggerInner {
                filter,
                registry,
                console,
                console_handler,
                log_thread: RwLock::new(None),
                queue_tx,
                queue_rx,
                fatal_action: config.fatal_action,
                active: AtomicBool::new(true),
            }),
        }
    }

    /// Shut the context down
    ///
    /// Delivers queued records, flushes and removes every handler (running
    /// destroy callbacks), and turns later logging into a no-op. Calling it
    /// again does nothing.
    pub fn uninit(&self) {
        self.inner.shutdown();
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    // ---- filtering ----

    /// Whether a record at `level` for `domain` would be accepted here
    pub fn level_enabled(&self, domain: &str, level: LogLevel) -> bool {
        self.is_active() && self.inner.filter.level_enabled(domain, level)
    }

    /// Enable `level` and everything more severe, for one domain or all
    pub fn set_log_level(&self, domain: Option<&str>, level: LogLevel) {
        self.inner.filter.set_level(domain, level);
    }

    pub fn set_log_level_mask(&self, domain: Option<&str>, mask: LevelMask) {
        self.inner.filter.set_mask(domain, mask);
    }

    /// Global mask for `domain`, or the default mask for `None`
    pub fn log_level_mask(&self, domain: Option<&str>) -> LevelMask {
        self.inner.filter.mask(domain)
    }

    /// Effective mask on the calling thread, overrides included
    pub fn effective_mask(&self, domain: &str) -> LevelMask {
        self.inner.filter.resolved_mask(domain)
    }

    pub fn configured_domains(&self) -> Vec<(String, LevelMask)> {
        self.inner.filter.domains()
    }

    /// Override the floor for the calling thread only
    pub fn set_thread_log_level(&self, domain: Option<&str>, level: LogLevel) {
        self.inner.filter.set_thread_level(domain, level);
    }

    pub fn clear_thread_log_level(&self, domain: Option<&str>) {
        self.inner.filter.clear_thread_level(domain);
    }

    // ---- handlers ----

    /// Register `handler`; a handler already present is left alone
    ///
    /// Returns `false` without registering once the logger is shut down.
    pub fn add_handler(&self, handler: &LogHandler) -> bool {
        self.inner.registry.add(handler.clone())
    }

    /// Unregister `handler` and run its destroy callback
    ///
    /// Removing a handler that is not registered does nothing.
    pub fn remove_handler(&self, handler: &LogHandler) -> bool {
        let removed = self.inner.registry.remove(handler);
        if removed {
            handler.destroy();
        }
        removed
    }

    pub fn handlers(&self) -> Vec<LogHandler> {
        self.inner.registry.snapshot().as_ref().clone()
    }

    /// The built-in console handler, registered or not
    pub fn console_handler(&self) -> LogHandler {
        self.inner.console_handler.clone()
    }

    /// Route console output through `func` for every domain
    pub fn set_log_handler(&self, func: impl Fn(&LogRecord) + Send + Sync + 'static) {
        self.set_log_handler_for_domain(func, None);
    }

    /// Route console output through `func`, restricted to `domain`
    ///
    /// The console handler is re-registered if it had been removed, unless
    /// the logger is shut down.
    pub fn set_log_handler_for_domain(
        &self,
        func: impl Fn(&LogRecord) + Send + Sync + 'static,
        domain: Option<&str>,
    ) {
        let func: Arc<LogFn> = Arc::new(func);
        self.inner.console.set_func(func);
        self.inner.console_handler.set_domain(domain);
        self.inner.registry.add(self.inner.console_handler.clone());
    }

    /// Send console output to `writer` instead of stdout/stderr
    pub fn set_log_writer(&self, writer: impl Write + Send + 'static) {
        self.inner.console.set_writer(Box::new(writer));
        self.inner.registry.add(self.inner.console_handler.clone());
    }

    /// Ask every handler to reopen its output on the next flush
    pub fn request_reopen(&self) {
        for handler in self.inner.registry.snapshot().iter() {
            handler.request_reopen();
        }
    }

    // ---- output thread ----

    /// Designate the thread that delivers records, or `None` to deliver inline
    ///
    /// Clearing the designation delivers anything still queued.
    pub fn set_log_thread(&self, thread: Option<ThreadId>) {
        *self.inner.log_thread.write() = thread;
        if thread.is_none() {
            self.inner.drain_queue();
        }
    }

    pub fn log_thread(&self) -> Option<ThreadId> {
        *self.inner.log_thread.read()
    }

    /// Records waiting for the output thread
    pub fn pending(&self) -> usize {
        self.inner.queue_rx.len()
    }

    /// Deliver queued records and flush every handler
    ///
    /// Returns the number of queued records delivered. When an output
    /// thread is designated, only that thread may flush; other callers get
    /// `0` and a diagnostic.
    pub fn flush(&self) -> usize {
        if let Some(owner) = self.log_thread() {
            if owner != thread::current().id() {
                log_op_error!(OP_FLUSH, LogFault::FlushOffThread, duration_ms = 0u64);
                return 0;
            }
        }
        let drained = self.inner.drain_queue();
        self.inner.registry.flush_all();
        tracing::trace!(op = OP_FLUSH, drained = drained as u64, "flushed output queue");
        drained
    }

    // ---- emission ----

    /// Render and route one record
    ///
    /// The macros call this after checking [`level_enabled`](Self::level_enabled);
    /// calling it directly repeats the check.
    pub fn logv(&self, domain: &str, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.level_enabled(domain, level) {
            return;
        }
        let message = match args.as_str() {
            Some(text) => text.to_string(),
            None => fmt::format(args),
        };
        self.emit(domain, level, message);
    }

    /// Open a stream that builds one record and sends it on drop
    pub fn stream<'a>(&'a self, domain: &'a str, level: LogLevel) -> LogStream<'a> {
        LogStream::new(self, domain, level)
    }

    pub(crate) fn emit(&self, domain: &str, level: LogLevel, message: String) {
        if !self.is_active() {
            return;
        }
        let record = LogRecord::new(domain, level, message).with_tags(tags::log_tags());
        if level == LogLevel::Fatal {
            self.inner.deliver_fatal(record);
        } else {
            self.inner.route(record);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::init(LoggerConfig::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("active", &self.is_active())
            .field("handlers", &self.inner.registry.len())
            .field("log_thread", &self.log_thread())
            .field("pending", &self.pending())
            .finish()
    }
}
