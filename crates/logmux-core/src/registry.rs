//! Handler registry
//!
//! Handlers live in a copy-on-write list: writers replace the whole list
//! under the lock, and dispatch clones the current `Arc` and walks it with
//! no lock held. A handler may therefore log, or add and remove handlers,
//! from inside its own callback.
//!
//! [`HandlerRegistry::close`] empties the registry for good; later adds are
//! refused under the same lock, so nothing slips in during shutdown.

use crate::handler::LogHandler;
use logmux_core_types::LogRecord;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Slots {
    handlers: Arc<Vec<LogHandler>>,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct HandlerRegistry {
    slots: RwLock<Slots>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`
    ///
    /// Returns `false` if it is already registered or the registry is
    /// closed.
    pub fn add(&self, handler: LogHandler) -> bool {
        let mut slots = self.slots.write();
        if slots.closed || slots.handlers.contains(&handler) {
            return false;
        }
        let mut next = Vec::with_capacity(slots.handlers.len() + 1);
        next.extend(slots.handlers.iter().cloned());
        next.push(handler);
        slots.handlers = Arc::new(next);
        true
    }

    /// Unregister `handler`; returns `false` if it was not registered
    ///
    /// The destroy callback is left to the caller so it can run outside
    /// the registry lock.
    pub fn remove(&self, handler: &LogHandler) -> bool {
        let mut slots = self.slots.write();
        if !slots.handlers.contains(handler) {
            return false;
        }
        let next: Vec<_> = slots.handlers.iter().filter(|h| *h != handler).cloned().collect();
        slots.handlers = Arc::new(next);
        true
    }

    /// Unregister every handler and refuse further adds
    ///
    /// Returns the handlers in registration order.
    pub fn close(&self) -> Vec<LogHandler> {
        let previous = {
            let mut slots = self.slots.write();
            slots.closed = true;
            std::mem::take(&mut slots.handlers)
        };
        Arc::try_unwrap(previous).unwrap_or_else(|shared| shared.as_ref().clone())
    }

    pub fn len(&self) -> usize {
        self.slots.read().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().handlers.is_empty()
    }

    pub fn snapshot(&self) -> Arc<Vec<LogHandler>> {
        self.slots.read().handlers.clone()
    }

    /// Deliver `record` to every handler accepting its domain
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, record: &LogRecord) -> usize {
        let handlers = self.snapshot();
        let mut delivered = 0;
        for handler in handlers.iter().filter(|h| h.accepts(&record.domain)) {
            handler.handle(record);
            delivered += 1;
        }
        delivered
    }

    pub fn flush_all(&self) {
        for handler in self.snapshot().iter() {
            handler.flush();
        }
    }
}
