//! Thread-local log tags
//!
//! Each thread owns an ordered set of tag entries. An entry is keyed by an
//! id and holds a stack of values; only the top value is rendered. Entries
//! keep the position of their first push, so `log_tags()` lists tags
//! oldest first no matter how often an inner value is replaced.
//!
//! ```
//! use logmux_core::tags;
//!
//! tags::push_log_tag("request", "req-7");
//! tags::push_log_tag("user", "alice");
//! assert_eq!(tags::log_tags(), vec!["req-7", "alice"]);
//!
//! tags::pop_log_tag("request");
//! tags::pop_log_tag("user");
//! assert!(tags::log_tags().is_empty());
//! ```

use std::cell::RefCell;
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagEntry {
    id: String,
    values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TagStack {
    entries: Vec<TagEntry>,
}

impl TagStack {
    fn push(&mut self, id: &str, value: String) {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.values.push(value),
            None => self.entries.push(TagEntry {
                id: id.to_string(),
                values: vec![value],
            }),
        }
    }

    fn pop(&mut self, id: &str) -> Option<String> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let value = self.entries[index].values.pop();
        if self.entries[index].values.is_empty() {
            self.entries.remove(index);
        }
        value
    }

    fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.values.last())
            .map(String::as_str)
    }

    fn current(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| entry.values.last().cloned())
            .collect()
    }
}

thread_local! {
    static TAGS: RefCell<TagStack> = RefCell::new(TagStack::default());
}

fn with_tags<R>(f: impl FnOnce(&mut TagStack) -> R) -> Option<R> {
    TAGS.try_with(|cell| cell.try_borrow_mut().ok().map(|mut stack| f(&mut *stack)))
        .ok()
        .flatten()
}

/// Push `value` onto the tag named `id` for the calling thread
pub fn push_log_tag(id: &str, value: impl Into<String>) {
    let value = value.into();
    with_tags(|stack| stack.push(id, value));
}

/// Pop the top value of tag `id`
///
/// Returns the removed value, or `None` when the tag is not set. The tag
/// disappears once its last value is popped.
pub fn pop_log_tag(id: &str) -> Option<String> {
    with_tags(|stack| stack.pop(id)).flatten()
}

/// Current value of tag `id`
pub fn log_tag(id: &str) -> Option<String> {
    with_tags(|stack| stack.get(id).map(str::to_string)).flatten()
}

/// Current value of every tag, in order of first push
pub fn log_tags() -> Vec<String> {
    with_tags(|stack| stack.current()).unwrap_or_default()
}

/// Remove every tag of the calling thread
pub fn clear_log_tags() {
    with_tags(|stack| stack.entries.clear());
}

/// A copy of one thread's tag state that can be pasted into another
///
/// Snapshots are plain values: dropping one releases it, and pasting does
/// not consume it, so a single snapshot can seed any number of threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    stack: TagStack,
}

impl TagSnapshot {
    /// Capture the calling thread's tags
    pub fn capture() -> Self {
        Self {
            stack: with_tags(|stack| stack.clone()).unwrap_or_default(),
        }
    }

    /// Replace the calling thread's tags with this snapshot
    pub fn paste(&self) {
        let stack = self.stack.clone();
        with_tags(|current| *current = stack);
    }

    /// Top values held by the snapshot, oldest first
    pub fn values(&self) -> Vec<String> {
        self.stack.current()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.entries.is_empty()
    }
}

/// Pops its tag when dropped
#[must_use = "the tag is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TagGuard {
    id: String,
}

impl Drop for TagGuard {
    fn drop(&mut self) {
        pop_log_tag(&self.id);
    }
}

/// Push a tag for the lifetime of the returned guard
pub fn scoped(id: &str, value: impl Into<String>) -> TagGuard {
    push_log_tag(id, value);
    TagGuard { id: id.to_string() }
}

/// Spawn a thread that starts with a copy of the caller's tags
pub fn spawn<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let snapshot = TagSnapshot::capture();
    thread::spawn(move || {
        snapshot.paste();
        f()
    })
}
