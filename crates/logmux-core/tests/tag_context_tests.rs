#![allow(clippy::unwrap_used, clippy::expect_used)]

/// Thread-local tags: ordering, attachment to records, snapshot and paste.
mod common;

use common::{collect, quiet_logger};
use logmux_core::tags::{self, TagSnapshot};
use logmux_core::{error, LogLevel};
use std::sync::mpsc;
use std::thread;

#[test]
fn test_tags_attached_to_records() {
    // GIVEN two tags on this thread
    tags::clear_log_tags();
    let logger = quiet_logger();
    let collected = collect(&logger);
    let _conn = tags::scoped("conn", "c-9");
    let _req = tags::scoped("req", "r-1");

    // WHEN logging
    error!(logger, "failed");

    // THEN the record carries both values, oldest first
    let record = &collected.records()[0];
    assert_eq!(record.tags, vec!["c-9", "r-1"]);
    assert!(record.format_line().ends_with("-error-[c-9 r-1] failed"));
}

#[test]
fn test_untagged_line_has_no_brackets() {
    let logger = quiet_logger();
    let collected = collect(&logger);
    tags::clear_log_tags();

    error!(logger, "plain");

    let line = collected.records()[0].format_line();
    assert!(line.ends_with("-error-plain"));
    assert!(!line.contains('['));
}

#[test]
fn test_tags_are_per_thread() {
    tags::clear_log_tags();
    tags::push_log_tag("owner", "main");

    let seen = thread::spawn(tags::log_tags).join().unwrap();

    assert!(seen.is_empty());
    assert_eq!(tags::log_tags(), vec!["main"]);
    tags::clear_log_tags();
}

#[test]
fn test_nested_values_restore_on_pop() {
    tags::clear_log_tags();
    tags::push_log_tag("step", "outer");
    tags::push_log_tag("step", "inner");
    assert_eq!(tags::log_tag("step").as_deref(), Some("inner"));

    tags::pop_log_tag("step");
    assert_eq!(tags::log_tag("step").as_deref(), Some("outer"));

    tags::pop_log_tag("step");
    assert_eq!(tags::log_tag("step"), None);
    assert_eq!(tags::pop_log_tag("step"), None);
}

#[test]
fn test_snapshot_pasted_into_worker() {
    // GIVEN a snapshot taken with two tags set
    tags::clear_log_tags();
    tags::push_log_tag("job", "j-3");
    tags::push_log_tag("user", "u-5");
    let snapshot = TagSnapshot::capture();
    tags::clear_log_tags();

    // WHEN a worker that already has its own tags pastes it
    let logger = quiet_logger();
    let collected = collect(&logger);
    let worker = logger.clone();
    thread::spawn(move || {
        tags::push_log_tag("stale", "x");
        snapshot.paste();
        worker.logv("d", LogLevel::Error, format_args!("from worker"));
    })
    .join()
    .unwrap();

    // THEN the worker's records carry exactly the snapshot's tags
    assert_eq!(collected.records()[0].tags, vec!["j-3", "u-5"]);
    assert!(tags::log_tags().is_empty());
}

#[test]
fn test_snapshot_is_independent_of_later_changes() {
    tags::clear_log_tags();
    tags::push_log_tag("a", "1");
    let snapshot = TagSnapshot::capture();
    tags::push_log_tag("a", "2");

    assert_eq!(snapshot.values(), vec!["1"]);
    tags::clear_log_tags();
}

#[test]
fn test_spawn_inherits_tags() {
    tags::clear_log_tags();
    let _guard = tags::scoped("trace", "t-77");

    let (tx, rx) = mpsc::channel();
    tags::spawn(move || tx.send(tags::log_tags()).unwrap())
        .join()
        .unwrap();

    assert_eq!(rx.recv().unwrap(), vec!["t-77"]);
}
