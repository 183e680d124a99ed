#![allow(clippy::unwrap_used, clippy::expect_used)]

/// Severity filtering: global masks, domain masks, and per-thread overrides.
mod common;

use common::{collect, quiet_logger};
use logmux_core::{error, message, LevelMask, LogLevel};
use proptest::prelude::*;
use std::thread;

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_floor_enables_exactly_the_more_severe_levels(floor in level_strategy(), queried in level_strategy()) {
        let logger = quiet_logger();
        logger.set_log_level(Some("d"), floor);

        prop_assert_eq!(logger.level_enabled("d", queried), queried >= floor);
    }

    #[test]
    fn prop_mask_round_trips_through_logger(bits in 0u32..1024) {
        let logger = quiet_logger();
        logger.set_log_level_mask(Some("d"), LevelMask::from_bits(bits));

        let mask = logger.log_level_mask(Some("d"));
        prop_assert_eq!(mask.bits(), bits & LevelMask::ALL.bits());
        for level in LogLevel::ALL {
            prop_assert_eq!(logger.level_enabled("d", level), mask.contains(level));
        }
    }
}

#[test]
fn test_default_suppresses_message() {
    // GIVEN a logger with the default configuration
    let logger = quiet_logger();
    let collected = collect(&logger);

    // WHEN logging below and at the default floor
    message!(logger, "hidden");
    error!(logger, "shown");

    // THEN only the error is delivered
    assert_eq!(collected.messages(), vec!["shown"]);
}

#[test]
fn test_unconfigured_domain_follows_default() {
    let logger = quiet_logger();
    logger.set_log_level(Some("media"), LogLevel::Debug);

    assert_eq!(
        logger.log_level_mask(Some("net")),
        LevelMask::floor(LogLevel::Warning)
    );
    assert_eq!(logger.log_level_mask(Some("media")), LevelMask::ALL);
}

#[test]
fn test_set_all_then_domain() {
    // GIVEN a configured domain
    let logger = quiet_logger();
    logger.set_log_level(Some("media"), LogLevel::Debug);

    // WHEN every domain is lowered to Error and one is raised again
    logger.set_log_level(None, LogLevel::Error);
    logger.set_log_level(Some("net"), LogLevel::Trace);

    // THEN the explicit domain wins and the rest share the new default
    assert!(!logger.level_enabled("media", LogLevel::Warning));
    assert!(logger.level_enabled("net", LogLevel::Trace));
    assert!(!logger.level_enabled("other", LogLevel::Warning));
}

#[test]
fn test_sparse_mask_is_not_a_floor() {
    let logger = quiet_logger();
    logger.set_log_level_mask(Some("d"), LogLevel::Debug | LogLevel::Fatal);

    assert!(logger.level_enabled("d", LogLevel::Debug));
    assert!(!logger.level_enabled("d", LogLevel::Error));
    assert!(logger.level_enabled("d", LogLevel::Fatal));
}

#[test]
fn test_thread_override_does_not_leak() {
    // GIVEN a thread that lowers its own floor to Debug
    let logger = quiet_logger();
    let worker = logger.clone();
    let seen_in_worker = thread::spawn(move || {
        worker.set_thread_log_level(None, LogLevel::Debug);
        worker.level_enabled("any", LogLevel::Debug)
    })
    .join()
    .unwrap();

    // THEN the override applied there but not here
    assert!(seen_in_worker);
    assert!(!logger.level_enabled("any", LogLevel::Debug));
}

#[test]
fn test_thread_override_beats_global_until_cleared() {
    let logger = quiet_logger();
    logger.set_log_level(Some("media"), LogLevel::Debug);
    logger.set_thread_log_level(Some("media"), LogLevel::Error);

    assert!(!logger.level_enabled("media", LogLevel::Warning));
    assert_eq!(
        logger.effective_mask("media"),
        LevelMask::floor(LogLevel::Error)
    );

    logger.clear_thread_log_level(Some("media"));
    assert!(logger.level_enabled("media", LogLevel::Debug));
}

#[test]
fn test_change_on_other_thread_is_seen_after_cache() {
    // GIVEN this thread has already resolved (and cached) a domain
    let logger = quiet_logger();
    assert!(!logger.level_enabled("media", LogLevel::Message));

    // WHEN another thread changes the global mask
    let other = logger.clone();
    thread::spawn(move || other.set_log_level(Some("media"), LogLevel::Message))
        .join()
        .unwrap();

    // THEN this thread observes the change
    assert!(logger.level_enabled("media", LogLevel::Message));
}

#[test]
fn test_configured_domains_listed_in_order() {
    let logger = quiet_logger();
    logger.set_log_level(Some("net"), LogLevel::Error);
    logger.set_log_level(Some("media"), LogLevel::Debug);

    let names: Vec<_> = logger
        .configured_domains()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["media", "net"]);
}
