#![allow(clippy::unwrap_used, clippy::expect_used)]

use logmux_core_types::schema::EVENT_START;
use logmux_errors::{LogError, LogErrorKind, LogFault};
use logmux_logging::test_capture::init_test_capture;
use logmux_logging::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let starts = capture.count_op(op_name, |e| e.is_start());
    assert_eq!(starts, 1, "Should have captured exactly one start event");
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert!(events[0].is_end());
    assert_eq!(events[0].duration_ms(), Some(42));
}

#[test]
fn test_log_op_error_includes_code_and_path() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let fault = LogFault::FileRotate {
        path: "/tmp/rot.log".to_string(),
        reason: "read-only filesystem".to_string(),
    };
    log_op_error!(op_name, fault, duration_ms = 1);

    let events = capture.for_op(op_name);
    let error_event = events
        .iter()
        .find(|e| e.is_error())
        .expect("Should have error event");

    assert_eq!(error_event.err_code(), Some("ERR_FILE_ROTATE"));
    assert_eq!(error_event.err_path(), Some("/tmp/rot.log"));
    assert_eq!(error_event.err_domain(), None);
    assert!(error_event
        .field("err_message")
        .is_some_and(|m| m.contains("read-only filesystem")));
}

#[test]
fn test_log_op_error_carries_domain_context() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = LogError::new(LogErrorKind::WrongThread)
        .with_message("not the output thread")
        .with_domain("media");
    log_op_error!(op_name, err, duration_ms = 0, handler_count = 2u64);

    let events = capture.for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].err_code(), Some("ERR_WRONG_THREAD"));
    assert_eq!(events[0].err_domain(), Some("media"));
    assert_eq!(events[0].field("handler_count"), Some("2"));
}

#[test]
fn test_extra_fields_are_recorded() {
    let capture = init_test_capture();
    let op_name = "test_extra_fields_unique_5";

    log_op_start!(op_name, path = "/tmp/a.log", domain = "net");

    let events = capture.for_op(op_name);
    let start = events.first().expect("Should have start event");

    assert_eq!(start.path(), Some("/tmp/a.log"));
    assert_eq!(start.domain(), Some("net"));
}

#[test]
fn test_events_record_thread_name() {
    let capture = init_test_capture();
    let op_name = "test_thread_name_unique_6";

    std::thread::Builder::new()
        .name("diag-writer".to_string())
        .spawn(move || {
            log_op_start!(op_name);
        })
        .unwrap()
        .join()
        .unwrap();

    let events = capture.for_op(op_name);
    assert_eq!(events[0].thread.as_deref(), Some("diag-writer"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}
