//! Canonical diagnostics macros
//!
//! These macros give the library's internal operations (file rotation,
//! reopen, flush) a structured, consistent shape.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use logmux_logging::log_op_start;
/// log_op_start!("file_rotate");
/// log_op_start!("file_rotate", path = "/tmp/app.log");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__private::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__private::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use logmux_logging::log_op_end;
/// log_op_end!("flush", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into `LogError` so the event carries its kind,
/// stable code, and any domain or path context it holds.
///
/// # Example
///
/// ```
/// # use logmux_logging::log_op_error;
/// use logmux_errors::LogFault;
///
/// let fault = LogFault::FileOpen { path: "/x".into(), reason: "denied".into() };
/// log_op_error!("file_open", fault, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let log_err: $crate::__private::LogError = $err.into();
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?log_err.kind(),
            err_code = log_err.code(),
            err_message = log_err.message(),
            err_domain = log_err.domain(),
            err_path = log_err.path(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let log_err: $crate::__private::LogError = $err.into();
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?log_err.kind(),
            err_code = log_err.code(),
            err_message = log_err.message(),
            err_domain = log_err.domain(),
            err_path = log_err.path(),
            $($field)*
        );
    }};
}
