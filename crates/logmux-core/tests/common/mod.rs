use logmux_core::{LogHandler, LogLevel, LogRecord, Logger, LoggerConfig};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every delivered record for later assertions
#[derive(Clone, Default)]
pub struct Collected(Arc<Mutex<Vec<LogRecord>>>);

#[allow(dead_code)]
impl Collected {
    pub fn records(&self) -> Vec<LogRecord> {
        self.0.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

/// A logger with no console output
#[allow(dead_code)]
pub fn quiet_logger() -> Logger {
    Logger::init(LoggerConfig::default().with_console(false))
}

/// A quiet logger with every level enabled
#[allow(dead_code)]
pub fn verbose_logger() -> Logger {
    Logger::init(
        LoggerConfig::default()
            .with_console(false)
            .with_level(LogLevel::Debug),
    )
}

/// A handler that stores what it receives
#[allow(dead_code)]
pub fn collecting_handler() -> (LogHandler, Collected) {
    let collected = Collected::default();
    let sink = collected.clone();
    let handler = LogHandler::from_fn(move |record, _| sink.0.lock().push(record.clone()));
    (handler, collected)
}

/// Register a collecting handler on `logger`
#[allow(dead_code)]
pub fn collect(logger: &Logger) -> Collected {
    let (handler, collected) = collecting_handler();
    logger.add_handler(&handler);
    collected
}
