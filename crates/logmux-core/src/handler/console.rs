use super::{LogSink, UserData};
use logmux_core_types::{LogLevel, LogRecord};
use parking_lot::{Mutex, RwLock};
use std::io::{self, Write};
use std::sync::Arc;

/// Callback form of the console handler
pub type LogFn = dyn Fn(&LogRecord) + Send + Sync;

#[derive(Clone)]
enum ConsoleOutput {
    Standard,
    Func(Arc<LogFn>),
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
}

/// The logger's built-in handler
///
/// By default it prints formatted lines, sending `Error` and `Fatal` to
/// stderr and everything else to stdout. The output can be swapped for a
/// callback or any writer without re-registering the handler.
pub struct ConsoleSink {
    output: RwLock<ConsoleOutput>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            output: RwLock::new(ConsoleOutput::Standard),
        }
    }

    pub fn set_func(&self, func: Arc<LogFn>) {
        *self.output.write() = ConsoleOutput::Func(func);
    }

    pub fn set_writer(&self, writer: Box<dyn Write + Send>) {
        *self.output.write() = ConsoleOutput::Writer(Arc::new(Mutex::new(writer)));
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    // Cloned out so no lock is held while user code runs.
    fn target(&self) -> ConsoleOutput {
        self.output.read().clone()
    }
}

impl LogSink for ConsoleSink {
    fn write(&self, record: &LogRecord, _user_data: Option<&UserData>) {
        match self.target() {
            ConsoleOutput::Standard => {
                let line = record.format_line();
                if record.level >= LogLevel::Error {
                    let _ = writeln!(io::stderr().lock(), "{line}");
                } else {
                    let _ = writeln!(io::stdout().lock(), "{line}");
                }
            }
            ConsoleOutput::Func(func) => func(record),
            ConsoleOutput::Writer(writer) => {
                let _ = writeln!(writer.lock(), "{}", record.format_line());
            }
        }
    }

    fn flush(&self) {
        match self.target() {
            ConsoleOutput::Standard => {
                let _ = io::stdout().flush();
                let _ = io::stderr().flush();
            }
            ConsoleOutput::Func(_) => {}
            ConsoleOutput::Writer(writer) => {
                let _ = writer.lock().flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_receives_formatted_line() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new();
        sink.set_writer(Box::new(buf.clone()));

        sink.write(&LogRecord::new("media", LogLevel::Warning, "slow decode"), None);

        let text = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert!(text.ends_with("media-warning-slow decode\n"));
    }

    #[test]
    fn test_func_replaces_writer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_cb = seen.clone();
        let sink = ConsoleSink::new();
        sink.set_writer(Box::new(SharedBuf::default()));
        sink.set_func(Arc::new(move |record: &LogRecord| {
            seen_in_cb.lock().push(record.message.clone());
        }));

        sink.write(&LogRecord::new("d", LogLevel::Message, "hello"), None);

        assert_eq!(*seen.lock(), vec!["hello".to_string()]);
    }
}
