//! Size-rotated file output
//!
//! Lines are appended to `dir/name`. When the next line would push the
//! file past `max_size`, archives shift up by one (`name.1` becomes
//! `name.2` and so on), the live file becomes `name.1`, and a fresh file
//! is started. Archives are never pruned.
//!
//! Write failures drop the line and are reported through diagnostics once
//! per failure streak; the file is closed and reopened on the next write.

use super::{LogSink, UserData};
use logmux_core_types::schema::{OP_FILE_OPEN, OP_FILE_REOPEN, OP_FILE_ROTATE, OP_FILE_WRITE};
use logmux_core_types::LogRecord;
use logmux_errors::{LogFault, Result};
use logmux_logging::{log_op_end, log_op_error, log_op_start};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[derive(Debug, Default)]
struct FileState {
    file: Option<File>,
    size: u64,
    failing: bool,
    rotations: u64,
}

/// Rotating file sink
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    name: String,
    max_size: u64,
    state: Mutex<FileState>,
    reopen_requested: AtomicBool,
}

impl FileSink {
    pub fn new(max_size: u64, dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            max_size,
            state: Mutex::new(FileState::default()),
            reopen_requested: AtomicBool::new(false),
        }
    }

    /// Path of the live file
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    /// Path of archive `index`, starting at 1 for the newest
    pub fn archive_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, index))
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Number of rotations performed by this sink
    pub fn rotations(&self) -> u64 {
        self.state.lock().rotations
    }

    /// Close and reopen the live file immediately
    ///
    /// # Errors
    ///
    /// Returns `ERR_FILE_OPEN` when the directory or file cannot be opened.
    pub fn reopen(&self) -> Result<()> {
        let started = Instant::now();
        let path = self.path();
        log_op_start!(OP_FILE_REOPEN, path = %path.display());

        let mut state = self.state.lock();
        state.file = None;
        match self.open(&mut state) {
            Ok(()) => {
                state.failing = false;
                log_op_end!(
                    OP_FILE_REOPEN,
                    duration_ms = started.elapsed().as_millis() as u64,
                    path = %path.display()
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    OP_FILE_REOPEN,
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    fn open(&self, state: &mut FileState) -> Result<()> {
        let started = Instant::now();
        let path = self.path();
        log_op_start!(OP_FILE_OPEN, path = %path.display());
        let fault = |err: std::io::Error| LogFault::FileOpen {
            path: path.display().to_string(),
            reason: err.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(&fault)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(&fault)?;
        state.size = file.metadata().map_err(&fault)?.len();
        state.file = Some(file);

        log_op_end!(
            OP_FILE_OPEN,
            duration_ms = started.elapsed().as_millis() as u64,
            path = %path.display(),
            size = state.size
        );
        Ok(())
    }

    fn rotate(&self, state: &mut FileState) -> Result<()> {
        let started = Instant::now();
        let path = self.path();
        log_op_start!(OP_FILE_ROTATE, path = %path.display(), size = state.size);

        state.file = None;
        let mut highest = 0;
        while self.archive_path(highest + 1).exists() {
            highest += 1;
        }
        for index in (1..=highest).rev() {
            rename(&self.archive_path(index), &self.archive_path(index + 1))?;
        }
        rename(&path, &self.archive_path(1))?;

        state.size = 0;
        state.rotations += 1;
        self.open(state)?;

        log_op_end!(
            OP_FILE_ROTATE,
            duration_ms = started.elapsed().as_millis() as u64,
            archives = highest + 1
        );
        Ok(())
    }

    fn write_line(&self, state: &mut FileState, line: &[u8]) -> Result<()> {
        if state.file.is_none() {
            self.open(state)?;
        }

        let len = line.len() as u64;
        if self.max_size > 0 && state.size > 0 && state.size + len > self.max_size {
            self.rotate(state)?;
        }

        let path = self.path();
        let file = state.file.as_mut().ok_or_else(|| LogFault::FileWrite {
            path: path.display().to_string(),
            reason: "file is not open".to_string(),
        })?;
        file.write_all(line).map_err(|err| LogFault::FileWrite {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        state.size += len;
        Ok(())
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|err| {
        LogFault::FileRotate {
            path: from.display().to_string(),
            reason: format!("rename to {} failed: {}", to.display(), err),
        }
        .into()
    })
}

impl LogSink for FileSink {
    fn write(&self, record: &LogRecord, _user_data: Option<&UserData>) {
        let mut line = record.format_line();
        line.push('\n');

        let mut state = self.state.lock();
        match self.write_line(&mut state, line.as_bytes()) {
            Ok(()) => state.failing = false,
            Err(err) => {
                state.file = None;
                if !state.failing {
                    state.failing = true;
                    let err = err.with_domain(record.domain.as_str());
                    log_op_error!(OP_FILE_WRITE, err, duration_ms = 0u64);
                }
            }
        }
    }

    fn flush(&self) {
        if self.reopen_requested.swap(false, Ordering::AcqRel) {
            // Failure is already reported; the next write retries the open.
            let _ = self.reopen();
        }
        if let Some(file) = self.state.lock().file.as_mut() {
            let _ = file.flush();
        }
    }

    fn request_reopen(&self) {
        self.reopen_requested.store(true, Ordering::Release);
    }
}
