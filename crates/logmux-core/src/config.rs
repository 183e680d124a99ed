//! Logger configuration
//!
//! Configuration is plain data, usually read from TOML:
//!
//! ```toml
//! level = "warning"
//! console = true
//! fatal_action = "abort"
//!
//! [domains]
//! media = "debug"
//!
//! [file]
//! dir = "/var/log/app"
//! name = "app.log"
//! max_size = 1048576
//! ```

use logmux_core_types::{LevelMask, LogLevel};
use logmux_errors::{LogFault, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What happens after a fatal record has been delivered and flushed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatalAction {
    /// `std::process::abort`
    #[default]
    Abort,
    /// Panic on the logging thread, letting tests and unwinding hosts observe it
    Panic,
}

/// Rotating file handler installed at init
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub dir: PathBuf,
    pub name: String,
    /// Rotation threshold in bytes; zero disables rotation
    #[serde(default)]
    pub max_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Least severe level enabled by default
    pub level: LogLevel,
    /// Per-domain floors
    pub domains: BTreeMap<String, LogLevel>,
    /// Register the built-in console handler
    pub console: bool,
    pub file: Option<FileConfig>,
    pub fatal_action: FatalAction,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warning,
            domains: BTreeMap::new(),
            console: true,
            file: None,
            fatal_action: FatalAction::Abort,
        }
    }
}

impl LoggerConfig {
    /// Parse and validate TOML text
    ///
    /// # Errors
    ///
    /// Returns `ERR_INVALID_CONFIG` for malformed TOML, unknown keys, bad
    /// level names, or an unusable file handler name.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LoggerConfig = toml::from_str(text).map_err(|err| LogFault::InvalidConfig {
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ERR_IO` when the file cannot be read, otherwise the errors
    /// of [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| LogFault::ConfigRead {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    ///
    /// Returns `ERR_INVALID_CONFIG` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.domains.keys().any(|d| d.is_empty()) {
            return Err(invalid("domain names must not be empty"));
        }
        if let Some(file) = &self.file {
            if file.name.is_empty() {
                return Err(invalid("file.name must not be empty"));
            }
            if file.name.contains(['/', '\\']) {
                return Err(invalid("file.name must not contain path separators"));
            }
        }
        Ok(())
    }

    pub fn default_mask(&self) -> LevelMask {
        LevelMask::floor(self.level)
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_domain_level(mut self, domain: impl Into<String>, level: LogLevel) -> Self {
        self.domains.insert(domain.into(), level);
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_file(mut self, dir: impl Into<PathBuf>, name: impl Into<String>, max_size: u64) -> Self {
        self.file = Some(FileConfig {
            dir: dir.into(),
            name: name.into(),
            max_size,
        });
        self
    }

    pub fn with_fatal_action(mut self, action: FatalAction) -> Self {
        self.fatal_action = action;
        self
    }
}

fn invalid(reason: &str) -> logmux_errors::LogError {
    LogFault::InvalidConfig {
        reason: reason.to_string(),
    }
    .into()
}
