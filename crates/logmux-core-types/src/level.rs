//! Severity levels and level masks
//!
//! Every level owns one bit, so levels compose into a `LevelMask` with
//! bitwise OR. Levels are ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Log severity levels, least severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum LogLevel {
    Debug = 1,
    Trace = 1 << 1,
    #[serde(alias = "info")]
    Message = 1 << 2,
    #[serde(alias = "warn")]
    Warning = 1 << 3,
    Error = 1 << 4,
    Fatal = 1 << 5,
}

impl LogLevel {
    /// All levels, least severe first
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Debug,
        LogLevel::Trace,
        LogLevel::Message,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Sentinel bit one past the most severe level. Never a valid level.
    pub const END_BIT: u32 = 1 << 6;

    /// The bit this level occupies in a `LevelMask`
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
            LogLevel::Message => "message",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Look up the level owning exactly `bit`
    pub fn from_bit(bit: u32) -> Option<LogLevel> {
        Self::ALL.into_iter().find(|level| level.bit() == bit)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl ParseLevelError {
    /// The rejected input
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level '{}'", self.input)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            "message" | "info" => Ok(LogLevel::Message),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(ParseLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// Set of enabled levels
///
/// Bits outside the six level bits (including the END sentinel) are
/// always dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct LevelMask(u32);

impl LevelMask {
    /// No level enabled
    pub const NONE: LevelMask = LevelMask(0);

    /// Every level enabled
    pub const ALL: LevelMask = LevelMask(LogLevel::END_BIT - 1);

    /// Build a mask from raw bits, discarding unknown bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits of the mask
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Cumulative floor: `level` and every more severe level
    ///
    /// # Example
    ///
    /// ```
    /// use logmux_core_types::{LevelMask, LogLevel};
    ///
    /// let mask = LevelMask::floor(LogLevel::Warning);
    /// assert!(mask.contains(LogLevel::Error));
    /// assert!(!mask.contains(LogLevel::Message));
    /// ```
    pub const fn floor(level: LogLevel) -> Self {
        Self(Self::ALL.0 & !(level.bit() - 1))
    }

    pub const fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, level: LogLevel) {
        self.0 |= level.bit();
    }

    pub fn remove(&mut self, level: LogLevel) {
        self.0 &= !level.bit();
    }

    /// Enabled levels, least severe first
    pub fn levels(self) -> impl Iterator<Item = LogLevel> {
        LogLevel::ALL
            .into_iter()
            .filter(move |level| self.contains(*level))
    }
}

impl From<u32> for LevelMask {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl From<LevelMask> for u32 {
    fn from(mask: LevelMask) -> Self {
        mask.bits()
    }
}

impl From<LogLevel> for LevelMask {
    fn from(level: LogLevel) -> Self {
        Self(level.bit())
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOr<LogLevel> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        LevelMask(self.0 | rhs.bit())
    }
}

impl BitOr for LogLevel {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        LevelMask(self.bit() | rhs.bit())
    }
}

impl BitOrAssign<LogLevel> for LevelMask {
    fn bitor_assign(&mut self, rhs: LogLevel) {
        self.insert(rhs);
    }
}

impl fmt::Display for LevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.levels().map(|level| level.as_str()).collect();
        f.write_str(&names.join("|"))
    }
}
