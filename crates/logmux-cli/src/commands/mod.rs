pub mod emit;
pub mod levels;

use logmux_core::LoggerConfig;
use std::path::Path;

/// Load `path` if given, otherwise start from defaults
pub fn load_config(path: Option<&Path>) -> Result<LoggerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(LoggerConfig::load(path)?),
        None => Ok(LoggerConfig::default()),
    }
}
