//! Levels command
//!
//! Usage: logmux levels [--config <FILE>] [--json] [DOMAIN]...
//!
//! Prints the default mask, every configured domain, and any extra domains
//! named on the command line.

use clap::Args;
use logmux_core::{LevelMask, Logger};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LevelsArgs {
    /// Domains to resolve in addition to the configured ones
    pub domains: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print a JSON object instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute levels command
pub fn execute(args: LevelsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(args.config.as_deref())?.with_console(false);
    let logger = Logger::init(config);

    let mut rows: Vec<(String, LevelMask)> = logger.configured_domains();
    for domain in &args.domains {
        if !rows.iter().any(|(name, _)| name == domain) {
            rows.push((domain.clone(), logger.log_level_mask(Some(domain.as_str()))));
        }
    }
    let default = logger.log_level_mask(None);

    if args.json {
        let domains: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .map(|(name, mask)| (name.clone(), serde_json::Value::from(mask.to_string())))
            .collect();
        let out = serde_json::json!({
            "default": default.to_string(),
            "domains": domains,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("default: {}", default);
        for (name, mask) in rows {
            println!("{}: {}", name, mask);
        }
    }

    logger.uninit();
    Ok(())
}
