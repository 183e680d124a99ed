//! Emit command
//!
//! Usage: logmux emit [--config <FILE>] [--domain <D>] [--level <L>] [MESSAGE]...
//!
//! Messages come from the arguments, or from stdin one per line when none
//! are given. With `--threads N` the main thread becomes the output thread
//! and N workers log concurrently through the queue.

use clap::Args;
use logmux_core::{tags, LogLevel, LogRecord, Logger};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

#[derive(Debug, Args)]
pub struct EmitArgs {
    /// Messages to log (default: read lines from stdin)
    pub messages: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Domain of the emitted records
    #[arg(short, long, default_value = "logmux")]
    pub domain: String,

    /// Level of the emitted records
    #[arg(short, long, default_value = "warning")]
    pub level: LogLevel,

    /// Override the configured default floor
    #[arg(long)]
    pub min_level: Option<LogLevel>,

    /// Also write to <DIR>/<FILE_NAME>
    #[arg(long)]
    pub file_dir: Option<PathBuf>,

    #[arg(long, default_value = "logmux.log")]
    pub file_name: String,

    /// Rotation threshold in bytes for --file-dir (0 disables rotation)
    #[arg(long, default_value_t = 0)]
    pub max_size: u64,

    /// Print records to stdout as JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Tag to attach, as ID=VALUE (repeatable)
    #[arg(short, long = "tag", value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,

    /// Log from this many worker threads through the output queue
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, value)) if !id.is_empty() => Ok((id.to_string(), value.to_string())),
        _ => Err(format!("expected ID=VALUE, got '{}'", raw)),
    }
}

/// Execute emit command
pub fn execute(args: EmitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(level) = args.min_level {
        config.level = level;
    }
    if let Some(dir) = &args.file_dir {
        config = config.with_file(dir.clone(), args.file_name.clone(), args.max_size);
    }
    config.validate()?;

    let logger = Logger::init(config);
    if args.json {
        logger.set_log_handler(print_json);
    }

    for (id, value) in &args.tags {
        tags::push_log_tag(id, value.as_str());
    }

    let messages = if args.messages.is_empty() {
        io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        args.messages
    };

    if args.threads == 0 {
        for message in &messages {
            logger.logv(&args.domain, args.level, format_args!("{}", message));
        }
    } else {
        emit_from_workers(&logger, &args.domain, args.level, &messages, args.threads)?;
    }

    logger.flush();
    logger.uninit();
    Ok(())
}

fn emit_from_workers(
    logger: &Logger,
    domain: &str,
    level: LogLevel,
    messages: &[String],
    threads: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    logger.set_log_thread(Some(thread::current().id()));

    let workers: Vec<_> = (0..threads)
        .map(|index| {
            let logger = logger.clone();
            let domain = domain.to_string();
            let messages = messages.to_vec();
            tags::spawn(move || {
                tags::push_log_tag("worker", index.to_string());
                for message in &messages {
                    logger.logv(&domain, level, format_args!("{}", message));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().map_err(|_| "worker thread panicked")?;
    }
    Ok(())
}

fn print_json(record: &LogRecord) {
    if let Ok(line) = serde_json::to_string(record) {
        let _ = writeln!(io::stdout().lock(), "{}", line);
    }
}
