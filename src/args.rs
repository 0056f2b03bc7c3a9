//! Command-line arguments

use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;

use crate::constants::{DEFAULT_LOG_FILE, DEFAULT_PING_PROGRAM, DEFAULT_WINDOW_SIZE, MIN_WINDOW_SIZE};
use crate::window::StatsMode;

fn parse_window(s: &str) -> Result<NonZeroUsize, String> {
    let size: NonZeroUsize = s
        .parse()
        .map_err(|e| format!("Invalid window size: {}", e))?;
    if size.get() < MIN_WINDOW_SIZE {
        return Err(format!("window must hold at least {} samples", MIN_WINDOW_SIZE));
    }
    Ok(size)
}

/// Live latency graph for a single host
#[derive(Parser, Debug, Clone)]
#[command(name = "pingg", version)]
pub struct Args {
    /// Host name or address to ping
    pub target: String,

    /// Number of samples kept on the chart
    #[arg(short, long, env = "PINGG_WINDOW", default_value_t = DEFAULT_WINDOW_SIZE, value_parser = parse_window)]
    pub window: NonZeroUsize,

    /// How avg/max/min are computed
    ///
    /// - compat: skips the first samples and treats a 0ms minimum as unset
    /// - exact: every reply counts
    #[arg(long, env = "PINGG_STATS", value_enum, default_value_t = StatsMode::Compat)]
    pub stats: StatsMode,

    /// Ping executable to run
    #[arg(long, env = "PINGG_PROGRAM", default_value = DEFAULT_PING_PROGRAM)]
    pub program: String,

    /// Log file (defaults to pingg.log in the temp directory)
    #[arg(long, env = "PINGG_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }
}
