// Latency extraction from ping output lines

use std::{num::ParseFloatError, sync::OnceLock};

use regex::Regex;
use thiserror::Error;

// Needs two digits at least: "time=5ms" and "time<1ms" are skipped.
// ASCII digits only, and the same whitespace set as RE2's \s (no \v).
const LATENCY_PATTERN: &str = r"(?-u)(\d+\.?\d+?)[\t\n\f\r ]*?ms";

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("no latency found in line")]
    NoMatch,
    #[error("invalid latency value: {0}")]
    Parse(#[from] ParseFloatError),
}

fn latency_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LATENCY_PATTERN).expect("latency pattern is valid"))
}

/// Parse the round-trip time in milliseconds out of one line of ping output.
pub fn parse_latency(line: &str) -> Result<f64, ExtractError> {
    let caps = latency_regex().captures(line).ok_or(ExtractError::NoMatch)?;
    let value = caps.get(1).ok_or(ExtractError::NoMatch)?;
    Ok(value.as_str().parse::<f64>()?)
}
