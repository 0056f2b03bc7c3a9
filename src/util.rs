use chrono::{DateTime, Local};

use crate::window::Aggregates;

pub fn format_stats(stats: &Aggregates) -> String {
    format!(
        "Avg: {:.2}ms Max: {:.2}ms Min: {:.2}ms",
        stats.avg, stats.max, stats.min
    )
}

pub fn format_clock(time: Option<&DateTime<Local>>) -> String {
    match time {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

// Upper y bound for the chart: 10% headroom, never below 1ms
pub fn y_ceiling(points: &[(f64, f64)]) -> f64 {
    let max = points.iter().map(|&(_, v)| v).fold(0.0, f64::max);
    (max * 1.1).max(1.0)
}
