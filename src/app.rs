use std::num::NonZeroUsize;

use chrono::{DateTime, Local};

use crate::constants::SEED_SAMPLES;
use crate::window::{RollingWindow, StatsMode};

// Main application state
pub struct App {
    pub target: String,
    pub window: RollingWindow,
    pub replies: u64,
    pub started_at: DateTime<Local>,
    pub last_reply_at: Option<DateTime<Local>>,
    source_closed: bool,
}

impl App {
    pub fn new(target: &str, capacity: NonZeroUsize, mode: StatsMode) -> App {
        let mut window = RollingWindow::new(capacity, mode);
        for seed in SEED_SAMPLES {
            window.seed(seed);
        }
        App {
            target: target.to_string(),
            window,
            replies: 0,
            started_at: Local::now(),
            last_reply_at: None,
            source_closed: false,
        }
    }

    pub fn on_sample(&mut self, latency_ms: f64) {
        self.window.add_sample(latency_ms);
        self.replies += 1;
        self.last_reply_at = Some(Local::now());
    }

    pub fn on_source_closed(&mut self) {
        self.source_closed = true;
    }

    pub fn source_closed(&self) -> bool {
        self.source_closed
    }
}
