use std::num::NonZeroUsize;

pub const DEFAULT_WINDOW_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => unreachable!(),
};
pub const MIN_WINDOW_SIZE: usize = 2;

// Placeholders pushed before the first reply so the chart never starts empty
pub const SEED_SAMPLES: [f64; 2] = [30.0, 30.0];

// Compat-mode aggregates only start updating once this many samples are held
pub const WARM_UP_SAMPLES: usize = 2;

pub const INPUT_POLL_MS: u64 = 200;

pub const DEFAULT_PING_PROGRAM: &str = "ping";
pub const DEFAULT_LOG_FILE: &str = "pingg.log";
