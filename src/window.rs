//! Rolling latency window with running aggregates.
//!
//! [`RollingWindow`] keeps the last `capacity` samples for the chart and
//! updates avg/max/min in O(1) per sample, independent of window size.

use std::{collections::VecDeque, num::NonZeroUsize};

use clap::ValueEnum;

use crate::constants::WARM_UP_SAMPLES;
use crate::error::AppError;

/// How the running aggregates are maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatsMode {
    /// Historical behaviour: the first samples are skipped and a min of 0.0 means unset
    #[default]
    Compat,
    /// Every sample counts and min/max start from the first one
    Exact,
}

impl StatsMode {
    pub fn label(self) -> &'static str {
        match self {
            StatsMode::Compat => "compat",
            StatsMode::Exact => "exact",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregates {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

/// Chart-ready view of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub points: Vec<(f64, f64)>,
    pub stats: Aggregates,
}

#[derive(Debug)]
pub struct RollingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
    mode: StatsMode,
    stats: Aggregates,
    // exact mode only
    contributed: u64,
}

impl RollingWindow {
    pub fn new(capacity: NonZeroUsize, mode: StatsMode) -> Self {
        let capacity = capacity.get();
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            mode,
            stats: Aggregates::default(),
            contributed: 0,
        }
    }

    pub fn add_sample(&mut self, sample: f64) {
        match self.mode {
            StatsMode::Compat => self.update_compat(sample),
            StatsMode::Exact => self.update_exact(sample),
        }
        self.push(sample);
    }

    /// Push a placeholder value. Compat mode treats it as a regular sample.
    pub fn seed(&mut self, sample: f64) {
        match self.mode {
            StatsMode::Compat => self.add_sample(sample),
            StatsMode::Exact => self.push(sample),
        }
    }

    fn update_compat(&mut self, sample: f64) {
        let held = self.samples.len();
        if held <= WARM_UP_SAMPLES {
            return;
        }
        let n = held as f64;
        self.stats.avg = (self.stats.avg * n + sample) / (n + 1.0);
        self.stats.max = self.stats.max.max(sample);
        // 0.0 doubles as "unset", so a real 0.0 sample restarts min tracking
        self.stats.min = if self.stats.min == 0.0 {
            sample
        } else {
            self.stats.min.min(sample)
        };
    }

    fn update_exact(&mut self, sample: f64) {
        self.contributed += 1;
        if self.contributed == 1 {
            self.stats = Aggregates { avg: sample, max: sample, min: sample };
            return;
        }
        self.stats.avg += (sample - self.stats.avg) / self.contributed as f64;
        self.stats.max = self.stats.max.max(sample);
        self.stats.min = self.stats.min.min(sample);
    }

    fn push(&mut self, sample: f64) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mode(&self) -> StatsMode {
        self.mode
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn aggregates(&self) -> Aggregates {
        self.stats
    }

    pub fn snapshot(&self) -> Result<Snapshot, AppError> {
        if self.is_empty() {
            return Err(AppError::EmptyHistory);
        }
        let points = self
            .samples()
            .enumerate()
            .map(|(i, v)| (i as f64, v))
            .collect();
        Ok(Snapshot { points, stats: self.stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn compat(capacity: usize) -> RollingWindow {
        RollingWindow::new(size(capacity), StatsMode::Compat)
    }

    fn history(win: &RollingWindow) -> Vec<f64> {
        win.samples().collect()
    }

    #[test]
    fn test_warm_up_then_incremental_average() {
        let mut win = compat(100);
        for s in [30.0, 30.0, 10.0] {
            win.add_sample(s);
        }
        assert_eq!(win.aggregates(), Aggregates::default());

        // 4th call: (0 * 3 + 50) / 4
        win.add_sample(50.0);
        assert_eq!(win.aggregates(), Aggregates { avg: 12.5, max: 50.0, min: 50.0 });

        // 5th call: (12.5 * 4 + 20) / 5
        win.add_sample(20.0);
        assert_eq!(win.len(), 5);
        assert_eq!(win.aggregates(), Aggregates { avg: 14.0, max: 50.0, min: 20.0 });
    }

    #[test]
    fn test_eviction_keeps_order() {
        let mut win = compat(2);
        for s in [1.0, 2.0, 3.0] {
            win.add_sample(s);
        }
        assert_eq!(win.len(), 2);
        assert_eq!(history(&win), vec![2.0, 3.0]);
    }

    #[test]
    fn test_full_window_uses_capped_count() {
        let mut win = compat(3);
        for s in [1.0, 1.0, 1.0] {
            win.add_sample(s);
        }
        win.add_sample(9.0);
        assert_eq!(win.aggregates().avg, 9.0 / 4.0);
        win.add_sample(5.0);
        // len stays at capacity, so the divisor is still 4
        assert_eq!(win.aggregates().avg, (9.0 / 4.0 * 3.0 + 5.0) / 4.0);
    }

    // Current behaviour, not the desired one: 0.0 is read as "min unset".
    #[test]
    fn test_zero_sample_resets_min_tracking() {
        let mut win = compat(100);
        for s in [30.0, 30.0, 30.0, 20.0] {
            win.add_sample(s);
        }
        assert_eq!(win.aggregates().min, 20.0);

        win.add_sample(0.0);
        assert_eq!(win.aggregates().min, 0.0);

        win.add_sample(40.0);
        assert_eq!(win.aggregates().min, 40.0);
    }

    #[test]
    fn test_exact_mode() {
        let mut win = RollingWindow::new(size(100), StatsMode::Exact);
        for s in [30.0, 30.0] {
            win.seed(s);
        }
        assert_eq!(win.aggregates(), Aggregates::default());

        for s in [10.0, 0.0, 50.0, 20.0] {
            win.add_sample(s);
        }
        assert_eq!(win.len(), 6);
        assert_eq!(win.aggregates(), Aggregates { avg: 20.0, max: 50.0, min: 0.0 });
    }

    #[test]
    fn test_compat_seed_counts_as_sample() {
        let mut win = compat(100);
        win.seed(30.0);
        win.seed(30.0);
        win.add_sample(10.0);
        win.add_sample(50.0);
        assert_eq!(win.aggregates().avg, 12.5);
    }

    #[test]
    fn test_snapshot() {
        let win = compat(4);
        assert!(matches!(win.snapshot(), Err(AppError::EmptyHistory)));

        let mut win = compat(2);
        for s in [5.0, 6.0, 7.0] {
            win.add_sample(s);
        }
        let snap = win.snapshot().unwrap();
        assert_eq!(snap.points, vec![(0.0, 6.0), (1.0, 7.0)]);
        assert_eq!(snap.stats, win.aggregates());
    }

    #[test]
    fn test_single_slot_window() {
        let mut win = compat(1);
        win.add_sample(1.0);
        win.add_sample(2.0);
        assert_eq!(win.capacity(), 1);
        assert_eq!(history(&win), vec![2.0]);
    }

    proptest! {
        #[test]
        fn history_is_most_recent_samples(
            capacity in 1usize..32,
            input in prop::collection::vec(0.0f64..1000.0, 0..100),
        ) {
            let mut win = compat(capacity);
            for &s in &input {
                win.add_sample(s);
            }
            let keep = input.len().min(capacity);
            let expected = input[input.len() - keep..].to_vec();
            prop_assert_eq!(history(&win), expected);
        }

        #[test]
        fn exact_stats_match_full_scan(input in prop::collection::vec(0.0f64..1000.0, 1..64)) {
            let mut win = RollingWindow::new(size(8), StatsMode::Exact);
            for &s in &input {
                win.add_sample(s);
            }
            let stats = win.aggregates();
            let mean = input.iter().sum::<f64>() / input.len() as f64;
            let max = input.iter().cloned().fold(f64::MIN, f64::max);
            let min = input.iter().cloned().fold(f64::MAX, f64::min);
            prop_assert!((stats.avg - mean).abs() < 1e-6);
            prop_assert_eq!(stats.max, max);
            prop_assert_eq!(stats.min, min);
        }
    }
}
