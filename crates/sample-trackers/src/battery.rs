// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Battery drain tracking, normalized to "percent per ten minutes".
//!
//! Sensor bridges push the battery level as a fraction of full charge in
//! `[0.0, 1.0]`. Because bridges report at wildly different cadences (every
//! few seconds on some platforms, only on level change on others), a raw
//! derivative is useless for budgeting. Instead every rate this tracker
//! reports is scaled to a common basis:
//!
//! ```text
//! rate = (level(t0) - level(tN)) / (tN - t0) * 600_000 ms * 100
//! ```
//!
//! i.e. the percentage points the battery would lose over ten minutes at
//! the observed pace. Charging intervals clamp to zero, never negative.

use crate::window::{Sample, SampleWindow};
use std::time::{Duration, Instant};

/// Default cap on retained battery samples.
pub const DEFAULT_BATTERY_SAMPLES: usize = 100;

/// Wall-clock span of the battery window.
pub const DEFAULT_BATTERY_WINDOW: Duration = Duration::from_secs(600);

/// Normalization basis: ten minutes in milliseconds.
const TEN_MINUTES_MS: f64 = 600_000.0;

/// Sliding-window battery level accumulator.
#[derive(Debug, Clone)]
pub struct BatteryDrainTracker {
    window: SampleWindow,
}

impl BatteryDrainTracker {
    /// Creates a tracker with the default cap and ten-minute window.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_BATTERY_SAMPLES, DEFAULT_BATTERY_WINDOW)
    }

    /// Creates a tracker with an explicit cap and wall-clock window.
    pub fn with_window(max_samples: usize, max_age: Duration) -> Self {
        Self {
            window: SampleWindow::with_max_age(max_samples, Some(max_age)),
        }
    }

    /// Records a battery level as a fraction of full charge.
    ///
    /// Levels outside `[0.0, 1.0]` (including NaN) are silently dropped:
    /// a misbehaving sensor bridge degrades to "no data", never an error.
    pub fn record_sample(&mut self, level: f64) {
        self.record_sample_at(level, Instant::now());
    }

    /// Records a battery level with an explicit timestamp.
    pub fn record_sample_at(&mut self, level: f64, at: Instant) {
        if !(0.0..=1.0).contains(&level) {
            return;
        }
        self.window.push_at(level, at);
    }

    /// The most recently recorded level, as a fraction of full charge.
    pub fn current_level(&self) -> Option<f64> {
        self.window.newest().map(|s| s.value)
    }

    /// Drain rate over the whole window, percent per ten minutes.
    ///
    /// Uses only the oldest and newest sample. `None` until two samples
    /// with positive elapsed time between them exist.
    pub fn current_drain_rate(&self) -> Option<f64> {
        if self.window.len() < 2 {
            return None;
        }
        let oldest = self.window.oldest()?;
        let newest = self.window.newest()?;
        drain_rate_between(oldest, newest)
    }

    /// Mean of the per-interval drain rates, percent per ten minutes.
    ///
    /// Every consecutive sample pair contributes one rate; pairs with
    /// non-positive elapsed time are discarded. Falls back to
    /// [`current_drain_rate`](Self::current_drain_rate) when fewer than
    /// three samples exist.
    pub fn average_drain_rate(&self) -> Option<f64> {
        if self.window.len() < 2 {
            return None;
        }
        if self.window.len() < 3 {
            return self.current_drain_rate();
        }
        let samples: Vec<&Sample> = self.window.iter().collect();
        let rates: Vec<f64> = samples
            .windows(2)
            .filter_map(|pair| drain_rate_between(pair[0], pair[1]))
            .collect();
        if rates.is_empty() {
            return None;
        }
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    }

    /// Number of samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.window.len()
    }

    /// Computes a serializable snapshot of the current statistics.
    pub fn stats(&self) -> BatteryStats {
        BatteryStats {
            sample_count: self.sample_count(),
            current_level: self.current_level(),
            current_drain_rate: self.current_drain_rate(),
            average_drain_rate: self.average_drain_rate(),
        }
    }

    /// Discards every recorded sample.
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl Default for BatteryDrainTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized drain rate between two samples, oldest first.
///
/// `None` when the pair spans no positive elapsed time. A rising level
/// (charging) clamps to zero.
fn drain_rate_between(older: &Sample, newer: &Sample) -> Option<f64> {
    let elapsed_ms = newer.timestamp.duration_since(older.timestamp).as_secs_f64() * 1000.0;
    if elapsed_ms <= 0.0 {
        return None;
    }
    let rate = (older.value - newer.value) / elapsed_ms * TEN_MINUTES_MS * 100.0;
    Some(rate.max(0.0))
}

/// Point-in-time battery statistics.
///
/// Optional fields are `None` until enough samples exist, mirroring the
/// tracker getters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BatteryStats {
    /// Samples in the window when the snapshot was taken.
    pub sample_count: usize,
    /// Most recent level, fraction of full charge.
    pub current_level: Option<f64>,
    /// Whole-window drain rate, percent per ten minutes.
    pub current_drain_rate: Option<f64>,
    /// Mean per-interval drain rate, percent per ten minutes.
    pub average_drain_rate: Option<f64>,
}

impl BatteryStats {
    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        let level = match self.current_level {
            Some(l) => format!("{:.0}%", l * 100.0),
            None => "unknown".to_string(),
        };
        let rate = match self.current_drain_rate {
            Some(r) => format!("{r:.2}%/10min"),
            None => "n/a".to_string(),
        };
        format!("level {level}, drain {rate}, {} samples", self.sample_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_levels_are_dropped() {
        let mut t = BatteryDrainTracker::new();
        t.record_sample(-0.1);
        t.record_sample(1.5);
        t.record_sample(f64::NAN);
        assert_eq!(t.sample_count(), 0);
        t.record_sample(0.0);
        t.record_sample(1.0);
        assert_eq!(t.sample_count(), 2);
    }

    #[test]
    fn test_drain_rate_normalization() {
        // 5 percentage points lost over exactly ten minutes -> 5.0 %/10min.
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.90, t0);
        t.record_sample_at(0.85, t0 + Duration::from_secs(600));
        let rate = t.current_drain_rate().unwrap();
        assert!((rate - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_drain_rate_scales_with_elapsed_time() {
        // The same 5-point drop over five minutes reads twice as fast.
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.90, t0);
        t.record_sample_at(0.85, t0 + Duration::from_secs(300));
        let rate = t.current_drain_rate().unwrap();
        assert!((rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_charging_clamps_to_zero() {
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.50, t0);
        t.record_sample_at(0.80, t0 + Duration::from_secs(60));
        assert_eq!(t.current_drain_rate(), Some(0.0));
    }

    #[test]
    fn test_flat_level_reads_zero() {
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.70, t0);
        t.record_sample_at(0.70, t0 + Duration::from_secs(60));
        assert_eq!(t.current_drain_rate(), Some(0.0));
    }

    #[test]
    fn test_too_few_samples_reads_none() {
        let mut t = BatteryDrainTracker::new();
        assert_eq!(t.current_drain_rate(), None);
        assert_eq!(t.average_drain_rate(), None);
        t.record_sample(0.9);
        assert_eq!(t.current_drain_rate(), None);
        assert_eq!(t.current_level(), Some(0.9));
    }

    #[test]
    fn test_average_falls_back_to_current_below_three_samples() {
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.90, t0);
        t.record_sample_at(0.85, t0 + Duration::from_secs(600));
        assert_eq!(t.average_drain_rate(), t.current_drain_rate());
    }

    #[test]
    fn test_average_of_consecutive_pair_rates() {
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        // Pair 1: 2 points over 5 min -> 4.0 %/10min.
        // Pair 2: 4 points over 5 min -> 8.0 %/10min.
        t.record_sample_at(0.90, t0);
        t.record_sample_at(0.88, t0 + Duration::from_secs(300));
        t.record_sample_at(0.84, t0 + Duration::from_secs(600));
        let avg = t.average_drain_rate().unwrap();
        assert!((avg - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_discards_zero_elapsed_pairs() {
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.90, t0);
        t.record_sample_at(0.89, t0); // Same instant: pair discarded.
        t.record_sample_at(0.88, t0 + Duration::from_secs(300));
        // Only the second pair (0.89 -> 0.88 over 5 min = 2.0) survives.
        let avg = t.average_drain_rate().unwrap();
        assert!((avg - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_expires_old_samples() {
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.95, t0);
        // Eleven minutes later the first sample is outside the window.
        t.record_sample_at(0.90, t0 + Duration::from_secs(660));
        assert_eq!(t.sample_count(), 1);
        assert_eq!(t.current_drain_rate(), None);
    }

    #[test]
    fn test_stats_summary() {
        let t0 = Instant::now();
        let mut t = BatteryDrainTracker::new();
        t.record_sample_at(0.80, t0);
        t.record_sample_at(0.75, t0 + Duration::from_secs(600));
        let stats = t.stats();
        assert_eq!(stats.current_level, Some(0.75));
        assert!(stats.summary().contains("level 75%"));
    }
}
