// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Inference latency tracking with nearest-rank percentiles.
//!
//! The scheduler records one wall-clock duration per completed task; this
//! tracker turns those into p50/p95/p99 and mean statistics over a bounded
//! window.
//!
//! # Percentile Method
//! Percentiles use deterministic nearest-rank selection, not linear
//! interpolation: sort the window ascending and take
//! `index = min(floor(count * pct), count - 1)`. For 100 ascending samples
//! `1..=100`, p95 selects index 95, which is the value `96`. Device-parity
//! checks depend on this exact rule, so it must not be swapped for an
//! interpolating estimator.

use crate::window::SampleWindow;
use std::time::{Duration, Instant};

/// Default cap on retained latency samples.
pub const DEFAULT_LATENCY_SAMPLES: usize = 100;

/// Sliding-window latency accumulator, in milliseconds.
#[derive(Debug, Clone)]
pub struct LatencyTracker {
    window: SampleWindow,
}

impl LatencyTracker {
    /// Creates a tracker with the default window cap.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LATENCY_SAMPLES)
    }

    /// Creates a tracker retaining at most `max_samples` entries.
    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            window: SampleWindow::new(max_samples),
        }
    }

    /// Records one latency observation in milliseconds.
    pub fn record(&mut self, latency_ms: f64) {
        self.window.push(latency_ms);
    }

    /// Records one latency observation with an explicit timestamp.
    pub fn record_at(&mut self, latency_ms: f64, at: Instant) {
        self.window.push_at(latency_ms, at);
    }

    /// Records an elapsed [`Duration`], converted to milliseconds.
    pub fn record_duration(&mut self, elapsed: Duration) {
        self.record(elapsed.as_secs_f64() * 1000.0);
    }

    /// Number of samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.window.len()
    }

    /// Arithmetic mean latency. Zero when the window is empty.
    pub fn mean_ms(&self) -> f64 {
        self.window.mean()
    }

    /// Median latency (nearest-rank). Zero when the window is empty.
    pub fn p50_ms(&self) -> f64 {
        self.percentile(0.50)
    }

    /// 95th-percentile latency (nearest-rank). Zero when the window is empty.
    pub fn p95_ms(&self) -> f64 {
        self.percentile(0.95)
    }

    /// 99th-percentile latency (nearest-rank). Zero when the window is empty.
    pub fn p99_ms(&self) -> f64 {
        self.percentile(0.99)
    }

    /// Nearest-rank percentile over the current window.
    ///
    /// `pct` is a fraction in `[0.0, 1.0]`. Selection rule:
    /// `index = min(floor(count * pct), count - 1)` over the ascending sort.
    pub fn percentile(&self, pct: f64) -> f64 {
        let mut sorted: Vec<f64> = self.window.values().collect();
        if sorted.is_empty() {
            return 0.0;
        }
        sorted.sort_by(f64::total_cmp);
        let index = ((sorted.len() as f64 * pct).floor() as usize).min(sorted.len() - 1);
        sorted[index]
    }

    /// Computes a serializable snapshot of the current statistics.
    pub fn stats(&self) -> LatencyStats {
        LatencyStats {
            sample_count: self.sample_count(),
            mean_ms: self.mean_ms(),
            p50_ms: self.p50_ms(),
            p95_ms: self.p95_ms(),
            p99_ms: self.p99_ms(),
        }
    }

    /// Discards every recorded sample.
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time latency statistics.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LatencyStats {
    /// Samples in the window when the snapshot was taken.
    pub sample_count: usize,
    /// Arithmetic mean, milliseconds.
    pub mean_ms: f64,
    /// Median, milliseconds.
    pub p50_ms: f64,
    /// 95th percentile, milliseconds.
    pub p95_ms: f64,
    /// 99th percentile, milliseconds.
    pub p99_ms: f64,
}

impl LatencyStats {
    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} samples, mean {:.1} ms, p50 {:.1} ms, p95 {:.1} ms, p99 {:.1} ms",
            self.sample_count, self.mean_ms, self.p50_ms, self.p95_ms, self.p99_ms,
        )
    }
}
