// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Process memory (RSS) tracking in megabytes.
//!
//! The peak value is a high-water mark over the tracker's whole lifetime:
//! window eviction never lowers it, only an explicit [`ResourceMonitor::reset`]
//! does. Nothing in the supervisor can shrink model weight residency, so
//! memory readings are consumed observe-only by budget checks.

use crate::window::SampleWindow;
use std::time::Instant;

/// Default cap on retained RSS samples.
pub const DEFAULT_RSS_SAMPLES: usize = 100;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Sliding-window RSS accumulator with an all-time peak.
#[derive(Debug, Clone)]
pub struct ResourceMonitor {
    window: SampleWindow,
    peak_rss_mb: f64,
}

impl ResourceMonitor {
    /// Creates a monitor with the default window cap.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RSS_SAMPLES)
    }

    /// Creates a monitor retaining at most `max_samples` entries.
    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            window: SampleWindow::new(max_samples),
            peak_rss_mb: 0.0,
        }
    }

    /// Records an RSS reading in megabytes.
    pub fn sample(&mut self, rss_mb: f64) {
        self.sample_at(rss_mb, Instant::now());
    }

    /// Records an RSS reading with an explicit timestamp.
    pub fn sample_at(&mut self, rss_mb: f64, at: Instant) {
        if rss_mb > self.peak_rss_mb {
            self.peak_rss_mb = rss_mb;
        }
        self.window.push_at(rss_mb, at);
    }

    /// Records an RSS reading in raw bytes, as sensor bridges report it.
    pub fn sample_bytes(&mut self, rss_bytes: u64) {
        self.sample(rss_bytes as f64 / BYTES_PER_MB);
    }

    /// The most recent RSS reading. Zero when no samples exist.
    pub fn current_rss_mb(&self) -> f64 {
        self.window.newest().map(|s| s.value).unwrap_or(0.0)
    }

    /// All-time peak RSS. Survives window eviction; cleared only by
    /// [`reset`](Self::reset).
    pub fn peak_rss_mb(&self) -> f64 {
        self.peak_rss_mb
    }

    /// Mean RSS over the current window. Zero when no samples exist.
    pub fn average_rss_mb(&self) -> f64 {
        self.window.mean()
    }

    /// Number of samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.window.len()
    }

    /// Computes a serializable snapshot of the current statistics.
    pub fn stats(&self) -> ResourceStats {
        ResourceStats {
            sample_count: self.sample_count(),
            current_rss_mb: self.current_rss_mb(),
            peak_rss_mb: self.peak_rss_mb(),
            average_rss_mb: self.average_rss_mb(),
        }
    }

    /// Discards every sample and clears the peak.
    pub fn reset(&mut self) {
        self.window.clear();
        self.peak_rss_mb = 0.0;
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time RSS statistics.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ResourceStats {
    /// Samples in the window when the snapshot was taken.
    pub sample_count: usize,
    /// Most recent reading, megabytes.
    pub current_rss_mb: f64,
    /// All-time peak, megabytes.
    pub peak_rss_mb: f64,
    /// Window mean, megabytes.
    pub average_rss_mb: f64,
}

impl ResourceStats {
    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "rss {:.1} MB (peak {:.1} MB, avg {:.1} MB, {} samples)",
            self.current_rss_mb, self.peak_rss_mb, self.average_rss_mb, self.sample_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reads_zero() {
        let m = ResourceMonitor::new();
        assert_eq!(m.current_rss_mb(), 0.0);
        assert_eq!(m.peak_rss_mb(), 0.0);
        assert_eq!(m.average_rss_mb(), 0.0);
    }

    #[test]
    fn test_current_tracks_newest() {
        let mut m = ResourceMonitor::new();
        m.sample(100.0);
        m.sample(150.0);
        m.sample(120.0);
        assert_eq!(m.current_rss_mb(), 120.0);
        assert_eq!(m.average_rss_mb(), (100.0 + 150.0 + 120.0) / 3.0);
    }

    #[test]
    fn test_peak_survives_eviction() {
        let mut m = ResourceMonitor::with_capacity(2);
        m.sample(500.0);
        m.sample(100.0);
        m.sample(100.0); // The 500 MB sample is evicted here.
        assert_eq!(m.sample_count(), 2);
        assert_eq!(m.peak_rss_mb(), 500.0);
        assert_eq!(m.current_rss_mb(), 100.0);
    }

    #[test]
    fn test_peak_never_decreases_without_reset() {
        let mut m = ResourceMonitor::new();
        m.sample(300.0);
        m.sample(200.0);
        assert_eq!(m.peak_rss_mb(), 300.0);
        m.reset();
        assert_eq!(m.peak_rss_mb(), 0.0);
        m.sample(50.0);
        assert_eq!(m.peak_rss_mb(), 50.0);
    }

    #[test]
    fn test_sample_bytes_converts_to_mb() {
        let mut m = ResourceMonitor::new();
        m.sample_bytes(512 * 1024 * 1024);
        assert!((m.current_rss_mb() - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_cap() {
        let mut m = ResourceMonitor::with_capacity(100);
        for i in 0..1000 {
            m.sample(i as f64);
        }
        assert_eq!(m.sample_count(), 100);
    }

    #[test]
    fn test_stats_summary() {
        let mut m = ResourceMonitor::new();
        m.sample(1024.0);
        let stats = m.stats();
        assert_eq!(stats.peak_rss_mb, 1024.0);
        assert!(stats.summary().contains("1024.0 MB"));
    }
}
