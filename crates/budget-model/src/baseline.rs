// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Measured device baseline captured at warm-up completion.

/// A one-time snapshot of measured device performance.
///
/// The scheduler captures exactly one of these, the moment its warm-up
/// threshold is reached, and resolves an adaptive profile against it.
/// The snapshot is immutable from then on: re-resolving the same profile
/// against the same baseline always yields the same limits.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeasuredBaseline {
    /// Measured 95th-percentile task latency, milliseconds.
    pub p95_latency_ms: f64,
    /// Measured battery drain, percent per ten minutes. `None` when too
    /// few battery samples existed at capture time.
    pub battery_drain_per_10min: Option<f64>,
    /// Thermal level at capture time (`-1` when unsupported).
    pub thermal_level: i32,
    /// Process RSS at capture time, megabytes.
    pub rss_mb: f64,
    /// Latency samples in the window at capture time.
    pub sample_count: usize,
    /// Capture time, milliseconds since the UNIX epoch.
    pub captured_at_ms: u64,
}

impl MeasuredBaseline {
    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        let drain = match self.battery_drain_per_10min {
            Some(d) => format!("{d:.2}%/10min"),
            None => "unmeasured".to_string(),
        };
        format!(
            "p95 {:.0} ms, drain {}, thermal {}, rss {:.1} MB ({} samples)",
            self.p95_latency_ms, drain, self.thermal_level, self.rss_mb, self.sample_count,
        )
    }
}
