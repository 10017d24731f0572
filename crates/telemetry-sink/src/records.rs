// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Record shapes pushed into a telemetry sink.

/// One completed task's latency measurement.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatencyRecord {
    /// Scheduler-assigned task id.
    pub task_id: u64,
    /// Workload label (e.g. `"text-generation"`).
    pub workload: String,
    /// Wall-clock task duration, milliseconds.
    pub latency_ms: f64,
    /// Completion time, milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
}

/// A point-in-time usage snapshot across the tracked signals.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResourceUsageRecord {
    /// Current process RSS, megabytes.
    pub rss_mb: f64,
    /// All-time peak RSS, megabytes.
    pub peak_rss_mb: f64,
    /// Current thermal level (`-1` when unsupported).
    pub thermal_level: i32,
    /// Current battery level, fraction of full charge.
    pub battery_level: Option<f64>,
    /// Rolling 95th-percentile latency, milliseconds.
    pub p95_latency_ms: f64,
    /// Snapshot time, milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
}

/// History bounds for an in-memory sink, oldest-first eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryCaps {
    /// Retained latency records.
    #[serde(default = "default_latency_cap")]
    pub latency: usize,
    /// Retained violation events.
    #[serde(default = "default_violation_cap")]
    pub violations: usize,
    /// Retained usage snapshots.
    #[serde(default = "default_snapshot_cap")]
    pub snapshots: usize,
}

fn default_latency_cap() -> usize {
    1000
}

fn default_violation_cap() -> usize {
    100
}

fn default_snapshot_cap() -> usize {
    100
}

impl Default for HistoryCaps {
    fn default() -> Self {
        Self {
            latency: default_latency_cap(),
            violations: default_violation_cap(),
            snapshots: default_snapshot_cap(),
        }
    }
}
