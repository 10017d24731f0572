// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # sample-trackers
//!
//! Sliding-window signal trackers feeding the resource-budget supervisor.
//! Four independent accumulators, one per signal:
//!
//! - [`LatencyTracker`]: per-task wall-clock latency with nearest-rank
//!   p50/p95/p99.
//! - [`BatteryDrainTracker`]: battery level samples normalized to a
//!   "percent per ten minutes" drain rate.
//! - [`ThermalMonitor`]: current platform thermal level with change
//!   listeners.
//! - [`ResourceMonitor`]: process RSS with an all-time peak.
//!
//! Each tracker is a single-owner mutable accumulator: sensor bridges push
//! raw numbers in, derived statistics are recomputed on every read, and
//! nothing in here ever returns an error. Malformed input degrades to
//! "no data" (battery levels outside `[0, 1]` are dropped on the floor),
//! and reads on an empty window yield zero or `None`.
//!
//! # Example
//! ```
//! use sample_trackers::LatencyTracker;
//!
//! let mut latency = LatencyTracker::new();
//! for ms in [120.0, 95.0, 140.0, 102.0] {
//!     latency.record(ms);
//! }
//! println!("{}", latency.stats().summary());
//! assert_eq!(latency.sample_count(), 4);
//! ```

mod battery;
mod latency;
mod resource;
mod thermal;
pub mod window;

pub use battery::{BatteryDrainTracker, BatteryStats, DEFAULT_BATTERY_SAMPLES, DEFAULT_BATTERY_WINDOW};
pub use latency::{LatencyStats, LatencyTracker, DEFAULT_LATENCY_SAMPLES};
pub use resource::{ResourceMonitor, ResourceStats, DEFAULT_RSS_SAMPLES};
pub use thermal::{
    thermal_level_name, ThermalListener, ThermalListenerHandle, ThermalMonitor, ThermalStats,
    THERMAL_CRITICAL, THERMAL_SERIOUS, THERMAL_UNSUPPORTED,
};
pub use window::{Sample, SampleWindow};
