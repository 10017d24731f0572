// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Point-in-time signal readings consumed by policy evaluation.

use sample_trackers::{BatteryDrainTracker, ResourceMonitor, ThermalMonitor};

/// The tracker values a policy decision is made from.
///
/// A plain value bundle so that evaluation stays pure: capture once, then
/// evaluate any number of policies against the same instant. `peak_rss_mb`
/// includes the current reading by construction, so "current near peak"
/// means the process is running at its historical high-water mark.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SignalReadings {
    /// Current thermal level (`-1` when unsupported).
    pub thermal_level: i32,
    /// Current battery level, fraction of full charge. `None` when the
    /// battery bridge has not reported yet.
    pub battery_level: Option<f64>,
    /// Current process RSS, megabytes.
    pub current_rss_mb: f64,
    /// All-time peak RSS, megabytes.
    pub peak_rss_mb: f64,
}

impl SignalReadings {
    /// Captures readings from the three relevant trackers.
    pub fn from_trackers(
        thermal: &ThermalMonitor,
        battery: &BatteryDrainTracker,
        resources: &ResourceMonitor,
    ) -> Self {
        Self {
            thermal_level: thermal.level(),
            battery_level: battery.current_level(),
            current_rss_mb: resources.current_rss_mb(),
            peak_rss_mb: resources.peak_rss_mb(),
        }
    }

    /// Readings for a device with no signal yet: thermal unsupported,
    /// battery unknown, zero memory.
    pub fn unavailable() -> Self {
        Self {
            thermal_level: -1,
            battery_level: None,
            current_rss_mb: 0.0,
            peak_rss_mb: 0.0,
        }
    }
}
