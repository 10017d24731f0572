// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Adaptive intent profiles and their resolution multipliers.
//!
//! A profile expresses *intent* ("be gentle with this device" vs. "go as
//! fast as it can bear") without naming concrete numbers. Resolution turns
//! intent into numbers by scaling a [`MeasuredBaseline`]:
//!
//! | Profile      | p95 latency      | battery drain | thermal ceiling    |
//! |--------------|------------------|---------------|--------------------|
//! | conservative | 2.0x (rounded)   | 0.6x          | max(1, measured)   |
//! | balanced     | 1.5x             | 1.0x          | 1 (fixed)          |
//! | performance  | 1.1x             | 1.5x          | 3 (fixed)          |
//!
//! The memory ceiling is never resolved: the supervisor cannot shrink
//! model weight residency, so memory stays observe-only under every
//! profile.

use crate::{BudgetError, BudgetLimits, MeasuredBaseline};
use std::fmt;
use std::str::FromStr;

/// Intent profile for an adaptive budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptiveProfile {
    /// Wide latency allowance, strict battery allowance. For background
    /// or battery-sensitive hosts.
    Conservative,
    /// Moderate allowances on every axis. The default intent.
    Balanced,
    /// Tight latency target, generous battery and thermal allowances.
    Performance,
}

impl AdaptiveProfile {
    /// Every profile, in severity order.
    pub const ALL: [AdaptiveProfile; 3] = [
        AdaptiveProfile::Conservative,
        AdaptiveProfile::Balanced,
        AdaptiveProfile::Performance,
    ];

    /// Lowercase profile name.
    pub fn name(&self) -> &'static str {
        match self {
            AdaptiveProfile::Conservative => "conservative",
            AdaptiveProfile::Balanced => "balanced",
            AdaptiveProfile::Performance => "performance",
        }
    }

    /// Resolves this profile against a measured baseline.
    ///
    /// Pure and deterministic: the same profile and baseline always
    /// produce identical limits. The drain limit is `None` whenever the
    /// baseline carries no measured drain, and the memory ceiling is
    /// always `None`.
    pub fn resolve(&self, baseline: &MeasuredBaseline) -> BudgetLimits {
        let (p95_latency_ms, drain_multiplier, max_thermal_level) = match self {
            AdaptiveProfile::Conservative => (
                (baseline.p95_latency_ms * 2.0).round(),
                0.6,
                baseline.thermal_level.max(1),
            ),
            AdaptiveProfile::Balanced => (baseline.p95_latency_ms * 1.5, 1.0, 1),
            AdaptiveProfile::Performance => (baseline.p95_latency_ms * 1.1, 1.5, 3),
        };
        BudgetLimits {
            p95_latency_ms: Some(p95_latency_ms),
            battery_drain_per_10min: baseline
                .battery_drain_per_10min
                .map(|drain| drain * drain_multiplier),
            max_thermal_level: Some(max_thermal_level),
            memory_ceiling_mb: None,
        }
    }
}

impl fmt::Display for AdaptiveProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdaptiveProfile {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(AdaptiveProfile::Conservative),
            "balanced" => Ok(AdaptiveProfile::Balanced),
            "performance" => Ok(AdaptiveProfile::Performance),
            _ => Err(BudgetError::UnknownProfile {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> MeasuredBaseline {
        MeasuredBaseline {
            p95_latency_ms: 1000.0,
            battery_drain_per_10min: Some(2.0),
            thermal_level: 0,
            rss_mb: 900.0,
            sample_count: 20,
            captured_at_ms: 0,
        }
    }

    #[test]
    fn test_conservative_multipliers() {
        let limits = AdaptiveProfile::Conservative.resolve(&baseline());
        assert_eq!(limits.p95_latency_ms, Some(2000.0));
        assert_eq!(limits.battery_drain_per_10min, Some(1.2));
        // Measured thermal 0 floors to 1.
        assert_eq!(limits.max_thermal_level, Some(1));
        assert_eq!(limits.memory_ceiling_mb, None);
    }

    #[test]
    fn test_conservative_keeps_elevated_thermal() {
        let mut b = baseline();
        b.thermal_level = 2;
        let limits = AdaptiveProfile::Conservative.resolve(&b);
        assert_eq!(limits.max_thermal_level, Some(2));
    }

    #[test]
    fn test_conservative_rounds_p95() {
        let mut b = baseline();
        b.p95_latency_ms = 333.3;
        let limits = AdaptiveProfile::Conservative.resolve(&b);
        assert_eq!(limits.p95_latency_ms, Some(667.0));
    }

    #[test]
    fn test_balanced_multipliers() {
        let mut b = baseline();
        b.thermal_level = 3; // Ignored: balanced pins thermal to 1.
        let limits = AdaptiveProfile::Balanced.resolve(&b);
        assert_eq!(limits.p95_latency_ms, Some(1500.0));
        assert_eq!(limits.battery_drain_per_10min, Some(2.0));
        assert_eq!(limits.max_thermal_level, Some(1));
    }

    #[test]
    fn test_performance_multipliers() {
        let limits = AdaptiveProfile::Performance.resolve(&baseline());
        assert!((limits.p95_latency_ms.unwrap() - 1100.0).abs() < 1e-9);
        assert_eq!(limits.battery_drain_per_10min, Some(3.0));
        assert_eq!(limits.max_thermal_level, Some(3));
    }

    #[test]
    fn test_missing_drain_propagates_as_none() {
        let mut b = baseline();
        b.battery_drain_per_10min = None;
        for profile in AdaptiveProfile::ALL {
            let limits = profile.resolve(&b);
            assert_eq!(limits.battery_drain_per_10min, None, "{profile}");
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let b = baseline();
        for profile in AdaptiveProfile::ALL {
            assert_eq!(profile.resolve(&b), profile.resolve(&b), "{profile}");
        }
    }

    #[test]
    fn test_unsupported_thermal_floors_to_one_under_conservative() {
        let mut b = baseline();
        b.thermal_level = -1;
        let limits = AdaptiveProfile::Conservative.resolve(&b);
        assert_eq!(limits.max_thermal_level, Some(1));
    }

    #[test]
    fn test_parse_profile_names() {
        assert_eq!(
            "conservative".parse::<AdaptiveProfile>().unwrap(),
            AdaptiveProfile::Conservative
        );
        assert_eq!(
            "  Balanced ".parse::<AdaptiveProfile>().unwrap(),
            AdaptiveProfile::Balanced
        );
        assert_eq!(
            "PERFORMANCE".parse::<AdaptiveProfile>().unwrap(),
            AdaptiveProfile::Performance
        );
        assert!("turbo".parse::<AdaptiveProfile>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for profile in AdaptiveProfile::ALL {
            let json = serde_json::to_string(&profile).unwrap();
            assert_eq!(json, format!("\"{profile}\""));
        }
    }
}
