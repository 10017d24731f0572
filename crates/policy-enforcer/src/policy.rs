// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Policy configuration: which signals may drive throttling.

/// Per-signal gates for policy evaluation.
///
/// Every gate defaults to on. Turning both `throttle_on_battery` and
/// `thermal_aware` off declares a pure-performance policy, which earns a
/// priority boost instead of a throttle (see
/// [`PolicyEnforcer::priority_multiplier`](crate::PolicyEnforcer::priority_multiplier)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PolicyConfig {
    /// Throttle when the battery runs low.
    #[serde(default = "default_true")]
    pub throttle_on_battery: bool,
    /// Throttle when RSS approaches its historical peak.
    #[serde(default = "default_true")]
    pub adaptive_memory: bool,
    /// Throttle under thermal pressure.
    #[serde(default = "default_true")]
    pub thermal_aware: bool,
    /// Allow deferring low-priority background work while throttled.
    #[serde(default = "default_true")]
    pub background_optimization: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            throttle_on_battery: true,
            adaptive_memory: true,
            thermal_aware: true,
            background_optimization: true,
        }
    }
}

impl PolicyConfig {
    /// Returns `true` when neither battery nor thermal signal may
    /// throttle, i.e. the caller asked for throughput above all.
    pub fn is_pure_performance(&self) -> bool {
        !self.throttle_on_battery && !self.thermal_aware
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_on() {
        let c = PolicyConfig::default();
        assert!(c.throttle_on_battery);
        assert!(c.adaptive_memory);
        assert!(c.thermal_aware);
        assert!(c.background_optimization);
        assert!(!c.is_pure_performance());
    }

    #[test]
    fn test_pure_performance_detection() {
        let c = PolicyConfig {
            throttle_on_battery: false,
            thermal_aware: false,
            ..Default::default()
        };
        assert!(c.is_pure_performance());

        let half = PolicyConfig {
            throttle_on_battery: false,
            ..Default::default()
        };
        assert!(!half.is_pure_performance());
    }

    #[test]
    fn test_missing_toml_fields_default_on() {
        let c: PolicyConfig = serde_json::from_str("{\"thermal_aware\": false}").unwrap();
        assert!(!c.thermal_aware);
        assert!(c.throttle_on_battery);
        assert!(c.adaptive_memory);
    }
}
