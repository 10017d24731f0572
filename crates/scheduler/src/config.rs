// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supervisor configuration loaded from TOML files or constructed
//! programmatically.
//!
//! Every field has a default, so an empty document is a valid config.
//! A budget is declared either as an intent profile or as explicit
//! ceilings, never both.
//!
//! # TOML Format
//! ```toml
//! warm_up_threshold = 20
//! latency_window = 100
//! battery_window = 100
//! battery_window_secs = 600
//! resource_window = 100
//! budget_profile = "balanced"
//!
//! [history]
//! latency = 1000
//! violations = 100
//! snapshots = 100
//!
//! [policy]
//! throttle_on_battery = true
//! thermal_aware = true
//! ```

use crate::SchedulerError;
use budget_model::{AdaptiveProfile, Budget, BudgetLimits};
use policy_enforcer::PolicyConfig;
use std::path::Path;
use telemetry_sink::HistoryCaps;

/// Configuration for the supervisor and its trackers.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SchedulerConfig {
    /// Latency samples required before an adaptive budget resolves.
    #[serde(default = "default_warm_up_threshold")]
    pub warm_up_threshold: usize,
    /// Latency tracker window cap, in samples.
    #[serde(default = "default_window_cap")]
    pub latency_window: usize,
    /// Battery tracker window cap, in samples.
    #[serde(default = "default_window_cap")]
    pub battery_window: usize,
    /// Battery tracker time window, in seconds.
    #[serde(default = "default_battery_window_secs")]
    pub battery_window_secs: u64,
    /// Resource tracker window cap, in samples.
    #[serde(default = "default_window_cap")]
    pub resource_window: usize,
    /// Intent profile name: `"conservative"`, `"balanced"`, `"performance"`.
    /// Mutually exclusive with the explicit `max_*` / `memory_ceiling_mb`
    /// ceilings below.
    pub budget_profile: Option<String>,
    /// Explicit p95 latency ceiling, milliseconds.
    pub max_p95_latency_ms: Option<f64>,
    /// Explicit battery drain ceiling, percent per 10 minutes.
    pub max_battery_drain_per_10min: Option<f64>,
    /// Explicit thermal level ceiling.
    pub max_thermal_level: Option<i32>,
    /// Memory RSS ceiling, megabytes. Observe-only.
    pub memory_ceiling_mb: Option<f64>,
    /// Telemetry history bounds.
    #[serde(default)]
    pub history: HistoryCaps,
    /// Throttle policy gates.
    #[serde(default)]
    pub policy: PolicyConfig,
}

fn default_warm_up_threshold() -> usize {
    20
}

fn default_window_cap() -> usize {
    100
}

fn default_battery_window_secs() -> u64 {
    600
}

impl SchedulerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SchedulerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SchedulerError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SchedulerError> {
        toml::from_str(toml_str)
            .map_err(|e| SchedulerError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, SchedulerError> {
        toml::to_string_pretty(self)
            .map_err(|e| SchedulerError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Builds the budget this config declares, if any.
    ///
    /// A profile name produces an adaptive budget; explicit ceilings
    /// produce an explicit one. Declaring both is a configuration error,
    /// and declaring neither yields `None` (observe without a budget).
    pub fn initial_budget(&self) -> Result<Option<Budget>, SchedulerError> {
        let limits = self.explicit_limits();
        match &self.budget_profile {
            Some(name) => {
                if !limits.is_empty() {
                    return Err(SchedulerError::ConfigError(
                        "budget_profile and explicit ceilings are mutually exclusive".to_string(),
                    ));
                }
                let profile: AdaptiveProfile = name.parse().map_err(|e| {
                    SchedulerError::ConfigError(format!("invalid budget_profile: {e}"))
                })?;
                Ok(Some(Budget::adaptive(profile)))
            }
            None if limits.is_empty() => Ok(None),
            None => Ok(Some(Budget::explicit(limits))),
        }
    }

    fn explicit_limits(&self) -> BudgetLimits {
        BudgetLimits {
            p95_latency_ms: self.max_p95_latency_ms,
            battery_drain_per_10min: self.max_battery_drain_per_10min,
            max_thermal_level: self.max_thermal_level,
            memory_ceiling_mb: self.memory_ceiling_mb,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            warm_up_threshold: default_warm_up_threshold(),
            latency_window: default_window_cap(),
            battery_window: default_window_cap(),
            battery_window_secs: default_battery_window_secs(),
            resource_window: default_window_cap(),
            budget_profile: None,
            max_p95_latency_ms: None,
            max_battery_drain_per_10min: None,
            max_thermal_level: None,
            memory_ceiling_mb: None,
            history: HistoryCaps::default(),
            policy: PolicyConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = SchedulerConfig::default();
        assert_eq!(c.warm_up_threshold, 20);
        assert_eq!(c.latency_window, 100);
        assert_eq!(c.battery_window_secs, 600);
        assert!(c.budget_profile.is_none());
        assert!(c.policy.thermal_aware);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let c = SchedulerConfig::from_toml("").unwrap();
        assert_eq!(c.warm_up_threshold, 20);
        assert_eq!(c.history.latency, 1000);
        assert!(c.initial_budget().unwrap().is_none());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
warm_up_threshold = 5
latency_window = 50
budget_profile = "conservative"

[history]
latency = 200

[policy]
throttle_on_battery = false
"#;
        let c = SchedulerConfig::from_toml(toml).unwrap();
        assert_eq!(c.warm_up_threshold, 5);
        assert_eq!(c.latency_window, 50);
        assert_eq!(c.battery_window, 100);
        assert_eq!(c.history.latency, 200);
        assert_eq!(c.history.violations, 100);
        assert!(!c.policy.throttle_on_battery);
        assert!(c.policy.thermal_aware);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(SchedulerConfig::from_toml("warm_up_threshold = \"soon\"").is_err());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = SchedulerConfig {
            warm_up_threshold: 10,
            max_p95_latency_ms: Some(1500.0),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = SchedulerConfig::from_toml(&toml).unwrap();
        assert_eq!(back.warm_up_threshold, 10);
        assert_eq!(back.max_p95_latency_ms, Some(1500.0));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("governor.toml");
        std::fs::write(&path, "budget_profile = \"performance\"\n").unwrap();

        let c = SchedulerConfig::from_file(&path).unwrap();
        let budget = c.initial_budget().unwrap().unwrap();
        assert_eq!(budget.profile(), Some(AdaptiveProfile::Performance));
    }

    #[test]
    fn test_from_file_missing() {
        let err = SchedulerConfig::from_file(Path::new("/nonexistent/governor.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("cannot read config"));
    }

    #[test]
    fn test_initial_budget_explicit() {
        let c = SchedulerConfig {
            max_p95_latency_ms: Some(2000.0),
            memory_ceiling_mb: Some(3000.0),
            ..Default::default()
        };
        let budget = c.initial_budget().unwrap().unwrap();
        assert!(!budget.is_adaptive());
        let limits = budget.limits().unwrap();
        assert_eq!(limits.p95_latency_ms, Some(2000.0));
        assert_eq!(limits.memory_ceiling_mb, Some(3000.0));
    }

    #[test]
    fn test_initial_budget_profile_and_ceilings_conflict() {
        let c = SchedulerConfig {
            budget_profile: Some("balanced".to_string()),
            max_p95_latency_ms: Some(2000.0),
            ..Default::default()
        };
        assert!(c.initial_budget().is_err());
    }

    #[test]
    fn test_initial_budget_unknown_profile() {
        let c = SchedulerConfig {
            budget_profile: Some("ludicrous".to_string()),
            ..Default::default()
        };
        let err = c.initial_budget().unwrap_err();
        assert!(err.to_string().contains("invalid budget_profile"));
    }
}
