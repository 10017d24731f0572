// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Concrete resource ceilings and advisory validation.

use std::fmt;

/// Budgets below these floors are flagged as unrealistic for on-device
/// LLM inference. Advisory only: validation never rejects a budget.
pub const MIN_REALISTIC_P95_MS: f64 = 500.0;
/// See [`MIN_REALISTIC_P95_MS`].
pub const MIN_REALISTIC_DRAIN_PER_10MIN: f64 = 0.5;
/// See [`MIN_REALISTIC_P95_MS`].
pub const MIN_REALISTIC_MEMORY_MB: f64 = 2000.0;

/// A set of optional resource ceilings.
///
/// Every field is independent; `None` means "no limit declared on this
/// axis". A check only runs for fields that are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BudgetLimits {
    /// Ceiling on 95th-percentile task latency, milliseconds.
    pub p95_latency_ms: Option<f64>,
    /// Ceiling on battery drain, percent per ten minutes.
    pub battery_drain_per_10min: Option<f64>,
    /// Ceiling on the thermal level (0 nominal to 3 critical).
    pub max_thermal_level: Option<i32>,
    /// Ceiling on process RSS, megabytes. Observe-only: a breach is
    /// reported but nothing can act on it.
    pub memory_ceiling_mb: Option<f64>,
}

impl BudgetLimits {
    /// Limits with no ceiling on any axis.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the p95 latency ceiling.
    pub fn with_p95_latency_ms(mut self, ms: f64) -> Self {
        self.p95_latency_ms = Some(ms);
        self
    }

    /// Sets the battery drain ceiling.
    pub fn with_battery_drain_per_10min(mut self, drain: f64) -> Self {
        self.battery_drain_per_10min = Some(drain);
        self
    }

    /// Sets the thermal level ceiling.
    pub fn with_max_thermal_level(mut self, level: i32) -> Self {
        self.max_thermal_level = Some(level);
        self
    }

    /// Sets the memory ceiling.
    pub fn with_memory_ceiling_mb(mut self, mb: f64) -> Self {
        self.memory_ceiling_mb = Some(mb);
        self
    }

    /// Returns `true` when no ceiling is set on any axis.
    pub fn is_empty(&self) -> bool {
        self.p95_latency_ms.is_none()
            && self.battery_drain_per_10min.is_none()
            && self.max_thermal_level.is_none()
            && self.memory_ceiling_mb.is_none()
    }

    /// Flags ceilings that are unrealistically tight.
    ///
    /// Advisory only. A caller is free to keep an "unrealistic" budget;
    /// the likely outcome is a steady stream of violation events.
    pub fn validate(&self) -> Vec<BudgetWarning> {
        let mut warnings = Vec::new();
        if let Some(ms) = self.p95_latency_ms {
            if ms < MIN_REALISTIC_P95_MS {
                warnings.push(BudgetWarning::UnrealisticLatency { value_ms: ms });
            }
        }
        if let Some(drain) = self.battery_drain_per_10min {
            if drain < MIN_REALISTIC_DRAIN_PER_10MIN {
                warnings.push(BudgetWarning::UnrealisticDrain { value: drain });
            }
        }
        if let Some(mb) = self.memory_ceiling_mb {
            if mb < MIN_REALISTIC_MEMORY_MB {
                warnings.push(BudgetWarning::UnrealisticMemory { value_mb: mb });
            }
        }
        warnings
    }
}

impl fmt::Display for BudgetLimits {
    /// Renders set fields in declaration order, e.g.
    /// `p95<=1500ms, drain<=3.00%/10min, thermal<=1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ms) = self.p95_latency_ms {
            parts.push(format!("p95<={ms:.0}ms"));
        }
        if let Some(drain) = self.battery_drain_per_10min {
            parts.push(format!("drain<={drain:.2}%/10min"));
        }
        if let Some(level) = self.max_thermal_level {
            parts.push(format!("thermal<={level}"));
        }
        if let Some(mb) = self.memory_ceiling_mb {
            parts.push(format!("memory<={mb:.0}MB"));
        }
        if parts.is_empty() {
            f.write_str("no limits")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Advisory warning about an unrealistically tight ceiling.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetWarning {
    /// p95 latency ceiling below 500 ms.
    UnrealisticLatency { value_ms: f64 },
    /// Battery drain ceiling below 0.5% per ten minutes.
    UnrealisticDrain { value: f64 },
    /// Memory ceiling below 2000 MB.
    UnrealisticMemory { value_mb: f64 },
}

impl fmt::Display for BudgetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetWarning::UnrealisticLatency { value_ms } => write!(
                f,
                "p95 latency ceiling {value_ms:.0} ms is below {MIN_REALISTIC_P95_MS:.0} ms; \
                 on-device inference rarely completes that fast"
            ),
            BudgetWarning::UnrealisticDrain { value } => write!(
                f,
                "battery drain ceiling {value:.2}%/10min is below \
                 {MIN_REALISTIC_DRAIN_PER_10MIN}%/10min; active inference drains faster"
            ),
            BudgetWarning::UnrealisticMemory { value_mb } => write!(
                f,
                "memory ceiling {value_mb:.0} MB is below {MIN_REALISTIC_MEMORY_MB:.0} MB; \
                 model weights alone typically exceed it"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_limits() {
        let limits = BudgetLimits::none();
        assert!(limits.is_empty());
        assert!(limits.validate().is_empty());
        assert_eq!(limits.to_string(), "no limits");
    }

    #[test]
    fn test_builder_chain() {
        let limits = BudgetLimits::none()
            .with_p95_latency_ms(1500.0)
            .with_max_thermal_level(2);
        assert_eq!(limits.p95_latency_ms, Some(1500.0));
        assert_eq!(limits.max_thermal_level, Some(2));
        assert!(!limits.is_empty());
    }

    #[test]
    fn test_realistic_limits_produce_no_warnings() {
        let limits = BudgetLimits::none()
            .with_p95_latency_ms(2000.0)
            .with_battery_drain_per_10min(3.0)
            .with_memory_ceiling_mb(4000.0);
        assert!(limits.validate().is_empty());
    }

    #[test]
    fn test_tight_latency_warns() {
        let warnings = BudgetLimits::none().with_p95_latency_ms(100.0).validate();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            BudgetWarning::UnrealisticLatency { value_ms } if value_ms == 100.0
        ));
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        // Exactly at the floor is fine; only strictly below warns.
        let at_floor = BudgetLimits::none()
            .with_p95_latency_ms(500.0)
            .with_battery_drain_per_10min(0.5)
            .with_memory_ceiling_mb(2000.0);
        assert!(at_floor.validate().is_empty());

        let below = BudgetLimits::none()
            .with_p95_latency_ms(499.9)
            .with_battery_drain_per_10min(0.4)
            .with_memory_ceiling_mb(1999.0);
        assert_eq!(below.validate().len(), 3);
    }

    #[test]
    fn test_display_field_order_is_stable() {
        let limits = BudgetLimits::none()
            .with_memory_ceiling_mb(4000.0)
            .with_p95_latency_ms(1200.0);
        assert_eq!(limits.to_string(), "p95<=1200ms, memory<=4000MB");
    }

    #[test]
    fn test_warning_messages_are_descriptive() {
        let warnings = BudgetLimits::none().with_memory_ceiling_mb(512.0).validate();
        assert!(warnings[0].to_string().contains("512 MB"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let limits = BudgetLimits::none().with_p95_latency_ms(800.0);
        let json = serde_json::to_string(&limits).unwrap();
        let back: BudgetLimits = serde_json::from_str(&json).unwrap();
        assert_eq!(limits, back);
    }
}
