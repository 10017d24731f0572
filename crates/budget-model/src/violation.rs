// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Budget violation events.
//!
//! A violation is advisory: it reports that a measured value exceeded a
//! declared ceiling, names a suggested mitigation, and is broadcast to
//! listeners. It never blocks or aborts the submission that triggered it.

use crate::BudgetError;
use std::fmt;
use std::str::FromStr;

/// The four budget axes a violation can fire on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// 95th-percentile task latency exceeded its ceiling.
    P95Latency,
    /// Battery drain rate exceeded its ceiling.
    BatteryDrain,
    /// Thermal level exceeded its ceiling.
    ThermalLevel,
    /// Process RSS exceeded its ceiling. Always observe-only.
    MemoryCeiling,
}

impl ConstraintKind {
    /// Every constraint kind, in check order.
    pub const ALL: [ConstraintKind; 4] = [
        ConstraintKind::P95Latency,
        ConstraintKind::BatteryDrain,
        ConstraintKind::ThermalLevel,
        ConstraintKind::MemoryCeiling,
    ];

    /// The fixed mitigation advice for this constraint.
    ///
    /// A lookup, not a computation: the strings are part of the public
    /// event contract and are matched verbatim by downstream consumers.
    pub fn mitigation(&self) -> &'static str {
        match self {
            ConstraintKind::P95Latency => "reduce inference frequency",
            ConstraintKind::BatteryDrain => "lower model quality",
            ConstraintKind::ThermalLevel => "pause high-priority workloads",
            ConstraintKind::MemoryCeiling => "observe only — cannot reduce model memory",
        }
    }

    /// Returns `true` for the memory constraint, the only axis nothing
    /// in the supervisor can act on.
    pub fn is_observe_only(&self) -> bool {
        matches!(self, ConstraintKind::MemoryCeiling)
    }

    /// Lowercase constraint name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::P95Latency => "p95_latency",
            ConstraintKind::BatteryDrain => "battery_drain",
            ConstraintKind::ThermalLevel => "thermal_level",
            ConstraintKind::MemoryCeiling => "memory_ceiling",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConstraintKind {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p95_latency" => Ok(ConstraintKind::P95Latency),
            "battery_drain" => Ok(ConstraintKind::BatteryDrain),
            "thermal_level" => Ok(ConstraintKind::ThermalLevel),
            "memory_ceiling" => Ok(ConstraintKind::MemoryCeiling),
            _ => Err(BudgetError::UnknownConstraint {
                input: s.to_string(),
            }),
        }
    }
}

/// An immutable record of one measured value exceeding one ceiling.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BudgetViolation {
    /// Which axis was exceeded.
    pub constraint: ConstraintKind,
    /// The measured value at check time.
    pub current_value: f64,
    /// The ceiling it exceeded.
    pub budget_value: f64,
    /// Fixed mitigation advice for this constraint.
    pub mitigation: String,
    /// Event time, milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
    /// Always `false`: the mitigation string is advice, not an action
    /// this subsystem has taken.
    pub mitigated: bool,
    /// `true` iff the constraint is the memory ceiling.
    pub observe_only: bool,
}

impl BudgetViolation {
    /// Builds a violation event, filling the fixed per-constraint fields.
    pub fn new(
        constraint: ConstraintKind,
        current_value: f64,
        budget_value: f64,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            constraint,
            current_value,
            budget_value,
            mitigation: constraint.mitigation().to_string(),
            timestamp_ms,
            mitigated: false,
            observe_only: constraint.is_observe_only(),
        }
    }

    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.2} > {:.2} ({})",
            self.constraint, self.current_value, self.budget_value, self.mitigation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mitigation_lookup_is_fixed() {
        assert_eq!(
            ConstraintKind::P95Latency.mitigation(),
            "reduce inference frequency"
        );
        assert_eq!(ConstraintKind::BatteryDrain.mitigation(), "lower model quality");
        assert_eq!(
            ConstraintKind::ThermalLevel.mitigation(),
            "pause high-priority workloads"
        );
        assert_eq!(
            ConstraintKind::MemoryCeiling.mitigation(),
            "observe only — cannot reduce model memory"
        );
    }

    #[test]
    fn test_only_memory_is_observe_only() {
        for kind in ConstraintKind::ALL {
            assert_eq!(kind.is_observe_only(), kind == ConstraintKind::MemoryCeiling);
        }
    }

    #[test]
    fn test_new_fills_fixed_fields() {
        let v = BudgetViolation::new(ConstraintKind::P95Latency, 2500.0, 2000.0, 123);
        assert_eq!(v.current_value, 2500.0);
        assert_eq!(v.budget_value, 2000.0);
        assert_eq!(v.mitigation, "reduce inference frequency");
        assert_eq!(v.timestamp_ms, 123);
        assert!(!v.mitigated);
        assert!(!v.observe_only);
    }

    #[test]
    fn test_memory_violation_is_observe_only() {
        let v = BudgetViolation::new(ConstraintKind::MemoryCeiling, 2400.0, 2000.0, 0);
        assert!(v.observe_only);
        assert!(!v.mitigated);
    }

    #[test]
    fn test_constraint_parse_roundtrip() {
        for kind in ConstraintKind::ALL {
            assert_eq!(kind.name().parse::<ConstraintKind>().unwrap(), kind);
        }
        assert!("latency".parse::<ConstraintKind>().is_err());
    }

    #[test]
    fn test_summary() {
        let v = BudgetViolation::new(ConstraintKind::ThermalLevel, 3.0, 1.0, 0);
        let s = v.summary();
        assert!(s.contains("thermal_level"));
        assert!(s.contains("pause high-priority workloads"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let v = BudgetViolation::new(ConstraintKind::BatteryDrain, 4.2, 1.2, 99);
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("\"constraint\":\"battery_drain\""));
        let back: BudgetViolation = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
