// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The compute budget sum type.
//!
//! A budget is in exactly one of three states:
//!
//! - [`Budget::Explicit`]: the caller named concrete ceilings up front.
//! - [`Budget::Adaptive`]: the caller named an intent profile; no concrete
//!   ceilings exist until the scheduler finishes warming up.
//! - [`Budget::Resolved`]: a formerly adaptive budget whose profile has
//!   been resolved against a [`MeasuredBaseline`], keeping the source
//!   profile for display.
//!
//! Constraint checks only ever see `Explicit` or `Resolved`; an
//! `Adaptive` budget has no limits to check against.

use crate::{AdaptiveProfile, BudgetLimits, BudgetWarning, MeasuredBaseline};
use std::fmt;

/// A declared compute budget.
///
/// # Example
/// ```
/// use budget_model::{AdaptiveProfile, Budget, MeasuredBaseline};
///
/// let budget = Budget::adaptive(AdaptiveProfile::Balanced);
/// assert!(budget.is_adaptive());
/// assert!(budget.limits().is_none());
///
/// let baseline = MeasuredBaseline {
///     p95_latency_ms: 1000.0,
///     battery_drain_per_10min: Some(2.0),
///     thermal_level: 0,
///     rss_mb: 1200.0,
///     sample_count: 20,
///     captured_at_ms: 0,
/// };
/// let resolved = budget.resolve(&baseline);
/// assert!(resolved.is_resolved());
/// assert_eq!(resolved.limits().unwrap().p95_latency_ms, Some(1500.0));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Budget {
    /// Concrete ceilings declared by the caller.
    Explicit {
        /// The declared ceilings.
        limits: BudgetLimits,
    },
    /// An intent profile awaiting warm-up resolution.
    Adaptive {
        /// The declared intent.
        profile: AdaptiveProfile,
    },
    /// Concrete ceilings produced by resolving an adaptive profile.
    Resolved {
        /// The resolved ceilings.
        limits: BudgetLimits,
        /// The profile the ceilings were derived from.
        source_profile: AdaptiveProfile,
    },
}

impl Budget {
    /// An explicit budget with the given ceilings.
    pub fn explicit(limits: BudgetLimits) -> Self {
        Budget::Explicit { limits }
    }

    /// An adaptive budget with the given intent profile.
    pub fn adaptive(profile: AdaptiveProfile) -> Self {
        Budget::Adaptive { profile }
    }

    /// Returns `true` for an adaptive budget that has not resolved yet.
    pub fn is_adaptive(&self) -> bool {
        matches!(self, Budget::Adaptive { .. })
    }

    /// Returns `true` once an adaptive budget has been resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Budget::Resolved { .. })
    }

    /// The concrete ceilings, if any exist yet.
    ///
    /// `None` exactly while the budget is adaptive-unresolved.
    pub fn limits(&self) -> Option<&BudgetLimits> {
        match self {
            Budget::Explicit { limits } | Budget::Resolved { limits, .. } => Some(limits),
            Budget::Adaptive { .. } => None,
        }
    }

    /// The intent profile behind this budget, declared or resolved.
    pub fn profile(&self) -> Option<AdaptiveProfile> {
        match self {
            Budget::Adaptive { profile } => Some(*profile),
            Budget::Resolved { source_profile, .. } => Some(*source_profile),
            Budget::Explicit { .. } => None,
        }
    }

    /// Resolves an adaptive budget against a measured baseline.
    ///
    /// Explicit and already-resolved budgets pass through unchanged;
    /// resolution is not re-run against a second baseline.
    pub fn resolve(&self, baseline: &MeasuredBaseline) -> Budget {
        match self {
            Budget::Adaptive { profile } => Budget::Resolved {
                limits: profile.resolve(baseline),
                source_profile: *profile,
            },
            other => other.clone(),
        }
    }

    /// Advisory warnings for the current ceilings.
    ///
    /// An unresolved adaptive budget has nothing to validate.
    pub fn validate(&self) -> Vec<BudgetWarning> {
        self.limits().map(BudgetLimits::validate).unwrap_or_default()
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Explicit { limits } => write!(f, "explicit ({limits})"),
            Budget::Adaptive { profile } => write!(f, "adaptive ({profile}, warming up)"),
            Budget::Resolved {
                limits,
                source_profile,
            } => write!(f, "resolved from {source_profile} ({limits})"),
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
            rss_mb: 1200.0,
            sample_count: 20,
            captured_at_ms: 0,
        }
    }

    #[test]
    fn test_adaptive_has_no_limits() {
        let b = Budget::adaptive(AdaptiveProfile::Conservative);
        assert!(b.is_adaptive());
        assert!(!b.is_resolved());
        assert!(b.limits().is_none());
        assert_eq!(b.profile(), Some(AdaptiveProfile::Conservative));
        assert!(b.validate().is_empty());
    }

    #[test]
    fn test_explicit_budget_exposes_limits() {
        let limits = BudgetLimits::none().with_p95_latency_ms(1800.0);
        let b = Budget::explicit(limits);
        assert!(!b.is_adaptive());
        assert!(!b.is_resolved());
        assert_eq!(b.limits(), Some(&limits));
        assert_eq!(b.profile(), None);
    }

    #[test]
    fn test_resolve_tags_source_profile() {
        let b = Budget::adaptive(AdaptiveProfile::Balanced).resolve(&baseline());
        assert!(b.is_resolved());
        assert_eq!(b.profile(), Some(AdaptiveProfile::Balanced));
        assert_eq!(b.limits().unwrap().p95_latency_ms, Some(1500.0));
    }

    #[test]
    fn test_resolve_is_identity_for_non_adaptive() {
        let explicit = Budget::explicit(BudgetLimits::none().with_p95_latency_ms(900.0));
        assert_eq!(explicit.resolve(&baseline()), explicit);

        let resolved = Budget::adaptive(AdaptiveProfile::Performance).resolve(&baseline());
        let mut second = baseline();
        second.p95_latency_ms = 5000.0;
        // A second baseline must not re-resolve.
        assert_eq!(resolved.resolve(&second), resolved);
    }

    #[test]
    fn test_validate_flags_tight_explicit_budget() {
        let b = Budget::explicit(BudgetLimits::none().with_p95_latency_ms(100.0));
        assert_eq!(b.validate().len(), 1);
    }

    #[test]
    fn test_display_states() {
        let adaptive = Budget::adaptive(AdaptiveProfile::Balanced);
        assert!(adaptive.to_string().contains("warming up"));

        let resolved = adaptive.resolve(&baseline());
        assert!(resolved.to_string().starts_with("resolved from balanced"));

        let explicit = Budget::explicit(BudgetLimits::none());
        assert!(explicit.to_string().starts_with("explicit"));
    }

    #[test]
    fn test_serde_tagged_representation() {
        let b = Budget::adaptive(AdaptiveProfile::Performance);
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"kind\":\"adaptive\""));
        let back: Budget = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
