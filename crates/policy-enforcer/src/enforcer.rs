// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Throttle evaluation over current signal readings.
//!
//! Evaluation is stateless and multiplicative: each enabled signal group
//! contributes its own factor, so a device that is simultaneously hot,
//! low on battery, and near its memory peak ends up with
//! `0.5 * 0.6 * 0.7 = 0.21` of its normal intensity.
//!
//! | Signal            | Condition          | Factor | Throttle flag |
//! |-------------------|--------------------|--------|---------------|
//! | thermal           | level >= 2         | 0.5    | yes           |
//! | thermal           | level == 1         | 0.8    | no            |
//! | battery           | level < 20%        | 0.6    | yes           |
//! | battery           | level < 50%        | 0.9    | no            |
//! | memory            | rss > 0.9 * peak   | 0.7    | yes           |

use crate::{PolicyConfig, SignalReadings};

const LOW_BATTERY_LEVEL: f64 = 0.20;
const REDUCED_BATTERY_LEVEL: f64 = 0.50;
const MEMORY_PRESSURE_RATIO: f64 = 0.9;

/// One throttle recommendation, produced by [`PolicyEnforcer::evaluate`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ThrottleDecision {
    /// At least one throttle-flagged condition fired.
    pub should_throttle: bool,
    /// Combined intensity multiplier. `1.0` when nothing fired; soft
    /// conditions can lower it without raising `should_throttle`.
    pub factor: f64,
    /// Human-readable reasons for throttle-flagged conditions, in check
    /// order (thermal, battery, memory).
    pub reasons: Vec<String>,
}

impl ThrottleDecision {
    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        if self.should_throttle {
            format!("throttle x{:.2} ({})", self.factor, self.reasons.join(", "))
        } else if self.factor < 1.0 {
            format!("reduce x{:.2}", self.factor)
        } else {
            "full intensity".to_string()
        }
    }
}

/// Evaluates throttle policy against signal readings.
///
/// A sibling consumer of the same trackers the scheduler samples; its
/// recommendation is independent of budget constraint checks and carries
/// no state between evaluations.
#[derive(Debug, Clone, Default)]
pub struct PolicyEnforcer {
    config: PolicyConfig,
}

impl PolicyEnforcer {
    /// Creates an enforcer with the given gates.
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// The active policy gates.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Evaluates all enabled signal groups against the readings.
    pub fn evaluate(&self, readings: &SignalReadings) -> ThrottleDecision {
        let mut should_throttle = false;
        let mut factor = 1.0;
        let mut reasons = Vec::new();

        if self.config.thermal_aware {
            if readings.thermal_level >= 2 {
                should_throttle = true;
                factor *= 0.5;
                reasons.push("thermal pressure".to_string());
            } else if readings.thermal_level == 1 {
                factor *= 0.8;
            }
        }

        if self.config.throttle_on_battery {
            if let Some(level) = readings.battery_level {
                if level < LOW_BATTERY_LEVEL {
                    should_throttle = true;
                    factor *= 0.6;
                    reasons.push("low battery".to_string());
                } else if level < REDUCED_BATTERY_LEVEL {
                    factor *= 0.9;
                }
            }
        }

        if self.config.adaptive_memory
            && readings.current_rss_mb > MEMORY_PRESSURE_RATIO * readings.peak_rss_mb
        {
            should_throttle = true;
            factor *= 0.7;
            reasons.push("high memory usage".to_string());
        }

        let decision = ThrottleDecision {
            should_throttle,
            factor,
            reasons,
        };
        if decision.should_throttle {
            tracing::debug!(
                factor = decision.factor,
                reasons = ?decision.reasons,
                "throttle recommended"
            );
        }
        decision
    }

    /// The priority multiplier for new work under the current readings.
    ///
    /// The throttle factor while throttling; `1.2` for a pure-performance
    /// policy (neither battery nor thermal gates enabled); otherwise `1.0`.
    pub fn priority_multiplier(&self, readings: &SignalReadings) -> f64 {
        let decision = self.evaluate(readings);
        if decision.should_throttle {
            decision.factor
        } else if self.config.is_pure_performance() {
            1.2
        } else {
            1.0
        }
    }

    /// Whether low-priority background work should be deferred right now.
    ///
    /// Requires the `background_optimization` gate and an active throttle
    /// recommendation.
    pub fn should_defer_background(&self, decision: &ThrottleDecision) -> bool {
        self.config.background_optimization && decision.should_throttle
    }
}
