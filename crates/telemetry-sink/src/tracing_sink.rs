// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Telemetry forwarding to the `tracing` subscriber.

use crate::{LatencyRecord, ResourceUsageRecord, TelemetrySink};
use budget_model::BudgetViolation;

/// A [`TelemetrySink`] that emits structured `tracing` events and retains
/// nothing. Suitable for hosts that already ship logs somewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    pub fn new() -> Self {
        Self
    }
}

impl TelemetrySink for TracingSink {
    fn log_latency(&self, record: LatencyRecord) {
        tracing::debug!(
            task_id = record.task_id,
            workload = %record.workload,
            latency_ms = record.latency_ms,
            "task latency"
        );
    }

    fn log_budget_violation(&self, violation: &BudgetViolation) {
        tracing::warn!(
            constraint = %violation.constraint,
            current = violation.current_value,
            budget = violation.budget_value,
            observe_only = violation.observe_only,
            mitigation = %violation.mitigation,
            "budget violation"
        );
    }

    fn log_resource_usage(&self, record: ResourceUsageRecord) {
        tracing::debug!(
            rss_mb = record.rss_mb,
            peak_rss_mb = record.peak_rss_mb,
            thermal_level = record.thermal_level,
            battery_level = record.battery_level,
            p95_latency_ms = record.p95_latency_ms,
            "resource usage"
        );
    }
}
