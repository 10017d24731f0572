// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded in-memory telemetry retention.

use crate::{HistoryCaps, LatencyRecord, ResourceUsageRecord, TelemetrySink};
use budget_model::BudgetViolation;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A [`TelemetrySink`] that retains a bounded history of everything it
/// receives, for inspection by diagnostics and tests.
///
/// Each stream keeps its newest entries up to its [`HistoryCaps`] bound,
/// evicting oldest-first. Locks are per-stream; a poisoned lock degrades
/// to dropping the record or returning an empty history, never a panic,
/// because telemetry is one-way and best-effort.
#[derive(Debug)]
pub struct InMemorySink {
    caps: HistoryCaps,
    latency: Mutex<VecDeque<LatencyRecord>>,
    violations: Mutex<VecDeque<BudgetViolation>>,
    usage: Mutex<VecDeque<ResourceUsageRecord>>,
}

impl InMemorySink {
    /// Creates a sink with the default caps (1000 / 100 / 100).
    pub fn new() -> Self {
        Self::with_caps(HistoryCaps::default())
    }

    /// Creates a sink with explicit history bounds.
    pub fn with_caps(caps: HistoryCaps) -> Self {
        Self {
            caps,
            latency: Mutex::new(VecDeque::new()),
            violations: Mutex::new(VecDeque::new()),
            usage: Mutex::new(VecDeque::new()),
        }
    }

    /// The retained latency records, oldest first.
    pub fn latency_history(&self) -> Vec<LatencyRecord> {
        self.latency
            .lock()
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The retained violation events, oldest first.
    pub fn violation_history(&self) -> Vec<BudgetViolation> {
        self.violations
            .lock()
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The retained usage snapshots, oldest first.
    pub fn usage_history(&self) -> Vec<ResourceUsageRecord> {
        self.usage
            .lock()
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops all retained history.
    pub fn clear(&self) {
        if let Ok(mut q) = self.latency.lock() {
            q.clear();
        }
        if let Ok(mut q) = self.violations.lock() {
            q.clear();
        }
        if let Ok(mut q) = self.usage.lock() {
            q.clear();
        }
    }

    /// Returns a human-readable one-line summary of retained counts.
    pub fn summary(&self) -> String {
        format!(
            "{} latency records, {} violations, {} snapshots",
            self.latency.lock().map(|q| q.len()).unwrap_or(0),
            self.violations.lock().map(|q| q.len()).unwrap_or(0),
            self.usage.lock().map(|q| q.len()).unwrap_or(0),
        )
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

/// Pushes to a bounded deque, evicting oldest-first.
fn push_bounded<T>(queue: &Mutex<VecDeque<T>>, cap: usize, item: T) {
    if let Ok(mut q) = queue.lock() {
        q.push_back(item);
        while q.len() > cap {
            q.pop_front();
        }
    }
}

impl TelemetrySink for InMemorySink {
    fn log_latency(&self, record: LatencyRecord) {
        push_bounded(&self.latency, self.caps.latency, record);
    }

    fn log_budget_violation(&self, violation: &BudgetViolation) {
        push_bounded(&self.violations, self.caps.violations, violation.clone());
    }

    fn log_resource_usage(&self, record: ResourceUsageRecord) {
        push_bounded(&self.usage, self.caps.snapshots, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_model::ConstraintKind;

    fn latency_record(task_id: u64) -> LatencyRecord {
        LatencyRecord {
            task_id,
            workload: "text-generation".to_string(),
            latency_ms: 100.0,
            timestamp_ms: task_id * 10,
        }
    }

    #[test]
    fn test_retains_in_arrival_order() {
        let sink = InMemorySink::new();
        sink.log_latency(latency_record(1));
        sink.log_latency(latency_record(2));
        let history = sink.latency_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].task_id, 1);
        assert_eq!(history[1].task_id, 2);
    }

    #[test]
    fn test_latency_cap_evicts_oldest() {
        let sink = InMemorySink::with_caps(HistoryCaps {
            latency: 3,
            violations: 100,
            snapshots: 100,
        });
        for id in 0..10 {
            sink.log_latency(latency_record(id));
        }
        let history = sink.latency_history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].task_id, 7);
        assert_eq!(history[2].task_id, 9);
    }

    #[test]
    fn test_violation_cap() {
        let sink = InMemorySink::with_caps(HistoryCaps {
            latency: 1000,
            violations: 2,
            snapshots: 100,
        });
        for i in 0..5 {
            let v = BudgetViolation::new(ConstraintKind::P95Latency, 2500.0, 2000.0, i);
            sink.log_budget_violation(&v);
        }
        let history = sink.violation_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].timestamp_ms, 3);
    }

    #[test]
    fn test_usage_snapshots() {
        let sink = InMemorySink::new();
        sink.log_resource_usage(ResourceUsageRecord {
            rss_mb: 1200.0,
            peak_rss_mb: 1500.0,
            thermal_level: 1,
            battery_level: Some(0.8),
            p95_latency_ms: 400.0,
            timestamp_ms: 1,
        });
        assert_eq!(sink.usage_history().len(), 1);
        assert!(sink.summary().contains("1 snapshots"));
    }

    #[test]
    fn test_clear() {
        let sink = InMemorySink::new();
        sink.log_latency(latency_record(1));
        sink.clear();
        assert!(sink.latency_history().is_empty());
    }
}
