// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # telemetry-sink
//!
//! The one-way telemetry interface the scheduler pushes into. The sink is
//! injected at scheduler construction (never a process-wide singleton), so
//! hosts choose what happens to the data:
//!
//! - [`InMemorySink`]: bounded history for diagnostics surfaces and tests.
//! - [`TracingSink`]: forward everything to the `tracing` subscriber.
//!
//! The scheduler has no read dependency on its sink: every trait method is
//! fire-and-forget, and implementations must never fail the caller.
//!
//! # Example
//! ```
//! use telemetry_sink::{InMemorySink, LatencyRecord, TelemetrySink};
//!
//! let sink = InMemorySink::new();
//! sink.log_latency(LatencyRecord {
//!     task_id: 1,
//!     workload: "embedding".to_string(),
//!     latency_ms: 42.0,
//!     timestamp_ms: 0,
//! });
//! assert_eq!(sink.latency_history().len(), 1);
//! ```

mod memory;
mod records;
mod tracing_sink;

pub use memory::InMemorySink;
pub use records::{HistoryCaps, LatencyRecord, ResourceUsageRecord};
pub use tracing_sink::TracingSink;

use budget_model::BudgetViolation;

/// Receiver for the scheduler's structured telemetry.
///
/// Implementations are shared behind an `Arc` and called from the
/// scheduler's single flow; they must be cheap, infallible, and must not
/// call back into the scheduler.
pub trait TelemetrySink: Send + Sync {
    /// Records one completed task's latency.
    fn log_latency(&self, record: LatencyRecord);

    /// Records a budget violation event.
    fn log_budget_violation(&self, violation: &BudgetViolation);

    /// Records a point-in-time resource usage snapshot.
    fn log_resource_usage(&self, record: ResourceUsageRecord);
}
