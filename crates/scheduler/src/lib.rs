// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # scheduler
//!
//! The adaptive resource-budget supervisor for on-device inference.
//!
//! The supervisor takes:
//! - Four sliding-window trackers from `sample-trackers` (owned, or
//!   injected pre-built).
//! - A declared [`budget_model::Budget`], explicit or adaptive.
//! - An injected [`telemetry_sink::TelemetrySink`] for structured history.
//!
//! And runs submitted work units one at a time, checking each submission
//! against the active budget and broadcasting [`budget_model::BudgetViolation`]
//! events to registered listeners.
//!
//! # Warm-Up State Machine
//! An adaptive budget starts unresolved:
//! ```text
//! Adaptive(profile) → [threshold latency samples] → Resolved(limits, source)
//! ```
//! Once the latency window reaches the configured threshold (default 20
//! samples), the supervisor captures a [`budget_model::MeasuredBaseline`]
//! and replaces the budget with the resolved, concrete one. The
//! transition fires at most once.
//!
//! # Cooperative Execution
//! [`InferenceScheduler::schedule_task`] takes `&mut self` and drives one
//! future to completion, so there is no concurrent mutation of tracker or
//! supervisor state; violations are advisory and never block work.

mod config;
mod error;
mod queue;
mod scheduler;
mod workload;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use queue::{QueueStatus, QueuedItem, TaskPriority, TaskQueue, TaskStatus};
pub use scheduler::{InferenceScheduler, ViolationListener, ViolationListenerHandle};
pub use workload::{DegradationPriority, WorkloadKind, WorkloadRegistry};
