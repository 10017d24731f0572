// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The adaptive resource-budget supervisor.
//!
//! ```text
//! set_compute_budget(adaptive)        schedule_task() × N
//!        │                                  │ success: record latency
//!        ▼                                  ▼
//!   warm-up (collecting) ──20th sample──▶ resolved budget
//!                                           │
//!                                           ▼
//!                               per-submission constraint checks
//!                                   └─▶ BudgetViolation events
//! ```
//!
//! The warm-up transition fires at most once per supervisor: the baseline
//! is captured from the four trackers at that instant and the adaptive
//! budget is replaced with the resolved, concrete one. An explicit budget
//! skips warm-up entirely and is checked from the first submission.
//!
//! Execution is cooperative and single-flow: `schedule_task` takes
//! `&mut self` and runs one unit of work to completion, so tracker writes
//! and the warm-up check-and-set never race.

use crate::{
    DegradationPriority, QueueStatus, SchedulerConfig, TaskPriority, TaskQueue, WorkloadKind,
    WorkloadRegistry,
};
use budget_model::{Budget, BudgetViolation, ConstraintKind, MeasuredBaseline};
use policy_enforcer::SignalReadings;
use sample_trackers::{BatteryDrainTracker, LatencyTracker, ResourceMonitor, ThermalMonitor};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry_sink::{LatencyRecord, ResourceUsageRecord, TelemetrySink};

/// Callback invoked with each budget violation as it fires.
pub type ViolationListener = Box<dyn FnMut(&BudgetViolation) + Send>;

/// Opaque handle for removing a registered violation listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViolationListenerHandle(u64);

/// Owns the four trackers, the current budget, the warm-up state machine,
/// and the task queue.
///
/// # Example
/// ```no_run
/// use budget_model::{AdaptiveProfile, Budget};
/// use scheduler::{InferenceScheduler, SchedulerConfig, TaskPriority, WorkloadKind};
/// use std::sync::Arc;
/// use telemetry_sink::InMemorySink;
///
/// # async fn example() -> Result<(), std::io::Error> {
/// let mut supervisor =
///     InferenceScheduler::new(SchedulerConfig::default(), Arc::new(InMemorySink::new()));
/// supervisor.set_compute_budget(Budget::adaptive(AdaptiveProfile::Balanced));
///
/// let reply = supervisor
///     .schedule_task(TaskPriority::High, WorkloadKind::TextGeneration, || async {
///         Ok::<_, std::io::Error>("generated text".to_string())
///     })
///     .await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
pub struct InferenceScheduler {
    config: SchedulerConfig,
    latency: LatencyTracker,
    battery: BatteryDrainTracker,
    thermal: ThermalMonitor,
    resources: ResourceMonitor,
    queue: TaskQueue,
    workloads: WorkloadRegistry,
    budget: Option<Budget>,
    baseline: Option<MeasuredBaseline>,
    warm_up_complete: bool,
    listeners: Vec<(ViolationListenerHandle, ViolationListener)>,
    next_handle: u64,
    telemetry: Arc<dyn TelemetrySink>,
}

impl InferenceScheduler {
    /// Creates a supervisor with fresh trackers sized from the config.
    pub fn new(config: SchedulerConfig, telemetry: Arc<dyn TelemetrySink>) -> Self {
        let latency = LatencyTracker::with_capacity(config.latency_window);
        let battery = BatteryDrainTracker::with_window(
            config.battery_window,
            Duration::from_secs(config.battery_window_secs),
        );
        let resources = ResourceMonitor::with_capacity(config.resource_window);
        Self::with_trackers(config, latency, battery, ThermalMonitor::new(), resources, telemetry)
    }

    /// Creates a supervisor around pre-built trackers.
    ///
    /// Useful for embedding hosts that already own sensor plumbing, and
    /// for tests that need pre-warmed windows.
    pub fn with_trackers(
        config: SchedulerConfig,
        latency: LatencyTracker,
        battery: BatteryDrainTracker,
        thermal: ThermalMonitor,
        resources: ResourceMonitor,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        tracing::info!(
            warm_up_threshold = config.warm_up_threshold,
            "supervisor created"
        );
        Self {
            config,
            latency,
            battery,
            thermal,
            resources,
            queue: TaskQueue::new(),
            workloads: WorkloadRegistry::new(),
            budget: None,
            baseline: None,
            warm_up_complete: false,
            listeners: Vec::new(),
            next_handle: 0,
            telemetry,
        }
    }

    // ── Budget ─────────────────────────────────────────────────

    /// Declares the active budget.
    ///
    /// An adaptive budget set before warm-up stays unresolved until the
    /// latency tracker reaches the warm-up threshold. Once a baseline has
    /// been captured, any later adaptive budget resolves against it
    /// immediately; the baseline itself is never re-measured.
    pub fn set_compute_budget(&mut self, budget: Budget) {
        let budget = match &self.baseline {
            Some(baseline) if budget.is_adaptive() => budget.resolve(baseline),
            _ => budget,
        };
        tracing::info!("compute budget set: {budget}");
        self.budget = Some(budget);
    }

    /// The active budget, if one has been declared.
    pub fn compute_budget(&self) -> Option<&Budget> {
        self.budget.as_ref()
    }

    /// The baseline captured at warm-up completion, if any.
    pub fn measured_baseline(&self) -> Option<&MeasuredBaseline> {
        self.baseline.as_ref()
    }

    /// Whether the warm-up transition has fired.
    pub fn is_warmed_up(&self) -> bool {
        self.warm_up_complete
    }

    // ── Task submission ────────────────────────────────────────

    /// Submits one unit of work and runs it to completion.
    ///
    /// Constraint checks run pre-flight against the active budget; a
    /// violation is broadcast but never blocks execution. On success the
    /// wall-clock duration is recorded as a latency sample and the warm-up
    /// transition is re-evaluated. An error from `work` propagates to the
    /// caller unchanged and leaves the latency window untouched.
    pub async fn schedule_task<F, Fut, T, E>(
        &mut self,
        priority: TaskPriority,
        workload: WorkloadKind,
        work: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let id = self.queue.enqueue(priority, workload);
        tracing::debug!(task = id, %priority, %workload, "task submitted");

        // Pre-flight, not gating: execution proceeds regardless.
        self.check_constraints();

        self.queue.mark_running(id);
        let started = Instant::now();
        let result = work().await;

        match &result {
            Ok(_) => {
                let elapsed = started.elapsed();
                self.latency.record_duration(elapsed);
                self.telemetry.log_latency(LatencyRecord {
                    task_id: id,
                    workload: workload.as_str().to_string(),
                    latency_ms: elapsed.as_secs_f64() * 1000.0,
                    timestamp_ms: epoch_ms(),
                });
                self.maybe_complete_warm_up();
                self.record_usage_snapshot();
                self.queue.finish(id, true);
            }
            Err(_) => {
                tracing::debug!(task = id, "task failed; error propagates to caller");
                self.queue.finish(id, false);
            }
        }
        result
    }

    /// Removes a pending task from the queue. In-flight work cannot be
    /// interrupted.
    pub fn cancel_task(&mut self, id: u64) -> bool {
        self.queue.cancel(id)
    }

    /// Snapshot of queue counters.
    pub fn queue_status(&self) -> QueueStatus {
        self.queue.status()
    }

    // ── Workload registry ──────────────────────────────────────

    /// Registers a named workload with its degradation priority,
    /// returning the previous priority if the name was already known.
    pub fn register_workload(
        &mut self,
        name: impl Into<String>,
        priority: DegradationPriority,
    ) -> Option<DegradationPriority> {
        self.workloads.register(name, priority)
    }

    /// The registered workload map.
    pub fn workloads(&self) -> &WorkloadRegistry {
        &self.workloads
    }

    // ── Violation listeners ────────────────────────────────────

    /// Registers a violation listener; returns a handle for removal.
    pub fn on_budget_violation<F>(&mut self, listener: F) -> ViolationListenerHandle
    where
        F: FnMut(&BudgetViolation) + Send + 'static,
    {
        let handle = ViolationListenerHandle(self.next_handle);
        self.next_handle += 1;
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Removes a listener. Returns `false` if the handle is unknown.
    pub fn remove_violation_listener(&mut self, handle: ViolationListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    /// Number of registered violation listeners.
    pub fn violation_listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Sensor feeds ───────────────────────────────────────────

    /// Records a battery level sample (fraction of full charge).
    /// Out-of-range values are silently dropped by the tracker.
    pub fn record_battery_level(&mut self, level: f64) {
        self.battery.record_sample(level);
    }

    /// Records a new thermal level from a sensor bridge.
    pub fn update_thermal_level(&mut self, level: i32) {
        self.thermal.update_level(level);
    }

    /// Records a process RSS sample in megabytes.
    pub fn record_rss_mb(&mut self, rss_mb: f64) {
        self.resources.sample(rss_mb);
    }

    /// Records a process RSS sample in bytes.
    pub fn record_rss_bytes(&mut self, rss_bytes: u64) {
        self.resources.sample_bytes(rss_bytes);
    }

    // ── Tracker access ─────────────────────────────────────────

    /// The latency tracker (read-only; samples come from task timing).
    pub fn latency_tracker(&self) -> &LatencyTracker {
        &self.latency
    }

    /// The battery drain tracker.
    pub fn battery_tracker(&self) -> &BatteryDrainTracker {
        &self.battery
    }

    /// The thermal monitor.
    pub fn thermal_monitor(&self) -> &ThermalMonitor {
        &self.thermal
    }

    /// Mutable thermal monitor access, for registering change listeners.
    pub fn thermal_monitor_mut(&mut self) -> &mut ThermalMonitor {
        &mut self.thermal
    }

    /// The resource monitor.
    pub fn resource_monitor(&self) -> &ResourceMonitor {
        &self.resources
    }

    /// Point-in-time signal snapshot for throttle policy evaluation.
    pub fn signal_readings(&self) -> SignalReadings {
        SignalReadings::from_trackers(&self.thermal, &self.battery, &self.resources)
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Clears all four trackers (window contents and peaks).
    ///
    /// The budget, the captured baseline, and the warm-up state survive;
    /// only measurements are dropped.
    pub fn reset_metrics(&mut self) {
        self.latency.reset();
        self.battery.reset();
        self.thermal.reset();
        self.resources.reset();
        tracing::debug!("tracker metrics reset");
    }

    // ── Private helpers ────────────────────────────────────────

    /// Compares each configured ceiling against the tracker's current
    /// derived value; `current > budget` (strictly) fires a violation.
    ///
    /// An unresolved adaptive budget has no limits yet, so checks are a
    /// no-op until warm-up completes.
    fn check_constraints(&mut self) {
        let Some(limits) = self.budget.as_ref().and_then(|b| b.limits()).copied() else {
            return;
        };
        let now = epoch_ms();
        let mut violations = Vec::new();

        if let Some(max_p95) = limits.p95_latency_ms {
            let current = self.latency.p95_ms();
            if current > max_p95 {
                violations.push(BudgetViolation::new(
                    ConstraintKind::P95Latency,
                    current,
                    max_p95,
                    now,
                ));
            }
        }
        if let Some(max_drain) = limits.battery_drain_per_10min {
            if let Some(current) = self.battery.current_drain_rate() {
                if current > max_drain {
                    violations.push(BudgetViolation::new(
                        ConstraintKind::BatteryDrain,
                        current,
                        max_drain,
                        now,
                    ));
                }
            }
        }
        if let Some(max_thermal) = limits.max_thermal_level {
            let current = self.thermal.level();
            if current > max_thermal {
                violations.push(BudgetViolation::new(
                    ConstraintKind::ThermalLevel,
                    f64::from(current),
                    f64::from(max_thermal),
                    now,
                ));
            }
        }
        if let Some(ceiling) = limits.memory_ceiling_mb {
            let current = self.resources.current_rss_mb();
            if current > ceiling {
                violations.push(BudgetViolation::new(
                    ConstraintKind::MemoryCeiling,
                    current,
                    ceiling,
                    now,
                ));
            }
        }

        for violation in violations {
            self.emit_violation(violation);
        }
    }

    /// Logs, records, and broadcasts one violation, isolating listener
    /// panics so siblings and the submitted task are unaffected.
    fn emit_violation(&mut self, violation: BudgetViolation) {
        tracing::warn!(
            constraint = violation.constraint.name(),
            current = violation.current_value,
            budget = violation.budget_value,
            "budget violation: {}",
            violation.mitigation,
        );
        self.telemetry.log_budget_violation(&violation);
        for (handle, listener) in &mut self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(&violation)));
            if let Err(payload) = outcome {
                tracing::warn!(
                    listener = handle.0,
                    detail = panic_text(payload.as_ref()),
                    "violation listener panicked; remaining listeners still run"
                );
            }
        }
    }

    /// Fires the warm-up transition when an adaptive budget is active and
    /// the latency window has just reached the threshold.
    fn maybe_complete_warm_up(&mut self) {
        if self.warm_up_complete {
            return;
        }
        if !self.budget.as_ref().is_some_and(Budget::is_adaptive) {
            return;
        }
        if self.latency.sample_count() < self.config.warm_up_threshold {
            return;
        }

        let baseline = self.capture_baseline();
        if let Some(budget) = &self.budget {
            let resolved = budget.resolve(&baseline);
            tracing::info!("warm-up complete: {}", baseline.summary());
            tracing::info!("budget resolved: {resolved}");
            self.budget = Some(resolved);
        }
        self.baseline = Some(baseline);
        self.warm_up_complete = true;
    }

    /// Snapshots the four trackers at this instant.
    fn capture_baseline(&self) -> MeasuredBaseline {
        MeasuredBaseline {
            p95_latency_ms: self.latency.p95_ms(),
            battery_drain_per_10min: self.battery.average_drain_rate(),
            thermal_level: self.thermal.level(),
            rss_mb: self.resources.current_rss_mb(),
            sample_count: self.latency.sample_count(),
            captured_at_ms: epoch_ms(),
        }
    }

    /// Pushes a point-in-time usage record to the telemetry sink.
    fn record_usage_snapshot(&self) {
        self.telemetry.log_resource_usage(ResourceUsageRecord {
            rss_mb: self.resources.current_rss_mb(),
            peak_rss_mb: self.resources.peak_rss_mb(),
            thermal_level: self.thermal.level(),
            battery_level: self.battery.current_level(),
            p95_latency_ms: self.latency.p95_ms(),
            timestamp_ms: epoch_ms(),
        });
    }
}

impl std::fmt::Debug for InferenceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceScheduler")
            .field("warm_up_complete", &self.warm_up_complete)
            .field("budget", &self.budget)
            .field("latency_samples", &self.latency.sample_count())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Milliseconds since the UNIX epoch; `0` if the clock is pre-epoch.
fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Best-effort text form of a panic payload.
fn panic_text(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
