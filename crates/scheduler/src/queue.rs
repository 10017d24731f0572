// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Priority-ordered task bookkeeping.
//!
//! The queue tracks every submission from creation to completion. Under
//! the supervisor's single-flow execution model at most one item is ever
//! live at a time, so the depth the snapshot reports is usually zero or
//! one; the priority ordering in [`TaskQueue::next_pending`] is the
//! data-structure contract that holds whenever multiple items are pending.

use crate::WorkloadKind;

/// Submission priority. Higher variants dequeue first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Opportunistic work, first to wait.
    Low = 0,
    /// Default for interactive tasks.
    Normal = 1,
    /// Latency-sensitive work, always dequeued first.
    High = 2,
}

impl TaskPriority {
    /// All priorities, lowest first.
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Normal, TaskPriority::High];

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Enqueued, not yet picked up.
    Pending,
    /// Currently executing.
    Running,
}

/// One tracked submission. The supervisor is the sole owner; callers see
/// only the id.
#[derive(Debug, Clone, serde::Serialize)]
pub struct QueuedItem {
    /// Supervisor-assigned unique id.
    pub id: u64,
    /// Submission priority.
    pub priority: TaskPriority,
    /// Engine family this task belongs to.
    pub workload: WorkloadKind,
    /// Current lifecycle state.
    pub status: TaskStatus,
}

/// Point-in-time queue counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct QueueStatus {
    /// Items waiting to run.
    pub pending: usize,
    /// Items currently executing.
    pub running: usize,
    /// Tasks finished successfully.
    pub completed: usize,
    /// Tasks whose work returned an error.
    pub failed: usize,
    /// Tasks cancelled before they ran.
    pub cancelled: usize,
}

impl QueueStatus {
    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "Queue: {} pending, {} running, {} completed, {} failed, {} cancelled",
            self.pending, self.running, self.completed, self.failed, self.cancelled,
        )
    }
}

/// Priority queue plus outcome counters.
///
/// Finished items are dropped and counted rather than retained; the
/// telemetry sink keeps per-task history.
#[derive(Debug, Default)]
pub struct TaskQueue {
    next_id: u64,
    items: Vec<QueuedItem>,
    completed: usize,
    failed: usize,
    cancelled: usize,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pending item and returns its fresh id. Ids start at 1 and
    /// never repeat.
    pub fn enqueue(&mut self, priority: TaskPriority, workload: WorkloadKind) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(QueuedItem {
            id,
            priority,
            workload,
            status: TaskStatus::Pending,
        });
        id
    }

    /// The id of the next item to run: highest priority first, oldest id
    /// within a priority band.
    pub fn next_pending(&self) -> Option<u64> {
        self.items
            .iter()
            .filter(|item| item.status == TaskStatus::Pending)
            .max_by(|a, b| a.priority.cmp(&b.priority).then(b.id.cmp(&a.id)))
            .map(|item| item.id)
    }

    /// Marks a pending item as running. Returns `false` if the id is
    /// unknown or not pending.
    pub fn mark_running(&mut self, id: u64) -> bool {
        match self.item_mut(id) {
            Some(item) if item.status == TaskStatus::Pending => {
                item.status = TaskStatus::Running;
                true
            }
            _ => false,
        }
    }

    /// Retires a running item, counting it as completed or failed.
    /// Returns `false` if the id is unknown or not running.
    pub fn finish(&mut self, id: u64, success: bool) -> bool {
        let Some(pos) = self
            .items
            .iter()
            .position(|item| item.id == id && item.status == TaskStatus::Running)
        else {
            return false;
        };
        self.items.remove(pos);
        if success {
            self.completed += 1;
        } else {
            self.failed += 1;
        }
        true
    }

    /// Removes a pending item. In-flight work cannot be interrupted, so a
    /// running id returns `false`.
    pub fn cancel(&mut self, id: u64) -> bool {
        let Some(pos) = self
            .items
            .iter()
            .position(|item| item.id == id && item.status == TaskStatus::Pending)
        else {
            return false;
        };
        self.items.remove(pos);
        self.cancelled += 1;
        true
    }

    /// Looks up a live item by id.
    pub fn get(&self, id: u64) -> Option<&QueuedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of pending items at the given priority.
    pub fn count_by_priority(&self, priority: TaskPriority) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == TaskStatus::Pending && item.priority == priority)
            .count()
    }

    /// Items waiting to run.
    pub fn pending_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == TaskStatus::Pending)
            .count()
    }

    /// Items currently executing.
    pub fn running_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == TaskStatus::Running)
            .count()
    }

    /// Snapshot of the queue counters.
    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            pending: self.pending_count(),
            running: self.running_count(),
            completed: self.completed,
            failed: self.failed,
            cancelled: self.cancelled,
        }
    }

    fn item_mut(&mut self, id: u64) -> Option<&mut QueuedItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(TaskPriority::High > TaskPriority::Normal);
        assert!(TaskPriority::Normal > TaskPriority::Low);
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_enqueue_assigns_increasing_ids() {
        let mut q = TaskQueue::new();
        let a = q.enqueue(TaskPriority::Normal, WorkloadKind::TextGeneration);
        let b = q.enqueue(TaskPriority::Normal, WorkloadKind::Embedding);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(q.get(a).unwrap().workload, WorkloadKind::TextGeneration);
    }

    #[test]
    fn test_next_pending_prefers_high_priority() {
        let mut q = TaskQueue::new();
        q.enqueue(TaskPriority::Low, WorkloadKind::Maintenance);
        let high = q.enqueue(TaskPriority::High, WorkloadKind::TextGeneration);
        q.enqueue(TaskPriority::Normal, WorkloadKind::Embedding);
        assert_eq!(q.next_pending(), Some(high));
    }

    #[test]
    fn test_next_pending_is_fifo_within_band() {
        let mut q = TaskQueue::new();
        let first = q.enqueue(TaskPriority::Normal, WorkloadKind::TextGeneration);
        let _second = q.enqueue(TaskPriority::Normal, WorkloadKind::TextGeneration);
        assert_eq!(q.next_pending(), Some(first));
    }

    #[test]
    fn test_lifecycle_counts() {
        let mut q = TaskQueue::new();
        let id = q.enqueue(TaskPriority::Normal, WorkloadKind::TextGeneration);
        assert_eq!(q.pending_count(), 1);

        assert!(q.mark_running(id));
        assert_eq!(q.pending_count(), 0);
        assert_eq!(q.running_count(), 1);

        assert!(q.finish(id, true));
        let status = q.status();
        assert_eq!(status.running, 0);
        assert_eq!(status.completed, 1);
        assert_eq!(status.failed, 0);
    }

    #[test]
    fn test_failed_work_counts_separately() {
        let mut q = TaskQueue::new();
        let id = q.enqueue(TaskPriority::High, WorkloadKind::SpeechTranscription);
        q.mark_running(id);
        assert!(q.finish(id, false));
        assert_eq!(q.status().failed, 1);
        assert_eq!(q.status().completed, 0);
    }

    #[test]
    fn test_cancel_is_pending_only() {
        let mut q = TaskQueue::new();
        let pending = q.enqueue(TaskPriority::Low, WorkloadKind::Maintenance);
        let running = q.enqueue(TaskPriority::Normal, WorkloadKind::Embedding);
        q.mark_running(running);

        assert!(q.cancel(pending));
        assert!(!q.cancel(running), "in-flight work cannot be cancelled");
        assert!(!q.cancel(999), "unknown id");
        assert_eq!(q.status().cancelled, 1);
    }

    #[test]
    fn test_mark_running_requires_pending() {
        let mut q = TaskQueue::new();
        let id = q.enqueue(TaskPriority::Normal, WorkloadKind::TextGeneration);
        assert!(q.mark_running(id));
        assert!(!q.mark_running(id), "already running");
        assert!(!q.mark_running(42), "unknown id");
    }

    #[test]
    fn test_count_by_priority_counts_pending_only() {
        let mut q = TaskQueue::new();
        q.enqueue(TaskPriority::High, WorkloadKind::TextGeneration);
        q.enqueue(TaskPriority::High, WorkloadKind::TextGeneration);
        let running = q.enqueue(TaskPriority::High, WorkloadKind::TextGeneration);
        q.mark_running(running);

        assert_eq!(q.count_by_priority(TaskPriority::High), 2);
        assert_eq!(q.count_by_priority(TaskPriority::Low), 0);
    }

    #[test]
    fn test_status_summary() {
        let mut q = TaskQueue::new();
        let id = q.enqueue(TaskPriority::Normal, WorkloadKind::Embedding);
        q.mark_running(id);
        q.finish(id, true);
        let s = q.status().summary();
        assert!(s.contains("1 completed"));
        assert!(s.contains("0 failed"));
    }
}
