// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the supervisor.
//!
//! Submitted work is deliberately absent here: a task's own error
//! propagates to the caller of
//! [`schedule_task`](crate::InferenceScheduler::schedule_task) unchanged,
//! and budget violations are advisory events rather than errors.

/// Errors that can occur while configuring the supervisor.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Configuration could not be read, parsed, or applied.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A workload name did not match any known workload kind.
    #[error("unknown workload '{input}'; expected one of: text-generation, \
             vision-description, speech-transcription, embedding, maintenance")]
    UnknownWorkload { input: String },
}
