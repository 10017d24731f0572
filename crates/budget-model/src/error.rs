// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the budget model.

/// Errors produced while constructing budget types from external input.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// An adaptive profile name did not match any known profile.
    #[error("unknown adaptive profile '{input}' (expected one of: conservative, balanced, performance)")]
    UnknownProfile { input: String },

    /// A constraint name did not match any known constraint kind.
    #[error("unknown constraint '{input}' (expected one of: p95_latency, battery_drain, thermal_level, memory_ceiling)")]
    UnknownConstraint { input: String },
}
