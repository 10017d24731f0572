// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # budget-model
//!
//! Pure vocabulary for compute budgets: no clocks, no trackers, no I/O.
//! This crate defines what a budget *is*; the scheduler decides when to
//! measure and resolve one.
//!
//! - [`Budget`]: sum type over explicit, adaptive, and resolved states.
//! - [`AdaptiveProfile`]: intent profiles with fixed resolution
//!   multipliers.
//! - [`BudgetLimits`]: optional ceilings per resource axis, with advisory
//!   [`BudgetLimits::validate`] warnings.
//! - [`MeasuredBaseline`]: the one-time device measurement an adaptive
//!   profile resolves against.
//! - [`BudgetViolation`] / [`ConstraintKind`]: the advisory event emitted
//!   when a measured value exceeds a ceiling.
//!
//! Everything here is deterministic: resolving the same profile against
//! the same baseline twice yields identical limits, which device-parity
//! tests rely on.

mod baseline;
mod budget;
mod error;
mod limits;
mod profile;
mod violation;

pub use baseline::MeasuredBaseline;
pub use budget::Budget;
pub use error::BudgetError;
pub use limits::{
    BudgetLimits, BudgetWarning, MIN_REALISTIC_DRAIN_PER_10MIN, MIN_REALISTIC_MEMORY_MB,
    MIN_REALISTIC_P95_MS,
};
pub use profile::AdaptiveProfile;
pub use violation::{BudgetViolation, ConstraintKind};
