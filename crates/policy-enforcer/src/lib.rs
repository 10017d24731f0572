// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # policy-enforcer
//!
//! Signal-driven throttle policy for the edge governor.
//!
//! Budget constraints say what the workload *promised*; this crate says
//! what the device can *currently bear*. It reads a point-in-time
//! [`SignalReadings`] snapshot (thermal level, battery level, memory
//! pressure), applies the gates in [`PolicyConfig`], and produces a
//! [`ThrottleDecision`] with a combined intensity factor.
//!
//! # Example
//!
//! ```
//! use policy_enforcer::{PolicyConfig, PolicyEnforcer, SignalReadings};
//!
//! let enforcer = PolicyEnforcer::new(PolicyConfig::default());
//! let readings = SignalReadings {
//!     thermal_level: 2,
//!     battery_level: Some(0.15),
//!     current_rss_mb: 400.0,
//!     peak_rss_mb: 1200.0,
//! };
//!
//! let decision = enforcer.evaluate(&readings);
//! assert!(decision.should_throttle);
//! assert!((decision.factor - 0.5 * 0.6).abs() < 1e-9);
//! ```

mod enforcer;
mod policy;
mod readings;

pub use enforcer::{PolicyEnforcer, ThrottleDecision};
pub use policy::PolicyConfig;
pub use readings::SignalReadings;
