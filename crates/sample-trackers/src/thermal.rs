// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Device thermal level tracking with change notifications.
//!
//! Platform sensor bridges map their native thermal API onto a small
//! integer scale and push it here via [`ThermalMonitor::update_level`]:
//!
//! | Level | Meaning                                    |
//! |-------|--------------------------------------------|
//! | `-1`  | Platform exposes no thermal state          |
//! | `0`   | Nominal                                    |
//! | `1`   | Fair (slightly elevated)                   |
//! | `2`   | Serious (sustained pressure, throttle)     |
//! | `3`   | Critical (imminent forced shutdown range)  |
//!
//! Unlike the other trackers this one keeps no window: the platform signal
//! is already a debounced state, so only the current level matters.
//! Registered listeners fire on level *changes* only, and a panicking
//! listener is caught and logged so its siblings still run.

use std::panic::{self, AssertUnwindSafe};

/// Thermal level meaning "the platform reports no thermal state".
pub const THERMAL_UNSUPPORTED: i32 = -1;

/// Lowest level at which sustained throttling is advised.
pub const THERMAL_SERIOUS: i32 = 2;

/// Level at which the device is near forced shutdown.
pub const THERMAL_CRITICAL: i32 = 3;

/// Callback invoked with the new level after a change.
pub type ThermalListener = Box<dyn FnMut(i32) + Send>;

/// Opaque handle for removing a registered thermal listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThermalListenerHandle(u64);

/// Tracks the current device thermal level and notifies on changes.
pub struct ThermalMonitor {
    level: i32,
    listeners: Vec<(ThermalListenerHandle, ThermalListener)>,
    next_handle: u64,
}

impl ThermalMonitor {
    /// Creates a monitor with no thermal data yet (level `-1`).
    pub fn new() -> Self {
        Self {
            level: THERMAL_UNSUPPORTED,
            listeners: Vec::new(),
            next_handle: 0,
        }
    }

    /// The current thermal level.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Returns `true` if the platform has reported a thermal state.
    pub fn is_supported(&self) -> bool {
        self.level >= 0
    }

    /// Returns `true` at level 2 (serious) or above.
    pub fn should_throttle(&self) -> bool {
        self.level >= THERMAL_SERIOUS
    }

    /// Returns `true` at level 3 (critical) or above.
    pub fn is_critical(&self) -> bool {
        self.level >= THERMAL_CRITICAL
    }

    /// Records a new thermal level from a sensor bridge.
    ///
    /// This is the only mutator. Listeners fire only when the level
    /// actually changes, not on every update.
    pub fn update_level(&mut self, level: i32) {
        if level == self.level {
            return;
        }
        self.level = level;
        self.notify(level);
    }

    /// Registers a change listener; returns a handle for removal.
    pub fn on_change<F>(&mut self, listener: F) -> ThermalListenerHandle
    where
        F: FnMut(i32) + Send + 'static,
    {
        let handle = ThermalListenerHandle(self.next_handle);
        self.next_handle += 1;
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Removes a listener. Returns `false` if the handle is unknown.
    pub fn remove_listener(&mut self, handle: ThermalListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Invokes every listener in registration order, isolating panics.
    ///
    /// A panicking listener must not take down its siblings or the caller.
    fn notify(&mut self, level: i32) {
        for (handle, listener) in &mut self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(level)));
            if let Err(payload) = outcome {
                tracing::warn!(
                    level,
                    listener = handle.0,
                    detail = panic_text(payload.as_ref()),
                    "thermal listener panicked; remaining listeners still run"
                );
            }
        }
    }

    /// Clears the thermal state back to "no data".
    ///
    /// Listener registrations survive a reset; no change notification is
    /// fired for the cleared level.
    pub fn reset(&mut self) {
        self.level = THERMAL_UNSUPPORTED;
    }

    /// Computes a serializable snapshot of the current state.
    pub fn stats(&self) -> ThermalStats {
        ThermalStats {
            level: self.level,
            should_throttle: self.should_throttle(),
            is_critical: self.is_critical(),
        }
    }
}

impl Default for ThermalMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThermalMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermalMonitor")
            .field("level", &self.level)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Human-readable name for a thermal level.
pub fn thermal_level_name(level: i32) -> &'static str {
    match level {
        i32::MIN..=-1 => "unsupported",
        0 => "nominal",
        1 => "fair",
        2 => "serious",
        _ => "critical",
    }
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

/// Point-in-time thermal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ThermalStats {
    /// Current level (`-1` when unsupported).
    pub level: i32,
    /// Level is serious or worse.
    pub should_throttle: bool,
    /// Level is critical.
    pub is_critical: bool,
}

impl ThermalStats {
    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!("level {} ({})", self.level, thermal_level_name(self.level))
    }
}
