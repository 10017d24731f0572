// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded, timestamp-ordered sample storage shared by every tracker.
//!
//! A [`SampleWindow`] holds `{value, timestamp}` pairs oldest-first and
//! evicts from the front on two conditions: a hard cap on sample count,
//! and (optionally) a maximum age relative to the newest sample. Both
//! checks run on every push, so the window is always within bounds and
//! never reorders.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A single timestamped measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// The recorded value, in whatever unit the owning tracker uses.
    pub value: f64,
    /// Monotonic instant at which the value was recorded.
    pub timestamp: Instant,
}

/// A bounded sliding window of [`Sample`]s, oldest-first.
///
/// Invariants:
/// - Samples are always in non-decreasing timestamp order. A push whose
///   timestamp precedes the newest stored sample is clamped to the newest
///   timestamp rather than inserted out of order.
/// - Eviction only removes from the front (oldest side).
/// - `len() <= max_samples` holds after every push.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    max_samples: usize,
    max_age: Option<Duration>,
}

impl SampleWindow {
    /// Creates a window bounded only by sample count.
    pub fn new(max_samples: usize) -> Self {
        Self::with_max_age(max_samples, None)
    }

    /// Creates a window bounded by both sample count and sample age.
    ///
    /// Age is measured against the newest sample in the window, not the
    /// wall clock, so a batch of replayed samples evicts deterministically.
    pub fn with_max_age(max_samples: usize, max_age: Option<Duration>) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples.min(256)),
            max_samples,
            max_age,
        }
    }

    /// Appends a sample stamped with the current instant.
    pub fn push(&mut self, value: f64) {
        self.push_at(value, Instant::now());
    }

    /// Appends a sample with an explicit timestamp.
    ///
    /// Sensor bridges that batch or replay readings use this; tests use it
    /// to build windows spanning minutes without sleeping.
    pub fn push_at(&mut self, value: f64, timestamp: Instant) {
        // Ordering invariant: never store a timestamp older than the back.
        let timestamp = match self.samples.back() {
            Some(newest) if timestamp < newest.timestamp => newest.timestamp,
            _ => timestamp,
        };
        self.samples.push_back(Sample { value, timestamp });
        self.evict(timestamp);
    }

    /// Drops expired and excess samples from the front.
    fn evict(&mut self, newest: Instant) {
        if let Some(max_age) = self.max_age {
            while let Some(front) = self.samples.front() {
                if newest.duration_since(front.timestamp) > max_age {
                    self.samples.pop_front();
                } else {
                    break;
                }
            }
        }
        while self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The oldest sample, if any.
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// The newest sample, if any.
    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Iterates samples oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Iterates sample values oldest-first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Sum of all sample values. Zero for an empty window.
    pub fn sum(&self) -> f64 {
        self.samples.iter().map(|s| s.value).sum()
    }

    /// Arithmetic mean of the window. Zero for an empty window.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum() / self.samples.len() as f64
    }

    /// Removes every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_cap() {
        let mut w = SampleWindow::new(3);
        for i in 0..10 {
            w.push(i as f64);
        }
        assert_eq!(w.len(), 3);
        let kept: Vec<f64> = w.values().collect();
        assert_eq!(kept, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_age_eviction_is_relative_to_newest() {
        let t0 = Instant::now();
        let mut w = SampleWindow::with_max_age(100, Some(Duration::from_secs(60)));
        w.push_at(1.0, t0);
        w.push_at(2.0, t0 + Duration::from_secs(30));
        // Third sample ages the first one out (90s > 60s window).
        w.push_at(3.0, t0 + Duration::from_secs(90));
        let kept: Vec<f64> = w.values().collect();
        assert_eq!(kept, vec![2.0, 3.0]);
    }

    #[test]
    fn test_out_of_order_timestamp_is_clamped() {
        let t0 = Instant::now();
        let mut w = SampleWindow::new(10);
        w.push_at(1.0, t0 + Duration::from_secs(10));
        w.push_at(2.0, t0); // Earlier than the newest sample.
        let stamps: Vec<Instant> = w.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps[0], stamps[1]);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn test_mean_of_empty_window_is_zero() {
        let w = SampleWindow::new(5);
        assert_eq!(w.mean(), 0.0);
        assert_eq!(w.sum(), 0.0);
        assert!(w.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut w = SampleWindow::new(5);
        w.push(1.0);
        w.push(2.0);
        w.clear();
        assert!(w.is_empty());
        assert!(w.oldest().is_none());
        assert!(w.newest().is_none());
    }
}
