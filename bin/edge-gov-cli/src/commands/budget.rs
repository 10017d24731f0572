// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-gov budget` command: resolve or validate a compute budget.
//!
//! With `--profile`, resolves the adaptive profile against a
//! hypothetical baseline (what the warm-up transition would produce on
//! a device measuring those numbers). With explicit ceiling flags,
//! validates them and prints advisory warnings.

use budget_model::{AdaptiveProfile, Budget, BudgetLimits, MeasuredBaseline};

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    profile: Option<String>,
    baseline_p95: f64,
    baseline_drain: Option<f64>,
    baseline_thermal: i32,
    p95_latency: Option<f64>,
    battery_drain: Option<f64>,
    thermal_level: Option<i32>,
    memory_ceiling: Option<f64>,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             edge-gov · Budget Resolver              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let mut limits = BudgetLimits::none();
    if let Some(ms) = p95_latency {
        limits = limits.with_p95_latency_ms(ms);
    }
    if let Some(drain) = battery_drain {
        limits = limits.with_battery_drain_per_10min(drain);
    }
    if let Some(level) = thermal_level {
        limits = limits.with_max_thermal_level(level);
    }
    if let Some(mb) = memory_ceiling {
        limits = limits.with_memory_ceiling_mb(mb);
    }

    let budget = match (&profile, limits.is_empty()) {
        (Some(_), false) => {
            anyhow::bail!("--profile and explicit ceilings are mutually exclusive")
        }
        (None, true) => {
            anyhow::bail!("pass --profile or at least one explicit ceiling")
        }
        (Some(name), true) => {
            let profile: AdaptiveProfile = name.parse()?;
            let baseline = MeasuredBaseline {
                p95_latency_ms: baseline_p95,
                battery_drain_per_10min: baseline_drain,
                thermal_level: baseline_thermal,
                rss_mb: 0.0,
                sample_count: 0,
                captured_at_ms: epoch_ms(),
            };

            println!("  Baseline (hypothetical)");
            println!("   p95 latency:  {baseline_p95:.0} ms");
            match baseline_drain {
                Some(drain) => println!("   drain:        {drain:.2}%/10min"),
                None => println!("   drain:        not measured"),
            }
            println!("   thermal:      {baseline_thermal}");
            println!();

            // ── Profile Comparison ─────────────────────────────
            println!("  Ceilings each profile would produce at this baseline:");
            println!(
                "  {:<14} {:>9} {:>14} {:>8} {:>8}",
                "Profile", "p95 (ms)", "drain (%/10m)", "thermal", "memory",
            );
            println!("  {}", "-".repeat(58));
            for candidate in AdaptiveProfile::ALL {
                let resolved = candidate.resolve(&baseline);
                println!(
                    "  {:<14} {:>9} {:>14} {:>8} {:>8}",
                    candidate.name(),
                    resolved
                        .p95_latency_ms
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.0}")),
                    resolved
                        .battery_drain_per_10min
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
                    resolved
                        .max_thermal_level
                        .map_or_else(|| "-".to_string(), |v| v.to_string()),
                    resolved
                        .memory_ceiling_mb
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.0}")),
                );
            }
            println!();

            Budget::adaptive(profile).resolve(&baseline)
        }
        (None, false) => Budget::explicit(limits),
    };

    // ── Result ─────────────────────────────────────────────────
    println!("  Budget: {budget}");
    if budget
        .limits()
        .is_some_and(|l| l.memory_ceiling_mb.is_some())
    {
        println!("  Note: the memory ceiling is observe-only; breaches are");
        println!("  reported but cannot be mitigated.");
    }

    let warnings = budget.validate();
    if warnings.is_empty() {
        println!("  Validation: ok");
    } else {
        for warning in &warnings {
            println!("  WARNING: {warning}");
        }
    }
    println!();

    Ok(())
}

fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
