// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-gov status` command: display the effective governor state.
//!
//! The supervisor is host-fed (the embedding process pushes sensor
//! readings), so outside a running host this shows the configuration,
//! the initial budget, and fresh tracker windows, not live hardware.

use std::path::PathBuf;

use scheduler::SchedulerConfig;

pub async fn execute(config_path: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (config, source) = match &config_path {
        Some(path) => (
            SchedulerConfig::from_file(path)?,
            path.display().to_string(),
        ),
        None => (SchedulerConfig::default(), "built-in defaults".to_string()),
    };
    let budget = config.initial_budget()?;

    if json {
        let payload = serde_json::json!({
            "source": source,
            "config": config,
            "budget": budget,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              edge-gov · Governor Status             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Config source: {source}");
    println!();

    // ── Trackers ───────────────────────────────────────────────
    println!("  Trackers");
    println!("   Latency window:   {} samples", config.latency_window);
    println!(
        "   Battery window:   {} samples / {} s",
        config.battery_window, config.battery_window_secs,
    );
    println!("   Resource window:  {} samples", config.resource_window);
    println!(
        "   Warm-up:          adaptive budgets resolve after {} latency samples",
        config.warm_up_threshold,
    );
    println!();

    // ── Budget ─────────────────────────────────────────────────
    println!("  Budget");
    match &budget {
        Some(b) => {
            println!("   Configured:   {b}");
            for warning in b.validate() {
                println!("   WARNING: {warning}");
            }
        }
        None => println!("   Configured:   none (host supplies one at runtime)"),
    }
    println!();

    // ── Policy ─────────────────────────────────────────────────
    println!("  Policy gates");
    println!(
        "   thermal_aware:            {}",
        on_off(config.policy.thermal_aware),
    );
    println!(
        "   throttle_on_battery:      {}",
        on_off(config.policy.throttle_on_battery),
    );
    println!(
        "   adaptive_memory:          {}",
        on_off(config.policy.adaptive_memory),
    );
    println!(
        "   background_optimization:  {}",
        on_off(config.policy.background_optimization),
    );
    println!();

    // ── Telemetry ──────────────────────────────────────────────
    println!("  Telemetry history caps");
    println!("   Latency records:  {}", config.history.latency);
    println!("   Violations:       {}", config.history.violations);
    println!("   Usage snapshots:  {}", config.history.snapshots);
    println!();

    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
