// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-gov simulate` command: drive the supervisor with synthetic load.
//!
//! Submits a mix of workloads while feeding generated battery, thermal,
//! and memory readings, then prints the warm-up transition, violations
//! as they fire, and the closing policy decision. Sensor time is
//! compressed: readings that would arrive minutes apart on a device are
//! pushed milliseconds apart here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use budget_model::{AdaptiveProfile, Budget};
use policy_enforcer::PolicyEnforcer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scheduler::{InferenceScheduler, SchedulerConfig, TaskPriority, WorkloadKind};
use telemetry_sink::InMemorySink;

pub async fn execute(
    config_path: Option<PathBuf>,
    tasks: usize,
    profile: String,
    workload: Option<String>,
    seed: Option<u64>,
    stress: bool,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               edge-gov · Simulation                 ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Configuration ──────────────────────────────────────────
    let config = match &config_path {
        Some(path) => SchedulerConfig::from_file(path)?,
        None => SchedulerConfig::default(),
    };
    let only: Option<WorkloadKind> = workload.as_deref().map(str::parse).transpose()?;
    let budget = match config.initial_budget()? {
        Some(b) => b,
        None => Budget::adaptive(profile.parse::<AdaptiveProfile>()?),
    };
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    println!("  Tasks:    {tasks}");
    println!("  Budget:   {budget}");
    println!(
        "  Workload: {}",
        only.map_or_else(|| "mixed".to_string(), |k| k.to_string()),
    );
    println!("  Stress:   {}", if stress { "ramping" } else { "off" });
    println!("  Seed:     {seed}");
    println!();

    let sink = Arc::new(InMemorySink::new());
    let mut sched = InferenceScheduler::new(config, sink.clone());
    tracing::debug!(seed, tasks, "synthetic session starting");
    sched.set_compute_budget(budget);
    sched.on_budget_violation(|v| {
        println!(
            "   !! {} {:.1} over budget {:.1} ({})",
            v.constraint.name(),
            v.current_value,
            v.budget_value,
            v.mitigation,
        );
    });

    // ── Synthetic Session ──────────────────────────────────────
    //
    // Battery drains linearly, thermal ramps under stress, and RSS
    // random-walks upward. Each task sleeps for a per-workload base
    // duration with jitter.
    let mut battery = 1.0_f64;
    let battery_step = if stress { 0.85 } else { 0.04 } / tasks.max(1) as f64;
    let mut rss_mb = 1800.0_f64;
    let mut announced_warm_up = false;

    for i in 0..tasks {
        battery = (battery - battery_step).max(0.05);
        sched.record_battery_level(battery);

        let thermal = if stress {
            ((4 * i) / tasks.max(1)).min(3) as i32
        } else if rng.gen_bool(0.1) {
            1
        } else {
            0
        };
        sched.update_thermal_level(thermal);

        rss_mb = (rss_mb + rng.gen_range(-20.0..30.0) + if stress { 8.0 } else { 0.0 }).max(500.0);
        sched.record_rss_mb(rss_mb);

        let kind = only
            .unwrap_or_else(|| WorkloadKind::ALL[rng.gen_range(0..WorkloadKind::ALL.len())]);
        let priority = TaskPriority::ALL[rng.gen_range(0..TaskPriority::ALL.len())];
        let stress_factor = 1.0 + if stress { i as f64 / tasks.max(1) as f64 } else { 0.0 };
        let sleep_ms = (base_sleep_ms(kind) as f64 * rng.gen_range(0.75..1.25) * stress_factor)
            .round() as u64;

        let started = Instant::now();
        sched
            .schedule_task(priority, kind, move || async move {
                tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
                Ok::<_, std::convert::Infallible>(())
            })
            .await?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        println!(
            "  #{:<3} {:<21} {:<7} {:>7.1}ms  battery={:.0}% thermal={}",
            i + 1,
            kind.as_str(),
            priority.as_str(),
            elapsed_ms,
            battery * 100.0,
            thermal,
        );

        if !announced_warm_up && sched.is_warmed_up() {
            announced_warm_up = true;
            println!();
            println!("  Warm-up complete after {} tasks.", i + 1);
            if let Some(resolved) = sched.compute_budget() {
                println!("   Budget: {resolved}");
            }
            println!();
        }
    }
    println!();

    // ── Session Summary ────────────────────────────────────────
    println!("  Session");
    println!("   {}", sched.queue_status().summary());
    println!("   {}", sched.latency_tracker().stats().summary());
    println!("   {}", sched.battery_tracker().stats().summary());
    println!("   {}", sched.thermal_monitor().stats().summary());
    println!("   {}", sched.resource_monitor().stats().summary());
    println!();

    // ── Policy Decision ────────────────────────────────────────
    let enforcer = PolicyEnforcer::new(sched.config().policy);
    let readings = sched.signal_readings();
    let decision = enforcer.evaluate(&readings);

    println!("  Policy");
    println!("   {}", decision.summary());
    println!(
        "   Priority multiplier: {:.2}",
        enforcer.priority_multiplier(&readings),
    );
    if enforcer.should_defer_background(&decision) {
        println!("   Background work: deferred");
    }
    println!();

    // ── Telemetry ──────────────────────────────────────────────
    println!("  Telemetry");
    println!("   {}", sink.summary());
    println!();
    println!("  Note: sensor time is compressed; drain rates reflect the");
    println!("  accelerated clock, not a real discharge curve.");
    println!();

    Ok(())
}

/// Base sleep duration per workload kind, before jitter and stress.
fn base_sleep_ms(kind: WorkloadKind) -> u64 {
    match kind {
        WorkloadKind::TextGeneration => 18,
        WorkloadKind::VisionDescription => 26,
        WorkloadKind::SpeechTranscription => 15,
        WorkloadKind::Embedding => 4,
        WorkloadKind::Maintenance => 8,
    }
}
