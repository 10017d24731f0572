// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # edge-gov
//!
//! Command-line interface for the edge-governor supervision workspace.
//!
//! ## Usage
//! ```bash
//! # Drive the supervisor with synthetic sensors and workloads
//! edge-gov simulate --tasks 60 --profile conservative --stress
//!
//! # Resolve an adaptive budget against a hypothetical baseline
//! edge-gov budget --profile balanced --baseline-p95 800
//!
//! # Show the effective governor configuration
//! edge-gov status --config governor.toml
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "edge-gov",
    about = "Adaptive resource-budget supervisor for on-device inference",
    version,
    author
)]
struct Cli {
    /// Path to a TOML governor configuration file.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the effective governor configuration and budget.
    Status {
        /// Emit machine-readable JSON instead of the table view.
        #[arg(long)]
        json: bool,
    },

    /// Drive the supervisor with synthetic sensor data and workloads.
    Simulate {
        /// Number of tasks to submit.
        #[arg(short, long, default_value_t = 40)]
        tasks: usize,

        /// Adaptive profile: conservative, balanced, performance.
        #[arg(short, long, default_value = "balanced")]
        profile: String,

        /// Restrict the mix to one workload kind (e.g., "text-generation").
        #[arg(short, long)]
        workload: Option<String>,

        /// Seed for the synthetic sensor generator (random when omitted).
        #[arg(long)]
        seed: Option<u64>,

        /// Ramp thermal and battery pressure over the run to provoke
        /// violations and throttling.
        #[arg(long)]
        stress: bool,
    },

    /// Resolve or validate a compute budget from flags.
    Budget {
        /// Adaptive profile to resolve: conservative, balanced, performance.
        #[arg(short, long)]
        profile: Option<String>,

        /// Hypothetical baseline p95 latency in milliseconds.
        #[arg(long, default_value_t = 800.0)]
        baseline_p95: f64,

        /// Hypothetical baseline battery drain, percent per ten minutes.
        #[arg(long)]
        baseline_drain: Option<f64>,

        /// Hypothetical baseline thermal level (-1 to 3).
        #[arg(long, default_value_t = 0)]
        baseline_thermal: i32,

        /// Explicit p95 latency ceiling in milliseconds.
        #[arg(long)]
        p95_latency: Option<f64>,

        /// Explicit battery drain ceiling, percent per ten minutes.
        #[arg(long)]
        battery_drain: Option<f64>,

        /// Explicit thermal level ceiling (0 to 3).
        #[arg(long)]
        thermal_level: Option<i32>,

        /// Explicit memory ceiling in megabytes (observe-only).
        #[arg(long)]
        memory_ceiling: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Status { json } => commands::status::execute(cli.config, json).await,
        Commands::Simulate {
            tasks,
            profile,
            workload,
            seed,
            stress,
        } => commands::simulate::execute(cli.config, tasks, profile, workload, seed, stress).await,
        Commands::Budget {
            profile,
            baseline_p95,
            baseline_drain,
            baseline_thermal,
            p95_latency,
            battery_drain,
            thermal_level,
            memory_ceiling,
        } => {
            commands::budget::execute(
                profile,
                baseline_p95,
                baseline_drain,
                baseline_thermal,
                p95_latency,
                battery_drain,
                thermal_level,
                memory_ceiling,
            )
            .await
        }
    }
}
