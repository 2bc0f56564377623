// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bos journey` command handlers (spec.md §4.5, §4.8).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use bos_core::JourneySpec;
use bos_wire::SimulationOptions;

use crate::client::ApiClient;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct JourneyArgs {
    #[command(subcommand)]
    pub command: JourneyCommand,
}

#[derive(Subcommand)]
pub enum JourneyCommand {
    /// Run one customer through a journey spec
    Simulate {
        /// Path to a JSON-encoded journey spec
        journey_file: PathBuf,
        #[command(flatten)]
        options: SimulateOptionsArgs,
    },
    /// Run many concurrent customers through the same journey spec
    SimulateMultiple {
        /// Path to a JSON-encoded journey spec
        journey_file: PathBuf,
        /// Number of concurrent customers to simulate
        #[arg(long, default_value_t = 1)]
        customers: u32,
        #[command(flatten)]
        options: SimulateOptionsArgs,
    },
}

#[derive(Args)]
pub struct SimulateOptionsArgs {
    /// Run steps sequentially within the journey (rather than independently)
    #[arg(long)]
    chained: bool,
    /// Override the think-time between steps, in milliseconds
    #[arg(long)]
    think_time_ms: Option<u64>,
    /// Allow flag-driven chaos injection for this run
    #[arg(long)]
    error_simulation: bool,
}

impl From<SimulateOptionsArgs> for SimulationOptions {
    fn from(args: SimulateOptionsArgs) -> Self {
        SimulationOptions { chained: args.chained, think_time_ms: args.think_time_ms, error_simulation_enabled: Some(args.error_simulation) }
    }
}

fn load_journey(path: &std::path::Path) -> Result<JourneySpec> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading journey spec from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing journey spec from {}", path.display()))
}

pub async fn handle(command: JourneyCommand, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match command {
        JourneyCommand::Simulate { journey_file, options } => {
            let journey = load_journey(&journey_file)?;
            let result = client.simulate_journey(journey, options.into()).await?;
            format_or_json(format, &result, || {
                println!("journey {} -> {:?}", result.journey_id, result.status);
                for step in &result.steps {
                    println!("  {:<24} {:?}", step.step_name, step.status);
                }
            })?;
        }
        JourneyCommand::SimulateMultiple { journey_file, customers, options } => {
            let journey = load_journey(&journey_file)?;
            let response = client.simulate_multiple(journey, customers, options.into()).await?;
            format_or_json(format, &response, || {
                println!("{} customer outcome(s)", response.results.len());
                for (index, outcome) in response.results.iter().enumerate() {
                    match outcome {
                        bos_wire::JourneyOutcome::Result(result) => println!("  [{index}] {:?}", result.status),
                        bos_wire::JourneyOutcome::Error { message } => println!("  [{index}] error: {message}"),
                    }
                }
            })?;
        }
    }
    Ok(())
}
