// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bos health` command handlers (spec.md §4.8).

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::ApiClient;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct HealthArgs {
    #[command(subcommand)]
    pub command: HealthCommand,
}

#[derive(Subcommand)]
pub enum HealthCommand {
    /// Show liveness and uptime
    Status,
    /// Show aggregated liveness across every owned subsystem
    Detailed,
}

pub async fn handle(command: HealthCommand, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match command {
        HealthCommand::Status => {
            let response = client.health().await?;
            format_or_json(format, &response, || {
                println!("{} (uptime {}s)", response.status, response.uptime_sec);
            })?;
        }
        HealthCommand::Detailed => {
            let response = client.health_detailed().await?;
            format_or_json(format, &response, || {
                println!("{} (uptime {}s)", response.status, response.uptime_sec);
                println!("services: {} healthy, {} unhealthy", response.services_healthy, response.services_unhealthy);
                println!("ports allocated: {}", response.ports_allocated);
                println!("event queue: depth={} dropped={} delivery_failed={}", response.event_queue_depth, response.event_queue_dropped, response.event_delivery_failed);
            })?;
        }
    }
    Ok(())
}
