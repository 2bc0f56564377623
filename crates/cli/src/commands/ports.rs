// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bos ports` command handlers (spec.md §4.1, §4.8).

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::ApiClient;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct PortsArgs {
    #[command(subcommand)]
    pub command: PortsCommand,
}

#[derive(Subcommand)]
pub enum PortsCommand {
    /// List the allocated port table and the configured range
    List,
    /// Release ports held by services that are no longer alive
    Cleanup,
}

pub async fn handle(command: PortsCommand, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match command {
        PortsCommand::List => {
            let response = client.list_ports().await?;
            format_or_json(format, &response, || {
                println!("range: {}-{}", response.range_min, response.range_max);
                if response.allocations.is_empty() {
                    println!("No ports allocated");
                } else {
                    for allocation in &response.allocations {
                        println!("{:<6} {}", allocation.port, allocation.service_name);
                    }
                }
            })?;
        }
        PortsCommand::Cleanup => {
            let response = client.cleanup_ports().await?;
            println!("Released {} stale port(s)", response.released);
        }
    }
    Ok(())
}
