// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bos admin` command handlers (spec.md §4.4, §4.6, §4.8).

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::ApiClient;
use crate::color;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List every tracked service and the auto-load driver status per company
    Services,
    /// Show the healthy/unhealthy/starting/stopping rollup
    Status,
    /// Stop every tracked service (preserved infrastructure exempted)
    Reset,
}

pub async fn handle(command: AdminCommand, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match command {
        AdminCommand::Services => {
            let response = client.list_services().await?;
            format_or_json(format, &response, || {
                if response.services.is_empty() {
                    println!("No services tracked");
                } else {
                    for service in &response.services {
                        println!("{:<34} {:?}", color::literal(&service.service_name.to_string()), service.state);
                    }
                }
                if !response.autoload.is_empty() {
                    println!("\nAuto-load drivers:");
                    for (company, status) in &response.autoload {
                        println!("  {:<24} {:?}", color::header(company), status);
                    }
                }
            })?;
        }
        AdminCommand::Status => {
            let response = client.services_status().await?;
            format_or_json(format, &response, || {
                println!(
                    "total={} healthy={} unhealthy={} starting={} stopping={}",
                    response.total, response.healthy, response.unhealthy, response.starting, response.stopping
                );
            })?;
        }
        AdminCommand::Reset => {
            let response = client.reset_and_restart().await?;
            println!("Stopped {} service(s)", response.stopped);
        }
    }
    Ok(())
}
