// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bos flag` command handlers (spec.md §4.2, §4.8).

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use bos_core::{FlagName, FlagValue, ServiceName};

use crate::client::ApiClient;
use crate::color;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct FlagArgs {
    #[command(subcommand)]
    pub command: FlagCommand,
}

#[derive(Subcommand)]
pub enum FlagCommand {
    /// List the global flag set (or a service's effective set), plus the
    /// currently-running inventory
    List {
        /// Show the effective set for one service instead of the global set
        #[arg(long)]
        service: Option<String>,
    },
    /// Show one flag's value and default
    Get {
        /// Flag name, e.g. errors_per_transaction
        name: String,
        /// Show this service's effective value instead of the global one
        #[arg(long)]
        service: Option<String>,
    },
    /// Set a flag, globally or for one service
    Set {
        /// Flag name, e.g. cache_enabled
        name: String,
        /// New value: true/false, an integer, or a decimal
        value: String,
        /// Scope the change to one service instead of the global default
        #[arg(long)]
        service: Option<String>,
        /// Free-text reason recorded alongside the change
        #[arg(long)]
        reason: Option<String>,
    },
    /// Clear a flag's override, or reset its global default
    Delete {
        /// Flag name, e.g. slow_responses_enabled
        name: String,
        /// Clear only this service's override instead of resetting the global default
        #[arg(long)]
        service: Option<String>,
    },
    /// Clear every override held for one service
    DeleteService {
        /// Service name, e.g. CheckoutService-acme
        service: String,
    },
}

/// Parse a CLI-supplied value string into a [`FlagValue`], trying bool, then
/// integer, then real — the order [`bos_core::flags::validate`] expects for
/// well-formed input.
fn parse_flag_value(raw: &str) -> Result<FlagValue> {
    if let Ok(b) = raw.parse::<bool>() {
        return Ok(FlagValue::Bool(b));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(FlagValue::Int(i));
    }
    if let Ok(r) = raw.parse::<f64>() {
        return Ok(FlagValue::Real(r));
    }
    bail!("could not parse '{raw}' as a flag value (expected true/false, an integer, or a decimal)")
}

fn parse_flag_name(raw: &str) -> Result<FlagName> {
    FlagName::parse(raw).ok_or_else(|| anyhow::anyhow!("unknown feature flag: {raw}"))
}

pub async fn handle(command: FlagCommand, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match command {
        FlagCommand::List { service } => {
            let response = client.list_flags(service.as_deref()).await?;
            format_or_json(format, &response, || {
                for (name, value) in &response.flags {
                    println!("{:<34} {}", color::literal(&name.to_string()), format!("{value:?}"));
                }
                if !response.overrides.is_empty() {
                    println!("\nOverrides:");
                    for (service, overrides) in &response.overrides {
                        for (name, value) in overrides {
                            println!("  {:<20} {:<34} {}", color::header(&service.to_string()), name.to_string(), format!("{value:?}"));
                        }
                    }
                }
            })?;
        }
        FlagCommand::Get { name, service } => {
            let flag_name = parse_flag_name(&name)?;
            let response = client.get_flag(flag_name, service.as_deref()).await?;
            format_or_json(format, &response, || {
                println!("{}: {:?} (default {:?})", response.name, response.value, response.default);
            })?;
        }
        FlagCommand::Set { name, value, service, reason } => {
            let flag_name = parse_flag_name(&name)?;
            let value = parse_flag_value(&value)?;
            let target_service = service.map(ServiceName::from);
            let response = client.put_flag(flag_name, value, target_service, reason).await?;
            println!("Set {} = {:?}", response.name, response.value);
        }
        FlagCommand::Delete { name, service } => {
            let flag_name = parse_flag_name(&name)?;
            client.delete_flag(flag_name, service.as_deref()).await?;
            match service {
                Some(service) => println!("Cleared override of {name} for {service}"),
                None => println!("Reset {name} to its default"),
            }
        }
        FlagCommand::DeleteService { service } => {
            client.delete_service_overrides(&service).await?;
            println!("Cleared every override for {service}");
        }
    }
    Ok(())
}
