// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bos`: a thin CLI client over a running `bos-server`'s Public API
//! (spec.md §4.8).

mod client;
mod color;
mod commands;
mod exit_error;
mod output;

use clap::Parser;

use client::ApiClient;
use commands::admin::AdminArgs;
use commands::flags::FlagArgs;
use commands::health::HealthArgs;
use commands::journey::JourneyArgs;
use commands::ports::PortsArgs;
use exit_error::ExitError;
use output::OutputFormat;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser)]
#[command(name = "bos", version = VERSION, styles = color::styles())]
struct Cli {
    /// Base URL of the bos-server instance to talk to
    #[arg(long, env = "BOS_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run synthetic customer journeys
    Journey(JourneyArgs),
    /// Manage feature flags and chaos-policy overrides
    Flag(FlagArgs),
    /// Inspect and manage the service supervisor
    Admin(AdminArgs),
    /// Inspect and reclaim the allocated port table
    Ports(PortsArgs),
    /// Check server and subsystem liveness
    Health(HealthArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = ApiClient::new(cli.server_url);

    let result = match cli.command {
        Command::Journey(args) => commands::journey::handle(args.command, &client, cli.output).await,
        Command::Flag(args) => commands::flags::handle(args.command, &client, cli.output).await,
        Command::Admin(args) => commands::admin::handle(args.command, &client, cli.output).await,
        Command::Ports(args) => commands::ports::handle(args.command, &client, cli.output).await,
        Command::Health(args) => commands::health::handle(args.command, &client, cli.output).await,
    };

    if let Err(err) = result {
        let code = err.downcast_ref::<ExitError>().map(|e| e.code).unwrap_or(1);
        eprintln!("error: {err}");
        std::process::exit(code);
    }
}
