//! `zigjoinctl`: inspect scan dumps and rehearse the join workflow against a
//! scripted coordinator.

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zigjoin_model::{NodeRole, StackStatus};

mod commands;

#[derive(Parser)]
#[command(
    name = "zigjoinctl",
    version,
    about = "Zigbee coordinator join tooling"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the 32-bit channel mask for a set of 2.4 GHz channels
    Mask {
        #[arg(
            required = true,
            value_parser = clap::value_parser!(u8).range(11..=26)
        )]
        channels: Vec<u8>,
    },
    /// Pick the network a join would target from a scan dump
    Select {
        /// JSON array of scan results
        #[arg(long)]
        scan: PathBuf,
    },
    /// Show the join parameters derived from a scan dump
    Plan {
        #[arg(long)]
        scan: PathBuf,
    },
    /// Run the full commissioning workflow against a loopback coordinator
    Simulate(SimulateArgs),
    /// Print the effective configuration and where it was loaded from
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// JSON array of scan results the coordinator reports
    #[arg(long)]
    scan: PathBuf,
    /// Immediate status returned by the join command
    #[arg(long, default_value = "success")]
    immediate: StackStatus,
    /// Stack status carried by the unsolicited callback
    #[arg(long, default_value = "network_up", conflicts_with = "no_event")]
    event: StackStatus,
    /// Never deliver the stack status callback
    #[arg(long)]
    no_event: bool,
    /// Deliver the callback while the join command is still executing
    #[arg(long)]
    inline: bool,
    /// Override the configured join timeout (e.g. 500ms, 30s)
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,
    /// Override the configured scan channels
    #[arg(
        long = "channel",
        value_parser = clap::value_parser!(u8).range(11..=26)
    )]
    channels: Vec<u8>,
    /// Override the configured node role
    #[arg(long)]
    role: Option<NodeRole>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Mask { channels } => commands::mask(&channels),
        Command::Select { scan } => commands::select(&scan),
        Command::Plan { scan } => commands::plan(&scan),
        Command::Simulate(args) => commands::simulate(args.into()).await,
        Command::Config { config } => commands::show_config(config.as_deref()),
    }
}

impl From<SimulateArgs> for commands::SimulateOptions {
    fn from(args: SimulateArgs) -> Self {
        Self {
            scan: args.scan,
            immediate: args.immediate,
            event: (!args.no_event).then_some(args.event),
            inline: args.inline,
            timeout: args.timeout,
            channels: args.channels,
            role: args.role,
            config: args.config,
        }
    }
}
