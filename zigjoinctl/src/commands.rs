use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};
use zigjoin_config::Config;
use zigjoin_core::{
    commission::{CommissionReport, Commissioner},
    join::{build_join_parameters, select_network},
    loopback::{FrameDelivery, LoopbackCoordinator, LoopbackScript},
};
use zigjoin_model::{
    ChannelMask, JoinParameters, NetworkDescriptor, NodeRole, ScanResult,
    StackStatus, UnsolicitedFrame,
};

#[derive(Debug)]
pub struct SimulateOptions {
    pub scan: PathBuf,
    pub immediate: StackStatus,
    /// `None` suppresses the status callback entirely.
    pub event: Option<StackStatus>,
    pub inline: bool,
    pub timeout: Option<Duration>,
    pub channels: Vec<u8>,
    pub role: Option<NodeRole>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationSummary {
    already_joined: bool,
    scanned: usize,
    network: Option<NetworkDescriptor>,
    parameters: Option<JoinParameters>,
    status: Option<StackStatus>,
}

impl From<CommissionReport> for SimulationSummary {
    fn from(report: CommissionReport) -> Self {
        Self {
            already_joined: report.already_joined,
            scanned: report.scanned,
            network: report.network,
            parameters: report.parameters,
            status: report.status,
        }
    }
}

pub fn mask(channels: &[u8]) -> Result<()> {
    let mask = ChannelMask::from_channels(channels.iter().copied());
    println!("{mask}");
    Ok(())
}

pub fn select(scan: &Path) -> Result<()> {
    let results = read_scan(scan)?;
    let network = select_network(&results)?;
    print_json(&network)
}

pub fn plan(scan: &Path) -> Result<()> {
    let results = read_scan(scan)?;
    let network = select_network(&results)?;
    print_json(&build_join_parameters(&network))
}

pub async fn simulate(options: SimulateOptions) -> Result<()> {
    let (mut config, source) = Config::load(options.config.as_deref())?;
    info!(%source, "loaded configuration");

    if let Some(timeout) = options.timeout {
        config.commission.join_timeout_ms =
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    }
    if !options.channels.is_empty() {
        config.commission.channels = options.channels.clone();
    }
    if let Some(role) = options.role {
        config.commission.node_role = role;
    }
    config.validate()?;

    let results = read_scan(&options.scan)?;
    let frames = match options.event {
        Some(status) => vec![UnsolicitedFrame::stack_status(status)],
        None => {
            warn!("status callback suppressed; the join will time out");
            Vec::new()
        }
    };
    let delivery = if options.inline {
        FrameDelivery::Inline
    } else {
        FrameDelivery::default()
    };
    let script = LoopbackScript::new(results)
        .join_status(options.immediate)
        .frames(frames)
        .delivery(delivery);
    let coordinator = LoopbackCoordinator::new(script);

    let report = Commissioner::new(&coordinator, config.commission)
        .run()
        .await
        .context("commissioning failed")?;

    print_json(&SimulationSummary::from(report))
}

pub fn show_config(path: Option<&Path>) -> Result<()> {
    let (config, source) = Config::load(path)?;
    if let Err(err) = config.validate() {
        warn!(%err, "configuration will be rejected by simulate");
    }
    println!("# source: {source}");
    print!("{}", config.to_toml()?);
    Ok(())
}

fn read_scan(path: &Path) -> Result<Vec<ScanResult>> {
    let raw = fs::read_to_string(path).with_context(|| {
        format!("failed to read scan dump {}", path.display())
    })?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid scan dump {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
