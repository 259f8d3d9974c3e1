use std::time::Duration;

use serde::{Deserialize, Serialize};
use zigjoin_model::{
    ChannelMask, NodeRole, STACK_STATUS_HANDLER, ScanType, StackConfig,
};

/// Knobs for one commissioning run.
///
/// All fields carry defaults so a config file only needs to name what it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionConfig {
    /// Channels visited by the active scan.
    pub channels: Vec<u8>,
    /// Scan duration exponent passed to the stack (0-14); each channel is
    /// listened to for roughly `(2^n + 1) * 15.36 ms`.
    pub scan_duration: u8,
    pub scan_type: ScanType,
    /// Role requested from the network.
    pub node_role: NodeRole,
    /// How long to wait for the stack status frame after the join command
    /// was accepted.
    pub join_timeout_ms: u64,
    /// Skip scanning and joining when the chip already reports a network.
    pub skip_if_joined: bool,
    /// Callback name carrying the join outcome.
    pub status_event: String,
    /// Stack configuration written right after the reset.
    pub stack_config: StackConfig,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            channels: vec![11],
            scan_duration: 3,
            scan_type: ScanType::Active,
            node_role: NodeRole::Router,
            join_timeout_ms: 30_000,
            skip_if_joined: true,
            status_event: STACK_STATUS_HANDLER.to_string(),
            stack_config: StackConfig::default(),
        }
    }
}

impl CommissionConfig {
    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    pub fn channel_mask(&self) -> ChannelMask {
        ChannelMask::from_channels(self.channels.iter().copied())
    }
}
