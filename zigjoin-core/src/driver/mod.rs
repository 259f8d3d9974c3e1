//! Collaborator surface consumed by the join workflow.
//!
//! A driver owns the connection to the coordinator chip: it turns commands
//! into request/response exchanges and hands every unsolicited callback
//! frame to its [`UnsolicitedDispatcher`]. Framing and transport live behind
//! these traits.

pub mod registry;

use std::sync::Arc;

use async_trait::async_trait;
use zigjoin_model::{
    ChannelMask, JoinParameters, NetworkState, NodeRole, ScanResult, ScanType,
    StackConfig, StackStatus, UnsolicitedFrame,
};

use crate::error::Result;

pub use registry::CallbackRegistry;

/// Callback invoked for every unsolicited frame. May run on any task or
/// thread, so it must not block.
pub type UnsolicitedCallback = Arc<dyn Fn(&UnsolicitedFrame) + Send + Sync>;

/// Handle identifying one subscription on a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub const fn new(id: u64) -> Self {
        SubscriptionToken(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Subscriber registry for unsolicited frames, owned by the connection.
pub trait UnsolicitedDispatcher: Send + Sync {
    fn subscribe(&self, callback: UnsolicitedCallback) -> SubscriptionToken;

    /// Removes exactly the subscription identified by `token`. Returns
    /// `false` when the token was unknown or already removed.
    fn unsubscribe(&self, token: SubscriptionToken) -> bool;
}

/// Request/response surface of a connected coordinator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoordinatorDriver: Send + Sync {
    async fn startup_reset(&self) -> Result<()>;

    async fn write_config(&self, config: &StackConfig) -> Result<()>;

    async fn network_state(&self) -> Result<NetworkState>;

    async fn network_init(&self) -> Result<StackStatus>;

    async fn start_scan(
        &self,
        scan_type: ScanType,
        channels: ChannelMask,
        duration: u8,
    ) -> Result<Vec<ScanResult>>;

    /// Issues the join command. The returned status only says whether the
    /// stack accepted the request; the outcome arrives later as a
    /// `stackStatusHandler` frame.
    async fn join_network(
        &self,
        role: NodeRole,
        params: JoinParameters,
    ) -> Result<StackStatus>;

    fn dispatcher(&self) -> Arc<dyn UnsolicitedDispatcher>;
}
