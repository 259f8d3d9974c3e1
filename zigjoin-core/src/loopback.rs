//! Scripted in-process coordinator.
//!
//! Answers every command from a [`LoopbackScript`] and pushes the scripted
//! unsolicited frames through its own [`CallbackRegistry`] once a join is
//! accepted. Used by `zigjoinctl simulate` and by the workspace tests.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use tracing::debug;
use zigjoin_model::{
    ChannelMask, JoinParameters, NetworkState, NodeRole, ScanResult, ScanType,
    StackConfig, StackStatus, UnsolicitedFrame,
};

use crate::{
    driver::{CallbackRegistry, CoordinatorDriver, UnsolicitedDispatcher},
    error::Result,
};

/// When scripted frames reach the registry relative to the join command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDelivery {
    /// Dispatched synchronously while the join command is still executing,
    /// before its response is returned.
    Inline,
    /// Dispatched from a spawned task after the delay.
    Deferred(Duration),
}

impl Default for FrameDelivery {
    fn default() -> Self {
        FrameDelivery::Deferred(Duration::from_millis(20))
    }
}

/// Canned answers for a [`LoopbackCoordinator`].
#[derive(Debug, Clone)]
pub struct LoopbackScript {
    pub initial_state: NetworkState,
    pub network_init_status: StackStatus,
    pub scan_results: Vec<ScanResult>,
    pub join_status: StackStatus,
    /// Frames emitted after an accepted join.
    pub frames_after_join: Vec<UnsolicitedFrame>,
    pub delivery: FrameDelivery,
}

impl LoopbackScript {
    /// A chip without a network that joins successfully and reports
    /// `NetworkUp`.
    pub fn new(scan_results: Vec<ScanResult>) -> Self {
        Self {
            initial_state: NetworkState::NoNetwork,
            network_init_status: StackStatus::NotJoined,
            scan_results,
            join_status: StackStatus::Success,
            frames_after_join: vec![UnsolicitedFrame::stack_status(
                StackStatus::NetworkUp,
            )],
            delivery: FrameDelivery::default(),
        }
    }

    pub fn initial_state(mut self, state: NetworkState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn join_status(mut self, status: StackStatus) -> Self {
        self.join_status = status;
        self
    }

    pub fn frames(mut self, frames: Vec<UnsolicitedFrame>) -> Self {
        self.frames_after_join = frames;
        self
    }

    pub fn delivery(mut self, delivery: FrameDelivery) -> Self {
        self.delivery = delivery;
        self
    }
}

/// Command observed by a [`LoopbackCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    StartupReset,
    WriteConfig(StackConfig),
    NetworkState,
    NetworkInit,
    StartScan {
        scan_type: ScanType,
        channels: ChannelMask,
        duration: u8,
    },
    JoinNetwork {
        role: NodeRole,
        params: JoinParameters,
        /// Registry subscribers at the moment the command arrived.
        subscribers: usize,
    },
}

#[derive(Debug)]
pub struct LoopbackCoordinator {
    registry: Arc<CallbackRegistry>,
    script: LoopbackScript,
    calls: Mutex<Vec<DriverCall>>,
}

impl LoopbackCoordinator {
    pub fn new(script: LoopbackScript) -> Self {
        Self {
            registry: Arc::new(CallbackRegistry::new()),
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.record_lock().clone()
    }

    fn record(&self, call: DriverCall) {
        self.record_lock().push(call);
    }

    fn record_lock(&self) -> std::sync::MutexGuard<'_, Vec<DriverCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit_frames(&self) {
        let frames = self.script.frames_after_join.clone();
        if frames.is_empty() {
            debug!("loopback script emits no frames after join");
            return;
        }

        match self.script.delivery {
            FrameDelivery::Inline => {
                for frame in &frames {
                    self.registry.dispatch(frame);
                }
            }
            FrameDelivery::Deferred(delay) => {
                let registry = Arc::clone(&self.registry);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    for frame in &frames {
                        registry.dispatch(frame);
                    }
                });
            }
        }
    }
}

#[async_trait]
impl CoordinatorDriver for LoopbackCoordinator {
    async fn startup_reset(&self) -> Result<()> {
        self.record(DriverCall::StartupReset);
        Ok(())
    }

    async fn write_config(&self, config: &StackConfig) -> Result<()> {
        self.record(DriverCall::WriteConfig(config.clone()));
        Ok(())
    }

    async fn network_state(&self) -> Result<NetworkState> {
        self.record(DriverCall::NetworkState);
        Ok(self.script.initial_state)
    }

    async fn network_init(&self) -> Result<StackStatus> {
        self.record(DriverCall::NetworkInit);
        Ok(self.script.network_init_status)
    }

    async fn start_scan(
        &self,
        scan_type: ScanType,
        channels: ChannelMask,
        duration: u8,
    ) -> Result<Vec<ScanResult>> {
        self.record(DriverCall::StartScan {
            scan_type,
            channels,
            duration,
        });
        Ok(self
            .script
            .scan_results
            .iter()
            .filter(|result| channels.contains(result.network.channel))
            .cloned()
            .collect())
    }

    async fn join_network(
        &self,
        role: NodeRole,
        params: JoinParameters,
    ) -> Result<StackStatus> {
        self.record(DriverCall::JoinNetwork {
            role,
            params,
            subscribers: self.registry.subscriber_count(),
        });

        if self.script.join_status.is_success() {
            self.emit_frames();
        }
        Ok(self.script.join_status)
    }

    fn dispatcher(&self) -> Arc<dyn UnsolicitedDispatcher> {
        self.registry.clone()
    }
}
