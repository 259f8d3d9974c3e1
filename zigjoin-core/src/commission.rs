//! End-to-end commissioning: reset and configure the coordinator, scan,
//! pick a network and join it.

use std::{any::type_name, fmt};

use tracing::{Instrument, debug, info, info_span, trace, warn};
use zigjoin_model::{
    JoinParameters, NetworkDescriptor, NetworkState, StackStatus,
};

use crate::{
    config::CommissionConfig,
    driver::CoordinatorDriver,
    error::{JoinError, Result},
    join::{JoinOrchestrator, build_join_parameters, select_network},
};

/// What a commissioning run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionReport {
    /// Network state reported right after the reset.
    pub initial_state: NetworkState,
    /// The chip was already on a network and nothing was joined.
    pub already_joined: bool,
    /// Number of beacons returned by the scan.
    pub scanned: usize,
    pub network: Option<NetworkDescriptor>,
    pub parameters: Option<JoinParameters>,
    /// Final stack status; `NetworkUp` for a successful join.
    pub status: Option<StackStatus>,
}

pub struct Commissioner<'a, D: CoordinatorDriver + ?Sized> {
    driver: &'a D,
    config: CommissionConfig,
}

impl<D: CoordinatorDriver + ?Sized> fmt::Debug for Commissioner<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commissioner")
            .field("driver", &type_name::<D>())
            .field("config", &self.config)
            .finish()
    }
}

impl<'a, D: CoordinatorDriver + ?Sized> Commissioner<'a, D> {
    pub fn new(driver: &'a D, config: CommissionConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &CommissionConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<CommissionReport> {
        let span = info_span!(
            "commission",
            role = %self.config.node_role,
            channels = ?self.config.channels,
        );
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<CommissionReport> {
        self.driver.startup_reset().await?;
        debug!("coordinator reset");

        self.driver.write_config(&self.config.stack_config).await?;
        for (id, value) in self.config.stack_config.iter() {
            trace!(id, value, "stack config value");
        }
        debug!(
            entries = self.config.stack_config.len(),
            "stack configuration written"
        );

        let initial_state = self.driver.network_state().await?;
        info!(state = %initial_state, "network state after reset");
        if initial_state.is_joined() && self.config.skip_if_joined {
            info!("coordinator already on a network; skipping join");
            return Ok(CommissionReport {
                initial_state,
                already_joined: true,
                scanned: 0,
                network: None,
                parameters: None,
                status: None,
            });
        }

        let init_status = self.driver.network_init().await?;
        match init_status {
            StackStatus::Success | StackStatus::NotJoined => {
                debug!(status = %init_status, "network init")
            }
            other => warn!(status = %other, "unexpected network init status"),
        }

        let mask = self.config.channel_mask();
        let results = self
            .driver
            .start_scan(self.config.scan_type, mask, self.config.scan_duration)
            .await?;
        info!(%mask, found = results.len(), "scan finished");

        let network = select_network(&results)?;
        let parameters = build_join_parameters(&network);

        let orchestrator = JoinOrchestrator::new(self.driver)
            .with_status_event(self.config.status_event.as_str());
        let timeout = self.config.join_timeout();
        let outcome = match tokio::time::timeout(
            timeout,
            orchestrator.join_with_parameters(
                self.config.node_role,
                parameters.clone(),
            ),
        )
        .await
        {
            Ok(outcome) => outcome?,
            Err(_) => {
                warn!(
                    timeout_ms = self.config.join_timeout_ms,
                    "no stack status before the join timeout"
                );
                return Err(JoinError::JoinAbandoned);
            }
        };

        let status = outcome.into_result()?;
        if status != StackStatus::NetworkUp {
            return Err(JoinError::NetworkNotUp(status));
        }

        info!(
            pan_id = network.pan_id,
            channel = network.channel,
            "joined network"
        );
        Ok(CommissionReport {
            initial_state,
            already_joined: false,
            scanned: results.len(),
            network: Some(network),
            parameters: Some(parameters),
            status: Some(status),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::{Sequence, predicate::eq};
    use zigjoin_model::{
        ChannelMask, ExtendedPanId, ScanResult, ScanType, UnsolicitedFrame,
    };

    use super::*;
    use crate::driver::{
        CallbackRegistry, MockCoordinatorDriver, UnsolicitedDispatcher,
    };

    fn beacon(pan_id: u16, allowing_join: bool, rssi: i8) -> ScanResult {
        ScanResult::new(
            NetworkDescriptor {
                extended_pan_id: ExtendedPanId::from(u64::from(pan_id) << 8),
                pan_id,
                channel: 11,
                nwk_update_id: 0,
                allowing_join,
                stack_profile: 2,
            },
            200,
            rssi,
        )
    }

    fn config() -> CommissionConfig {
        CommissionConfig {
            join_timeout_ms: 200,
            stack_config: zigjoin_model::StackConfig::new()
                .with("CONFIG_STACK_PROFILE", 2),
            ..CommissionConfig::default()
        }
    }

    #[tokio::test]
    async fn runs_the_script_in_order() {
        let registry = Arc::new(CallbackRegistry::new());
        let shared: Arc<dyn UnsolicitedDispatcher> = registry.clone();
        let mut driver = MockCoordinatorDriver::new();
        let mut seq = Sequence::new();

        driver
            .expect_startup_reset()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        driver
            .expect_write_config()
            .withf(|config| config.get("CONFIG_STACK_PROFILE") == Some(2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        driver
            .expect_network_state()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(NetworkState::NoNetwork));
        driver
            .expect_network_init()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(StackStatus::NotJoined));
        driver
            .expect_start_scan()
            .with(eq(ScanType::Active), eq(ChannelMask(1 << 11)), eq(3u8))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| {
                Ok(vec![beacon(0xA, false, -40), beacon(0xB, true, -60)])
            });
        driver
            .expect_dispatcher()
            .returning(move || Arc::clone(&shared));
        let registry_ref = Arc::clone(&registry);
        driver
            .expect_join_network()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, params| {
                assert_eq!(params.pan_id, 0xB);
                let registry = Arc::clone(&registry_ref);
                tokio::spawn(async move {
                    registry.dispatch(&UnsolicitedFrame::stack_status(
                        StackStatus::NetworkUp,
                    ));
                });
                Ok(StackStatus::Success)
            });

        let report = Commissioner::new(&driver, config())
            .run()
            .await
            .expect("commission");

        assert!(!report.already_joined);
        assert_eq!(report.scanned, 2);
        assert_eq!(report.network.map(|network| network.pan_id), Some(0xB));
        assert_eq!(report.status, Some(StackStatus::NetworkUp));
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn skips_join_when_already_on_a_network() {
        let mut driver = MockCoordinatorDriver::new();
        driver.expect_startup_reset().returning(|| Ok(()));
        driver.expect_write_config().returning(|_| Ok(()));
        driver
            .expect_network_state()
            .returning(|| Ok(NetworkState::JoinedNetwork));
        driver.expect_network_init().never();
        driver.expect_start_scan().never();
        driver.expect_join_network().never();

        let report = Commissioner::new(&driver, config())
            .run()
            .await
            .expect("commission");
        assert!(report.already_joined);
        assert_eq!(report.initial_state, NetworkState::JoinedNetwork);
    }

    #[tokio::test]
    async fn empty_scan_fails_before_joining() {
        let mut driver = MockCoordinatorDriver::new();
        driver.expect_startup_reset().returning(|| Ok(()));
        driver.expect_write_config().returning(|_| Ok(()));
        driver
            .expect_network_state()
            .returning(|| Ok(NetworkState::NoNetwork));
        driver
            .expect_network_init()
            .returning(|| Ok(StackStatus::NotJoined));
        driver.expect_start_scan().returning(|_, _, _| Ok(vec![]));
        driver.expect_join_network().never();

        let err = Commissioner::new(&driver, config()).run().await.unwrap_err();
        assert_eq!(err, JoinError::NoJoinableNetwork);
    }

    #[tokio::test]
    async fn reset_failure_propagates() {
        let mut driver = MockCoordinatorDriver::new();
        driver
            .expect_startup_reset()
            .returning(|| Err(JoinError::Driver("no response to RST".into())));
        driver.expect_write_config().never();

        let err = Commissioner::new(&driver, config()).run().await.unwrap_err();
        assert_eq!(err, JoinError::Driver("no response to RST".into()));
    }
}
