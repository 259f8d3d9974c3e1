use std::{any::type_name, fmt, sync::Arc};

use tracing::{Instrument, debug, info, info_span, warn};
use zigjoin_model::{
    JoinParameters, NetworkDescriptor, NodeRole, STACK_STATUS_HANDLER,
    StackStatus,
};

use super::{params::build_join_parameters, waiter::StatusWaiter};
use crate::{
    driver::CoordinatorDriver,
    error::{JoinError, Result},
};

/// Terminal status of a single join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The join command itself was refused; no status frame was awaited.
    Rejected(StackStatus),
    /// The stack accepted the command and later reported this status.
    Completed(StackStatus),
}

impl JoinOutcome {
    pub fn status(&self) -> StackStatus {
        match self {
            JoinOutcome::Rejected(status) | JoinOutcome::Completed(status) => {
                *status
            }
        }
    }

    /// Turns a refused command into [`JoinError::ImmediateJoinFailure`].
    pub fn into_result(self) -> Result<StackStatus> {
        match self {
            JoinOutcome::Rejected(status) => {
                Err(JoinError::ImmediateJoinFailure(status))
            }
            JoinOutcome::Completed(status) => Ok(status),
        }
    }
}

/// Drives one join attempt against a connected coordinator.
///
/// The status waiter is registered strictly before the join command goes
/// out, so a status frame emitted while the command is still in flight is
/// never missed. The waiter is dropped, and its subscription removed, on
/// every exit path including cancellation of the returned future.
pub struct JoinOrchestrator<'a, D: CoordinatorDriver + ?Sized> {
    driver: &'a D,
    status_event: Arc<str>,
}

impl<D: CoordinatorDriver + ?Sized> fmt::Debug for JoinOrchestrator<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinOrchestrator")
            .field("driver", &type_name::<D>())
            .field("status_event", &self.status_event)
            .finish()
    }
}

impl<'a, D: CoordinatorDriver + ?Sized> JoinOrchestrator<'a, D> {
    pub fn new(driver: &'a D) -> Self {
        Self {
            driver,
            status_event: Arc::from(STACK_STATUS_HANDLER),
        }
    }

    /// Overrides the callback name that carries the join outcome.
    pub fn with_status_event(
        mut self,
        event_name: impl Into<Arc<str>>,
    ) -> Self {
        self.status_event = event_name.into();
        self
    }

    pub async fn join(
        &self,
        role: NodeRole,
        network: &NetworkDescriptor,
    ) -> Result<JoinOutcome> {
        self.join_with_parameters(role, build_join_parameters(network))
            .await
    }

    pub async fn join_with_parameters(
        &self,
        role: NodeRole,
        params: JoinParameters,
    ) -> Result<JoinOutcome> {
        let span = info_span!(
            "join",
            %role,
            pan_id = params.pan_id,
            extended_pan_id = %params.extended_pan_id,
            channel = params.radio_channel,
        );

        async move {
            let waiter = StatusWaiter::register(
                self.driver.dispatcher(),
                Arc::clone(&self.status_event),
            );

            let immediate = self.driver.join_network(role, params).await?;
            if !immediate.is_success() {
                warn!(status = %immediate, "join command rejected");
                return Ok(JoinOutcome::Rejected(immediate));
            }

            debug!("join command accepted; awaiting stack status");
            let status = waiter.wait().await?;
            info!(%status, "join attempt finished");
            Ok(JoinOutcome::Completed(status))
        }
        .instrument(span)
        .await
    }
}
