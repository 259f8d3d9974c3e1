//! Single-shot bridge between the `stackStatusHandler` callback and an
//! awaiting join.
//!
//! [`StatusWaiter::register`] subscribes a filter callback on the driver's
//! dispatcher. The first matching frame resolves the waiter's
//! [`StatusHandle`]; later frames are ignored. Dropping the waiter, on any
//! path, removes the subscription and abandons a still-pending handle so its
//! awaiter observes [`JoinError::JoinAbandoned`] instead of hanging.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU8, Ordering},
    },
    task::{Context, Poll},
};

use tokio::sync::oneshot;
use tracing::{debug, error, trace, warn};
use zigjoin_model::{StackStatus, UnsolicitedFrame};

use crate::{
    driver::{SubscriptionToken, UnsolicitedCallback, UnsolicitedDispatcher},
    error::{JoinError, Result},
};

const PENDING: u8 = 0;
const RESOLVED: u8 = 1;
const ABANDONED: u8 = 2;

/// Observable state of a [`StatusWaiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterState {
    Registered,
    Resolved,
    Abandoned,
}

/// Resolve-once slot. The state word is the authority: whichever caller
/// moves it away from `PENDING` first owns the sender.
struct ResolveOnce {
    state: AtomicU8,
    sender: Mutex<Option<oneshot::Sender<StackStatus>>>,
}

impl ResolveOnce {
    fn new(sender: oneshot::Sender<StackStatus>) -> Self {
        Self {
            state: AtomicU8::new(PENDING),
            sender: Mutex::new(Some(sender)),
        }
    }

    /// `Ok(true)` when this call delivered the status, `Ok(false)` when the
    /// slot was already settled.
    fn resolve(&self, status: StackStatus) -> Result<bool> {
        if self
            .state
            .compare_exchange(
                PENDING,
                RESOLVED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Ok(false);
        }

        let sender = self.take_sender();
        match sender {
            Some(sender) => {
                if sender.send(status).is_err() {
                    debug!(%status, "status handle dropped before resolution");
                }
                Ok(true)
            }
            None => Err(JoinError::DuplicateResolution),
        }
    }

    fn abandon(&self) -> bool {
        if self
            .state
            .compare_exchange(
                PENDING,
                ABANDONED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return false;
        }
        drop(self.take_sender());
        true
    }

    fn state(&self) -> WaiterState {
        match self.state.load(Ordering::Acquire) {
            PENDING => WaiterState::Registered,
            RESOLVED => WaiterState::Resolved,
            _ => WaiterState::Abandoned,
        }
    }

    fn take_sender(&self) -> Option<oneshot::Sender<StackStatus>> {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Future resolving to the status delivered to a [`StatusWaiter`], or to
/// [`JoinError::JoinAbandoned`] once the waiter is dropped unresolved.
#[derive(Debug)]
pub struct StatusHandle {
    receiver: oneshot::Receiver<StackStatus>,
}

impl StatusHandle {
    /// Non-blocking check: `None` while still pending.
    pub fn try_status(&mut self) -> Option<Result<StackStatus>> {
        match self.receiver.try_recv() {
            Ok(status) => Some(Ok(status)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(Err(JoinError::JoinAbandoned))
            }
        }
    }
}

impl Future for StatusHandle {
    type Output = Result<StackStatus>;

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.map_err(|_| JoinError::JoinAbandoned))
    }
}

/// Scoped subscription waiting for one stack status frame.
pub struct StatusWaiter {
    dispatcher: Arc<dyn UnsolicitedDispatcher>,
    token: Option<SubscriptionToken>,
    slot: Arc<ResolveOnce>,
    handle: Option<StatusHandle>,
    event_name: Arc<str>,
}

impl fmt::Debug for StatusWaiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusWaiter")
            .field("event_name", &self.event_name)
            .field("token", &self.token)
            .field("state", &self.slot.state())
            .field("handle_attached", &self.handle.is_some())
            .finish()
    }
}

impl StatusWaiter {
    /// Subscribes on `dispatcher` for frames named `event_name`. Must be
    /// called before the command whose outcome it waits for is sent.
    pub fn register(
        dispatcher: Arc<dyn UnsolicitedDispatcher>,
        event_name: impl Into<Arc<str>>,
    ) -> Self {
        let (sender, receiver) = oneshot::channel();
        let slot = Arc::new(ResolveOnce::new(sender));
        let event_name: Arc<str> = event_name.into();

        let callback =
            status_callback(Arc::clone(&slot), Arc::clone(&event_name));
        let token = dispatcher.subscribe(callback);
        trace!(
            token = token.id(),
            event = %event_name,
            "status waiter registered"
        );

        Self {
            dispatcher,
            token: Some(token),
            slot,
            handle: Some(StatusHandle { receiver }),
            event_name,
        }
    }

    pub fn state(&self) -> WaiterState {
        self.slot.state()
    }

    pub fn token(&self) -> Option<SubscriptionToken> {
        self.token
    }

    /// Detaches the handle so it can be awaited elsewhere. The subscription
    /// stays tied to this waiter.
    pub fn take_handle(&mut self) -> Option<StatusHandle> {
        self.handle.take()
    }

    /// Waits for the status and releases the subscription. Dropping the
    /// returned future (for example on timeout) drops the waiter with it.
    pub async fn wait(mut self) -> Result<StackStatus> {
        match self.handle.take() {
            Some(handle) => handle.await,
            None => Err(JoinError::JoinAbandoned),
        }
    }
}

impl Drop for StatusWaiter {
    fn drop(&mut self) {
        // Settle the slot first so a dispatch racing the unsubscribe finds
        // it abandoned.
        if self.slot.abandon() {
            debug!(
                event = %self.event_name,
                "status waiter abandoned before any status arrived"
            );
        }
        if let Some(token) = self.token.take()
            && !self.dispatcher.unsubscribe(token)
        {
            warn!(
                token = token.id(),
                "status waiter subscription already gone"
            );
        }
    }
}

fn status_callback(
    slot: Arc<ResolveOnce>,
    event_name: Arc<str>,
) -> UnsolicitedCallback {
    Arc::new(move |frame: &UnsolicitedFrame| {
        if frame.name.as_str() != &*event_name {
            return;
        }
        let Some(status) = frame.single_status() else {
            warn!(
                event = %frame.name,
                args = ?frame.args,
                "status frame without a single status field"
            );
            return;
        };
        match slot.resolve(status) {
            Ok(true) => debug!(%status, "stack status received"),
            Ok(false) => {
                debug!(%status, "ignoring stack status after resolution")
            }
            Err(err) => error!(
                %status,
                error = %err,
                "status waiter invariant violated"
            ),
        }
    })
}
