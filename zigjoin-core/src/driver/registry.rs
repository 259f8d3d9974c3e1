use std::{
    fmt,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::{trace, warn};
use zigjoin_model::UnsolicitedFrame;

use super::{SubscriptionToken, UnsolicitedCallback, UnsolicitedDispatcher};

/// In-process fan-out of unsolicited frames to the callbacks currently
/// subscribed. Each subscription is keyed by its own token, so removing one
/// never disturbs callbacks registered by unrelated operations.
#[derive(Default)]
pub struct CallbackRegistry {
    next_token: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionToken, UnsolicitedCallback)>>,
    frames_dispatched: AtomicU64,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("subscribers", &self.subscriber_count())
            .field(
                "frames_dispatched",
                &self.frames_dispatched.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_subscribed(&self, token: SubscriptionToken) -> bool {
        self.lock().iter().any(|(existing, _)| *existing == token)
    }

    /// Delivers `frame` to every current subscriber and returns how many
    /// callbacks saw it. The subscriber list is snapshotted first so a
    /// callback may unsubscribe without deadlocking.
    pub fn dispatch(&self, frame: &UnsolicitedFrame) -> usize {
        let snapshot: Vec<UnsolicitedCallback> = self
            .lock()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        self.frames_dispatched.fetch_add(1, Ordering::Relaxed);
        trace!(
            frame = %frame.name,
            subscribers = snapshot.len(),
            "dispatching unsolicited frame"
        );

        for callback in &snapshot {
            callback(frame);
        }
        snapshot.len()
    }

    fn lock(
        &self,
    ) -> MutexGuard<'_, Vec<(SubscriptionToken, UnsolicitedCallback)>> {
        // Callbacks run outside the lock, so a poisoned guard still holds a
        // consistent list.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl UnsolicitedDispatcher for CallbackRegistry {
    fn subscribe(&self, callback: UnsolicitedCallback) -> SubscriptionToken {
        let token = SubscriptionToken::new(
            self.next_token.fetch_add(1, Ordering::Relaxed) + 1,
        );
        self.lock().push((token, callback));
        trace!(token = token.id(), "callback subscribed");
        token
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut guard = self.lock();
        match guard.iter().position(|(existing, _)| *existing == token) {
            Some(idx) => {
                guard.remove(idx);
                trace!(token = token.id(), "callback unsubscribed");
                true
            }
            None => {
                warn!(token = token.id(), "unsubscribe for unknown token");
                false
            }
        }
    }
}
