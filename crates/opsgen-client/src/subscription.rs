//! Subscription handles and the cancellation registry

use crate::abort::{AbortHandle, AbortSignal};
use crate::response::ClientResponse;
use dashmap::DashMap;
use futures_util::Stream;
use opsgen_core::SubscriptionState;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Open subscriptions of one client, keyed by subscription id
pub(crate) type Registry = Arc<DashMap<u64, Registration>>;

/// Shared control block of one subscription
///
/// Held by the registry, the driving task, and the [`Subscription`] handle.
#[derive(Debug, Clone)]
pub(crate) struct Registration {
    abort: AbortHandle,
    state: Arc<Mutex<SubscriptionState>>,
}

impl Registration {
    pub(crate) fn new() -> Self {
        Self {
            abort: AbortHandle::new(),
            state: Arc::new(Mutex::new(SubscriptionState::Pending)),
        }
    }

    pub(crate) fn state(&self) -> SubscriptionState {
        *self.state.lock()
    }

    /// Apply `target` if the state machine allows it
    pub(crate) fn transition(&self, target: SubscriptionState) -> bool {
        let mut state = self.state.lock();
        if state.can_transition_to(target) {
            *state = target;
            true
        } else {
            false
        }
    }

    /// Mark canceled before waking the task, so readers stop immediately
    pub(crate) fn cancel(&self) {
        self.transition(SubscriptionState::Canceled);
        self.abort.abort();
    }

    pub(crate) fn signal(&self) -> AbortSignal {
        self.abort.signal()
    }
}

/// A lazy, non-restartable sequence of operation responses
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    operation: String,
    receiver: mpsc::Receiver<ClientResponse>,
    registration: Registration,
    registry: Registry,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        operation: String,
        receiver: mpsc::Receiver<ClientResponse>,
        registration: Registration,
        registry: Registry,
    ) -> Self {
        Self {
            id,
            operation,
            receiver,
            registration,
            registry,
        }
    }

    /// Client-unique id
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn state(&self) -> SubscriptionState {
        self.registration.state()
    }

    /// Next event, or `None` once the subscription completed or was canceled
    pub async fn next(&mut self) -> Option<ClientResponse> {
        if self.state() == SubscriptionState::Canceled {
            return None;
        }
        let event = self.receiver.recv().await?;
        // Cancellation may have landed while the event sat in the buffer
        (self.state() != SubscriptionState::Canceled).then_some(event)
    }

    /// Stop this subscription; other subscriptions of the client are unaffected
    pub fn cancel(&self) {
        self.registry.remove(&self.id);
        self.registration.cancel();
    }

    /// Adapt into a [`Stream`] of responses
    pub fn into_stream(self) -> impl Stream<Item = ClientResponse> {
        futures_util::stream::unfold(self, |mut subscription| async move {
            let event = subscription.next().await?;
            Some((event, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.state().is_terminal() {
            self.cancel();
        }
    }
}
