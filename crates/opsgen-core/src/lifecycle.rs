//! Subscription lifecycle state machine

use serde::{Deserialize, Serialize};

/// States of a subscription owned by an operations client
///
/// State transitions:
/// ```text
/// Pending → Streaming → Completed
///    │          │
///    │          └──────→ Canceled
///    ├─────────────────→ Completed (closed before any event)
///    └─────────────────→ Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    /// Created, no event received yet
    #[default]
    Pending,
    /// At least one event received
    Streaming,
    /// Upstream closed the stream
    Completed,
    /// Canceled by the client or an abort signal
    Canceled,
}

impl SubscriptionState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: SubscriptionState) -> bool {
        use SubscriptionState::*;
        matches!(
            (self, target),
            (Pending, Streaming)
                | (Streaming, Completed)
                | (Pending, Completed)
                | (Pending, Canceled)
                | (Streaming, Canceled)
        )
    }

    /// Whether events may still be delivered
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// Check if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubscriptionState::Completed | SubscriptionState::Canceled)
    }

    pub fn description(&self) -> &'static str {
        match self {
            SubscriptionState::Pending => "Subscription is waiting for its first event",
            SubscriptionState::Streaming => "Subscription is receiving events",
            SubscriptionState::Completed => "Subscription was closed by the server",
            SubscriptionState::Canceled => "Subscription was canceled",
        }
    }
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionState::Pending => write!(f, "Pending"),
            SubscriptionState::Streaming => write!(f, "Streaming"),
            SubscriptionState::Completed => write!(f, "Completed"),
            SubscriptionState::Canceled => write!(f, "Canceled"),
        }
    }
}
