//! Caller-driven cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// Handle for aborting in-flight operations
#[derive(Debug, Clone)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
    sender: broadcast::Sender<()>,
}

impl AbortHandle {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Abort every operation holding a signal from this handle
    pub fn abort(&self) {
        if !self.aborted.swap(true, Ordering::SeqCst) {
            // Only the first abort notifies
            let _ = self.sender.send(());
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Get a signal to pass along with a request
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            aborted: self.aborted.clone(),
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for AbortHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of an [`AbortHandle`] (cloneable, can be moved into tasks)
#[derive(Debug)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
    receiver: broadcast::Receiver<()>,
}

impl AbortSignal {
    /// Check if the handle has fired (non-blocking)
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Wait for the handle to fire
    ///
    /// Returns immediately if already aborted.
    pub async fn wait(&mut self) {
        if self.is_aborted() {
            return;
        }
        let _ = self.receiver.recv().await;
    }
}

impl Clone for AbortSignal {
    fn clone(&self) -> Self {
        Self {
            aborted: self.aborted.clone(),
            receiver: self.receiver.resubscribe(),
        }
    }
}

/// Wait on an optional signal; never completes when there is none
pub(crate) async fn wait_optional(signal: &mut Option<AbortSignal>) {
    match signal {
        Some(signal) => signal.wait().await,
        None => std::future::pending().await,
    }
}
