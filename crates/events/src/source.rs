//! Identity event subscription abstraction (mechanics only).
//!
//! The identity provider pushes sign-in/sign-out notifications at arbitrary
//! times. Consumers hold an [`IdentitySubscription`] for as long as they want
//! to hear about them.
//!
//! ## Delivery contract
//!
//! - The first event on every new subscription describes the provider's
//!   current state (possibly [`IdentityEvent::SignedOut`]), so a consumer can
//!   leave its initial "unknown" state without waiting for user activity.
//! - Later events arrive in the order the provider emitted them.
//! - After [`IdentitySubscription::unsubscribe`] (or drop) nothing more is
//!   delivered to that subscription.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::IdentityEvent;

/// A subscription to the identity event stream.
///
/// Designed for a single consumer. Unsubscribing consumes the subscription, so
/// it can only happen once.
#[derive(Debug)]
pub struct IdentitySubscription {
    receiver: mpsc::UnboundedReceiver<IdentityEvent>,
}

impl IdentitySubscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<IdentityEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event; `None` once the source is gone.
    pub async fn recv(&mut self) -> Option<IdentityEvent> {
        self.receiver.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Result<IdentityEvent, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Stop delivery. Events queued but not yet received are discarded.
    pub fn unsubscribe(mut self) {
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
        tracing::debug!("identity subscription closed");
    }
}

/// Source of identity events (the external identity provider).
///
/// `subscribe` must never block; it hands back a subscription whose first
/// event reflects the current provider state.
pub trait IdentitySource: Send + Sync {
    fn subscribe(&self) -> IdentitySubscription;
}

impl<S> IdentitySource for Arc<S>
where
    S: IdentitySource + ?Sized,
{
    fn subscribe(&self) -> IdentitySubscription {
        (**self).subscribe()
    }
}
