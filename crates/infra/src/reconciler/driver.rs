//! Async reconciliation loop.
//!
//! One task owns the [`SessionMachine`]; identity events and profile-fetch
//! completions are both funneled into it from a single `select!` loop, so the
//! machine is only ever touched by one writer. Fetches run concurrently with
//! event delivery and are tagged with the generation they were issued for.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::sync::{oneshot, watch};

use stockgate_auth::Session;
use stockgate_events::{IdentitySource, IdentitySubscription};

use super::machine::{FetchTicket, SessionMachine, Step, Transition};
use crate::profile_store::{FetchOutcome, ProfileStore};

/// Read side of the reconciled session (cheap to clone, many readers).
#[derive(Debug, Clone)]
pub struct SessionHandle {
    receiver: watch::Receiver<Session>,
}

impl SessionHandle {
    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.receiver.borrow().clone()
    }

    /// Receiver notified on every published transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.receiver.clone()
    }

    /// Wait until the first identity event has been resolved.
    ///
    /// Returns `None` if the reconciler stopped before that happened.
    pub async fn resolved(&self) -> Option<Session> {
        self.wait_for(|session| !session.is_initializing()).await
    }

    /// Wait until the published session satisfies `predicate`.
    ///
    /// Returns `None` if the reconciler stopped first.
    pub async fn wait_for(&self, predicate: impl FnMut(&Session) -> bool) -> Option<Session> {
        let mut receiver = self.receiver.clone();
        let session = receiver.wait_for(predicate).await.ok()?;
        Some(session.clone())
    }
}

/// Owns the identity subscription and the single writable session.
pub struct SessionReconciler {
    subscription: IdentitySubscription,
    store: Arc<dyn ProfileStore>,
    machine: SessionMachine,
    publisher: watch::Sender<Session>,
}

impl SessionReconciler {
    /// Subscribe to `source` and prepare a reconciler; nothing runs until
    /// [`run`](Self::run) is polled.
    pub fn new<S>(source: &S, store: Arc<dyn ProfileStore>) -> (Self, SessionHandle)
    where
        S: IdentitySource + ?Sized,
    {
        let (publisher, receiver) = watch::channel(Session::initializing());
        let reconciler = Self {
            subscription: source.subscribe(),
            store,
            machine: SessionMachine::new(),
            publisher,
        };
        (reconciler, SessionHandle { receiver })
    }

    /// Process identity events until `shutdown` fires (or its sender is dropped).
    ///
    /// On exit the subscription is released and any fetch still in flight is
    /// dropped without being applied.
    pub async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let Self {
            mut subscription,
            store,
            mut machine,
            publisher,
        } = self;

        let mut fetches = FuturesUnordered::new();
        let mut source_open = true;

        tracing::debug!("session reconciler started");

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,

                event = subscription.recv(), if source_open => match event {
                    Some(event) => {
                        tracing::debug!(
                            event = event.event_type(),
                            generation = machine.generation() + 1,
                            "identity event received"
                        );
                        match machine.observe(event) {
                            Step::Fetch(ticket) => fetches.push(fetch_profile(store.clone(), ticket)),
                            Step::Switch { withdrawn, ticket } => {
                                publish(&publisher, withdrawn);
                                fetches.push(fetch_profile(store.clone(), ticket));
                            }
                            Step::Applied(transition) => publish(&publisher, transition),
                        }
                    }
                    None => {
                        tracing::debug!("identity source closed");
                        source_open = false;
                    }
                },

                Some((ticket, outcome)) = fetches.next(), if !fetches.is_empty() => {
                    let transition = machine.settle(ticket, outcome);
                    publish(&publisher, transition);
                }
            }
        }

        machine.close();
        subscription.unsubscribe();
        let discarded = fetches.len();
        drop(fetches);

        tracing::info!(discarded_fetches = discarded, "session reconciler stopped");
    }
}

async fn fetch_profile(
    store: Arc<dyn ProfileStore>,
    ticket: FetchTicket,
) -> (FetchTicket, FetchOutcome) {
    let outcome = store.fetch_record(ticket.identity().id()).await;
    (ticket, outcome)
}

fn publish(publisher: &watch::Sender<Session>, transition: Transition) {
    match transition {
        Transition::Published(session) => {
            tracing::info!(
                identity_id = session.identity_id().map(|id| id.as_str()).unwrap_or("-"),
                role = session.role().map(|r| r.as_str()).unwrap_or("-"),
                "session published"
            );
            publisher.send_replace(session);
        }
        Transition::Unchanged => tracing::debug!("session unchanged"),
        Transition::Stale { ticket, current } => {
            tracing::debug!(ticket, current, "stale profile fetch discarded");
        }
        Transition::Closed => tracing::debug!("reconciler closed; input ignored"),
    }
}
