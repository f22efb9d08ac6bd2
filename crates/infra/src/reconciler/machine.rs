//! Session state machine (no IO, no runtime).
//!
//! Turns identity events and profile-fetch completions into published
//! [`Session`] values. The async loop in [`driver`](super::driver) feeds it;
//! the machine itself never awaits, so every transition is applied atomically.
//!
//! ## Generations
//!
//! Every observed identity event bumps `generation`. A sign-in hands out a
//! [`FetchTicket`] tagged with the generation current at issue time; when the
//! fetch settles the ticket is compared with the machine's generation *at
//! settle time* and discarded if they differ. Sign-out and teardown bump the
//! generation too, so any fetch still in flight across them is stale.

use stockgate_auth::{AuthorizationRecord, Identity, Session};
use stockgate_events::IdentityEvent;

use crate::profile_store::FetchOutcome;

/// Permission to apply one profile fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    identity: Identity,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// What the caller must do after [`SessionMachine::observe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Fetch the profile for the ticket's identity, then call `settle`.
    Fetch(FetchTicket),
    /// A different identity signed in over a published one: publish
    /// `withdrawn` (signed out) now, then fetch as for [`Step::Fetch`].
    Switch {
        withdrawn: Transition,
        ticket: FetchTicket,
    },
    /// The event was applied without a fetch.
    Applied(Transition),
}

/// Effect of a transition on the published session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new session value must be published.
    Published(Session),
    /// The resolved session equals the one already published.
    Unchanged,
    /// A fetch result arrived after a newer transition; it was discarded.
    Stale { ticket: u64, current: u64 },
    /// The machine was closed; the input was ignored.
    Closed,
}

#[derive(Debug)]
pub struct SessionMachine {
    generation: u64,
    session: Session,
    pending: Option<Identity>,
    closed: bool,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            generation: 0,
            session: Session::initializing(),
            pending: None,
            closed: false,
        }
    }

    /// Last session handed out in a [`Transition::Published`].
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Identity whose authorization is still being fetched.
    pub fn pending_identity(&self) -> Option<&Identity> {
        self.pending.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply an identity event.
    pub fn observe(&mut self, event: IdentityEvent) -> Step {
        if self.closed {
            return Step::Applied(Transition::Closed);
        }

        self.generation += 1;
        match event {
            IdentityEvent::SignedIn(identity) => {
                let switching = self
                    .session
                    .identity_id()
                    .is_some_and(|current| current != identity.id());
                self.pending = Some(identity.clone());
                let ticket = FetchTicket {
                    generation: self.generation,
                    identity,
                };

                // The previous identity's authorization must not outlive it.
                if switching {
                    Step::Switch {
                        withdrawn: self.apply(Session::signed_out()),
                        ticket,
                    }
                } else {
                    Step::Fetch(ticket)
                }
            }
            IdentityEvent::SignedOut => {
                self.pending = None;
                Step::Applied(self.apply(Session::signed_out()))
            }
        }
    }

    /// Apply the result of the fetch a ticket was issued for.
    pub fn settle(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> Transition {
        if ticket.generation != self.generation {
            return Transition::Stale {
                ticket: ticket.generation,
                current: self.generation,
            };
        }
        if self.closed {
            return Transition::Closed;
        }

        let authorization = match outcome {
            Ok(Some(record)) => AuthorizationRecord::from_profile(record),
            Ok(None) => AuthorizationRecord::fallback(),
            Err(err) => {
                tracing::warn!(
                    identity_id = %ticket.identity.id(),
                    error = %err,
                    "profile fetch failed; using default authorization"
                );
                AuthorizationRecord::fallback()
            }
        };

        self.pending = None;
        self.apply(Session::signed_in(ticket.identity, authorization))
    }

    /// Stop accepting input. Tickets still in flight become stale.
    pub fn close(&mut self) {
        self.closed = true;
        self.generation += 1;
        self.pending = None;
    }

    fn apply(&mut self, next: Session) -> Transition {
        if self.session == next {
            return Transition::Unchanged;
        }
        self.session = next.clone();
        Transition::Published(next)
    }
}
