//! Identity events and the identity-provider boundary.
//!
//! The identity provider is external: this crate only describes how its
//! sign-in/sign-out notifications are delivered ([`IdentitySource`]) and how
//! views ask it to act ([`IdentityActions`]). An in-memory provider is
//! included for tests/dev.

pub mod actions;
pub mod event;
pub mod in_memory_source;
pub mod source;

pub use actions::{IdentityActions, SignInFailure};
pub use event::IdentityEvent;
pub use in_memory_source::{InMemoryIdentitySource, SourceError};
pub use source::{IdentitySource, IdentitySubscription};
