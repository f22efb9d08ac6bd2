//! `stockgate-auth` — pure session/authorization boundary.
//!
//! This crate is intentionally decoupled from providers, storage and views:
//! it defines what a session *is* and how a route requirement is decided
//! against it.

pub mod guard;
pub mod identity;
pub mod record;
pub mod roles;
pub mod session;

pub use guard::{AccessDenial, AccessRequirement, GuardDecision, evaluate};
pub use identity::Identity;
pub use record::{AuthorizationRecord, ProfileRecord};
pub use roles::Role;
pub use session::{Session, SessionStatus, UserProfile};
