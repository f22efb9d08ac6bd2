//! Infrastructure layer: profile store boundary, session reconciliation,
//! configuration.

pub mod config;
pub mod profile_store;
pub mod reconciler;

pub use config::{AppConfig, ConfigError};
pub use profile_store::{InMemoryProfileStore, ProfileFetchError, ProfileStore};
pub use reconciler::{SessionHandle, SessionMachine, SessionReconciler, SessionScope};
