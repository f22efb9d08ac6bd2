//! Profile store boundary.
//!
//! The profile store holds one optional authorization document per identity.
//! This module defines the read contract the session reconciler relies on,
//! without making any storage assumptions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryProfileStore;
pub use r#trait::{FetchOutcome, ProfileFetchError, ProfileStore};
