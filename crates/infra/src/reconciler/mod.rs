//! Session reconciliation: identity events in, one consistent session out.

pub mod driver;
pub mod machine;
pub mod scope;

pub use driver::{SessionHandle, SessionReconciler};
pub use machine::{FetchTicket, SessionMachine, Step, Transition};
pub use scope::SessionScope;
