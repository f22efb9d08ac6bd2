//! `stockgate-web`
//!
//! **Responsibility:** route-level access control for the inventory dashboard.
//!
//! This crate provides:
//! - Start-up wiring (configuration, logging)
//! - The static route table (path → view, access requirement)
//! - Navigation decisions composed from the access guard
//! - Live re-evaluation of a mounted route when the session changes
//! - The sidebar menu model
//! - The Leptos browser frontend (wasm32 only)

pub mod boot;
pub mod menu;
pub mod navigation;
pub mod routes;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use menu::{NavItem, menu};
pub use navigation::{Navigation, Navigator, RouteWatch};
pub use routes::{Route, RouteEntry, lookup};
