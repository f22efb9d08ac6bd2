//! Leptos browser frontend.
//!
//! The host page supplies the identity provider and profile store bindings;
//! this module wires them to a session reconciler and mounts the app.

pub mod app;
pub mod guard;
pub mod session;

use std::sync::Arc;

use stockgate_events::{IdentityActions, IdentitySource};
use stockgate_infra::{AppConfig, ProfileStore};

use crate::boot;

/// Mount the dashboard into `<body>`.
pub fn mount(
    source: Arc<dyn IdentitySource>,
    store: Arc<dyn ProfileStore>,
    actions: Arc<dyn IdentityActions>,
    config: AppConfig,
) {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let navigator = boot::start(&config);
    leptos::mount_to_body(move || {
        session::provide_session(source, store, actions, navigator);
        leptos::view! { <app::App/> }
    });
}
