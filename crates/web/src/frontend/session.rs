//! Session context shared by every component.

use std::sync::Arc;

use leptos::*;
use tokio::sync::oneshot;

use stockgate_auth::Session;
use stockgate_events::{IdentityActions, IdentitySource};
use stockgate_infra::{ProfileStore, SessionReconciler};

use crate::navigation::Navigator;

/// Reactive view of the reconciled session plus the actions views may take.
#[derive(Clone)]
pub struct SessionContext {
    pub session: ReadSignal<Session>,
    pub navigator: Navigator,
    pub actions: Arc<dyn IdentityActions>,
}

/// Start a reconciler for the current reactive owner and provide its session
/// as context. The reconciler is shut down when the owner is cleaned up.
pub fn provide_session(
    source: Arc<dyn IdentitySource>,
    store: Arc<dyn ProfileStore>,
    actions: Arc<dyn IdentityActions>,
    navigator: Navigator,
) {
    let (reconciler, handle) = SessionReconciler::new(source.as_ref(), store);
    let (shutdown, signal) = oneshot::channel();
    spawn_local(reconciler.run(signal));

    let (session, set_session) = create_signal(handle.current());
    let mut receiver = handle.subscribe();
    spawn_local(async move {
        while receiver.changed().await.is_ok() {
            let next = receiver.borrow_and_update().clone();
            set_session.set(next);
        }
    });

    on_cleanup(move || {
        let _ = shutdown.send(());
    });

    provide_context(SessionContext {
        session,
        navigator,
        actions,
    });
}
