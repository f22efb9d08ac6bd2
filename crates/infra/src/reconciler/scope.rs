//! Scoped ownership of a running reconciler.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use stockgate_events::IdentitySource;

use super::driver::{SessionHandle, SessionReconciler};
use crate::profile_store::ProfileStore;

/// A running session reconciler and the handle consumers read from.
///
/// Opening the scope subscribes to the identity source and spawns the
/// reconciliation task on the current tokio runtime; [`close`](Self::close)
/// unsubscribes and waits for the task to finish. Dropping an open scope
/// signals shutdown without waiting.
#[derive(Debug)]
pub struct SessionScope {
    handle: SessionHandle,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SessionScope {
    /// Must be called from within a tokio runtime.
    pub fn open<S>(source: &S, store: Arc<dyn ProfileStore>) -> Self
    where
        S: IdentitySource + ?Sized,
    {
        let (reconciler, handle) = SessionReconciler::new(source, store);
        let (shutdown, signal) = oneshot::channel();
        let task = tokio::spawn(reconciler.run(signal));

        Self {
            handle,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Tear down: unsubscribe, discard in-flight fetches, wait for the task.
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "session reconciler task failed");
            }
        }
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use stockgate_auth::{Identity, ProfileRecord, Session};
    use stockgate_core::IdentityId;
    use stockgate_events::InMemoryIdentitySource;

    use crate::profile_store::InMemoryProfileStore;

    fn id(value: &str) -> IdentityId {
        IdentityId::new(value).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn close_unsubscribes_and_discards_pending_fetch() {
        let source = InMemoryIdentitySource::new();
        let store = Arc::new(InMemoryProfileStore::new());
        store.put(id("u1"), ProfileRecord::new().with_role("admin"));
        store.set_latency(id("u1"), Duration::from_millis(100));

        let scope = SessionScope::open(&source, store.clone());
        let handle = scope.handle().clone();
        handle.resolved().await;
        assert_eq!(source.subscriber_count().unwrap(), 1);

        source.emit_signed_in(Identity::new(id("u1"), "Dewi")).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        scope.close().await;

        assert_eq!(source.subscriber_count().unwrap(), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.current(), Session::signed_out());
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scope_stops_delivery() {
        let source = InMemoryIdentitySource::new();
        let scope = SessionScope::open(&source, Arc::new(InMemoryProfileStore::new()));
        let handle = scope.handle().clone();
        handle.resolved().await;

        drop(scope);
        tokio::time::sleep(Duration::from_millis(1)).await;

        source.emit_signed_in(Identity::new(id("u9"), "Tono")).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(handle.current(), Session::signed_out());
        assert_eq!(source.subscriber_count().unwrap(), 0);
    }
}
