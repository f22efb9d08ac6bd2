use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use stockgate_auth::ProfileRecord;
use stockgate_core::IdentityId;

use super::r#trait::{FetchOutcome, ProfileFetchError, ProfileStore};

#[derive(Debug, Clone)]
enum StoredDocument {
    Typed(ProfileRecord),
    /// Raw JSON, decoded on read (lets tests plant malformed documents).
    Raw(JsonValue),
}

#[derive(Debug, Default)]
struct StoreState {
    documents: HashMap<IdentityId, StoredDocument>,
    failures: HashMap<IdentityId, ProfileFetchError>,
    latency: HashMap<IdentityId, Duration>,
    unreachable: bool,
}

/// In-memory profile store.
///
/// Intended for tests/dev. Supports per-identity latency and failure
/// injection so reconciliation races can be reproduced deterministically
/// (with a paused tokio clock).
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    state: RwLock<StoreState>,
    fetches: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, identity_id: IdentityId, record: ProfileRecord) {
        if let Ok(mut state) = self.state.write() {
            state.documents.insert(identity_id, StoredDocument::Typed(record));
        }
    }

    pub fn put_raw(&self, identity_id: IdentityId, document: JsonValue) {
        if let Ok(mut state) = self.state.write() {
            state.documents.insert(identity_id, StoredDocument::Raw(document));
        }
    }

    /// Make every fetch for `identity_id` fail with `error`.
    pub fn fail_for(&self, identity_id: IdentityId, error: ProfileFetchError) {
        if let Ok(mut state) = self.state.write() {
            state.failures.insert(identity_id, error);
        }
    }

    /// Delay every fetch for `identity_id` by `delay` before answering.
    pub fn set_latency(&self, identity_id: IdentityId, delay: Duration) {
        if let Ok(mut state) = self.state.write() {
            state.latency.insert(identity_id, delay);
        }
    }

    /// Simulate the whole store being offline.
    pub fn set_unreachable(&self, unreachable: bool) {
        if let Ok(mut state) = self.state.write() {
            state.unreachable = unreachable;
        }
    }

    /// Number of fetches served (or failed) so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn latency_for(&self, identity_id: &IdentityId) -> Option<Duration> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.latency.get(identity_id).copied())
    }

    fn read(&self, identity_id: &IdentityId) -> FetchOutcome {
        let state = self
            .state
            .read()
            .map_err(|_| ProfileFetchError::Unreachable("store lock poisoned".to_string()))?;

        if state.unreachable {
            return Err(ProfileFetchError::Unreachable("store offline".to_string()));
        }
        if let Some(error) = state.failures.get(identity_id) {
            return Err(error.clone());
        }

        match state.documents.get(identity_id) {
            None => Ok(None),
            Some(StoredDocument::Typed(record)) => Ok(Some(record.clone())),
            Some(StoredDocument::Raw(value)) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ProfileFetchError::Malformed(e.to_string())),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_record(&self, identity_id: &IdentityId) -> FetchOutcome {
        if let Some(delay) = self.latency_for(identity_id) {
            tokio::time::sleep(delay).await;
        }

        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.read(identity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(value: &str) -> IdentityId {
        IdentityId::new(value).unwrap()
    }

    #[tokio::test]
    async fn missing_document_is_not_an_error() {
        let store = InMemoryProfileStore::new();
        assert_eq!(store.fetch_record(&id("u1")).await, Ok(None));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn typed_and_raw_documents_are_returned() {
        let store = InMemoryProfileStore::new();
        store.put(id("u1"), ProfileRecord::new().with_role("admin"));
        store.put_raw(id("u2"), json!({ "role": "user", "branchName": "Bandung" }));

        let u1 = store.fetch_record(&id("u1")).await.unwrap().unwrap();
        assert_eq!(u1.role.as_deref(), Some("admin"));

        let u2 = store.fetch_record(&id("u2")).await.unwrap().unwrap();
        assert_eq!(u2.branch_name.as_deref(), Some("Bandung"));
    }

    #[tokio::test]
    async fn malformed_raw_document_fails_the_fetch() {
        let store = InMemoryProfileStore::new();
        store.put_raw(id("u1"), json!(["admin"]));

        let err = store.fetch_record(&id("u1")).await.unwrap_err();
        assert!(matches!(err, ProfileFetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn loosely_typed_raw_document_keeps_its_role() {
        let store = InMemoryProfileStore::new();
        store.put_raw(id("u1"), json!({ "role": "admin", "createdAt": 1_714_550_000_000_i64 }));

        let record = store.fetch_record(&id("u1")).await.unwrap().unwrap();
        assert_eq!(record.role.as_deref(), Some("admin"));
        assert!(record.created_at.is_some());
    }

    #[tokio::test]
    async fn injected_failures_win_over_documents() {
        let store = InMemoryProfileStore::new();
        store.put(id("u1"), ProfileRecord::new().with_role("admin"));
        store.fail_for(id("u1"), ProfileFetchError::Denied("rules".to_string()));
        assert_eq!(
            store.fetch_record(&id("u1")).await,
            Err(ProfileFetchError::Denied("rules".to_string()))
        );

        store.set_unreachable(true);
        assert!(matches!(
            store.fetch_record(&id("u2")).await,
            Err(ProfileFetchError::Unreachable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_the_answer() {
        let store = InMemoryProfileStore::new();
        store.set_latency(id("u1"), Duration::from_millis(250));

        let started = tokio::time::Instant::now();
        assert_eq!(store.fetch_record(&id("u1")).await, Ok(None));
        assert!(started.elapsed() >= Duration::from_millis(250));
    }
}
