use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockgate_auth::ProfileRecord;
use stockgate_core::IdentityId;

/// Result of a single profile fetch: a document, no document, or a failure.
pub type FetchOutcome = Result<Option<ProfileRecord>, ProfileFetchError>;

/// Profile store failure.
///
/// Never fatal for a sign-in: the reconciler downgrades the identity to the
/// default authorization record and logs the error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileFetchError {
    #[error("profile store unreachable: {0}")]
    Unreachable(String),

    #[error("malformed profile document: {0}")]
    Malformed(String),

    #[error("profile read denied: {0}")]
    Denied(String),
}

/// Read side of the profile store.
///
/// `Ok(None)` means no document has been provisioned for the identity yet;
/// that is not an error.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_record(&self, identity_id: &IdentityId) -> FetchOutcome;
}

#[async_trait]
impl<S> ProfileStore for Arc<S>
where
    S: ProfileStore + ?Sized,
{
    async fn fetch_record(&self, identity_id: &IdentityId) -> FetchOutcome {
        (**self).fetch_record(identity_id).await
    }
}
