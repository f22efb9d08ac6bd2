//! The reconciled, application-facing session value.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use stockgate_core::IdentityId;

use crate::{AuthorizationRecord, Identity, Role};

/// Resolution status of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No identity event has been resolved yet.
    Initializing,
    /// At least one identity event has been fully resolved.
    Resolved,
}

/// Current session: who is signed in, with which authorization attributes.
///
/// # Invariants
/// - `authorization` is present iff `identity` is present.
/// - An `Initializing` session carries neither.
///
/// Both are enforced by construction: the only way to build a session is
/// through [`Session::initializing`], [`Session::signed_out`] and
/// [`Session::signed_in`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    identity: Option<Identity>,
    authorization: Option<AuthorizationRecord>,
    status: SessionStatus,
}

impl Session {
    pub fn initializing() -> Self {
        Self {
            identity: None,
            authorization: None,
            status: SessionStatus::Initializing,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: None,
            authorization: None,
            status: SessionStatus::Resolved,
        }
    }

    pub fn signed_in(identity: Identity, authorization: AuthorizationRecord) -> Self {
        Self {
            identity: Some(identity),
            authorization: Some(authorization),
            status: SessionStatus::Resolved,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn identity_id(&self) -> Option<&IdentityId> {
        self.identity.as_ref().map(Identity::id)
    }

    pub fn authorization(&self) -> Option<&AuthorizationRecord> {
        self.authorization.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_initializing(&self) -> bool {
        self.status == SessionStatus::Initializing
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn role(&self) -> Option<&Role> {
        self.authorization.as_ref().map(AuthorizationRecord::role)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }

    /// Merged identity + authorization view, as shown by the dashboard.
    pub fn profile(&self) -> Option<UserProfile> {
        let identity = self.identity.as_ref()?;
        let authorization = self.authorization.as_ref()?;

        Some(UserProfile {
            id: identity.id().clone(),
            display_name: identity.display_name().to_string(),
            email: identity.email().map(str::to_string),
            avatar_url: identity.avatar_url().map(str::to_string),
            role: authorization.role().clone(),
            branch_code: authorization.branch_code().map(str::to_string),
            branch_name: authorization.branch_name().map(str::to_string),
            created_at: authorization.created_at(),
            attributes: authorization.attributes().clone(),
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initializing()
    }
}

/// Flattened user profile (identity fields + authorization fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: IdentityId,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub branch_code: Option<String>,
    pub branch_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileRecord;

    fn identity(id: &str) -> Identity {
        Identity::new(IdentityId::new(id).unwrap(), "Andi")
            .with_email("andi@example.com")
    }

    #[test]
    fn initializing_session_is_empty() {
        let session = Session::initializing();
        assert!(session.is_initializing());
        assert!(session.identity().is_none());
        assert!(session.authorization().is_none());
        assert!(session.profile().is_none());
    }

    #[test]
    fn signed_out_session_is_resolved_and_empty() {
        let session = Session::signed_out();
        assert_eq!(session.status(), SessionStatus::Resolved);
        assert!(!session.is_authenticated());
        assert!(session.role().is_none());
    }

    #[test]
    fn profile_merges_identity_and_authorization() {
        let record = AuthorizationRecord::from_profile(
            ProfileRecord::new().with_role("admin").with_branch("JKT-01", "Jakarta"),
        );
        let session = Session::signed_in(identity("u1"), record);

        let profile = session.profile().unwrap();
        assert_eq!(profile.id.as_str(), "u1");
        assert_eq!(profile.display_name, "Andi");
        assert_eq!(profile.email.as_deref(), Some("andi@example.com"));
        assert_eq!(profile.role, Role::ADMIN);
        assert_eq!(profile.branch_name.as_deref(), Some("Jakarta"));
        assert!(session.is_admin());
    }
}
