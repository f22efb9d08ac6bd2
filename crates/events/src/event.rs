use serde::Serialize;

use stockgate_auth::Identity;

/// Notification emitted by the identity provider.
///
/// Events are facts about the provider's state at delivery time; the provider
/// decides when they happen, not the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "identity", rename_all = "snake_case")]
pub enum IdentityEvent {
    SignedIn(Identity),
    SignedOut,
}

impl IdentityEvent {
    /// Stable event name (e.g. for logs).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SignedIn(_) => "identity.signed_in",
            Self::SignedOut => "identity.signed_out",
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::SignedOut => None,
        }
    }
}

impl From<Option<Identity>> for IdentityEvent {
    fn from(value: Option<Identity>) -> Self {
        match value {
            Some(identity) => Self::SignedIn(identity),
            None => Self::SignedOut,
        }
    }
}
