//! Actions views ask of the identity provider.
//!
//! The session core never calls these: it only observes their effect through
//! the [`IdentitySource`](crate::IdentitySource).

use async_trait::async_trait;
use thiserror::Error;

use stockgate_auth::Identity;

/// Why a sign-in (or registration) attempt was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignInFailure {
    /// Unknown account or wrong password; the two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("account disabled")]
    AccountDisabled,

    #[error("email already in use")]
    EmailInUse,

    #[error("password too weak")]
    WeakPassword,

    #[error("identity provider error: {0}")]
    Provider(String),
}

impl SignInFailure {
    /// Map a provider error code (e.g. `auth/wrong-password`) to a failure kind.
    pub fn from_provider_code(code: &str) -> Self {
        match code {
            "auth/invalid-credential" | "auth/user-not-found" | "auth/wrong-password" => {
                Self::InvalidCredentials
            }
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/user-disabled" => Self::AccountDisabled,
            "auth/email-already-in-use" => Self::EmailInUse,
            "auth/weak-password" => Self::WeakPassword,
            other => Self::Provider(other.to_string()),
        }
    }

    /// Text shown to the user by the login/register forms.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Incorrect email or password.",
            Self::InvalidEmail => "The email address is not valid.",
            Self::AccountDisabled => "This account has been disabled.",
            Self::EmailInUse => "An account with this email already exists.",
            Self::WeakPassword => "The password must be at least 6 characters.",
            Self::Provider(_) => "Something went wrong while signing in. Please try again.",
        }
    }
}

/// Sign-in/sign-out/register requests sent to the identity provider.
#[async_trait]
pub trait IdentityActions: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, SignInFailure>;

    /// Create an account and sign it in.
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, SignInFailure>;

    async fn sign_out(&self) -> Result<(), SignInFailure>;
}
