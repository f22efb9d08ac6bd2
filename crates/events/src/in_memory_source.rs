//! In-memory identity provider for tests/dev.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use stockgate_auth::Identity;
use stockgate_core::IdentityId;

use crate::actions::{IdentityActions, SignInFailure};
use crate::source::{IdentitySource, IdentitySubscription};
use crate::IdentityEvent;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Internal lock poisoning.
    #[error("identity source lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
struct Account {
    password: String,
    identity: Identity,
    disabled: bool,
}

#[derive(Debug, Default)]
struct SourceState {
    current: Option<Identity>,
    subscribers: Vec<mpsc::UnboundedSender<IdentityEvent>>,
    accounts: HashMap<String, Account>,
    registered: u64,
}

impl SourceState {
    fn emit(&mut self, event: IdentityEvent) {
        self.current = event.identity().cloned();

        // Drop any dead subscribers while publishing.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());

        tracing::debug!(
            event = event.event_type(),
            subscribers = self.subscribers.len(),
            "identity event emitted"
        );
    }
}

/// In-memory identity provider.
///
/// - No IO
/// - Fan-out to every live subscription, current state first
/// - Simple email/password account table for the [`IdentityActions`] side
#[derive(Debug, Default)]
pub struct InMemoryIdentitySource {
    state: Mutex<SourceState>,
}

impl InMemoryIdentitySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already holds a restored sign-in (e.g. persisted by the
    /// provider across reloads).
    pub fn signed_in(identity: Identity) -> Self {
        let source = Self::default();
        if let Ok(mut state) = source.state.lock() {
            state.current = Some(identity);
        }
        source
    }

    fn lock(&self) -> Result<MutexGuard<'_, SourceState>, SourceError> {
        self.state.lock().map_err(|_| SourceError::Poisoned)
    }

    /// Register an account that [`IdentityActions::sign_in`] will accept.
    pub fn add_account(
        &self,
        email: &str,
        password: &str,
        identity: Identity,
    ) -> Result<(), SourceError> {
        let mut state = self.lock()?;
        state.accounts.insert(
            normalize_email(email),
            Account {
                password: password.to_string(),
                identity,
                disabled: false,
            },
        );
        Ok(())
    }

    pub fn disable_account(&self, email: &str) -> Result<(), SourceError> {
        let mut state = self.lock()?;
        if let Some(account) = state.accounts.get_mut(&normalize_email(email)) {
            account.disabled = true;
        }
        Ok(())
    }

    /// Emit a raw provider event to every subscriber.
    pub fn emit(&self, event: IdentityEvent) -> Result<(), SourceError> {
        self.lock()?.emit(event);
        Ok(())
    }

    pub fn emit_signed_in(&self, identity: Identity) -> Result<(), SourceError> {
        self.emit(IdentityEvent::SignedIn(identity))
    }

    pub fn emit_signed_out(&self) -> Result<(), SourceError> {
        self.emit(IdentityEvent::SignedOut)
    }

    pub fn current(&self) -> Result<Option<Identity>, SourceError> {
        Ok(self.lock()?.current.clone())
    }

    /// Number of subscriptions still open.
    pub fn subscriber_count(&self) -> Result<usize, SourceError> {
        let mut state = self.lock()?;
        state.subscribers.retain(|tx| !tx.is_closed());
        Ok(state.subscribers.len())
    }
}

impl IdentitySource for InMemoryIdentitySource {
    fn subscribe(&self) -> IdentitySubscription {
        let (tx, rx) = mpsc::unbounded_channel();

        match self.state.lock() {
            Ok(mut state) => {
                let _ = tx.send(IdentityEvent::from(state.current.clone()));
                state.subscribers.push(tx);
            }
            Err(_) => {
                // Poisoned: report signed-out once so the consumer still resolves;
                // no further events will follow.
                tracing::warn!("identity source poisoned; subscription will only see sign-out");
                let _ = tx.send(IdentityEvent::SignedOut);
            }
        }

        IdentitySubscription::new(rx)
    }
}

#[async_trait]
impl IdentityActions for InMemoryIdentitySource {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, SignInFailure> {
        validate_email(email)?;

        let mut state = self.lock().map_err(provider_failure)?;
        let identity = match state.accounts.get(&normalize_email(email)) {
            Some(account) if account.password != password => {
                return Err(SignInFailure::InvalidCredentials);
            }
            Some(account) if account.disabled => return Err(SignInFailure::AccountDisabled),
            Some(account) => account.identity.clone(),
            None => return Err(SignInFailure::InvalidCredentials),
        };

        state.emit(IdentityEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, SignInFailure> {
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SignInFailure::WeakPassword);
        }

        let mut state = self.lock().map_err(provider_failure)?;
        let key = normalize_email(email);
        if state.accounts.contains_key(&key) {
            return Err(SignInFailure::EmailInUse);
        }

        state.registered += 1;
        let id = IdentityId::new(format!("local-{}", state.registered))
            .map_err(|e| SignInFailure::Provider(e.to_string()))?;
        let identity = Identity::new(id, display_name).with_email(email.trim());

        state.accounts.insert(
            key,
            Account {
                password: password.to_string(),
                identity: identity.clone(),
                disabled: false,
            },
        );
        state.emit(IdentityEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), SignInFailure> {
        self.lock().map_err(provider_failure)?.emit(IdentityEvent::SignedOut);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str) -> Result<(), SignInFailure> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(SignInFailure::InvalidEmail),
    }
}

fn provider_failure(err: SourceError) -> SignInFailure {
    SignInFailure::Provider(err.to_string())
}
