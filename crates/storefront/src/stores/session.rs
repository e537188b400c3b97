//! Session store - the authentication token and the identity derived from it.
//!
//! The token is the only credential the storefront holds. It is persisted
//! under a fixed storage key, rehydrated at construction, and published to
//! subscribers whenever it changes. Failures surface the server's message
//! and are terminal per attempt - nothing is retried here.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::instrument;

use fresh_cart_core::UserId;

use crate::commerce::types::{SignInRequest, SignUpRequest};
use crate::commerce::{CommerceClient, CommerceError};

use super::claims::decode_claims;
use super::storage::{LocalStorage, storage_keys};

/// The signed-in identity derived from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The user's id, as encoded in the token.
    pub user_id: UserId,
    /// The user's display name, when the token carries one.
    pub name: Option<String>,
}

struct AuthState {
    token: SecretString,
    identity: Identity,
}

/// Process-wide holder of the authentication token and derived identity.
///
/// Cheaply cloneable; clones share state. Construct one per isolated
/// storage (one per browser session in the server, one per test).
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    client: CommerceClient,
    storage: Arc<dyn LocalStorage>,
    state: RwLock<Option<AuthState>>,
    tx: watch::Sender<Option<Identity>>,
}

impl SessionStore {
    /// Create a session store, rehydrating from the persisted token.
    ///
    /// A persisted token that no longer decodes is discarded rather than
    /// surfaced - the user is simply signed out.
    #[must_use]
    pub fn new(client: CommerceClient, storage: Arc<dyn LocalStorage>) -> Self {
        let state = storage
            .get(storage_keys::USER_TOKEN)
            .and_then(|token| match decode_claims(&token) {
                Ok(claims) => Some(AuthState {
                    token: SecretString::from(token),
                    identity: Identity {
                        user_id: claims.id,
                        name: claims.name,
                    },
                }),
                Err(e) => {
                    tracing::warn!("Discarding undecodable persisted token: {e}");
                    storage.remove(storage_keys::USER_TOKEN);
                    None
                }
            });

        let (tx, _rx) = watch::channel(state.as_ref().map(|s| s.identity.clone()));

        Self {
            inner: Arc::new(SessionStoreInner {
                client,
                storage,
                state: RwLock::new(state),
                tx,
            }),
        }
    }

    /// Sign an existing user in.
    ///
    /// On success the token is persisted, the identity decoded from it,
    /// and subscribers notified.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials or is
    /// unreachable. State is untouched on failure.
    #[instrument(skip(self, credentials))]
    pub async fn sign_in(&self, credentials: &SignInRequest) -> Result<Identity, CommerceError> {
        let response = self.inner.client.sign_in(credentials).await?;
        self.install(response.token)
    }

    /// Register a new user and sign them in.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the registration or is
    /// unreachable. State is untouched on failure.
    #[instrument(skip(self, registration))]
    pub async fn sign_up(&self, registration: &SignUpRequest) -> Result<Identity, CommerceError> {
        let response = self.inner.client.sign_up(registration).await?;
        self.install(response.token)
    }

    /// Adopt a freshly issued token: persist, decode, publish.
    fn install(&self, token: String) -> Result<Identity, CommerceError> {
        let claims = decode_claims(&token).map_err(|e| CommerceError::Rejected {
            status: None,
            message: format!("received a malformed session token: {e}"),
        })?;

        let identity = Identity {
            user_id: claims.id,
            name: claims.name,
        };

        self.inner.storage.set(storage_keys::USER_TOKEN, &token);
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(AuthState {
            token: SecretString::from(token),
            identity: identity.clone(),
        });
        self.inner.tx.send_replace(Some(identity.clone()));

        Ok(identity)
    }

    /// Sign out: remove the persisted token, clear the identity, notify.
    ///
    /// Dependent state (the cart snapshot) is reset by
    /// [`UserStores::sign_out`](super::UserStores::sign_out).
    pub fn sign_out(&self) {
        self.inner.storage.remove(storage_keys::USER_TOKEN);
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        self.inner.tx.send_replace(None);
    }

    /// The current session token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// The current identity, if signed in.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.identity.clone())
    }

    /// Whether a token is currently held.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Subscribe to identity changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::super::claims::tests::make_token;
    use super::super::storage::MemoryStorage;
    use super::*;
    use crate::config::CommerceApiConfig;

    fn offline_client() -> CommerceClient {
        CommerceClient::new(&CommerceApiConfig {
            base_url: "http://localhost:9".to_string(),
            checkout_return_url: "http://localhost:9".to_string(),
        })
    }

    #[test]
    fn test_rehydrates_identity_from_persisted_token() {
        let storage = Arc::new(MemoryStorage::new());
        let token = make_token(&json!({ "id": "640ab1f38f1a", "name": "Ahmed" }));
        storage.set(storage_keys::USER_TOKEN, &token);

        let store = SessionStore::new(offline_client(), storage);
        let identity = store.identity().unwrap();
        assert_eq!(identity.user_id, UserId::new("640ab1f38f1a"));
        assert_eq!(identity.name.as_deref(), Some("Ahmed"));
        assert!(store.is_signed_in());
    }

    #[test]
    fn test_no_persisted_token_means_signed_out() {
        let store = SessionStore::new(offline_client(), Arc::new(MemoryStorage::new()));
        assert!(!store.is_signed_in());
        assert_eq!(store.identity(), None);
        assert!(store.token().is_none());
    }

    #[test]
    fn test_undecodable_persisted_token_is_discarded() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(storage_keys::USER_TOKEN, "not-a-jwt");

        let store = SessionStore::new(offline_client(), storage.clone());
        assert!(!store.is_signed_in());
        assert_eq!(storage.get(storage_keys::USER_TOKEN), None);
    }

    #[test]
    fn test_sign_out_clears_persisted_token_and_notifies() {
        let storage = Arc::new(MemoryStorage::new());
        let token = make_token(&json!({ "id": "u1" }));
        storage.set(storage_keys::USER_TOKEN, &token);

        let store = SessionStore::new(offline_client(), storage.clone());
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_some());

        store.sign_out();
        assert!(!store.is_signed_in());
        assert_eq!(storage.get(storage_keys::USER_TOKEN), None);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }
}
