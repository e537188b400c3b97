//! Authentication middleware and extractors.
//!
//! The route guard is a pure predicate over the session store's persisted
//! token: it is re-evaluated on every guarded request and keeps no state
//! of its own.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::state::AppState;
use crate::stores::{Identity, UserStores};

/// Session keys for storefront data.
pub mod session_keys {
    /// Key tying the browser session to its server-side store bundle.
    pub const STORE_ID: &str = "store_id";
}

/// Extractor resolving the browser session's store bundle.
///
/// Assigns a store id to the session on first use and returns the same
/// bundle for every later request of that session.
pub struct Stores(pub Arc<UserStores>);

impl FromRequestParts<AppState> for Stores {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let store_id = match session
            .get::<String>(session_keys::STORE_ID)
            .await
            .ok()
            .flatten()
        {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                session
                    .insert(session_keys::STORE_ID, &id)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to assign store id to session: {e}");
                        StatusCode::INTERNAL_SERVER_ERROR
                    })?;
                id
            }
        };

        Ok(Self(state.user_stores(&store_id)))
    }
}

/// Extractor that requires a signed-in user.
///
/// If no token is persisted for the session, returns a redirect to the
/// sign-in page (API-shaped paths get a plain 401).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth { identity, stores }: RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
pub struct RequireAuth {
    /// The signed-in identity.
    pub identity: Identity,
    /// The session's store bundle.
    pub stores: Arc<UserStores>,
}

/// Error returned when authentication is required but no token is held.
pub enum AuthRejection {
    /// Redirect to the sign-in page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// The session layer is missing or failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Stores(stores) = Stores::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::Internal)?;

        match stores.session().identity() {
            Some(identity) => Ok(Self { identity, stores }),
            None => {
                if parts.uri.path().starts_with("/api/") {
                    Err(AuthRejection::Unauthorized)
                } else {
                    Err(AuthRejection::RedirectToLogin)
                }
            }
        }
    }
}
