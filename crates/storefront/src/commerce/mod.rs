//! Remote commerce API client.
//!
//! # Architecture
//!
//! - The remote API is the source of truth - NO local sync, direct REST calls
//! - One method per endpoint, explicit response schemas parsed at the boundary
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//! - Cart and order calls are never cached
//!
//! # Authentication
//!
//! Authenticated endpoints take the session token issued at sign-in and
//! send it in the API's bearer-style custom `token` header. The client
//! holds no credentials of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use fresh_cart_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce);
//!
//! // Browse the catalog
//! let products = client.get_products().await?;
//!
//! // Mutate the signed-in user's cart
//! let cart = client.add_to_cart(token, &products[0].id).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::CommerceClient;

use thiserror::Error;

/// Header carrying the session token on authenticated calls.
pub const TOKEN_HEADER: &str = "token";

/// Errors that can occur when interacting with the commerce API.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// No session token is available. Raised locally, before any network call.
    #[error("no authentication token")]
    MissingAuth,

    /// The server rejected the request. Carries the server's message field.
    #[error("{message}")]
    Rejected {
        /// HTTP status of the rejection, if the request got that far.
        status: Option<reqwest::StatusCode>,
        /// Message supplied by the server, or a summary of the rejection.
        message: String,
    },

    /// The server was unreachable or the transport failed.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected schema.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CommerceError {
    /// The message a view should show for this failure.
    ///
    /// Server-rejected requests surface the server's own message; network
    /// and parse failures fall back to a generic message rather than
    /// leaking transport details.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingAuth => "Please sign in first".to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Http(_) => "No response from server. Please try again later.".to_string(),
            Self::Parse(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    /// Whether this failure was raised before any network call.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::MissingAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_surfaces_server_message() {
        let err = CommerceError::Rejected {
            status: Some(reqwest::StatusCode::UNAUTHORIZED),
            message: "incorrect email or password".to_string(),
        };
        assert_eq!(err.user_message(), "incorrect email or password");
        assert_eq!(err.to_string(), "incorrect email or password");
    }

    #[test]
    fn test_missing_auth_is_local() {
        assert!(CommerceError::MissingAuth.is_local());
        assert!(
            !CommerceError::Rejected {
                status: None,
                message: "nope".to_string()
            }
            .is_local()
        );
    }
}
