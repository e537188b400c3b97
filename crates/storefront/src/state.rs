//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::commerce::CommerceClient;
use crate::config::StorefrontConfig;
use crate::stores::UserStores;

/// How long an idle browser session keeps its store bundle alive.
const STORES_IDLE_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the commerce API client, and the
/// per-browser-session store bundles.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    commerce: CommerceClient,
    stores: moka::sync::Cache<String, Arc<UserStores>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let commerce = CommerceClient::new(&config.commerce);

        // Store bundles are keyed by the session cookie's store id and
        // dropped after the session expiry of inactivity
        let stores = moka::sync::Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(Duration::from_secs(STORES_IDLE_SECONDS))
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                commerce,
                stores,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce API client.
    #[must_use]
    pub fn commerce(&self) -> &CommerceClient {
        &self.inner.commerce
    }

    /// Get (or lazily create) the store bundle for a browser session.
    #[must_use]
    pub fn user_stores(&self, store_id: &str) -> Arc<UserStores> {
        self.inner.stores.get_with(store_id.to_string(), || {
            Arc::new(UserStores::new(self.inner.commerce.clone()))
        })
    }
}
