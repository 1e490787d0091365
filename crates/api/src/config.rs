//! Process configuration.
//!
//! Everything the service depends on (collaborator base URLs, lookup
//! timeout, store selection, bind address, request-shaping policy) is read
//! from the environment once at startup and injected at construction time.
//! Nothing below this layer reads globals.

use std::time::Duration;

/// Where sales are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process memory; data dies with the process. Dev/test only.
    Memory,
    /// Postgres at the given URL.
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Base URL of the customer directory service.
    pub customers_url: String,
    /// Base URL of the product catalog service.
    pub products_url: String,
    /// Per-request timeout for collaborator lookups. Single attempt, no retry.
    pub lookup_timeout: Duration,
    pub store: StoreBackend,
    /// Recognized request-layer policy (off by default): silently drop
    /// non-positive-quantity entries from an incoming request before
    /// validation. If nothing survives the filter the request is rejected as
    /// empty. This shapes the request; the validator itself always rejects a
    /// non-positive quantity it is handed.
    pub drop_non_positive_quantities: bool,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` selects the Postgres store; without it the service runs
    /// on the in-memory store and says so loudly.
    pub fn from_env() -> Self {
        let store = match std::env::var("DATABASE_URL") {
            Ok(database_url) => StoreBackend::Postgres { database_url },
            Err(_) => {
                tracing::warn!("DATABASE_URL not set; using in-memory store (dev only)");
                StoreBackend::Memory
            }
        };

        let lookup_timeout = std::env::var("LOOKUP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            customers_url: env_or("CUSTOMERS_SERVICE_URL", "http://localhost:3002"),
            products_url: env_or("PRODUCTS_SERVICE_URL", "http://localhost:3001"),
            lookup_timeout,
            store,
            drop_non_positive_quantities: env_flag("DROP_NON_POSITIVE_QUANTITIES"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}
