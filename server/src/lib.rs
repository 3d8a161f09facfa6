//! ScrollNote API proxy.
//!
//! A stateless pass-through between the extension/website clients and the
//! hosted provider: each route validates that required fields are present,
//! forwards the call, and relays the provider's JSON. The proxy never
//! inspects bearer tokens — the provider rejects invalid ones when the
//! forwarded call arrives.

pub mod config;
pub mod error;
pub mod provider;
pub mod rate_limit;
pub mod rest;

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::provider::Provider;
use crate::rate_limit::RateLimiter;

pub struct AppContext {
    pub config: ServerConfig,
    pub provider: Arc<dyn Provider>,
    pub rate_limiter: RateLimiter,
    pub started_at: Instant,
}

impl AppContext {
    pub fn new(config: ServerConfig, provider: Arc<dyn Provider>) -> Self {
        let rate_limiter = RateLimiter::new(
            std::time::Duration::from_secs(config.rate_limit_window_secs),
            config.rate_limit_max,
        );
        Self {
            config,
            provider,
            rate_limiter,
            started_at: Instant::now(),
        }
    }

    /// Log an unexpected failure and build the client-facing 500. Detail
    /// stays server-side unless `expose_errors` is set (development).
    pub fn internal(&self, public_message: &str, err: anyhow::Error) -> ApiError {
        tracing::error!("{public_message}: {err:#}");
        let message = if self.config.expose_errors {
            format!("{public_message}: {err}")
        } else {
            public_message.to_string()
        };
        ApiError::Internal { message }
    }
}
