// rest/mod.rs — the proxy's public HTTP surface.
//
// Endpoints:
//   GET  /health
//   GET  /api/auth                GET  /api/auth/signin   POST /api/auth/signin
//   GET  /api/auth/signup         POST /api/auth/signup
//   GET  /api/snaps?email=        POST /api/snaps
//   GET  /api/storage             POST /api/storage/upload

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{rate_limit, AppContext};

// Screenshot data-URIs are the big payload; mirror the original 10 MB cap.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("ScrollNote proxy listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let cors = cors_layer(&ctx);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/auth", get(routes::auth::auth_index))
        .route(
            "/api/auth/signin",
            get(routes::auth::signin_usage).post(routes::auth::sign_in),
        )
        .route(
            "/api/auth/signup",
            get(routes::auth::signup_usage).post(routes::auth::sign_up),
        )
        .route(
            "/api/snaps",
            get(routes::snaps::list_snaps).post(routes::snaps::create_snap),
        )
        .route("/api/storage", get(routes::storage::storage_index))
        .route("/api/storage/upload", post(routes::storage::upload))
        .layer(axum::middleware::from_fn_with_state(
            ctx.clone(),
            rate_limit::middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(ctx)
}

/// Configured allow-list with credentials, or the relaxed shape that
/// mirrors whatever origin calls (extension pages have unpredictable
/// origins in development).
fn cors_layer(ctx: &AppContext) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    match ctx.config.origin_list() {
        Some(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!("Ignoring unparseable CORS origin {o:?}");
                        None
                    }
                })
                .collect();
            base.allow_origin(AllowOrigin::list(parsed))
        }
        None => base.allow_origin(AllowOrigin::mirror_request()),
    }
}

/// Pull the bearer token out of `Authorization: Bearer <token>`. Presence
/// only — validation is the provider's job.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
