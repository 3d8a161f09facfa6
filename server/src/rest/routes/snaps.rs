// rest/routes/snaps.rs — the saved-record store, proxied to the
// provider's table. Row-level ownership (user_email must match the token's
// identity) is enforced by the provider's policy, not here.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::provider::{Position, ProviderError, SnapInsert};
use crate::rest::bearer_token;
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    email: Option<String>,
}

pub async fn list_snaps(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(token), Some(email)) = (bearer_token(&headers), query.email.filter(|e| !e.is_empty()))
    else {
        return Err(ApiError::Unauthorized("Authentication required".to_string()));
    };

    match ctx.provider.list_snaps(&email, &token).await {
        Ok(snaps) => Ok(Json(snaps)),
        Err(e) => Err(ctx.internal("Failed to fetch snaps", e.into())),
    }
}

/// Loosely-typed inbound shape: required fields are options so their
/// absence maps to the contract's 400 rather than a deserialization
/// rejection. Unknown fields (any UI bookkeeping a client sends along)
/// are dropped here and never reach the provider.
#[derive(Debug, Deserialize)]
pub struct CreateSnapRequest {
    #[serde(default)]
    user_email: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    screenshot: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

pub async fn create_snap(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<CreateSnapRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Some(token) = bearer_token(&headers) else {
        return Err(ApiError::Unauthorized("Authentication required".to_string()));
    };

    let (Some(user_email), Some(text), Some(url)) = (
        body.user_email.filter(|v| !v.is_empty()),
        body.text.filter(|v| !v.is_empty()),
        body.url.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::MissingInput("Missing required snap data".to_string()));
    };

    let snap = SnapInsert {
        text,
        url,
        title: body.title.unwrap_or_default(),
        heading: body.heading,
        position: body.position,
        note: body.note.unwrap_or_default(),
        screenshot: body.screenshot,
        user_email,
        timestamp: body.timestamp.unwrap_or_default(),
    };

    match ctx.provider.create_snap(&snap, &token).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(ProviderError::Rejected(message)) => Err(ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message,
        }),
        Err(ProviderError::Transport(e)) => Err(ctx.internal("Failed to create snap", e)),
    }
}
