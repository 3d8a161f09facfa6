// rest/routes/auth.rs — sign-in and sign-up, forwarded to the provider's
// auth endpoints. Credentials are checked for presence only; the provider
// decides whether they are any good.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::provider::ProviderError;
use crate::AppContext;

pub async fn auth_index() -> Json<Value> {
    Json(json!({
        "message": "Auth API",
        "endpoints": [
            "/signin - User authentication",
            "/signup - User registration"
        ]
    }))
}

pub async fn signin_usage() -> Json<Value> {
    Json(json!({
        "message": "Authentication endpoint",
        "usage": "Send a POST request to this endpoint with email and password in the request body",
        "required_fields": ["email", "password"]
    }))
}

pub async fn signup_usage() -> Json<Value> {
    Json(json!({
        "message": "Registration endpoint",
        "usage": "Send a POST request to this endpoint with email and password in the request body",
        "required_fields": ["email", "password"]
    }))
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl CredentialsRequest {
    fn require(self) -> Result<(String, String), ApiError> {
        match (self.email, self.password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok((email, password))
            }
            _ => Err(ApiError::MissingInput(
                "Email and password are required".to_string(),
            )),
        }
    }
}

pub async fn sign_in(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = body.require()?;

    match ctx.provider.sign_in(&email, &password).await {
        Ok(session) => Ok(Json(json!({
            "user": {
                "email": email,
                "token": session.access_token,
            }
        }))),
        Err(ProviderError::Rejected(message)) => Err(ApiError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            message,
        }),
        Err(ProviderError::Transport(e)) => {
            Err(ctx.internal("An error occurred during sign in", e))
        }
    }
}

pub async fn sign_up(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (email, password) = body.require()?;

    match ctx.provider.sign_up(&email, &password).await {
        Ok(()) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Registration successful. Please check your email for confirmation."
            })),
        )),
        Err(ProviderError::Rejected(message)) => Err(ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message,
        }),
        Err(ProviderError::Transport(e)) => {
            Err(ctx.internal("An error occurred during registration", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::provider::stub::{Call, StubProvider};
    use crate::rest::routes::testing::{app, app_with, get_request, json_post, send};

    #[tokio::test]
    async fn test_sign_in_returns_session() {
        let (router, provider) = app();
        let (status, body) = send(
            router,
            json_post("/api/auth/signin", None, json!({"email": "user@example.com", "password": "pw"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "user@example.com");
        assert_eq!(body["user"]["token"], "stub-token");
        assert_eq!(provider.calls(), vec![Call::SignIn { email: "user@example.com".into() }]);
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials_is_401() {
        let (router, _) = app_with(StubProvider {
            reject_sign_in: Some("Invalid login credentials".to_string()),
            ..Default::default()
        });
        let (status, body) = send(
            router,
            json_post("/api/auth/signin", None, json!({"email": "user@example.com", "password": "nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Invalid login credentials");
        assert!(body.get("user").is_none());
    }

    #[tokio::test]
    async fn test_sign_in_missing_fields_is_400_without_provider_call() {
        let (router, provider) = app();
        let (status, body) = send(
            router,
            json_post("/api/auth/signin", None, json!({"email": "user@example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email and password are required");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_created() {
        let (router, _) = app();
        let (status, body) = send(
            router,
            json_post("/api/auth/signup", None, json!({"email": "new@example.com", "password": "pw"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_sign_up_rejection_is_400() {
        let (router, _) = app_with(StubProvider {
            reject_sign_up: Some("User already registered".to_string()),
            ..Default::default()
        });
        let (status, body) = send(
            router,
            json_post("/api/auth/signup", None, json!({"email": "new@example.com", "password": "pw"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User already registered");
    }

    #[tokio::test]
    async fn test_usage_endpoints_are_open() {
        let (router, provider) = app();
        let (status, body) = send(router, get_request("/api/auth/signin", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["required_fields"][0], "email");
        assert!(provider.calls().is_empty());
    }
}
