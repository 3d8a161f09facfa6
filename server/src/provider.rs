//! Client for the hosted provider (Supabase-compatible auth, record
//! store, and blob storage).
//!
//! No logic beyond request construction and response pass-through lives
//! here. Every call carries the project anon key; user-scoped calls also
//! carry the caller's bearer token, which the provider validates (the
//! proxy never does).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered and said no (bad credentials, malformed
    /// record, refused upload). The message is client-safe.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or answered garbage.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// A successful password sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
}

/// Selection offset within the captured page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// The typed insert payload for the snaps table. There is deliberately no
/// transient-state field here: whatever UI bookkeeping a client sends
/// alongside a record is dropped at the route boundary and never reaches
/// the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapInsert {
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    pub user_email: String,
    #[serde(default)]
    pub timestamp: String,
}

#[async_trait]
pub trait Provider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), ProviderError>;
    /// Snaps owned by `user_email`, newest first, relayed verbatim.
    async fn list_snaps(&self, user_email: &str, token: &str) -> Result<Value, ProviderError>;
    async fn create_snap(&self, snap: &SnapInsert, token: &str) -> Result<Value, ProviderError>;
    /// Upload a blob and return its public URL.
    async fn upload_object(
        &self,
        path: &str,
        bytes: Vec<u8>,
        token: &str,
    ) -> Result<String, ProviderError>;
}

pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn public_object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}", self.base_url, path)
    }
}

#[async_trait]
impl Provider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError> {
        let resp = self
            .http
            .post(self.url("/auth/v1/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let body: TokenResponse = resp.json().await.map_err(anyhow::Error::from)?;
        match body.access_token {
            Some(access_token) => Ok(AuthSession { access_token }),
            None => Err(ProviderError::Rejected(
                body.error_description
                    .or(body.msg)
                    .unwrap_or_else(|| "Authentication failed".to_string()),
            )),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let resp = self
            .http
            .post(self.url("/auth/v1/signup"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        if resp.status().is_success() {
            return Ok(());
        }
        let body: TokenResponse = resp.json().await.map_err(anyhow::Error::from)?;
        Err(ProviderError::Rejected(
            body.msg
                .or(body.error_description)
                .unwrap_or_else(|| "Registration failed".to_string()),
        ))
    }

    async fn list_snaps(&self, user_email: &str, token: &str) -> Result<Value, ProviderError> {
        let resp = self
            .http
            .get(self.url("/rest/v1/snaps"))
            .query(&[
                ("user_email", format!("eq.{user_email}")),
                ("order", "created_at.desc".to_string()),
            ])
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        resp.json().await.map_err(|e| anyhow::Error::from(e).into())
    }

    async fn create_snap(&self, snap: &SnapInsert, token: &str) -> Result<Value, ProviderError> {
        let resp = self
            .http
            .post(self.url("/rest/v1/snaps"))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(token)
            .json(snap)
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        if !resp.status().is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected(if detail.is_empty() {
                "Provider rejected the record".to_string()
            } else {
                detail
            }));
        }
        resp.json().await.map_err(|e| anyhow::Error::from(e).into())
    }

    async fn upload_object(
        &self,
        path: &str,
        bytes: Vec<u8>,
        token: &str,
    ) -> Result<String, ProviderError> {
        let resp = self
            .http
            .post(self.url(&format!("/storage/v1/object/{path}")))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/octet-stream")
            .bearer_auth(token)
            .body(bytes)
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        if !resp.status().is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected(format!(
                "Failed to upload file: {detail}"
            )));
        }
        Ok(self.public_object_url(path))
    }
}
