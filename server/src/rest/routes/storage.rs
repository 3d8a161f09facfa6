// rest/routes/storage.rs — screenshot uploads, forwarded to the
// provider's blob store under a per-user path.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::rest::bearer_token;
use crate::AppContext;

pub async fn storage_index() -> Json<Value> {
    Json(json!({
        "message": "Storage API",
        "endpoints": [
            "/upload - Upload files to storage"
        ],
        "note": "Authentication required for all endpoints"
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    file_data: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
}

pub async fn upload(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<UploadRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(token), Some(user_email)) =
        (bearer_token(&headers), body.user_email.filter(|v| !v.is_empty()))
    else {
        return Err(ApiError::Unauthorized("Authentication required".to_string()));
    };

    let (Some(file_data), Some(file_name)) = (
        body.file_data.filter(|v| !v.is_empty()),
        body.file_name.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::MissingInput(
            "File data and file name are required".to_string(),
        ));
    };

    let bytes = decode_data_uri(&file_data)
        .map_err(|e| ApiError::MissingInput(format!("Invalid file data: {e}")))?;

    let path = object_path(&user_email, &file_name);
    match ctx.provider.upload_object(&path, bytes, &token).await {
        Ok(file_url) => Ok(Json(json!({ "fileUrl": file_url }))),
        // Any refused or failed upload is a 500 for this route.
        Err(e) => Err(ctx.internal("Failed to upload file", e.into())),
    }
}

/// Per-user object path inside the screenshots bucket.
fn object_path(user_email: &str, file_name: &str) -> String {
    format!("screenshots/{user_email}/{file_name}")
}

/// Strip the `data:<mime>;base64,` prefix and decode the payload.
fn decode_data_uri(data: &str) -> Result<Vec<u8>, String> {
    let encoded = data.split_once(',').map(|(_, rest)| rest).unwrap_or(data);
    BASE64
        .decode(encoded.trim())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::{decode_data_uri, object_path};
    use crate::provider::stub::{Call, StubProvider};
    use crate::rest::routes::testing::{app, app_with, json_post, send};

    #[test]
    fn test_decode_data_uri() {
        assert_eq!(decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap(), b"hello");
        // A bare base64 payload without the prefix still decodes.
        assert_eq!(decode_data_uri("aGVsbG8=").unwrap(), b"hello");
        assert!(decode_data_uri("data:image/png;base64,???").is_err());
    }

    #[test]
    fn test_object_path() {
        assert_eq!(
            object_path("user@example.com", "note_1756450200123_42.png"),
            "screenshots/user@example.com/note_1756450200123_42.png"
        );
    }

    #[tokio::test]
    async fn test_upload_requires_token_and_email() {
        let (router, provider) = app();
        let body = json!({"fileData": "data:image/png;base64,aGVsbG8=", "fileName": "a.png", "userEmail": "u@e.c"});

        let (status, _) = send(router.clone(), json_post("/api/storage/upload", None, body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            router,
            json_post(
                "/api/storage/upload",
                Some("tok"),
                json!({"fileData": "data:image/png;base64,aGVsbG8=", "fileName": "a.png"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_file_fields() {
        let (router, provider) = app();
        let (status, body) = send(
            router,
            json_post(
                "/api/storage/upload",
                Some("tok"),
                json!({"userEmail": "user@example.com", "fileName": "a.png"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "File data and file name are required");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let (router, provider) = app();
        let (status, body) = send(
            router,
            json_post(
                "/api/storage/upload",
                Some("tok"),
                json!({
                    "fileData": "data:image/png;base64,aGVsbG8=",
                    "fileName": "note_1756450200123_42.png",
                    "userEmail": "user@example.com"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["fileUrl"],
            "https://proj.supabase.co/storage/v1/object/public/screenshots/user@example.com/note_1756450200123_42.png"
        );
        assert_eq!(
            provider.calls(),
            vec![Call::UploadObject {
                path: "screenshots/user@example.com/note_1756450200123_42.png".into(),
                token: "tok".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_refused_upload_is_500() {
        let (router, _) = app_with(StubProvider { reject_upload: true, ..Default::default() });
        let (status, body) = send(
            router,
            json_post(
                "/api/storage/upload",
                Some("tok"),
                json!({
                    "fileData": "data:image/png;base64,aGVsbG8=",
                    "fileName": "a.png",
                    "userEmail": "user@example.com"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to upload file");
    }
}
