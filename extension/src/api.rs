/// HTTP client for the ScrollNote proxy.
///
/// Every authenticated call sends the opaque bearer token as-is; the proxy
/// checks presence only and the provider does the real validation. No call
/// is retried — a failure is surfaced to the caller and the user repeats
/// the action.
use js_sys::Promise;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::session::StoredUser;
use crate::snap::{SavedSnap, SnapPayload};

/// Proxy base URL. Set SCROLLNOTE_API_URL at build time to point a bundle
/// at a deployed backend; unset, it targets a local dev server.
pub const API_BASE: &str = match option_env!("SCROLLNOTE_API_URL") {
    Some(url) => url,
    None => "http://localhost:5000",
};

// Bind the global fetch so the same client works from the popup, the
// website page, and the background service worker (no Window there).
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = fetch)]
    fn global_fetch(input: &Request) -> Promise;
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    user: StoredUser,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    file_data: &'a str,
    file_name: &'a str,
    user_email: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub async fn sign_in(email: &str, password: &str) -> Result<StoredUser, String> {
    let body = serde_json::to_string(&Credentials { email, password }).map_err(|e| e.to_string())?;
    let text = request("POST", "/api/auth/signin", Some(&body), None).await?;
    let parsed: SignInResponse =
        serde_json::from_str(&text).map_err(|e| format!("Unexpected sign-in response: {e}"))?;
    Ok(parsed.user)
}

pub async fn sign_up(email: &str, password: &str) -> Result<String, String> {
    let body = serde_json::to_string(&Credentials { email, password }).map_err(|e| e.to_string())?;
    let text = request("POST", "/api/auth/signup", Some(&body), None).await?;
    let parsed: SignUpResponse = serde_json::from_str(&text).unwrap_or(SignUpResponse {
        message: "Registration successful.".to_string(),
    });
    Ok(parsed.message)
}

/// Fetch the signed-in user's snaps, newest first (ordering is applied by
/// the proxy's provider query).
pub async fn fetch_snaps(user: &StoredUser) -> Result<Vec<SavedSnap>, String> {
    let path = format!("/api/snaps?email={}", urlencode(&user.email));
    let text = request("GET", &path, None, Some(&user.token)).await?;
    serde_json::from_str(&text).map_err(|e| format!("Unexpected snaps response: {e}"))
}

pub async fn create_snap(payload: &SnapPayload, token: &str) -> Result<(), String> {
    let body = serde_json::to_string(payload).map_err(|e| e.to_string())?;
    request("POST", "/api/snaps", Some(&body), Some(token)).await?;
    Ok(())
}

/// Upload a captured screenshot (data-URI) and get back its public URL.
pub async fn upload_screenshot(
    data_uri: &str,
    file_name: &str,
    user: &StoredUser,
) -> Result<String, String> {
    let body = serde_json::to_string(&UploadRequest {
        file_data: data_uri,
        file_name,
        user_email: &user.email,
    })
    .map_err(|e| e.to_string())?;
    let text = request("POST", "/api/storage/upload", Some(&body), Some(&user.token)).await?;
    let parsed: UploadResponse =
        serde_json::from_str(&text).map_err(|e| format!("Unexpected upload response: {e}"))?;
    Ok(parsed.file_url)
}

/// One fetch round-trip. Non-2xx responses become `Err` carrying the
/// proxy's `message` where the body has one.
async fn request(
    method: &str,
    path: &str,
    json_body: Option<&str>,
    token: Option<&str>,
) -> Result<String, String> {
    let headers = Headers::new().map_err(|e| format!("{e:?}"))?;
    if json_body.is_some() {
        headers
            .append("Content-Type", "application/json")
            .map_err(|e| format!("{e:?}"))?;
    }
    if let Some(token) = token {
        headers
            .append("Authorization", &format!("Bearer {token}"))
            .map_err(|e| format!("{e:?}"))?;
    }

    let init = RequestInit::new();
    init.set_method(method);
    init.set_headers(&headers);
    if let Some(body) = json_body {
        init.set_body(&JsValue::from_str(body));
    }

    let url = format!("{API_BASE}{path}");
    let req = Request::new_with_str_and_init(&url, &init).map_err(|e| format!("{e:?}"))?;

    let resp_value = JsFuture::from(global_fetch(&req))
        .await
        .map_err(|_| "Network error: could not reach the ScrollNote backend".to_string())?;
    let resp: Response = resp_value.dyn_into().map_err(|e| format!("{e:?}"))?;

    let text_promise = resp.text().map_err(|e| format!("{e:?}"))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| format!("{e:?}"))?
        .as_string()
        .unwrap_or_default();

    if resp.ok() {
        Ok(text)
    } else {
        Err(error_message(resp.status(), &text))
    }
}

/// Pull the proxy's `{error, message}` body apart; fall back to the status
/// code when the body is not ours.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => format!("Request failed with status {status}"),
    }
}

fn urlencode(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => c.to_string(),
            _ => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{b:02X}"))
                    .collect()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_is_a_usable_prefix() {
        // Request URLs are built as `{API_BASE}{path}` with a leading
        // slash on every path, so the base must not end with one.
        assert!(API_BASE.starts_with("http"));
        assert!(!API_BASE.ends_with('/'));
    }

    #[test]
    fn test_error_message_prefers_body() {
        assert_eq!(
            error_message(401, r#"{"error":true,"message":"Authentication required"}"#),
            "Authentication required"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "Request failed with status 502");
        assert_eq!(error_message(500, r#"{"error":true}"#), "Request failed with status 500");
    }

    #[test]
    fn test_urlencode_email() {
        assert_eq!(urlencode("user@example.com"), "user%40example.com");
        assert_eq!(urlencode("plain"), "plain");
    }

    #[test]
    fn test_upload_request_wire_shape() {
        let body = serde_json::to_value(&UploadRequest {
            file_data: "data:image/png;base64,AAAA",
            file_name: "note_1_2.png",
            user_email: "user@example.com",
        })
        .unwrap();

        assert_eq!(body["fileData"], "data:image/png;base64,AAAA");
        assert_eq!(body["fileName"], "note_1_2.png");
        assert_eq!(body["userEmail"], "user@example.com");
    }
}
