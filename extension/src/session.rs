/// Signed-in session handling.
///
/// The extension keeps one `{email, token}` object under a well-known key
/// in `chrome.storage.local`; the website keeps the same JSON in
/// `window.localStorage`. The token is opaque — it is read on every
/// authenticated call and deleted on sign-out, never inspected.
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

pub const SESSION_KEY: &str = "scrollnote_user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub email: String,
    pub token: String,
}

impl StoredUser {
    /// Decode the value handed back by a storage bridge. Absent keys come
    /// through as null/undefined and mean "not signed in".
    pub fn from_storage_value(value: JsValue) -> Result<Option<StoredUser>, String> {
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| format!("Failed to parse stored session: {e:?}"))
    }

    pub fn to_storage_value(&self) -> Result<JsValue, String> {
        serde_wasm_bindgen::to_value(self).map_err(|e| format!("Failed to serialize session: {e:?}"))
    }
}

/// Load the website session from `window.localStorage`.
pub fn load_local_session() -> Option<StoredUser> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let raw = storage.get_item(SESSION_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

/// Persist the website session in `window.localStorage`.
pub fn save_local_session(user: &StoredUser) -> Result<(), String> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())?;
    let json = serde_json::to_string(user).map_err(|e| format!("Failed to serialize session: {e}"))?;
    storage
        .set_item(SESSION_KEY, &json)
        .map_err(|e| format!("Failed to persist session: {e:?}"))
}

pub fn clear_local_session() {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let user = StoredUser {
            email: "user@example.com".to_string(),
            token: "opaque-bearer".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        let back: StoredUser = serde_json::from_str(&json).unwrap();

        assert_eq!(back, user);
    }

    #[test]
    fn test_expected_wire_fields() {
        let user = StoredUser {
            email: "user@example.com".to_string(),
            token: "t".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["token"], "t");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_partial_session() {
        // A session without a token is useless; fail loudly rather than
        // carrying a half-signed-in state around.
        let res: Result<StoredUser, _> = serde_json::from_str(r#"{"email":"a@b.c"}"#);
        assert!(res.is_err());
    }
}
