/// Data structures for ScrollNote
use serde::{Deserialize, Serialize};

/// Page offset of the captured selection, informational only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionPosition {
    pub x: f64,
    pub y: f64,
}

/// A snap as it moves between the content script, the background
/// coordinator, and the popup. `screenshot` holds a data-URI while the
/// capture is in flight and a public URL after upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapRecord {
    pub text: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub heading: Option<String>,
    pub position: SelectionPosition,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub screenshot: Option<String>,
    /// Transient: set when the capture API failed, shown as a warning in
    /// the note panel. Never part of the persisted payload.
    #[serde(default)]
    pub screenshot_failed: bool,
    pub timestamp: String,
}

impl SnapRecord {
    pub fn new(text: String, url: String, title: String, heading: Option<String>, position: SelectionPosition, timestamp: String) -> SnapRecord {
        SnapRecord {
            text,
            url,
            title,
            heading,
            position,
            note: String::new(),
            screenshot: None,
            screenshot_failed: false,
            timestamp,
        }
    }

    /// Fold the screenshot capture outcome into the record. Failure is
    /// non-fatal: the record continues without an image, flagged so the
    /// note panel can warn the user.
    pub fn apply_capture(&mut self, result: Result<String, String>) {
        match result {
            Ok(data_uri) => {
                self.screenshot = Some(data_uri);
                self.screenshot_failed = false;
            }
            Err(_) => {
                self.screenshot = None;
                self.screenshot_failed = true;
            }
        }
    }

    /// Convert into the payload submitted to the proxy. The transient
    /// failure flag has no counterpart here, and a screenshot that is
    /// still a data-URI (upload never ran or failed) is dropped — a
    /// persisted snap carries a reachable URL or nothing.
    pub fn into_payload(self, user_email: String) -> SnapPayload {
        let screenshot = self.screenshot.filter(|s| !s.starts_with("data:"));
        SnapPayload {
            text: self.text,
            url: self.url,
            title: self.title,
            heading: self.heading,
            position: self.position,
            note: self.note,
            screenshot,
            user_email,
            timestamp: self.timestamp,
        }
    }
}

/// The persisted shape, one-to-one with the proxy's snap-create route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapPayload {
    pub text: String,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub position: SelectionPosition,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    pub user_email: String,
    pub timestamp: String,
}

/// A snap as returned by the proxy's query route. Provider-assigned
/// columns (`id`, `created_at`) come back alongside the submitted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSnap {
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SnapRecord {
        SnapRecord::new(
            "hello world".to_string(),
            "https://example.com/page".to_string(),
            "Demo".to_string(),
            Some("Welcome".to_string()),
            SelectionPosition { x: 12.0, y: 340.5 },
            "2026-08-29T10:30:00.000Z".to_string(),
        )
    }

    #[test]
    fn test_apply_capture_success() {
        let mut snap = record();
        snap.apply_capture(Ok("data:image/png;base64,AAAA".to_string()));

        assert_eq!(snap.screenshot.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(!snap.screenshot_failed);
    }

    #[test]
    fn test_apply_capture_failure() {
        let mut snap = record();
        snap.apply_capture(Err("activeTab not granted".to_string()));

        assert_eq!(snap.screenshot, None);
        assert!(snap.screenshot_failed);
    }

    #[test]
    fn test_payload_never_carries_failure_flag() {
        let mut snap = record();
        snap.apply_capture(Err("capture error".to_string()));

        let payload = snap.into_payload("user@example.com".to_string());
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("screenshot_failed").is_none());
        assert!(json.get("screenshot").is_none());
        assert_eq!(json["user_email"], "user@example.com");
    }

    #[test]
    fn test_payload_drops_unuploaded_data_uri() {
        let mut snap = record();
        snap.apply_capture(Ok("data:image/png;base64,AAAA".to_string()));

        // Upload never resolved the data-URI to a URL.
        let payload = snap.into_payload("user@example.com".to_string());
        assert_eq!(payload.screenshot, None);
    }

    #[test]
    fn test_payload_keeps_uploaded_url() {
        let mut snap = record();
        snap.screenshot = Some(
            "https://x.supabase.co/storage/v1/object/public/screenshots/u/note_1_2.png".to_string(),
        );

        let payload = snap.into_payload("user@example.com".to_string());
        assert!(payload.screenshot.is_some());
    }

    #[test]
    fn test_record_serialization() {
        let snap = record();
        let json = serde_json::to_string(&snap).unwrap();
        let back: SnapRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snap);
        assert_eq!(back.position.x, 12.0);
    }

    #[test]
    fn test_record_carries_no_identity() {
        // Identity comes from the stored session at save time; the record
        // crossing the messaging boundary has no user field at all.
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("user_email").is_none());
    }

    #[test]
    fn test_record_tolerates_missing_optional_fields() {
        // Payloads from older panels may omit note/screenshot entirely.
        let json = r#"{
            "text": "hello",
            "url": "https://example.com",
            "title": "Demo",
            "position": {"x": 0.0, "y": 0.0},
            "timestamp": "2026-08-29T10:30:00.000Z"
        }"#;
        let snap: SnapRecord = serde_json::from_str(json).unwrap();

        assert_eq!(snap.note, "");
        assert_eq!(snap.screenshot, None);
        assert!(!snap.screenshot_failed);
    }
}
