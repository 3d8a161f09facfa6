/// Cross-context message protocol: content script <-> background <-> popup.
///
/// One closed set of variants, tagged on `action`, one response per
/// request. Nothing crosses the boundary except by value.
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::snap::SnapRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Message {
    /// Content script -> background: capture the visible tab for this record.
    #[serde(rename = "captureScreenshot")]
    CaptureScreenshot { data: SnapRecord },

    /// Background -> content script: capture finished (either way), show
    /// the note panel for the updated record.
    #[serde(rename = "showNoteInput")]
    ShowNoteInput { data: SnapRecord },

    /// Content script -> background: upload the screenshot if present and
    /// persist the record through the proxy.
    #[serde(rename = "saveToSupabase")]
    SaveSnap { data: SnapRecord },

    /// Background -> content script: terminal outcome of a save.
    #[serde(rename = "noteSaveResult")]
    SaveResult { success: bool, #[serde(default)] error: String },
}

impl Message {
    pub fn to_js(&self) -> Result<JsValue, String> {
        serde_wasm_bindgen::to_value(self).map_err(|e| format!("Failed to encode message: {e:?}"))
    }

    pub fn from_js(value: JsValue) -> Result<Message, String> {
        serde_wasm_bindgen::from_value(value).map_err(|e| format!("Failed to decode message: {e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SelectionPosition;

    fn record() -> SnapRecord {
        SnapRecord::new(
            "hello world".to_string(),
            "https://example.com".to_string(),
            "Demo".to_string(),
            None,
            SelectionPosition { x: 0.0, y: 0.0 },
            "2026-08-29T10:30:00.000Z".to_string(),
        )
    }

    #[test]
    fn test_capture_wire_shape() {
        let msg = Message::CaptureScreenshot { data: record() };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["action"], "captureScreenshot");
        assert_eq!(json["data"]["text"], "hello world");
    }

    #[test]
    fn test_save_wire_shape() {
        let msg = Message::SaveSnap { data: record() };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["action"], "saveToSupabase");
    }

    #[test]
    fn test_save_result_wire_shape() {
        let msg = Message::SaveResult { success: false, error: "Not signed in".to_string() };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["action"], "noteSaveResult");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Not signed in");
    }

    #[test]
    fn test_round_trip() {
        let msg = Message::ShowNoteInput { data: record() };
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();

        assert_eq!(back, msg);
    }

    #[test]
    fn test_result_error_defaults_empty() {
        let back: Message =
            serde_json::from_str(r#"{"action":"noteSaveResult","success":true}"#).unwrap();

        assert_eq!(back, Message::SaveResult { success: true, error: String::new() });
    }

    #[test]
    fn test_unknown_action_rejected() {
        let res: Result<Message, _> =
            serde_json::from_str(r#"{"action":"closeAllTabs","data":{}}"#);

        assert!(res.is_err());
    }
}
