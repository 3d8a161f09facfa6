/// Background coordinator: owns every in-flight capture/save.
///
/// Two requests come in from content scripts: capture the visible tab, and
/// persist a finished record. Each external call is attempted exactly once.
/// A failed capture or upload degrades the record to no-screenshot and the
/// flow continues; only a failed save is reported as an error.
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::console;

use crate::api;
use crate::messaging::Message;
use crate::session::{StoredUser, SESSION_KEY};
use crate::snap::SnapRecord;

// Chrome API bridge (service-worker side).
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn captureVisibleTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendToTab(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendToActiveTab(message: JsValue) -> Result<JsValue, JsValue>;

    fn onRuntimeMessage(callback: &js_sys::Function);
}

/// Register the runtime message listener. Called once from the service
/// worker entry point.
pub fn init() {
    let callback = Closure::wrap(Box::new(move |message: JsValue, sender_tab: JsValue| {
        let tab_id = sender_tab.as_f64().map(|id| id as i32);
        match Message::from_js(message) {
            Ok(Message::CaptureScreenshot { data }) => {
                spawn_local(handle_capture(data, tab_id));
            }
            Ok(Message::SaveSnap { data }) => {
                spawn_local(handle_save(data, tab_id));
            }
            Ok(other) => {
                log::warn!("Background received a message meant for a tab: {other:?}");
            }
            Err(e) => {
                console::error_1(&format!("Undecodable runtime message: {e}").into());
            }
        }
    }) as Box<dyn Fn(JsValue, JsValue)>);

    onRuntimeMessage(callback.as_ref().unchecked_ref());
    callback.forget();
}

/// One capture attempt, then show the note panel either way.
async fn handle_capture(mut record: SnapRecord, sender_tab: Option<i32>) {
    let result = capture().await;
    if let Err(e) = &result {
        console::error_1(&format!("Screenshot capture failed: {e}").into());
    }
    record.apply_capture(result);
    deliver(sender_tab, &Message::ShowNoteInput { data: record }).await;
}

/// Upload (if there is anything to upload), persist, report back.
async fn handle_save(record: SnapRecord, sender_tab: Option<i32>) {
    let result = save_snap(record).await;
    let message = match result {
        Ok(()) => Message::SaveResult { success: true, error: String::new() },
        Err(e) => {
            console::error_1(&format!("Save failed: {e}").into());
            Message::SaveResult { success: false, error: e }
        }
    };
    deliver(sender_tab, &message).await;
}

async fn save_snap(mut record: SnapRecord) -> Result<(), String> {
    let stored = getStorage(SESSION_KEY)
        .await
        .map_err(|e| format!("Storage unavailable: {e:?}"))?;
    let user = StoredUser::from_storage_value(stored)?
        .ok_or_else(|| "User not authenticated".to_string())?;

    // One upload attempt; failure degrades the snap to no-screenshot
    // rather than aborting the save.
    if let Some(data_uri) = record.screenshot.clone().filter(|s| s.starts_with("data:")) {
        let file_name = fresh_screenshot_name();
        match api::upload_screenshot(&data_uri, &file_name, &user).await {
            Ok(url) => record.screenshot = Some(url),
            Err(e) => {
                console::error_1(&format!("Screenshot upload failed: {e}").into());
                record.screenshot = None;
            }
        }
    }

    let payload = record.into_payload(user.email.clone());
    api::create_snap(&payload, &user.token).await
}

/// Relay a message to the tab that asked, falling back to the active tab
/// when the sender is gone (navigation, closed tab).
async fn deliver(sender_tab: Option<i32>, message: &Message) {
    let value = match message.to_js() {
        Ok(v) => v,
        Err(e) => {
            console::error_1(&e.into());
            return;
        }
    };

    if let Some(tab_id) = sender_tab {
        if sendToTab(tab_id, value.clone()).await.is_ok() {
            return;
        }
    }
    if let Err(e) = sendToActiveTab(value).await {
        console::error_1(&format!("No tab reachable for relay: {e:?}").into());
    }
}

async fn capture() -> Result<String, String> {
    let data = captureVisibleTab()
        .await
        .map_err(|e| format!("{e:?}"))?;
    data.as_string().ok_or_else(|| "Capture returned no image data".to_string())
}

fn fresh_screenshot_name() -> String {
    let now_ms = js_sys::Date::now() as u64;
    let suffix = (js_sys::Math::random() * 10_000.0) as u32;
    screenshot_file_name(now_ms, suffix)
}

/// `note_<ms>_<suffix>.png` — the random suffix keeps two captures in the
/// same millisecond from colliding in the per-user storage folder.
pub fn screenshot_file_name(timestamp_ms: u64, suffix: u32) -> String {
    format!("note_{timestamp_ms}_{suffix}.png")
}
