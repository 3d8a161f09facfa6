/// Content-script overlay: the floating Save button and the note panel.
///
/// Injected into every page. A text selection shows exactly one Save
/// button; clicking it builds a record, shows the note panel immediately
/// in a waiting state, and asks the background coordinator for a
/// screenshot. The panel is the only piece of shared UI state and is owned
/// by a single `PanelController` — a new capture replaces any prior
/// unsaved panel wholesale.
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, Document, Element, HtmlButtonElement, HtmlTextAreaElement, MouseEvent};

use crate::messaging::Message;
use crate::snap::{SelectionPosition, SnapRecord};

// Chrome API bridge (content-script side).
#[wasm_bindgen(module = "/content.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    fn onRuntimeMessage(callback: &js_sys::Function);
}

const SAVE_BUTTON_CLASS: &str = "scrollnote-save-btn";
const DISMISS_DELAY_MS: i32 = 1200;

pub struct PanelController {
    document: Document,
    save_button: RefCell<Option<Element>>,
    panel: RefCell<Option<Element>>,
}

pub fn start() {
    let Some(window) = web_sys::window() else { return };
    let Some(document) = window.document() else { return };

    let controller = Rc::new(PanelController {
        document,
        save_button: RefCell::new(None),
        panel: RefCell::new(None),
    });

    // Selection trigger.
    {
        let handler = controller.clone();
        let on_mouseup = Closure::wrap(Box::new(move |e: MouseEvent| {
            handler.handle_mouseup(&e);
        }) as Box<dyn Fn(MouseEvent)>);
        let _ = controller
            .document
            .add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        on_mouseup.forget();
    }

    // Messages relayed back from the background coordinator.
    {
        let controller = controller.clone();
        let on_message = Closure::wrap(Box::new(move |message: JsValue| {
            match Message::from_js(message) {
                Ok(Message::ShowNoteInput { data }) => controller.show_panel(&data, false),
                Ok(Message::SaveResult { success, error }) => {
                    controller.handle_save_result(success, &error)
                }
                Ok(_) => {}
                Err(e) => console::error_1(&e.into()),
            }
        }) as Box<dyn Fn(JsValue)>);
        onRuntimeMessage(on_message.as_ref().unchecked_ref());
        on_message.forget();
    }
}

impl PanelController {
    fn handle_mouseup(self: &Rc<Self>, e: &MouseEvent) {
        self.remove_save_button();

        // The click that presses the Save button must not re-trigger it.
        if e.target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .is_some_and(|el| el.class_name() == SAVE_BUTTON_CLASS)
        {
            return;
        }

        let selection = web_sys::window().and_then(|w| w.get_selection().ok().flatten());
        let has_selection = selection
            .as_ref()
            .map(|s| !String::from(s.to_string()).trim().is_empty())
            .unwrap_or(false);
        if has_selection {
            self.show_save_button(e);
        }
    }

    fn show_save_button(self: &Rc<Self>, e: &MouseEvent) {
        let Ok(button) = self.document.create_element("button") else { return };
        button.set_text_content(Some("Save"));
        button.set_class_name(SAVE_BUTTON_CLASS);
        let _ = button.set_attribute(
            "style",
            &format!(
                "position:absolute; left:{}px; top:{}px; z-index:9999;",
                e.page_x(),
                e.page_y()
            ),
        );

        // Swallow mouseup so the document listener does not see it.
        let stop = Closure::wrap(Box::new(move |ev: MouseEvent| {
            ev.stop_propagation();
        }) as Box<dyn Fn(MouseEvent)>);
        let _ = button.add_event_listener_with_callback("mouseup", stop.as_ref().unchecked_ref());
        stop.forget();

        {
            let controller = self.clone();
            let on_click = Closure::wrap(Box::new(move |_: MouseEvent| {
                controller.capture_selection();
            }) as Box<dyn Fn(MouseEvent)>);
            let _ =
                button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            on_click.forget();
        }

        if let Some(body) = self.document.body() {
            let _ = body.append_child(&button);
            *self.save_button.borrow_mut() = Some(button);
        }
    }

    /// Build a record from the live selection and kick off the capture.
    /// The note panel appears immediately; the screenshot result updates
    /// it in place later.
    fn capture_selection(self: &Rc<Self>) {
        let Some(record) = self.build_record() else { return };

        self.show_panel(&record, true);

        let message = Message::CaptureScreenshot { data: record };
        spawn_local(async move {
            match message.to_js() {
                Ok(value) => {
                    if let Err(e) = sendRuntimeMessage(value).await {
                        console::error_1(&format!("Capture request failed: {e:?}").into());
                    }
                }
                Err(e) => console::error_1(&e.into()),
            }
        });
    }

    fn build_record(&self) -> Option<SnapRecord> {
        let window = web_sys::window()?;
        let selection = window.get_selection().ok().flatten()?;
        let text = String::from(selection.to_string()).trim().to_string();
        if text.is_empty() {
            return None;
        }

        let position = selection
            .get_range_at(0)
            .ok()
            .map(|range| {
                let rect = range.get_bounding_client_rect();
                SelectionPosition {
                    x: rect.left() + window.scroll_x().unwrap_or(0.0),
                    y: rect.top() + window.scroll_y().unwrap_or(0.0),
                }
            })
            .unwrap_or(SelectionPosition { x: 0.0, y: 0.0 });

        let heading = self
            .document
            .query_selector("h1")
            .ok()
            .flatten()
            .and_then(|h| h.text_content())
            .filter(|t| !t.is_empty());

        Some(SnapRecord::new(
            text,
            self.document.url().unwrap_or_default(),
            self.document.title(),
            heading,
            position,
            js_sys::Date::new_0().to_iso_string().into(),
        ))
    }

    /// Render the note panel. `waiting` marks the first phase, before the
    /// capture result has come back.
    fn show_panel(self: &Rc<Self>, record: &SnapRecord, waiting: bool) {
        self.remove_save_button();
        self.remove_panel();

        let Ok(panel) = self.document.create_element("div") else { return };
        panel.set_class_name("scrollnote-input");
        let _ = panel.set_attribute(
            "style",
            "position:fixed; top:50%; left:50%; transform:translate(-50%,-50%); z-index:10000; \
             background:#1f2430; color:#eee; padding:16px; border-radius:8px; min-width:320px; \
             box-shadow:0 8px 30px rgba(0,0,0,0.4);",
        );

        let warning = if record.screenshot_failed {
            r#"<div style="color:#ff6b6b; margin-bottom:8px;">Screenshot unavailable for this page.</div>"#
        } else if waiting {
            r#"<div style="color:#888888; margin-bottom:8px;">Attempting to capture screenshot...</div>"#
        } else {
            ""
        };
        panel.set_inner_html(&format!(
            r#"{warning}
            <textarea placeholder="Add your note..." style="width:100%; min-height:70px;"></textarea>
            <button id="scrollnote-submit-btn">Save Note</button>
            <button id="scrollnote-cancel-btn">Cancel</button>
            <div id="scrollnote-status-msg" style="margin-top:8px;"></div>"#
        ));

        // Submit: disable against double-submits, show progress, hand the
        // finished record to the coordinator.
        if let Ok(Some(submit)) = panel.query_selector("#scrollnote-submit-btn") {
            let controller = self.clone();
            let record = record.clone();
            let panel_el = panel.clone();
            let on_submit = Closure::wrap(Box::new(move |_: MouseEvent| {
                let mut record = record.clone();
                if let Ok(Some(textarea)) = panel_el.query_selector("textarea") {
                    if let Ok(textarea) = textarea.dyn_into::<HtmlTextAreaElement>() {
                        record.note = textarea.value();
                    }
                }
                if let Ok(Some(btn)) = panel_el.query_selector("#scrollnote-submit-btn") {
                    if let Ok(btn) = btn.dyn_into::<HtmlButtonElement>() {
                        btn.set_disabled(true);
                    }
                }
                controller.set_status("Saving...", "#888888");

                let message = Message::SaveSnap { data: record };
                spawn_local(async move {
                    match message.to_js() {
                        Ok(value) => {
                            if let Err(e) = sendRuntimeMessage(value).await {
                                console::error_1(&format!("Save request failed: {e:?}").into());
                            }
                        }
                        Err(e) => console::error_1(&e.into()),
                    }
                });
            }) as Box<dyn Fn(MouseEvent)>);
            let _ =
                submit.add_event_listener_with_callback("click", on_submit.as_ref().unchecked_ref());
            on_submit.forget();
        }

        if let Ok(Some(cancel)) = panel.query_selector("#scrollnote-cancel-btn") {
            let controller = self.clone();
            let on_cancel = Closure::wrap(Box::new(move |_: MouseEvent| {
                controller.remove_panel();
            }) as Box<dyn Fn(MouseEvent)>);
            let _ =
                cancel.add_event_listener_with_callback("click", on_cancel.as_ref().unchecked_ref());
            on_cancel.forget();
        }

        if let Some(body) = self.document.body() {
            let _ = body.append_child(&panel);
            *self.panel.borrow_mut() = Some(panel);
        }
    }

    fn handle_save_result(self: &Rc<Self>, success: bool, error: &str) {
        if self.panel.borrow().is_none() {
            return;
        }
        if success {
            self.set_status("Note saved successfully!", "#4ade80");
            self.dismiss_after(DISMISS_DELAY_MS);
        } else {
            let detail = if error.is_empty() { "Unknown error" } else { error };
            self.set_status(&format!("Failed to save note: {detail}"), "#ff6b6b");
            // Re-enable submit so the user can retry by hand.
            if let Some(panel) = self.panel.borrow().as_ref() {
                if let Ok(Some(btn)) = panel.query_selector("#scrollnote-submit-btn") {
                    if let Ok(btn) = btn.dyn_into::<HtmlButtonElement>() {
                        btn.set_disabled(false);
                    }
                }
            }
        }
    }

    fn set_status(&self, text: &str, color: &str) {
        if let Some(panel) = self.panel.borrow().as_ref() {
            if let Ok(Some(status)) = panel.query_selector("#scrollnote-status-msg") {
                status.set_text_content(Some(text));
                let _ = status.set_attribute("style", &format!("margin-top:8px; color:{color};"));
            }
        }
    }

    fn dismiss_after(self: &Rc<Self>, delay_ms: i32) {
        let Some(window) = web_sys::window() else { return };
        let controller = self.clone();
        let cb = Closure::wrap(Box::new(move || {
            controller.remove_panel();
        }) as Box<dyn Fn()>);
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay_ms);
        cb.forget();
    }

    fn remove_save_button(&self) {
        if let Some(button) = self.save_button.borrow_mut().take() {
            button.remove();
        }
    }

    fn remove_panel(&self) {
        if let Some(panel) = self.panel.borrow_mut().take() {
            panel.remove();
        }
    }
}
