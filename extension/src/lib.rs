/// ScrollNote - web clipper Chrome extension and companion website
/// Built with Rust + WASM + Yew

mod api;
mod coordinator;
mod messaging;
mod page;
mod session;
mod snap;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the companion website
#[wasm_bindgen]
pub fn start_viewer() {
    yew::Renderer::<ui::viewer::Viewer>::new().render();
}

// Content script entry: selection trigger + note panel
#[wasm_bindgen]
pub fn start_content() {
    ui::content::start();
}

// Background service worker entry: capture/save coordinator
#[wasm_bindgen]
pub fn start_background() {
    coordinator::init();
}
