/// Popup UI for the ScrollNote extension

use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api;
use crate::session::{StoredUser, SESSION_KEY};
use crate::ui::components::{Button as ActionButton, ButtonVariant};

/// Where "View My Notes" takes the user.
const WEBSITE_URL: &str = "https://scrollnote-home.onrender.com";

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(key: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;
}

#[derive(Clone, PartialEq)]
enum PopupState {
    Idle,
    Busy(String),
    Notice(String),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Idle);
    let user = use_state(|| None::<StoredUser>);
    let email = use_state(String::new);
    let password = use_state(String::new);

    // Restore the stored session on mount
    {
        let user = user.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                if let Ok(value) = getStorage(SESSION_KEY).await {
                    if let Ok(stored) = StoredUser::from_storage_value(value) {
                        user.set(stored);
                    }
                }
            });
            || ()
        });
    }

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let on_sign_in = {
        let state = state.clone();
        let user = user.clone();
        let email = email.clone();
        let password = password.clone();

        Callback::from(move |_| {
            let email_value = (*email).clone();
            let password_value = (*password).clone();
            if email_value.is_empty() || password_value.is_empty() {
                state.set(PopupState::Error("Email and password are required".to_string()));
                return;
            }

            let state = state.clone();
            let user = user.clone();
            state.set(PopupState::Busy("Signing in...".to_string()));

            spawn_local(async move {
                match api::sign_in(&email_value, &password_value).await {
                    Ok(signed_in) => match signed_in.to_storage_value() {
                        Ok(value) => {
                            if let Err(e) = setStorage(SESSION_KEY, value).await {
                                state.set(PopupState::Error(format!("Failed to store session: {e:?}")));
                                return;
                            }
                            user.set(Some(signed_in));
                            state.set(PopupState::Idle);
                        }
                        Err(e) => state.set(PopupState::Error(e)),
                    },
                    Err(e) => state.set(PopupState::Error(format!("Sign in failed: {e}"))),
                }
            });
        })
    };

    let on_sign_up = {
        let state = state.clone();
        let email = email.clone();
        let password = password.clone();

        Callback::from(move |_| {
            let email_value = (*email).clone();
            let password_value = (*password).clone();
            if email_value.is_empty() || password_value.is_empty() {
                state.set(PopupState::Error("Email and password are required".to_string()));
                return;
            }

            let state = state.clone();
            state.set(PopupState::Busy("Signing up...".to_string()));

            spawn_local(async move {
                match api::sign_up(&email_value, &password_value).await {
                    Ok(message) => state.set(PopupState::Notice(message)),
                    Err(e) => state.set(PopupState::Error(format!("Sign up failed: {e}"))),
                }
            });
        })
    };

    let on_sign_out = {
        let state = state.clone();
        let user = user.clone();

        Callback::from(move |_| {
            let state = state.clone();
            let user = user.clone();
            spawn_local(async move {
                if let Err(e) = removeStorage(SESSION_KEY).await {
                    state.set(PopupState::Error(format!("Failed to sign out: {e:?}")));
                    return;
                }
                user.set(None);
                state.set(PopupState::Idle);
            });
        })
    };

    let on_view_notes = {
        Callback::from(move |_| {
            spawn_local(async move {
                let _ = openTab(WEBSITE_URL).await;
            });
        })
    };

    let is_busy = matches!(*state, PopupState::Busy(_));

    html! {
        <div style="padding: 16px; min-width: 280px;">
            <h1 style="font-size: 18px; margin: 0 0 12px;">{"ScrollNote"}</h1>

            {match &*state {
                PopupState::Busy(msg) => html! {
                    <div style="text-align: center; margin: 8px 0;">
                        <Spinner />
                        <p>{msg}</p>
                    </div>
                },
                PopupState::Notice(msg) => html! {
                    <Alert r#type={AlertType::Info} title={msg.clone()} inline={true}>
                    </Alert>
                },
                PopupState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={err.clone()} inline={true}>
                    </Alert>
                },
                PopupState::Idle => html! {},
            }}

            if let Some(current) = &*user {
                <div>
                    <p style="margin: 8px 0;">{format!("Signed in as {}", current.email)}</p>
                    <div style="display: flex; gap: 8px;">
                        <ActionButton onclick={on_view_notes}>
                            {"View My Notes"}
                        </ActionButton>
                        <ActionButton onclick={on_sign_out} variant={ButtonVariant::Secondary}>
                            {"Sign Out"}
                        </ActionButton>
                    </div>
                </div>
            } else {
                <div style="display: flex; flex-direction: column; gap: 8px;">
                    <input
                        type="email"
                        placeholder="Email"
                        value={(*email).clone()}
                        oninput={on_email_input}
                        disabled={is_busy}
                    />
                    <input
                        type="password"
                        placeholder="Password"
                        value={(*password).clone()}
                        oninput={on_password_input}
                        disabled={is_busy}
                    />
                    <div style="display: flex; gap: 8px;">
                        <ActionButton onclick={on_sign_in} disabled={is_busy}>
                            {"Sign In"}
                        </ActionButton>
                        <ActionButton onclick={on_sign_up} disabled={is_busy} variant={ButtonVariant::Secondary}>
                            {"Sign Up"}
                        </ActionButton>
                    </div>
                </div>
            }
        </div>
    }
}
