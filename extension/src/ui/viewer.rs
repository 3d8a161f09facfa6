/// ScrollNote website: the signed-in user's saved snaps.
///
/// Restores a persisted session from localStorage, fetches the snaps
/// newest-first through the proxy, and renders them as a card grid with
/// expandable text and an image lightbox. No pagination, caching, or
/// offline behavior.
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api;
use crate::page::{display_domain, format_timestamp, needs_truncation, truncate_snippet};
use crate::session::{clear_local_session, load_local_session, save_local_session};
use crate::snap::SavedSnap;
use crate::ui::components::{Button as ActionButton, ButtonVariant, PlaceholderImage};

const SNIPPET_CHARS: usize = 220;

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Notice(String),
    Error(String),
}

#[function_component(Viewer)]
pub fn viewer() -> Html {
    let state = use_state(|| ViewState::Loading);
    let user = use_state(load_local_session);
    let snaps = use_state(Vec::<SavedSnap>::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let lightbox = use_state(|| None::<String>);

    // Restore session and load snaps on mount
    {
        let state = state.clone();
        let user = user.clone();
        let snaps = snaps.clone();

        use_effect_with((), move |_| {
            match (*user).clone() {
                Some(current) => spawn_local(async move {
                    match api::fetch_snaps(&current).await {
                        Ok(list) => {
                            snaps.set(list);
                            state.set(ViewState::Idle);
                        }
                        Err(e) => state.set(ViewState::Error(format!("Failed to load snaps: {e}"))),
                    }
                }),
                None => state.set(ViewState::Idle),
            }
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
        let snaps = snaps.clone();
        let email = email.clone();
        let password = password.clone();

        Callback::from(move |_| {
            let email_value = (*email).clone();
            let password_value = (*password).clone();
            if email_value.is_empty() || password_value.is_empty() {
                state.set(ViewState::Error("Email and password are required".to_string()));
                return;
            }

            let state = state.clone();
            let user = user.clone();
            let snaps = snaps.clone();
            state.set(ViewState::Loading);

            spawn_local(async move {
                match api::sign_in(&email_value, &password_value).await {
                    Ok(signed_in) => {
                        if let Err(e) = save_local_session(&signed_in) {
                            state.set(ViewState::Error(e));
                            return;
                        }
                        match api::fetch_snaps(&signed_in).await {
                            Ok(list) => {
                                user.set(Some(signed_in));
                                snaps.set(list);
                                state.set(ViewState::Idle);
                            }
                            Err(e) => {
                                user.set(Some(signed_in));
                                state.set(ViewState::Error(format!("Failed to load snaps: {e}")));
                            }
                        }
                    }
                    Err(e) => state.set(ViewState::Error(format!("Sign in failed: {e}"))),
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
                state.set(ViewState::Error("Email and password are required".to_string()));
                return;
            }

            let state = state.clone();
            spawn_local(async move {
                match api::sign_up(&email_value, &password_value).await {
                    Ok(message) => state.set(ViewState::Notice(message)),
                    Err(e) => state.set(ViewState::Error(format!("Sign up failed: {e}"))),
                }
            });
        })
    };

    let on_sign_out = {
        let user = user.clone();
        let snaps = snaps.clone();

        Callback::from(move |_| {
            clear_local_session();
            user.set(None);
            snaps.set(Vec::new());
        })
    };

    let on_open_lightbox = {
        let lightbox = lightbox.clone();
        Callback::from(move |src: String| {
            lightbox.set(Some(src));
        })
    };

    let on_close_lightbox = {
        let lightbox = lightbox.clone();
        Callback::from(move |_| {
            lightbox.set(None);
        })
    };

    html! {
        <div style="max-width: 1100px; margin: 0 auto; padding: 24px;">
            <div style="display: flex; justify-content: space-between; align-items: center;">
                <h1>{"ScrollNote"}</h1>
                if let Some(current) = &*user {
                    <div style="display: flex; gap: 12px; align-items: center;">
                        <span>{&current.email}</span>
                        <ActionButton onclick={on_sign_out} variant={ButtonVariant::Secondary}>
                            {"Sign Out"}
                        </ActionButton>
                    </div>
                }
            </div>

            {match &*state {
                ViewState::Loading => html! {
                    <div style="text-align: center; margin: 40px 0;">
                        <Spinner />
                        <p>{"Loading snaps..."}</p>
                    </div>
                },
                ViewState::Notice(msg) => html! {
                    <Alert r#type={AlertType::Info} title={msg.clone()} inline={true}>
                    </Alert>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={err.clone()} inline={true}>
                    </Alert>
                },
                ViewState::Idle => html! {},
            }}

            if user.is_none() {
                <div style="display: flex; flex-direction: column; gap: 8px; max-width: 320px; margin: 24px auto;">
                    <input
                        type="email"
                        placeholder="Email"
                        value={(*email).clone()}
                        oninput={on_email_input}
                    />
                    <input
                        type="password"
                        placeholder="Password"
                        value={(*password).clone()}
                        oninput={on_password_input}
                    />
                    <div style="display: flex; gap: 8px;">
                        <ActionButton onclick={on_sign_in}>{"Sign In"}</ActionButton>
                        <ActionButton onclick={on_sign_up} variant={ButtonVariant::Secondary}>
                            {"Sign Up"}
                        </ActionButton>
                    </div>
                </div>
            } else if snaps.is_empty() && matches!(*state, ViewState::Idle) {
                <div style="text-align: center; margin: 40px 0; color: #888;">
                    <p>{"No snaps yet. Start capturing with the extension!"}</p>
                </div>
            } else {
                <div style="display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 16px; margin-top: 24px;">
                    {for snaps.iter().map(|snap| html! {
                        <SnapCard
                            key={snap.id.map(|id| id.to_string()).unwrap_or_else(|| snap.timestamp.clone())}
                            snap={snap.clone()}
                            on_open_image={on_open_lightbox.clone()}
                        />
                    })}
                </div>
            }

            // Full-size overlay; clicking it again closes it
            if let Some(src) = (*lightbox).clone() {
                <div
                    onclick={on_close_lightbox}
                    style="position: fixed; inset: 0; background: rgba(0,0,0,0.8); display: flex; align-items: center; justify-content: center; z-index: 10000; cursor: zoom-out;"
                >
                    <img src={src} alt="Enlarged screenshot" style="max-width: 90%; max-height: 90%;" />
                </div>
            }
        </div>
    }
}

// Snap card component
#[derive(Properties, PartialEq)]
struct SnapCardProps {
    snap: SavedSnap,
    on_open_image: Callback<String>,
}

#[function_component(SnapCard)]
fn snap_card(props: &SnapCardProps) -> Html {
    let expanded = use_state(|| false);
    let snap = &props.snap;

    let toggle_expanded = {
        let expanded = expanded.clone();
        Callback::from(move |_| {
            expanded.set(!*expanded);
        })
    };

    // Prefer the capture-time timestamp; the provider's created_at is the
    // fallback for snaps written by older extension builds.
    let date = if !snap.timestamp.is_empty() {
        format_timestamp(&snap.timestamp)
    } else {
        format_timestamp(snap.created_at.as_deref().unwrap_or(""))
    };

    let shown_text = if *expanded || !needs_truncation(&snap.text, SNIPPET_CHARS) {
        snap.text.clone()
    } else {
        truncate_snippet(&snap.text, SNIPPET_CHARS)
    };

    let source_label = display_domain(&snap.url).unwrap_or_else(|| snap.url.clone());

    html! {
        <div style="border: 1px solid #ddd; border-radius: 8px; padding: 16px; background: white;">
            <div style="display: flex; justify-content: space-between; gap: 8px;">
                <h3 style="margin: 0; font-size: 16px;">{&snap.title}</h3>
                <span style="color: #888; font-size: 13px; white-space: nowrap;">{date}</span>
            </div>

            <div style="margin: 12px 0;">
                if let Some(src) = &snap.screenshot {
                    <img
                        src={src.clone()}
                        alt="Screenshot"
                        style="max-width: 100%; border-radius: 4px; cursor: zoom-in;"
                        onclick={props.on_open_image.reform({
                            let src = src.clone();
                            move |_| src.clone()
                        })}
                    />
                } else {
                    <PlaceholderImage />
                }
            </div>

            <p style="margin: 8px 0; white-space: pre-wrap;">{shown_text}</p>
            if needs_truncation(&snap.text, SNIPPET_CHARS) {
                <a
                    style="color: #5B4FE8; cursor: pointer; font-size: 13px;"
                    onclick={toggle_expanded}
                >
                    {if *expanded { "Show less" } else { "Show more" }}
                </a>
            }

            <p style="margin: 8px 0; color: #555;">
                <strong>{"Note: "}</strong>
                {if snap.note.is_empty() { "No note".to_string() } else { snap.note.clone() }}
            </p>

            <a href={snap.url.clone()} target="_blank" style="font-size: 13px;">
                {source_label}
            </a>
        </div>
    }
}
