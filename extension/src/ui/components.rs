/// Reusable UI components

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ButtonProps {
    pub onclick: Callback<MouseEvent>,
    pub children: Children,
    #[prop_or(false)]
    pub disabled: bool,
    #[prop_or_default]
    pub variant: ButtonVariant,
}

#[derive(PartialEq, Clone, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
}

#[function_component(Button)]
pub fn button(props: &ButtonProps) -> Html {
    let base_style = "padding: 10px 20px; border: none; border-radius: 4px; font-size: 14px; cursor: pointer; font-weight: 500; transition: all 0.2s;";

    let variant_style = match props.variant {
        ButtonVariant::Primary => "background-color: #5B4FE8; color: white;",
        ButtonVariant::Secondary => "background-color: #e0e0e0; color: #333;",
    };

    let disabled_style = if props.disabled {
        "opacity: 0.5; cursor: not-allowed;"
    } else {
        ""
    };

    let style = format!("{} {} {}", base_style, variant_style, disabled_style);

    html! {
        <button
            onclick={props.onclick.clone()}
            disabled={props.disabled}
            style={style}
        >
            {props.children.clone()}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct PlaceholderImageProps {
    #[prop_or("No screenshot".to_string())]
    pub label: String,
}

/// Grey box shown where a snap has no screenshot.
#[function_component(PlaceholderImage)]
pub fn placeholder_image(props: &PlaceholderImageProps) -> Html {
    html! {
        <div style="width:200px;height:120px;display:flex;align-items:center;justify-content:center;background:#eee;color:#888;font-size:14px;border-radius:4px;border:1px solid #ddd;">
            {&props.label}
        </div>
    }
}
