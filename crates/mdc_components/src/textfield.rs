//! Material text field.
//!
//! Options passed to [`view`] land on the `<label class="mdc-text-field">` container. Options
//! for the native `<input>` (or `<textarea>`) go through [`native_control`], which targets
//! [`Part::INPUT`]. Input listeners such as `on_input` belong there too.

use leptos::*;
use mdc_options::{
    apply, configure, cs, input, many, resolve, set, when, Part, Property, ResolveError, Resolved,
};
use serde::{Deserialize, Serialize};

use crate::{attr, bool_token};

/// Native input type of a single-line text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    /// Plain text.
    #[default]
    Text,
    /// Masked password entry.
    Password,
    /// Email address.
    Email,
}

impl InputType {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
        }
    }
}

/// Text field configuration collected from `Set` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Floating label text.
    pub label: Option<String>,
    /// Current value.
    pub value: Option<String>,
    /// Placeholder shown while empty.
    pub placeholder: Option<String>,
    /// Disables the field.
    pub disabled: bool,
    /// Native input type.
    pub input_type: InputType,
    /// Renders a multi-line `<textarea>`.
    pub textarea: bool,
    /// Visible rows of a textarea.
    pub rows: Option<u32>,
    /// Outlined rather than filled style.
    pub outlined: bool,
    /// Spans the full width of its container.
    pub full_width: bool,
    /// Marks the field as required.
    pub required: bool,
}

impl Config {
    fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|value| !value.is_empty())
    }

    /// Initial content of a textarea, rendered as text content and as the `value` property
    /// rather than as an attribute.
    pub fn textarea_text(&self) -> Option<&str> {
        self.value.as_deref().filter(|_| self.textarea)
    }
}

/// Sets the floating label.
pub fn label<M>(text: impl Into<String>) -> Property<M, Config> {
    let text = text.into();
    set(move |config: &mut Config| config.label = Some(text.clone()))
}

/// Sets the current value.
pub fn value<M>(text: impl Into<String>) -> Property<M, Config> {
    let text = text.into();
    set(move |config: &mut Config| config.value = Some(text.clone()))
}

/// Sets the placeholder.
pub fn placeholder<M>(text: impl Into<String>) -> Property<M, Config> {
    let text = text.into();
    set(move |config: &mut Config| config.placeholder = Some(text.clone()))
}

/// Disables the field.
pub fn disabled<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.disabled = true)
}

/// Masks the entered text.
pub fn password<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.input_type = InputType::Password)
}

/// Accepts an email address.
pub fn email<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.input_type = InputType::Email)
}

/// Renders a multi-line textarea.
pub fn textarea<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.textarea = true)
}

/// Visible rows of a textarea.
pub fn rows<M>(count: u32) -> Property<M, Config> {
    set(move |config: &mut Config| config.rows = Some(count))
}

/// Outlined style.
pub fn outlined<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.outlined = true)
}

/// Full-width style.
pub fn full_width<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.full_width = true)
}

/// Marks the field as required.
pub fn required<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.required = true)
}

/// Options for the native input element.
pub fn native_control<M>(
    properties: impl IntoIterator<Item = Property<M>>,
) -> Property<M, Config> {
    input(properties)
}

fn native_properties<M>(config: &Config) -> Vec<Property<M>> {
    vec![
        cs("mdc-text-field__input"),
        when(!config.textarea, attr("type", config.input_type.token())),
        when(config.textarea, attr("rows", config.rows.unwrap_or(4).to_string())),
        config
            .value
            .clone()
            .filter(|_| !config.textarea)
            .map(|value| attr("value", value))
            .unwrap_or(Property::Nop),
        config
            .placeholder
            .clone()
            .map(|placeholder| attr("placeholder", placeholder))
            .unwrap_or(Property::Nop),
        when(config.disabled, attr("disabled", "")),
        when(config.required, attr("required", "")),
        attr("aria-required", bool_token(config.required)),
    ]
}

/// Resolves the text field container; native control options end up under [`Part::INPUT`].
///
/// # Errors
///
/// Propagates [`ResolveError`] from listeners on the container or the native control.
pub fn summarize<M>(
    options: Vec<Property<M, Config>>,
) -> Result<Resolved<M, Config>, ResolveError> {
    let config = configure(Config::default(), &options);
    let properties = vec![
        cs("mdc-text-field"),
        if config.outlined {
            cs("mdc-text-field--outlined")
        } else {
            cs("mdc-text-field--filled")
        },
        when(config.disabled, cs("mdc-text-field--disabled")),
        when(config.textarea, cs("mdc-text-field--textarea")),
        when(config.full_width, cs("mdc-text-field--fullwidth")),
        when(config.label.is_none(), cs("mdc-text-field--no-label")),
        when(config.has_value(), cs("mdc-text-field--label-floating")),
        input(native_properties(&config)),
        many(options),
    ];
    resolve(&properties)
}

/// Renders the text field.
///
/// # Errors
///
/// Returns [`ResolveError`] when the options bind one event twice without a lift.
pub fn view<M: 'static>(
    options: Vec<Property<M, Config>>,
    on_message: Callback<M>,
) -> Result<View, ResolveError> {
    let mut resolved = summarize(options)?;
    let native = resolved.take_part(&Part::INPUT);
    let (root, config) = resolved.split_config();

    let floating_label = config.label.clone().map(|text| {
        let class = if config.has_value() {
            "mdc-floating-label mdc-floating-label--float-above"
        } else {
            "mdc-floating-label"
        };
        view! { <span class=class>{text}</span> }
    });

    let control = if config.textarea {
        let text = config.textarea_text().unwrap_or_default().to_string();
        let area = view! { <textarea prop:value=text.clone()>{text}</textarea> };
        let area = apply(area, native, on_message);
        view! { <span class="mdc-text-field__resizer">{area}</span> }.into_view()
    } else {
        apply(view! { <input/> }, native, on_message).into_view()
    };

    let container = if config.outlined {
        view! {
            <label>
                <span class="mdc-notched-outline">
                    <span class="mdc-notched-outline__leading"></span>
                    <span class="mdc-notched-outline__notch">{floating_label}</span>
                    <span class="mdc-notched-outline__trailing"></span>
                </span>
                {control}
            </label>
        }
    } else {
        view! {
            <label>
                <span class="mdc-text-field__ripple"></span>
                {floating_label}
                {control}
                <span class="mdc-line-ripple"></span>
            </label>
        }
    };
    Ok(apply(container, root, on_message).into_view())
}
