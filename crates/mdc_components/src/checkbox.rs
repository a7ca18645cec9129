//! Material checkbox inside a form field.
//!
//! Rendered as `div.mdc-form-field > (div.mdc-checkbox > input + background, label)`. Root
//! options apply to `div.mdc-checkbox`; [`Part::CONTAINER`] options apply to the form field and
//! [`Part::INPUT`] options to the native checkbox.

use leptos::*;
use mdc_options::{
    apply, configure, container, cs, input, many, resolve, set, when, Part, Property,
    ResolveError, Resolved,
};
use serde::{Deserialize, Serialize};

use crate::{attr, bool_token};

/// Checked state of a checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckState {
    /// Not checked.
    #[default]
    Unchecked,
    /// Checked.
    Checked,
    /// Neither checked nor unchecked.
    Indeterminate,
}

impl CheckState {
    pub(crate) fn aria_token(self) -> &'static str {
        match self {
            Self::Unchecked => "false",
            Self::Checked => "true",
            Self::Indeterminate => "mixed",
        }
    }
}

/// Checkbox configuration collected from `Set` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Checked state.
    pub state: CheckState,
    /// Disables the checkbox.
    pub disabled: bool,
    /// Label text rendered next to the checkbox.
    pub label: Option<String>,
}

/// Sets the checked state.
pub fn checked<M>(value: bool) -> Property<M, Config> {
    set(move |config: &mut Config| {
        config.state = if value {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    })
}

/// Shows the indeterminate mark.
pub fn indeterminate<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.state = CheckState::Indeterminate)
}

/// Disables the checkbox.
pub fn disabled<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.disabled = true)
}

/// Sets the label text.
pub fn label<M>(text: impl Into<String>) -> Property<M, Config> {
    let text = text.into();
    set(move |config: &mut Config| config.label = Some(text.clone()))
}

/// Options for the native checkbox input.
pub fn native_control<M>(
    properties: impl IntoIterator<Item = Property<M>>,
) -> Property<M, Config> {
    input(properties)
}

/// Resolves the checkbox root together with its form field and native control parts.
///
/// # Errors
///
/// Propagates [`ResolveError`] from listeners on any of the three elements.
pub fn summarize<M>(
    options: Vec<Property<M, Config>>,
) -> Result<Resolved<M, Config>, ResolveError> {
    let config = configure(Config::default(), &options);
    let indeterminate = config.state == CheckState::Indeterminate;
    let properties = vec![
        cs("mdc-checkbox"),
        when(config.disabled, cs("mdc-checkbox--disabled")),
        container([cs("mdc-form-field")]),
        input([
            cs("mdc-checkbox__native-control"),
            attr("type", "checkbox"),
            when(config.state == CheckState::Checked, attr("checked", "")),
            when(indeterminate, attr("data-indeterminate", bool_token(true))),
            attr("aria-checked", config.state.aria_token()),
            when(config.disabled, attr("disabled", "")),
        ]),
        many(options),
    ];
    resolve(&properties)
}

/// Renders the checkbox and its label.
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
    let form_field = resolved.take_part(&Part::CONTAINER);
    let (root, config) = resolved.split_config();

    let label_for = native.attribute("id").map(str::to_string);
    let label = config
        .label
        .map(|text| view! { <label for=label_for>{text}</label> });

    let native = apply(view! { <input/> }, native, on_message);
    let checkbox = view! {
        <div>
            {native}
            <div class="mdc-checkbox__background">
                <svg class="mdc-checkbox__checkmark" viewBox="0 0 24 24">
                    <path
                        class="mdc-checkbox__checkmark-path"
                        fill="none"
                        d="M1.73,12.91 8.1,19.28 22.79,4.59"
                    ></path>
                </svg>
                <div class="mdc-checkbox__mixedmark"></div>
            </div>
            <div class="mdc-checkbox__ripple"></div>
        </div>
    };
    let checkbox = apply(checkbox, root, on_message);
    let field = view! { <div>{checkbox}{label}</div> };
    Ok(apply(field, form_field, on_message).into_view())
}
