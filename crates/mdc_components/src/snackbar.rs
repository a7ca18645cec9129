//! Material snackbar surface.
//!
//! Only the markup of a snackbar is rendered here. Queueing messages and timing their display is
//! left to the application, which passes the current message and [`open`] state on every render.

use leptos::*;
use mdc_options::{
    apply, configure, cs, many, resolve, set, targeted, when, Part, Property, ResolveError,
    Resolved,
};
use serde::{Deserialize, Serialize};

use crate::attr;

/// The action button of a snackbar.
pub const ACTION: Part = Part::new("action");
/// The message label of a snackbar, announced to assistive technology.
pub const LABEL: Part = Part::new("label");

/// Snackbar configuration collected from `Set` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Shows the snackbar.
    pub open: bool,
    /// Aligns the snackbar to the leading edge on wide screens.
    pub leading: bool,
    /// Places the action below the message.
    pub stacked: bool,
    /// Message text.
    pub message: String,
    /// Action button label; no button is rendered without one.
    pub action: Option<String>,
}

/// Shows the snackbar.
pub fn open<M>(value: bool) -> Property<M, Config> {
    set(move |config: &mut Config| config.open = value)
}

/// Leading-edge alignment.
pub fn leading<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.leading = true)
}

/// Stacks the action below the message.
pub fn stacked<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.stacked = true)
}

/// Sets the message text.
pub fn message<M>(text: impl Into<String>) -> Property<M, Config> {
    let text = text.into();
    set(move |config: &mut Config| config.message = text.clone())
}

/// Adds an action button with `label`.
pub fn action<M>(label: impl Into<String>) -> Property<M, Config> {
    let label = label.into();
    set(move |config: &mut Config| config.action = Some(label.clone()))
}

/// Options for the action button, typically its click listener.
pub fn action_options<M>(
    properties: impl IntoIterator<Item = Property<M>>,
) -> Property<M, Config> {
    targeted(ACTION, properties)
}

/// Resolves the snackbar root; action button options end up under [`ACTION`] and label options
/// under [`LABEL`].
///
/// # Errors
///
/// Propagates [`ResolveError`] from listeners on the snackbar or its action.
pub fn summarize<M>(
    options: Vec<Property<M, Config>>,
) -> Result<Resolved<M, Config>, ResolveError> {
    let config = configure(Config::default(), &options);
    let properties = vec![
        cs("mdc-snackbar"),
        when(config.open, cs("mdc-snackbar--open")),
        when(config.leading, cs("mdc-snackbar--leading")),
        when(config.stacked, cs("mdc-snackbar--stacked")),
        attr("aria-hidden", if config.open { "false" } else { "true" }),
        targeted(
            LABEL,
            [
                cs("mdc-snackbar__label"),
                attr("role", "status"),
                attr("aria-live", "polite"),
            ],
        ),
        targeted(
            ACTION,
            [
                cs("mdc-button"),
                cs("mdc-snackbar__action"),
                attr("type", "button"),
            ],
        ),
        many(options),
    ];
    resolve(&properties)
}

/// Renders the snackbar.
///
/// # Errors
///
/// Returns [`ResolveError`] when the options bind one event twice without a lift.
pub fn view<M: 'static>(
    options: Vec<Property<M, Config>>,
    on_message: Callback<M>,
) -> Result<View, ResolveError> {
    let mut resolved = summarize(options)?;
    let action_button = resolved.take_part(&ACTION);
    let label = resolved.take_part(&LABEL);
    let (root, config) = resolved.split_config();
    let message = apply(view! { <div>{config.message}</div> }, label, on_message);

    let actions = config.action.map(|label| {
        let button = view! {
            <button>
                <div class="mdc-button__ripple"></div>
                <span class="mdc-button__label">{label}</span>
            </button>
        };
        let button = apply(button, action_button, on_message);
        view! { <div class="mdc-snackbar__actions" aria-atomic="true">{button}</div> }
    });

    let surface = view! {
        <aside>
            <div class="mdc-snackbar__surface">
                {message}
                {actions}
            </div>
        </aside>
    };
    Ok(apply(surface, root, on_message).into_view())
}
