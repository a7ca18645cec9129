//! Material button.

use leptos::*;
use mdc_options::{
    apply, configure, cs, many, nop, resolve, set, when, Property, ResolveError, Resolved,
};
use serde::{Deserialize, Serialize};

use crate::attr;

/// Button configuration collected from `Set` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Disables the button.
    pub disabled: bool,
    /// Renders an anchor to this location instead of a `<button>`.
    pub link: Option<String>,
    /// Material icon ligature shown next to the label.
    pub icon: Option<String>,
    /// Places the icon after the label.
    pub trailing_icon: bool,
    /// Adds the ripple surface.
    pub ripple: bool,
}

/// Contained button with elevation.
pub fn raised<M>() -> Property<M, Config> {
    cs("mdc-button--raised")
}

/// Contained button without elevation.
pub fn unelevated<M>() -> Property<M, Config> {
    cs("mdc-button--unelevated")
}

/// Outlined button.
pub fn outlined<M>() -> Property<M, Config> {
    cs("mdc-button--outlined")
}

/// Compact button.
pub fn dense<M>() -> Property<M, Config> {
    cs("mdc-button--dense")
}

/// Enables the ripple surface.
pub fn ripple<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.ripple = true)
}

/// Disables the button.
pub fn disabled<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.disabled = true)
}

/// Renders the button as a link to `href`.
pub fn link<M>(href: impl Into<String>) -> Property<M, Config> {
    let href = href.into();
    set(move |config: &mut Config| config.link = Some(href.clone()))
}

/// Shows a Material icon before the label.
pub fn icon<M>(name: impl Into<String>) -> Property<M, Config> {
    let name = name.into();
    set(move |config: &mut Config| config.icon = Some(name.clone()))
}

/// Moves the icon after the label.
pub fn trailing_icon<M>() -> Property<M, Config> {
    set(|config: &mut Config| config.trailing_icon = true)
}

/// Resolves the button root: component classes first, then the caller's options.
///
/// # Errors
///
/// Propagates [`ResolveError`] from the caller's listeners.
pub fn summarize<M>(
    options: Vec<Property<M, Config>>,
) -> Result<Resolved<M, Config>, ResolveError> {
    let config = configure(Config::default(), &options);
    let is_link = config.link.is_some();
    let properties = vec![
        cs("mdc-button"),
        when(config.ripple, cs("mdc-ripple-surface")),
        when(config.icon.is_some(), cs("mdc-button--icon-leading")),
        config
            .link
            .map(|href| attr("href", href))
            .unwrap_or_else(nop),
        when(config.disabled && !is_link, attr("disabled", "")),
        when(config.disabled && is_link, attr("aria-disabled", "true")),
        when(config.disabled && is_link, attr("tabindex", "-1")),
        many(options),
    ];
    resolve(&properties)
}

/// Renders a button with `children` as its label.
///
/// # Errors
///
/// Returns [`ResolveError`] when the options bind one event twice without a lift.
pub fn view<M: 'static>(
    options: Vec<Property<M, Config>>,
    on_message: Callback<M>,
    children: impl IntoView,
) -> Result<View, ResolveError> {
    let (resolved, config) = summarize(options)?.split_config();
    let icon = config.icon.map(|name| {
        view! { <i class="material-icons mdc-button__icon" aria-hidden="true">{name}</i> }
    });
    let (leading, trailing) = if config.trailing_icon {
        (None, icon)
    } else {
        (icon, None)
    };
    let label = view! { <span class="mdc-button__label">{children}</span> };

    let rendered = if config.link.is_some() {
        let anchor = view! { <a>{leading}{label}{trailing}</a> };
        apply(anchor, resolved, on_message).into_view()
    } else {
        let button = view! { <button type="button">{leading}{label}{trailing}</button> };
        apply(button, resolved, on_message).into_view()
    };
    Ok(rendered)
}
