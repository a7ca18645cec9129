//! Declarative element options for Material components rendered with Leptos.
//!
//! Components and applications describe an element as an ordered list of [`Property`] values:
//! classes, inline styles, raw attributes, event listeners, groups, conditional entries, and
//! options aimed at a named sub-element. [`resolve`] flattens such a list into a [`Resolved`]
//! attribute set and [`styled`] attaches it to a Leptos element.
//!
//! ```
//! use mdc_options::prelude::*;
//!
//! #[derive(Clone)]
//! enum Msg {
//!     Save,
//! }
//!
//! let busy = false;
//! let properties: Vec<Property<Msg>> = vec![
//!     cs("mdc-button"),
//!     when(busy, cs("mdc-button--busy")),
//!     on_click(Msg::Save),
//! ];
//! let resolved = resolve(&properties).unwrap();
//! assert_eq!(resolved.class(), "mdc-button");
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod decoder;
mod property;
mod render;
mod resolve;

pub use decoder::{DecodeError, Decoder};
pub use property::{
    aria, attribute, container, cs, css, data, id, input, lift, many, nop, on, on_blur,
    on_change, on_check, on_click, on_focus, on_input, on_mouse_down, on_with_options, set,
    tabindex, targeted, when, Lift, Listener, ListenerOptions, Part, Property, PropertyError,
    Setter,
};
pub use render::{apply, event_payload, styled};
pub use resolve::{
    configure, resolve, resolve_with, Handler, RenderedAttribute, ResolveError, Resolved,
};

/// Convenience imports for component crates building property lists.
pub mod prelude {
    pub use crate::{
        apply, aria, attribute, configure, container, cs, css, data, id, input, lift, many, nop,
        on, on_blur, on_change, on_check, on_click, on_focus, on_input, on_mouse_down,
        on_with_options, resolve, resolve_with, set, styled, tabindex, targeted, when, Decoder,
        ListenerOptions, Part, Property, PropertyError, ResolveError, Resolved,
    };
}
