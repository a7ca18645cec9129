//! Material components built on `mdc_options` property lists.
//!
//! Each component module exposes a `Config` record, option constructors returning
//! `Property<M, Config>`, a pure `summarize` step producing the root [`Resolved`] set, and a
//! `view` function rendering the component through Leptos. Options a caller passes are resolved
//! after the component's own, so caller classes, styles and attributes win on conflicts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use mdc_options::Property;
#[cfg(doc)]
use mdc_options::Resolved;

pub mod button;
pub mod checkbox;
pub mod snackbar;
pub mod textfield;

/// Builds an attribute with a static, known-valid name.
pub(crate) fn attr<M, C>(name: &'static str, value: impl Into<String>) -> Property<M, C> {
    Property::Attribute {
        name: name.to_string(),
        value: value.into(),
    }
}

pub(crate) fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Convenience imports for applications composing Material components.
pub mod prelude {
    pub use crate::{button, checkbox, snackbar, textfield};
    pub use mdc_options::prelude::*;
}
