//! Declarative element options and their constructors.
//!
//! A [`Property`] is one directive contributing to a rendered element: a class, an inline style
//! declaration, a raw attribute, an event listener, a grouping construct, or options aimed at a
//! named sub-element of a composite component. Lists of properties are flattened by
//! [`crate::resolve`].

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decoder::{self, Decoder};

/// Errors raised while constructing a [`Property`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// A style declaration was built with an empty property name.
    #[error("style property name must not be empty")]
    EmptyStyleKey,
    /// An attribute was built with an empty name.
    #[error("attribute name must not be empty")]
    EmptyAttributeName,
    /// An attribute name contains characters HTML does not allow in names.
    #[error("attribute name `{0}` contains characters not allowed in attribute names")]
    InvalidAttributeName(String),
    /// `class` and `style` are merged by the resolver and cannot be set as raw attributes.
    #[error("attribute `{0}` is managed by the resolver; use `cs`/`css` instead")]
    ReservedAttributeName(String),
}

/// Name of a sub-element inside a composite component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Part(Cow<'static, str>);

impl Part {
    /// The wrapping container of a composite control.
    pub const CONTAINER: Part = Part(Cow::Borrowed("container"));
    /// The native input element inside a composite control.
    pub const INPUT: Part = Part(Cow::Borrowed("input"));

    /// Names a component-specific part.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Part name as written in snapshots and errors.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listener behaviour flags applied before a decoded message is dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerOptions {
    /// Call `stopPropagation` on the event.
    pub stop_propagation: bool,
    /// Call `preventDefault` on the event.
    pub prevent_default: bool,
}

impl ListenerOptions {
    /// Combines flags of listeners sharing one event; any requested behaviour wins.
    pub fn merge(self, other: Self) -> Self {
        Self {
            stop_propagation: self.stop_propagation || other.stop_propagation,
            prevent_default: self.prevent_default || other.prevent_default,
        }
    }
}

/// A DOM event binding.
pub struct Listener<M> {
    pub(crate) event: String,
    pub(crate) options: Option<ListenerOptions>,
    pub(crate) decoder: Decoder<M>,
}

impl<M> Listener<M> {
    /// Event name, e.g. `click`.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Listener flags, if any were requested.
    pub fn options(&self) -> Option<ListenerOptions> {
        self.options
    }

    /// Payload decoder producing the message.
    pub fn decoder(&self) -> &Decoder<M> {
        &self.decoder
    }
}

impl<M> Clone for Listener<M> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            options: self.options,
            decoder: self.decoder.clone(),
        }
    }
}

impl<M> PartialEq for Listener<M> {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event && self.options == other.options && self.decoder == other.decoder
    }
}

impl<M> fmt::Debug for Listener<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event", &self.event)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Folds the messages produced by several listeners for one event into a single message.
pub struct Lift<M>(Rc<dyn Fn(Vec<M>) -> M>);

impl<M> Lift<M> {
    /// Wraps a folding function.
    pub fn new(fold: impl Fn(Vec<M>) -> M + 'static) -> Self {
        Self(Rc::new(fold))
    }

    /// Applies the fold.
    pub fn fold(&self, messages: Vec<M>) -> M {
        (self.0)(messages)
    }
}

impl<M> Clone for Lift<M> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<M> PartialEq for Lift<M> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<M> fmt::Debug for Lift<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lift(..)")
    }
}

/// Updates a component's configuration record.
pub struct Setter<C>(Rc<dyn Fn(&mut C)>);

impl<C> Setter<C> {
    /// Wraps an update function.
    pub fn new(update: impl Fn(&mut C) + 'static) -> Self {
        Self(Rc::new(update))
    }

    /// Applies the update to `config`.
    pub fn apply(&self, config: &mut C) {
        (self.0)(config)
    }
}

impl<C> Clone for Setter<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C> PartialEq for Setter<C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<C> fmt::Debug for Setter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Setter(..)")
    }
}

/// One declarative directive for an element.
///
/// `M` is the message type produced by listeners, `C` the configuration record of the component
/// the property is passed to. Plain elements use `C = ()`.
///
/// Equality is structural; function-valued fields compare by identity.
pub enum Property<M, C = ()> {
    /// CSS class to add.
    Class(String),
    /// Inline CSS declaration.
    Style {
        /// Property name.
        key: String,
        /// Declaration value.
        value: String,
    },
    /// Raw attribute, including `data-*` and `aria-*` attributes.
    Attribute {
        /// Attribute name.
        name: String,
        /// Attribute value.
        value: String,
    },
    /// DOM event binding.
    Listener(Listener<M>),
    /// Expands to its members, in order.
    Many(Vec<Property<M, C>>),
    /// Contributes nothing.
    Nop,
    /// Combines listeners bound to the same event.
    Lift(Lift<M>),
    /// Options for a named sub-element rather than the root element.
    Targeted {
        /// Sub-element receiving the options.
        part: Part,
        /// Options for that sub-element.
        properties: Vec<Property<M>>,
    },
    /// Updates the component configuration.
    Set(Setter<C>),
}

impl<M, C> Clone for Property<M, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Class(class) => Self::Class(class.clone()),
            Self::Style { key, value } => Self::Style {
                key: key.clone(),
                value: value.clone(),
            },
            Self::Attribute { name, value } => Self::Attribute {
                name: name.clone(),
                value: value.clone(),
            },
            Self::Listener(listener) => Self::Listener(listener.clone()),
            Self::Many(properties) => Self::Many(properties.clone()),
            Self::Nop => Self::Nop,
            Self::Lift(lift) => Self::Lift(lift.clone()),
            Self::Targeted { part, properties } => Self::Targeted {
                part: part.clone(),
                properties: properties.clone(),
            },
            Self::Set(setter) => Self::Set(setter.clone()),
        }
    }
}

impl<M, C> PartialEq for Property<M, C> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Class(a), Self::Class(b)) => a == b,
            (
                Self::Style { key, value },
                Self::Style {
                    key: other_key,
                    value: other_value,
                },
            ) => key == other_key && value == other_value,
            (
                Self::Attribute { name, value },
                Self::Attribute {
                    name: other_name,
                    value: other_value,
                },
            ) => name == other_name && value == other_value,
            (Self::Listener(a), Self::Listener(b)) => a == b,
            (Self::Many(a), Self::Many(b)) => a == b,
            (Self::Nop, Self::Nop) => true,
            (Self::Lift(a), Self::Lift(b)) => a == b,
            (
                Self::Targeted { part, properties },
                Self::Targeted {
                    part: other_part,
                    properties: other_properties,
                },
            ) => part == other_part && properties == other_properties,
            (Self::Set(a), Self::Set(b)) => a == b,
            _ => false,
        }
    }
}

impl<M, C> fmt::Debug for Property<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Self::Style { key, value } => f
                .debug_struct("Style")
                .field("key", key)
                .field("value", value)
                .finish(),
            Self::Attribute { name, value } => f
                .debug_struct("Attribute")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::Listener(listener) => f.debug_tuple("Listener").field(listener).finish(),
            Self::Many(properties) => f.debug_tuple("Many").field(properties).finish(),
            Self::Nop => f.write_str("Nop"),
            Self::Lift(lift) => fmt::Debug::fmt(lift, f),
            Self::Targeted { part, properties } => f
                .debug_struct("Targeted")
                .field("part", part)
                .field("properties", properties)
                .finish(),
            Self::Set(setter) => fmt::Debug::fmt(setter, f),
        }
    }
}

/// Adds a CSS class.
///
/// A string holding several whitespace-separated tags adds each of them; blank strings add
/// nothing.
pub fn cs<M, C>(class: impl Into<String>) -> Property<M, C> {
    Property::Class(class.into())
}

/// Adds an inline style declaration.
///
/// # Errors
///
/// Returns [`PropertyError::EmptyStyleKey`] when `key` is empty or whitespace.
pub fn css<M, C>(
    key: impl Into<String>,
    value: impl Into<String>,
) -> Result<Property<M, C>, PropertyError> {
    let key = key.into().trim().to_string();
    if key.is_empty() {
        return Err(PropertyError::EmptyStyleKey);
    }
    Ok(Property::Style {
        key,
        value: value.into(),
    })
}

fn validate_attribute_name(name: &str) -> Result<(), PropertyError> {
    if name.is_empty() {
        return Err(PropertyError::EmptyAttributeName);
    }
    let invalid = name.chars().any(|ch| {
        ch.is_whitespace() || ch.is_control() || matches!(ch, '"' | '\'' | '>' | '/' | '=')
    });
    if invalid {
        return Err(PropertyError::InvalidAttributeName(name.to_string()));
    }
    if name.eq_ignore_ascii_case("class") || name.eq_ignore_ascii_case("style") {
        return Err(PropertyError::ReservedAttributeName(name.to_ascii_lowercase()));
    }
    Ok(())
}

/// Sets a raw attribute. The name is stored in ASCII lowercase.
///
/// # Errors
///
/// Returns a [`PropertyError`] when `name` is empty, malformed, or one of the resolver-managed
/// names `class` and `style`.
pub fn attribute<M, C>(
    name: impl Into<String>,
    value: impl Into<String>,
) -> Result<Property<M, C>, PropertyError> {
    let name = name.into().to_ascii_lowercase();
    validate_attribute_name(&name)?;
    Ok(Property::Attribute {
        name,
        value: value.into(),
    })
}

/// Sets a `data-{key}` attribute.
///
/// # Errors
///
/// See [`attribute`].
pub fn data<M, C>(
    key: impl AsRef<str>,
    value: impl Into<String>,
) -> Result<Property<M, C>, PropertyError> {
    let key = key.as_ref();
    if key.is_empty() {
        return Err(PropertyError::EmptyAttributeName);
    }
    attribute(format!("data-{key}"), value)
}

/// Sets an `aria-{key}` attribute.
///
/// # Errors
///
/// See [`attribute`].
pub fn aria<M, C>(
    key: impl AsRef<str>,
    value: impl Into<String>,
) -> Result<Property<M, C>, PropertyError> {
    let key = key.as_ref();
    if key.is_empty() {
        return Err(PropertyError::EmptyAttributeName);
    }
    attribute(format!("aria-{key}"), value)
}

/// Sets the element `id`.
pub fn id<M, C>(value: impl Into<String>) -> Property<M, C> {
    Property::Attribute {
        name: "id".to_string(),
        value: value.into(),
    }
}

/// Sets the element `tabindex`.
pub fn tabindex<M, C>(index: i32) -> Property<M, C> {
    Property::Attribute {
        name: "tabindex".to_string(),
        value: index.to_string(),
    }
}

/// Binds `event` to a payload decoder.
pub fn on<M, C>(event: impl Into<String>, decoder: Decoder<M>) -> Property<M, C> {
    Property::Listener(Listener {
        event: event.into(),
        options: None,
        decoder,
    })
}

/// Binds `event` to a payload decoder with explicit listener flags.
pub fn on_with_options<M, C>(
    event: impl Into<String>,
    options: ListenerOptions,
    decoder: Decoder<M>,
) -> Property<M, C> {
    Property::Listener(Listener {
        event: event.into(),
        options: Some(options),
        decoder,
    })
}

/// Emits `msg` on `click`.
pub fn on_click<M: Clone + 'static, C>(msg: M) -> Property<M, C> {
    on("click", Decoder::succeed(msg))
}

/// Emits `msg` on `mousedown`.
pub fn on_mouse_down<M: Clone + 'static, C>(msg: M) -> Property<M, C> {
    on("mousedown", Decoder::succeed(msg))
}

/// Emits `msg` on `focus`.
pub fn on_focus<M: Clone + 'static, C>(msg: M) -> Property<M, C> {
    on("focus", Decoder::succeed(msg))
}

/// Emits `msg` on `blur`.
pub fn on_blur<M: Clone + 'static, C>(msg: M) -> Property<M, C> {
    on("blur", Decoder::succeed(msg))
}

/// Maps `target.value` on `input`.
pub fn on_input<M: 'static, C>(tagger: impl Fn(String) -> M + 'static) -> Property<M, C> {
    on("input", decoder::target_value().map(tagger))
}

/// Maps `target.value` on `change`.
pub fn on_change<M: 'static, C>(tagger: impl Fn(String) -> M + 'static) -> Property<M, C> {
    on("change", decoder::target_value().map(tagger))
}

/// Maps `target.checked` on `change`.
pub fn on_check<M: 'static, C>(tagger: impl Fn(bool) -> M + 'static) -> Property<M, C> {
    on("change", decoder::target_checked().map(tagger))
}

/// Groups properties; they expand in place, in order.
pub fn many<M, C>(properties: impl IntoIterator<Item = Property<M, C>>) -> Property<M, C> {
    Property::Many(properties.into_iter().collect())
}

/// The property that contributes nothing.
pub fn nop<M, C>() -> Property<M, C> {
    Property::Nop
}

/// `property` when `condition` holds, otherwise [`nop`].
pub fn when<M, C>(condition: bool, property: Property<M, C>) -> Property<M, C> {
    if condition {
        property
    } else {
        Property::Nop
    }
}

/// Combines messages of listeners sharing an event with `fold`.
pub fn lift<M, C>(fold: impl Fn(Vec<M>) -> M + 'static) -> Property<M, C> {
    Property::Lift(Lift::new(fold))
}

/// Updates the component configuration.
pub fn set<M, C>(update: impl Fn(&mut C) + 'static) -> Property<M, C> {
    Property::Set(Setter::new(update))
}

/// Options for the sub-element `part`.
pub fn targeted<M, C>(
    part: Part,
    properties: impl IntoIterator<Item = Property<M>>,
) -> Property<M, C> {
    Property::Targeted {
        part,
        properties: properties.into_iter().collect(),
    }
}

/// Options for the native input of a composite control.
pub fn input<M, C>(properties: impl IntoIterator<Item = Property<M>>) -> Property<M, C> {
    targeted(Part::INPUT, properties)
}

/// Options for the wrapping container of a composite control.
pub fn container<M, C>(properties: impl IntoIterator<Item = Property<M>>) -> Property<M, C> {
    targeted(Part::CONTAINER, properties)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type P = Property<u8>;

    #[test]
    fn css_rejects_blank_keys() {
        assert_eq!(css::<u8, ()>("  ", "red"), Err(PropertyError::EmptyStyleKey));
        assert_eq!(
            css::<u8, ()>(" color ", "red"),
            Ok(Property::Style {
                key: "color".to_string(),
                value: "red".to_string()
            })
        );
    }

    #[test]
    fn attribute_names_are_validated() {
        assert_eq!(
            attribute::<u8, ()>("", "x"),
            Err(PropertyError::EmptyAttributeName)
        );
        assert_eq!(
            attribute::<u8, ()>("on click", "x"),
            Err(PropertyError::InvalidAttributeName("on click".to_string()))
        );
        assert_eq!(
            attribute::<u8, ()>("Class", "x"),
            Err(PropertyError::ReservedAttributeName("class".to_string()))
        );
        assert_eq!(data::<u8, ()>("", "x"), Err(PropertyError::EmptyAttributeName));
    }

    #[test]
    fn attribute_names_reject_markup_characters() {
        for name in ["a=b", "x/y", "say\"hi\"", "it's", "a>b", "tab\tname"] {
            assert_eq!(
                attribute::<u8, ()>(name, "x"),
                Err(PropertyError::InvalidAttributeName(name.to_string())),
                "{name}"
            );
        }
        assert_eq!(
            aria::<u8, ()>("label=x", "y"),
            Err(PropertyError::InvalidAttributeName("aria-label=x".to_string()))
        );
    }

    #[test]
    fn attribute_names_are_lowercased() {
        let expected: P = Property::Attribute {
            name: "tabindex".to_string(),
            value: "0".to_string(),
        };
        assert_eq!(attribute("TabIndex", "0"), Ok(expected));
    }

    #[test]
    fn data_and_aria_prefix_their_names() {
        let expected: P = Property::Attribute {
            name: "data-ui-kind".to_string(),
            value: "button".to_string(),
        };
        assert_eq!(data("ui-kind", "button"), Ok(expected));
        let expected: P = Property::Attribute {
            name: "aria-hidden".to_string(),
            value: "true".to_string(),
        };
        assert_eq!(aria("hidden", "true"), Ok(expected));
    }

    #[test]
    fn when_selects_property_or_nop() {
        let p: P = cs("mdc-button");
        assert_eq!(when(true, p.clone()), p);
        assert_eq!(when(false, p), Property::Nop);
    }

    #[test]
    fn function_fields_compare_by_identity() {
        let fold: P = lift(|msgs: Vec<u8>| msgs.into_iter().sum());
        assert_eq!(fold.clone(), fold);
        assert_ne!(fold, lift(|msgs: Vec<u8>| msgs.into_iter().sum()));
    }

    #[test]
    fn listener_options_merge_is_any() {
        let merged = ListenerOptions {
            stop_propagation: true,
            prevent_default: false,
        }
        .merge(ListenerOptions {
            stop_propagation: false,
            prevent_default: true,
        });
        assert!(merged.stop_propagation && merged.prevent_default);
    }
}
