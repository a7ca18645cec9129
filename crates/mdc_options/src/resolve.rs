//! Flattening of property lists into concrete element attributes.
//!
//! Resolution walks a property list once, depth first, expanding groups in place. Class strings
//! are split on whitespace and each tag is kept once, in order of first appearance. Styles and
//! attributes are last-write-wins per key and keep the position of their first occurrence;
//! attribute names are compared in ASCII lowercase. Listeners are collected per event name and
//! either bound directly or, when several share an event, combined through the list's [`Lift`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::decoder::Decoder;
use crate::property::{Lift, Listener, ListenerOptions, Part, Property};

/// Errors raised while resolving a property list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Several listeners target one event and no lift is available to combine them.
    #[error("{count} listeners bound to `{event}`{} without a lift to combine them", part_suffix(.part))]
    ConflictingListeners {
        /// Event name.
        event: String,
        /// Number of listeners bound to the event.
        count: usize,
        /// Sub-element the listeners were targeted at, if not the root.
        part: Option<Part>,
    },
}

fn part_suffix(part: &Option<Part>) -> String {
    match part {
        Some(part) => format!(" on part `{part}`"),
        None => String::new(),
    }
}

/// Resolved binding for one event.
pub struct Handler<M> {
    event: String,
    options: ListenerOptions,
    decoders: Vec<Decoder<M>>,
    lift: Option<Lift<M>>,
}

impl<M> Handler<M> {
    /// Event name.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Merged listener flags.
    pub fn options(&self) -> ListenerOptions {
        self.options
    }

    /// Whether several listeners were combined into this handler.
    pub fn is_combined(&self) -> bool {
        self.decoders.len() > 1
    }

    /// Produces the message for an event payload.
    ///
    /// A single listener yields its decoded message. Combined listeners run every decoder,
    /// skip the ones that fail, and fold the remaining messages with the lift. `None` means no
    /// decoder accepted the payload.
    pub fn handle(&self, payload: &Value) -> Option<M> {
        match (self.decoders.as_slice(), self.lift.as_ref()) {
            ([decoder], _) => decoder.decode(payload).ok(),
            (decoders, Some(lift)) => {
                let messages: Vec<M> = decoders
                    .iter()
                    .filter_map(|decoder| decoder.decode(payload).ok())
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(lift.fold(messages))
                }
            }
            (_, None) => None,
        }
    }
}

impl<M> Clone for Handler<M> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            options: self.options,
            decoders: self.decoders.clone(),
            lift: self.lift.clone(),
        }
    }
}

impl<M> fmt::Debug for Handler<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("event", &self.event)
            .field("options", &self.options)
            .field("listeners", &self.decoders.len())
            .finish_non_exhaustive()
    }
}

/// One attribute of a resolved element, in emission order.
#[derive(Debug, Clone)]
pub enum RenderedAttribute<'a, M> {
    /// Raw attribute.
    Attribute {
        /// Attribute name.
        name: &'a str,
        /// Attribute value.
        value: &'a str,
    },
    /// Merged `class` attribute.
    Class(String),
    /// Merged `style` attribute.
    Style(String),
    /// Event handler.
    Handler(&'a Handler<M>),
}

/// Flattened attribute set of one element.
pub struct Resolved<M, C = ()> {
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    handlers: Vec<Handler<M>>,
    parts: BTreeMap<Part, Resolved<M>>,
    config: C,
}

impl<M, C: Default> Default for Resolved<M, C> {
    fn default() -> Self {
        Self::empty(C::default())
    }
}

impl<M, C> Resolved<M, C> {
    fn empty(config: C) -> Self {
        Self {
            classes: Vec::new(),
            styles: Vec::new(),
            attributes: Vec::new(),
            handlers: Vec::new(),
            parts: BTreeMap::new(),
            config,
        }
    }

    /// Distinct classes in order of first appearance.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Space-separated class string.
    pub fn class(&self) -> String {
        self.classes.join(" ")
    }

    /// Style declarations, last write per key.
    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }

    /// Inline style string, e.g. `color: red; width: 2px`.
    pub fn style(&self) -> String {
        self.styles
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Raw attributes, last write per name.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the raw attribute `name`, matched case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Event handlers, in order of the first listener for each event.
    pub fn handlers(&self) -> &[Handler<M>] {
        &self.handlers
    }

    /// Handler bound to `event`.
    pub fn handler(&self, event: &str) -> Option<&Handler<M>> {
        self.handlers.iter().find(|handler| handler.event == event)
    }

    /// Resolved options of a sub-element.
    pub fn part(&self, part: &Part) -> Option<&Resolved<M>> {
        self.parts.get(part)
    }

    /// Removes and returns the options of a sub-element; empty when none were given.
    pub fn take_part(&mut self, part: &Part) -> Resolved<M> {
        self.parts
            .remove(part)
            .unwrap_or_else(|| Resolved::empty(()))
    }

    /// Component configuration after every `Set` directive.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Consumes the set and returns the configuration.
    pub fn into_config(self) -> C {
        self.config
    }

    /// Splits off the configuration, leaving a plain attribute set.
    pub fn split_config(self) -> (Resolved<M>, C) {
        let Self {
            classes,
            styles,
            attributes,
            handlers,
            parts,
            config,
        } = self;
        (
            Resolved {
                classes,
                styles,
                attributes,
                handlers,
                parts,
                config: (),
            },
            config,
        )
    }

    /// Root attributes in emission order: raw attributes, `class`, `style`, then handlers.
    ///
    /// `class` and `style` are omitted when empty.
    pub fn render_order(&self) -> Vec<RenderedAttribute<'_, M>> {
        let mut rendered: Vec<RenderedAttribute<'_, M>> = self
            .attributes
            .iter()
            .map(|(name, value)| RenderedAttribute::Attribute {
                name: name.as_str(),
                value: value.as_str(),
            })
            .collect();
        if !self.classes.is_empty() {
            rendered.push(RenderedAttribute::Class(self.class()));
        }
        if !self.styles.is_empty() {
            rendered.push(RenderedAttribute::Style(self.style()));
        }
        rendered.extend(self.handlers.iter().map(RenderedAttribute::Handler));
        rendered
    }

    /// JSON view of the set without its function values.
    pub fn snapshot(&self) -> Value {
        let mut snapshot = Map::new();
        snapshot.insert(
            "attributes".to_string(),
            Value::Array(
                self.attributes
                    .iter()
                    .map(|(name, value)| json!([name, value]))
                    .collect(),
            ),
        );
        snapshot.insert("class".to_string(), Value::String(self.class()));
        snapshot.insert("style".to_string(), Value::String(self.style()));
        snapshot.insert(
            "handlers".to_string(),
            Value::Array(
                self.handlers
                    .iter()
                    .map(|handler| {
                        json!({
                            "event": handler.event,
                            "listeners": handler.decoders.len(),
                            "stop_propagation": handler.options.stop_propagation,
                            "prevent_default": handler.options.prevent_default,
                        })
                    })
                    .collect(),
            ),
        );
        snapshot.insert(
            "parts".to_string(),
            Value::Object(
                self.parts
                    .iter()
                    .map(|(part, resolved)| (part.to_string(), resolved.snapshot()))
                    .collect(),
            ),
        );
        Value::Object(snapshot)
    }

    /// [`Resolved::snapshot`] with the configuration under `config`.
    pub fn snapshot_with_config(&self) -> Value
    where
        C: Serialize,
    {
        let mut snapshot = self.snapshot();
        if let Value::Object(map) = &mut snapshot {
            map.insert(
                "config".to_string(),
                serde_json::to_value(&self.config).unwrap_or(Value::Null),
            );
        }
        snapshot
    }
}

impl<M, C: fmt::Debug> fmt::Debug for Resolved<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("classes", &self.classes)
            .field("styles", &self.styles)
            .field("attributes", &self.attributes)
            .field("handlers", &self.handlers)
            .field("parts", &self.parts)
            .field("config", &self.config)
            .finish()
    }
}

fn upsert(entries: &mut Vec<(String, String)>, key: &str, value: &str) {
    match entries.iter_mut().find(|(existing, _)| existing == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => entries.push((key.to_string(), value.to_string())),
    }
}

struct Accumulator<M, C> {
    classes: Vec<String>,
    seen_classes: HashSet<String>,
    styles: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    listeners: Vec<(String, Vec<Listener<M>>)>,
    parts: BTreeMap<Part, Vec<Property<M>>>,
    lift: Option<Lift<M>>,
    config: C,
}

impl<M, C> Accumulator<M, C> {
    fn new(config: C) -> Self {
        Self {
            classes: Vec::new(),
            seen_classes: HashSet::new(),
            styles: Vec::new(),
            attributes: Vec::new(),
            listeners: Vec::new(),
            parts: BTreeMap::new(),
            lift: None,
            config,
        }
    }

    fn walk(&mut self, properties: &[Property<M, C>]) {
        for property in properties {
            match property {
                Property::Class(class) => {
                    for tag in class.split_whitespace() {
                        if self.seen_classes.insert(tag.to_string()) {
                            self.classes.push(tag.to_string());
                        }
                    }
                }
                Property::Style { key, value } => upsert(&mut self.styles, key, value),
                Property::Attribute { name, value } => {
                    upsert(&mut self.attributes, &name.to_ascii_lowercase(), value)
                }
                Property::Listener(listener) => {
                    match self
                        .listeners
                        .iter_mut()
                        .find(|(event, _)| *event == listener.event)
                    {
                        Some((_, bound)) => bound.push(listener.clone()),
                        None => self
                            .listeners
                            .push((listener.event.clone(), vec![listener.clone()])),
                    }
                }
                Property::Many(members) => self.walk(members),
                Property::Nop => {}
                Property::Lift(lift) => self.lift = Some(lift.clone()),
                Property::Targeted { part, properties } => self
                    .parts
                    .entry(part.clone())
                    .or_default()
                    .extend(properties.iter().cloned()),
                Property::Set(setter) => setter.apply(&mut self.config),
            }
        }
    }

    fn finish(
        self,
        inherited_lift: Option<&Lift<M>>,
        part: Option<&Part>,
    ) -> Result<Resolved<M, C>, ResolveError> {
        let lift = self.lift.or_else(|| inherited_lift.cloned());

        let mut handlers = Vec::with_capacity(self.listeners.len());
        for (event, listeners) in self.listeners {
            if listeners.len() > 1 && lift.is_none() {
                return Err(ResolveError::ConflictingListeners {
                    event,
                    count: listeners.len(),
                    part: part.cloned(),
                });
            }
            let options = listeners
                .iter()
                .filter_map(Listener::options)
                .fold(ListenerOptions::default(), ListenerOptions::merge);
            let handler_lift = if listeners.len() > 1 { lift.clone() } else { None };
            handlers.push(Handler {
                event,
                options,
                decoders: listeners.into_iter().map(|listener| listener.decoder).collect(),
                lift: handler_lift,
            });
        }

        let mut parts = BTreeMap::new();
        for (part, properties) in self.parts {
            let mut accumulator = Accumulator::new(());
            accumulator.walk(&properties);
            let resolved = accumulator.finish(lift.as_ref(), Some(&part))?;
            parts.insert(part, resolved);
        }

        Ok(Resolved {
            classes: self.classes,
            styles: self.styles,
            attributes: self.attributes,
            handlers,
            parts,
            config: self.config,
        })
    }
}

/// Resolves `properties` starting from the default configuration.
///
/// # Errors
///
/// Returns [`ResolveError::ConflictingListeners`] when an event has several listeners and the
/// list carries no [`Lift`].
pub fn resolve<M, C: Default>(
    properties: &[Property<M, C>],
) -> Result<Resolved<M, C>, ResolveError> {
    resolve_with(C::default(), properties)
}

/// Resolves `properties` starting from `config`.
///
/// # Errors
///
/// See [`resolve`].
pub fn resolve_with<M, C>(
    config: C,
    properties: &[Property<M, C>],
) -> Result<Resolved<M, C>, ResolveError> {
    let mut accumulator = Accumulator::new(config);
    accumulator.walk(properties);
    accumulator.finish(None, None)
}

/// Applies only the `Set` directives of `properties` to `config`.
pub fn configure<M, C>(mut config: C, properties: &[Property<M, C>]) -> C {
    fn apply<M, C>(config: &mut C, properties: &[Property<M, C>]) {
        for property in properties {
            match property {
                Property::Set(setter) => setter.apply(config),
                Property::Many(members) => apply(config, members),
                _ => {}
            }
        }
    }
    apply(&mut config, properties);
    config
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::decoder::{self, Decoder};
    use crate::property::{
        attribute, container, cs, css, data, id, input, lift, many, nop, on, on_click,
        on_with_options, set, when,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Clicked(u8),
        Batch(Vec<Msg>),
        Typed(String),
    }

    fn batch() -> Property<Msg> {
        lift(Msg::Batch)
    }

    fn click(n: u8) -> Property<Msg> {
        on_click(Msg::Clicked(n))
    }

    #[test]
    fn classes_are_deduplicated_in_first_appearance_order() {
        let resolved = resolve(&[
            cs::<Msg, ()>("b"),
            cs("a"),
            many([cs("b"), cs("c")]),
            cs("a"),
        ])
        .expect("resolve");
        assert_eq!(resolved.class(), "b a c");
        assert_eq!(resolved.classes(), ["b", "a", "c"]);
    }

    #[test]
    fn class_strings_are_split_into_tags() {
        let resolved = resolve(&[
            cs::<Msg, ()>("mdc-button mdc-button--raised"),
            cs("mdc-button"),
            cs(""),
            cs("  mdc-button--dense\tmdc-button--raised "),
        ])
        .expect("resolve");
        assert_eq!(
            resolved.classes(),
            ["mdc-button", "mdc-button--raised", "mdc-button--dense"]
        );
        assert_eq!(resolved.class(), "mdc-button mdc-button--raised mdc-button--dense");

        let blank = resolve(&[cs::<Msg, ()>(" "), cs("")]).expect("resolve");
        assert!(blank.classes().is_empty());
        assert!(blank.render_order().is_empty());
    }

    #[test]
    fn attribute_names_compare_case_insensitively() {
        let resolved = resolve(&[
            attribute::<Msg, ()>("ID", "a").expect("attribute"),
            id("b"),
            Property::Attribute {
                name: "Title".to_string(),
                value: "first".to_string(),
            },
            attribute("title", "second").expect("attribute"),
        ])
        .expect("resolve");
        assert_eq!(
            resolved.snapshot()["attributes"],
            json!([["id", "b"], ["title", "second"]])
        );
        assert_eq!(resolved.attribute("Id"), Some("b"));
    }

    #[test]
    fn styles_and_attributes_are_last_write_wins() {
        let resolved = resolve(&[
            css::<Msg, ()>("color", "red").expect("css"),
            attribute("title", "first").expect("attribute"),
            css("width", "2px").expect("css"),
            many([
                css("color", "blue").expect("css"),
                attribute("title", "second").expect("attribute"),
            ]),
        ])
        .expect("resolve");
        assert_eq!(resolved.style(), "color: blue; width: 2px");
        assert_eq!(resolved.attribute("title"), Some("second"));
        assert_eq!(resolved.attributes().len(), 1);
    }

    #[test]
    fn empty_group_and_nop_are_identical() {
        let empty = resolve(&[cs::<Msg, ()>("x"), many([])]).expect("resolve");
        let noop = resolve(&[cs::<Msg, ()>("x"), nop()]).expect("resolve");
        assert_eq!(empty.snapshot(), noop.snapshot());
    }

    #[test]
    fn when_false_is_nop_and_when_true_is_identity() {
        let styled = || many([cs::<Msg, ()>("on"), data("state", "open").expect("data")]);
        let hidden = resolve(&[when(false, styled())]).expect("resolve");
        assert_eq!(hidden.snapshot(), resolve(&[nop::<Msg, ()>()]).expect("resolve").snapshot());
        let shown = resolve(&[when(true, styled())]).expect("resolve");
        assert_eq!(shown.snapshot(), resolve(&[styled()]).expect("resolve").snapshot());
    }

    #[test]
    fn lift_folds_messages_of_shared_event() {
        let resolved = resolve(&[click(1), cs("mdc-button"), click(2), batch()]).expect("resolve");
        let handler = resolved.handler("click").expect("click handler");
        assert!(handler.is_combined());
        assert_eq!(
            handler.handle(&json!({ "type": "click" })),
            Some(Msg::Batch(vec![Msg::Clicked(1), Msg::Clicked(2)]))
        );
    }

    #[test]
    fn lift_skips_decoders_that_reject_the_payload() {
        let resolved = resolve(&[
            on("input", decoder::target_value().map(Msg::Typed)),
            on("input", Decoder::succeed(Msg::Clicked(0))),
            batch(),
        ])
        .expect("resolve");
        let handler = resolved.handler("input").expect("input handler");
        assert_eq!(
            handler.handle(&json!({ "target": {} })),
            Some(Msg::Batch(vec![Msg::Clicked(0)]))
        );
    }

    #[test]
    fn combined_handler_yields_nothing_when_every_decoder_fails() {
        let resolved = resolve(&[
            on("change", decoder::target_value().map(Msg::Typed)),
            on("change", decoder::target_checked().map(|_| Msg::Clicked(0))),
            batch(),
        ])
        .expect("resolve");
        let handler = resolved.handler("change").expect("change handler");
        assert!(handler.is_combined());
        assert_eq!(handler.handle(&json!({ "type": "change" })), None);
        assert_eq!(handler.handle(&Value::Null), None);
    }

    #[test]
    fn single_listener_is_bound_without_lift() {
        let resolved = resolve(&[click(7)]).expect("resolve");
        let handler = resolved.handler("click").expect("click handler");
        assert!(!handler.is_combined());
        assert_eq!(handler.handle(&Value::Null), Some(Msg::Clicked(7)));
    }

    #[test]
    fn shared_event_without_lift_is_a_configuration_error() {
        let err = resolve(&[click(1), click(2)]).expect_err("conflict");
        assert_eq!(
            err,
            ResolveError::ConflictingListeners {
                event: "click".to_string(),
                count: 2,
                part: None,
            }
        );
        assert_eq!(
            err.to_string(),
            "2 listeners bound to `click` without a lift to combine them"
        );
    }

    #[test]
    fn targeted_groups_stay_out_of_the_root() {
        let mut resolved = resolve(&[
            cs::<Msg, ()>("mdc-text-field"),
            input([cs("mdc-text-field__input"), on_click(Msg::Clicked(1))]),
            input([attribute("type", "email").expect("attribute")]),
        ])
        .expect("resolve");
        assert_eq!(resolved.class(), "mdc-text-field");
        assert!(resolved.handlers().is_empty());
        assert!(resolved.part(&Part::CONTAINER).is_none());

        let native = resolved.take_part(&Part::INPUT);
        assert_eq!(native.class(), "mdc-text-field__input");
        assert_eq!(native.attribute("type"), Some("email"));
        assert!(native.handler("click").is_some());
        assert!(resolved.part(&Part::INPUT).is_none());
    }

    #[test]
    fn targeted_groups_inherit_the_enclosing_lift() {
        let resolved = resolve(&[container([click(1), click(2)]), batch()]).expect("resolve");
        let wrapper = resolved.part(&Part::CONTAINER).expect("container");
        assert_eq!(
            wrapper.handler("click").and_then(|h| h.handle(&Value::Null)),
            Some(Msg::Batch(vec![Msg::Clicked(1), Msg::Clicked(2)]))
        );

        let err = resolve(&[input::<Msg, ()>([click(1), click(2)])]).expect_err("conflict");
        assert_eq!(
            err.to_string(),
            "2 listeners bound to `click` on part `input` without a lift to combine them"
        );
    }

    #[test]
    fn render_order_is_attributes_class_style_handlers() {
        let resolved = resolve(&[
            click(1),
            css::<Msg, ()>("color", "red").expect("css"),
            cs("a"),
            attribute("role", "button").expect("attribute"),
        ])
        .expect("resolve");
        let order: Vec<String> = resolved
            .render_order()
            .into_iter()
            .map(|rendered| match rendered {
                RenderedAttribute::Attribute { name, .. } => name.to_string(),
                RenderedAttribute::Class(_) => "class".to_string(),
                RenderedAttribute::Style(_) => "style".to_string(),
                RenderedAttribute::Handler(handler) => format!("on:{}", handler.event()),
            })
            .collect();
        assert_eq!(order, ["role", "class", "style", "on:click"]);
    }

    #[test]
    fn listener_flags_are_merged_across_combined_listeners() {
        let resolved = resolve(&[
            on_with_options(
                "keydown",
                ListenerOptions {
                    stop_propagation: false,
                    prevent_default: true,
                },
                Decoder::succeed(Msg::Clicked(1)),
            ),
            on_with_options(
                "keydown",
                ListenerOptions {
                    stop_propagation: true,
                    prevent_default: false,
                },
                Decoder::succeed(Msg::Clicked(2)),
            ),
            batch(),
        ])
        .expect("resolve");
        assert_eq!(
            resolved.snapshot()["handlers"],
            json!([{
                "event": "keydown",
                "listeners": 2,
                "stop_propagation": true,
                "prevent_default": true,
            }])
        );
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize)]
    struct Config {
        dense: bool,
        label: Option<String>,
    }

    #[test]
    fn setters_update_configuration_in_order() {
        let properties: Vec<Property<Msg, Config>> = vec![
            set(|config: &mut Config| config.label = Some("first".to_string())),
            cs("mdc-button"),
            many([set(|config: &mut Config| config.dense = true)]),
            set(|config: &mut Config| config.label = Some("second".to_string())),
        ];
        let expected = Config {
            dense: true,
            label: Some("second".to_string()),
        };
        assert_eq!(configure(Config::default(), &properties), expected);

        let resolved = resolve(&properties).expect("resolve");
        assert_eq!(
            resolved.snapshot_with_config()["config"],
            json!({ "dense": true, "label": "second" })
        );
        let (plain, config) = resolved.split_config();
        assert_eq!(plain.class(), "mdc-button");
        assert_eq!(config, expected);
    }
}
