//! Leptos binding for resolved attribute sets.

use leptos::html::{ElementDescriptor, HtmlElement};
use leptos::{ev, logging, Callable, Callback};
use serde_json::{Map, Number, Value};
use wasm_bindgen::JsValue;

use crate::property::Property;
use crate::resolve::{resolve, Handler, RenderedAttribute, ResolveError, Resolved};

const PAYLOAD_FIELDS: [&str; 8] = [
    "type", "key", "code", "button", "clientX", "clientY", "detail", "timeStamp",
];
const TARGET_FIELDS: [&str; 4] = ["value", "checked", "id", "name"];

fn read(object: &JsValue, field: &str) -> Option<Value> {
    let value = js_sys::Reflect::get(object, &JsValue::from_str(field)).ok()?;
    if let Some(text) = value.as_string() {
        Some(Value::String(text))
    } else if let Some(flag) = value.as_bool() {
        Some(Value::Bool(flag))
    } else {
        value.as_f64().and_then(Number::from_f64).map(Value::Number)
    }
}

/// Snapshots the fields of a DOM event that decoders commonly read.
///
/// The result holds the event's `type`, keyboard and pointer fields when present, and a
/// `target` object with `value`, `checked`, `id` and `name`.
pub fn event_payload(event: &web_sys::Event) -> Value {
    let event: &JsValue = event.as_ref();
    let mut payload: Map<String, Value> = PAYLOAD_FIELDS
        .iter()
        .filter_map(|field| read(event, field).map(|value| (field.to_string(), value)))
        .collect();

    if let Ok(target) = js_sys::Reflect::get(event, &JsValue::from_str("target")) {
        if target.is_object() {
            let target: Map<String, Value> = TARGET_FIELDS
                .iter()
                .filter_map(|field| read(&target, field).map(|value| (field.to_string(), value)))
                .collect();
            payload.insert("target".to_string(), Value::Object(target));
        }
    }
    Value::Object(payload)
}

fn bind_handler<El, M>(
    element: HtmlElement<El>,
    handler: Handler<M>,
    on_message: Callback<M>,
) -> HtmlElement<El>
where
    El: ElementDescriptor + 'static,
    M: 'static,
{
    let event = handler.event().to_string();
    element.on(ev::Custom::<web_sys::Event>::new(event), move |event| {
        let options = handler.options();
        if options.prevent_default {
            event.prevent_default();
        }
        if options.stop_propagation {
            event.stop_propagation();
        }
        match handler.handle(&event_payload(&event)) {
            Some(msg) => on_message.call(msg),
            None => {
                logging::debug_warn!(
                    "`{}` event produced no message from its payload",
                    handler.event()
                );
            }
        }
    })
}

/// Attaches a resolved attribute set to `element`.
///
/// Attributes are attached in [`Resolved::render_order`]. Messages produced by handlers are
/// forwarded to `on_message`. Sub-element options are not applied; components take them with
/// [`Resolved::take_part`] and apply them to the matching child.
pub fn apply<El, M, C>(
    element: HtmlElement<El>,
    resolved: Resolved<M, C>,
    on_message: Callback<M>,
) -> HtmlElement<El>
where
    El: ElementDescriptor + 'static,
    M: 'static,
{
    let mut element = element;
    let mut handlers = Vec::new();
    for rendered in resolved.render_order() {
        element = match rendered {
            RenderedAttribute::Attribute { name, value } => {
                element.attr(name.to_string(), value.to_string())
            }
            RenderedAttribute::Class(class) => element.attr("class", class),
            RenderedAttribute::Style(style) => element.attr("style", style),
            RenderedAttribute::Handler(handler) => {
                handlers.push(handler.clone());
                element
            }
        };
    }
    handlers
        .into_iter()
        .fold(element, |element, handler| bind_handler(element, handler, on_message))
}

/// Resolves `properties` and attaches the result to `element`.
///
/// # Errors
///
/// Returns the [`ResolveError`] of [`resolve`]; nothing is attached in that case.
pub fn styled<El, M>(
    element: HtmlElement<El>,
    properties: &[Property<M>],
    on_message: Callback<M>,
) -> Result<HtmlElement<El>, ResolveError>
where
    El: ElementDescriptor + 'static,
    M: 'static,
{
    let resolved = resolve(properties)?;
    Ok(apply(element, resolved, on_message))
}
