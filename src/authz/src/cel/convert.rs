//! Attribute bags as CEL values
//!
//! The bag becomes a CEL map keyed by attribute name. Nested JSON objects
//! become nested maps, so `attributes.owner.id` resolves the way it reads.

use crate::types::AttributeBag;
use cel_interpreter::objects::{Key, Map, Value as CelValue};
use serde_json::{Number, Value as JsonValue};
use std::sync::Arc;

/// CEL map holding every attribute of the bag
pub(crate) fn attributes_to_cel(attributes: &AttributeBag) -> CelValue {
    cel_map(attributes.iter())
}

/// A single attribute value; integers stay integral, JSON `null` is CEL `null`
fn attribute_to_cel(value: &JsonValue) -> CelValue {
    match value {
        JsonValue::Null => CelValue::Null,
        JsonValue::Bool(b) => CelValue::Bool(*b),
        JsonValue::Number(n) => number_to_cel(n),
        JsonValue::String(s) => CelValue::String(Arc::new(s.clone())),
        JsonValue::Array(items) => {
            CelValue::List(Arc::new(items.iter().map(attribute_to_cel).collect()))
        }
        JsonValue::Object(obj) => cel_map(obj.iter()),
    }
}

fn number_to_cel(n: &Number) -> CelValue {
    n.as_i64()
        .map(CelValue::Int)
        .or_else(|| n.as_u64().map(CelValue::UInt))
        .or_else(|| n.as_f64().map(CelValue::Float))
        .unwrap_or(CelValue::Null)
}

fn cel_map<'a>(entries: impl Iterator<Item = (&'a String, &'a JsonValue)>) -> CelValue {
    let map = entries
        .map(|(key, value)| (Key::from(key.clone()), attribute_to_cel(value)))
        .collect();
    CelValue::Map(Map { map: Arc::new(map) })
}
