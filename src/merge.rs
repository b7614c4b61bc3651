//! Data merging when the active alternative changes.
//!
//! A branch switch intentionally clears data that only made sense under
//! the old branch, while leaving sibling fields declared outside the
//! `oneOf`/`anyOf` block untouched. The rules here reproduce the
//! original engine's observable behavior: keys declared by the old
//! alternative's `properties` are dropped even when the new alternative
//! re-declares them (the new branch's defaults win), and a scalar value
//! only survives a switch when its runtime type is compatible with the
//! new alternative.

use serde_json::{Map, Value};

use crate::schema::SchemaNode;

/// Produce the new data value after the active alternative changes.
///
/// Starts from `new_defaults` and carries over every old key the old
/// alternative did not declare. `old_alternative = None` (first
/// resolution) degrades to a plain overlay of the old data onto the
/// defaults.
pub fn merge_on_switch(
    old_data: Option<&Value>,
    old_alternative: Option<&SchemaNode>,
    new_alternative: &SchemaNode,
    new_defaults: Option<Value>,
) -> Option<Value> {
    let Some(old) = old_data else {
        return new_defaults;
    };

    match old {
        Value::Object(old_map) => {
            // Object data only follows into an object-shaped branch.
            if !new_alternative.is_object_like() {
                return new_defaults;
            }
            let mut out = match new_defaults {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            for (name, value) in old_map {
                let stale = old_alternative.is_some_and(|alt| alt.properties.contains_key(name));
                if !stale {
                    out.insert(name.clone(), value.clone());
                }
            }
            Some(Value::Object(out))
        }
        scalar => {
            if new_alternative.ty.matches(scalar) {
                Some(scalar.clone())
            } else {
                new_defaults
            }
        }
    }
}

/// Deep overlay of `over` onto `base`; `over` wins, objects merge
/// field by field.
pub fn overlay(base: Option<Value>, over: Option<&Value>) -> Option<Value> {
    match (base, over) {
        (base, None) => base,
        (Some(Value::Object(mut base_map)), Some(Value::Object(over_map))) => {
            for (name, value) in over_map {
                let merged = overlay(base_map.remove(name), Some(value));
                if let Some(merged) = merged {
                    base_map.insert(name.clone(), merged);
                }
            }
            Some(Value::Object(base_map))
        }
        (_, Some(value)) => Some(value.clone()),
    }
}
