//! Default data computation for resolved schema nodes.
//!
//! Builds the data value a form should start from: declared `default`
//! literals, required object structure, and any provided seed value,
//! with the seed taking precedence. The computation is idempotent —
//! feeding its own output back as the seed reproduces it exactly.

use log::debug;
use serde_json::{Map, Value};

use crate::resolve::{resolve_tracked, SeenRefs};
use crate::schema::{DefinitionsTable, SchemaNode, SchemaType};

/// Compute the default data value for a schema node.
///
/// * Scalars: the `provided` seed, else the declared `default`, else
///   absent.
/// * Object-like nodes: a map of recursive per-property defaults, each
///   seeded by the matching field of `provided` (falling back to the
///   node's own `default` object); absent children are omitted.
///   Undeclared `provided` keys pass through unless
///   `additionalProperties` is `false`.
/// * Arrays: `provided` when it is already a sequence, else the
///   declared `default` when it is one, else an empty sequence.
///   `minItems` expansion is the array widget's concern, not ours.
///
/// Unresolvable `$ref`s inside the tree are recovered by keeping the
/// seed for that subtree; cycles collapse to absent via the terminal
/// marker.
pub fn compute_defaults(
    node: &SchemaNode,
    definitions: &DefinitionsTable,
    provided: Option<&Value>,
) -> Option<Value> {
    let mut seen = SeenRefs::new();
    defaults_node(node, definitions, provided, &mut seen)
}

fn defaults_node(
    node: &SchemaNode,
    definitions: &DefinitionsTable,
    provided: Option<&Value>,
    seen: &mut SeenRefs,
) -> Option<Value> {
    let (resolved, followed) = match resolve_tracked(node, definitions, seen) {
        Ok(resolved) => resolved,
        Err(err) => {
            debug!("keeping seed for unresolvable subtree: {err}");
            return provided.cloned();
        }
    };
    let out = defaults_resolved(&resolved, definitions, provided, seen);
    for pointer in &followed {
        seen.remove(pointer);
    }
    out
}

fn defaults_resolved(
    node: &SchemaNode,
    definitions: &DefinitionsTable,
    provided: Option<&Value>,
    seen: &mut SeenRefs,
) -> Option<Value> {
    if node.terminal {
        return provided.cloned();
    }

    if node.is_object_like() {
        let declared = node.default.as_ref().and_then(Value::as_object);
        let seeded = provided.and_then(Value::as_object);

        let mut out = Map::new();
        for (name, child) in &node.properties {
            let seed = seeded
                .and_then(|m| m.get(name))
                .or_else(|| declared.and_then(|m| m.get(name)));
            if let Some(value) = defaults_node(child, definitions, seed, seen) {
                out.insert(name.clone(), value);
            }
        }

        if node.additional.passes_through() {
            if let Some(map) = seeded {
                for (name, value) in map {
                    if !node.properties.contains_key(name) {
                        out.insert(name.clone(), value.clone());
                    }
                }
            }
        }

        return Some(Value::Object(out));
    }

    match node.ty {
        SchemaType::Array => {
            if let Some(value) = provided {
                if value.is_array() {
                    return Some(value.clone());
                }
            }
            if let Some(default) = &node.default {
                if default.is_array() {
                    return Some(default.clone());
                }
            }
            Some(Value::Array(Vec::new()))
        }
        _ => provided.cloned().or_else(|| node.default.clone()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn setup(raw: serde_json::Value) -> (SchemaNode, DefinitionsTable) {
        let node = SchemaNode::parse(&raw).unwrap();
        let defs = DefinitionsTable::from_root(&raw).unwrap();
        (node, defs)
    }

    #[test]
    fn scalar_default_and_seed_precedence() {
        let (node, defs) = setup(json!({ "type": "string", "default": "fallback" }));
        assert_eq!(compute_defaults(&node, &defs, None), Some(json!("fallback")));
        assert_eq!(
            compute_defaults(&node, &defs, Some(&json!("typed"))),
            Some(json!("typed"))
        );

        let (bare, defs) = setup(json!({ "type": "string" }));
        assert_eq!(compute_defaults(&bare, &defs, None), None);
    }

    #[test]
    fn object_collects_property_defaults() {
        let (node, defs) = setup(json!({
            "type": "object",
            "properties": {
                "foo": { "type": "string", "default": "defaultfoo" },
                "bar": { "type": "string" },
                "nested": { "type": "object" },
            },
        }));
        assert_eq!(
            compute_defaults(&node, &defs, None),
            Some(json!({ "foo": "defaultfoo", "nested": {} }))
        );
    }

    #[test]
    fn declared_object_default_seeds_children() {
        let (node, defs) = setup(json!({
            "type": "object",
            "default": { "foo": "from-default" },
            "properties": {
                "foo": { "type": "string" },
            },
        }));
        assert_eq!(
            compute_defaults(&node, &defs, None),
            Some(json!({ "foo": "from-default" }))
        );
        assert_eq!(
            compute_defaults(&node, &defs, Some(&json!({ "foo": "seeded" }))),
            Some(json!({ "foo": "seeded" }))
        );
    }

    #[test]
    fn additional_properties_gate_passthrough() {
        let open = setup(json!({
            "type": "object",
            "properties": { "foo": { "type": "string" } },
        }));
        assert_eq!(
            compute_defaults(&open.0, &open.1, Some(&json!({ "foo": "x", "extra": 1 }))),
            Some(json!({ "foo": "x", "extra": 1 }))
        );

        let closed = setup(json!({
            "type": "object",
            "additionalProperties": false,
            "properties": { "foo": { "type": "string" } },
        }));
        assert_eq!(
            compute_defaults(&closed.0, &closed.1, Some(&json!({ "foo": "x", "extra": 1 }))),
            Some(json!({ "foo": "x" }))
        );
    }

    #[test]
    fn arrays_keep_sequences_and_default_to_empty() {
        let (node, defs) = setup(json!({ "type": "array", "items": { "type": "string" } }));
        assert_eq!(
            compute_defaults(&node, &defs, Some(&json!(["a", "b"]))),
            Some(json!(["a", "b"]))
        );
        assert_eq!(
            compute_defaults(&node, &defs, Some(&json!("not-an-array"))),
            Some(json!([]))
        );
        assert_eq!(compute_defaults(&node, &defs, None), Some(json!([])));

        let (with_default, defs) = setup(json!({
            "type": "array",
            "default": ["seeded"],
        }));
        assert_eq!(
            compute_defaults(&with_default, &defs, None),
            Some(json!(["seeded"]))
        );
    }

    #[test]
    fn refs_resolve_inside_properties() {
        let (node, defs) = setup(json!({
            "type": "object",
            "properties": {
                "field": { "$ref": "#/definitions/named" },
            },
            "definitions": {
                "named": { "type": "string", "default": "resolved" },
            },
        }));
        assert_eq!(
            compute_defaults(&node, &defs, None),
            Some(json!({ "field": "resolved" }))
        );
    }

    #[test]
    fn cyclic_subtree_defaults_to_absent() {
        let (node, defs) = setup(json!({
            "$ref": "#/definitions/rec",
            "definitions": {
                "rec": {
                    "type": "object",
                    "properties": {
                        "next": { "$ref": "#/definitions/rec" },
                        "label": { "type": "string", "default": "leaf" },
                    },
                },
            },
        }));
        // The self-reference collapses to the terminal marker: a value,
        // not an unbounded structure.
        assert_eq!(
            compute_defaults(&node, &defs, None),
            Some(json!({ "label": "leaf" }))
        );
    }

    #[test]
    fn computation_is_idempotent() {
        let (node, defs) = setup(json!({
            "type": "object",
            "properties": {
                "foo": { "type": "string", "default": "defaultfoo" },
                "list": { "type": "array", "items": { "type": "number" } },
                "inner": {
                    "type": "object",
                    "properties": { "flag": { "type": "boolean", "default": true } },
                },
            },
        }));
        let seed = json!({ "extra": "kept", "foo": "typed" });
        let once = compute_defaults(&node, &defs, Some(&seed));
        let twice = compute_defaults(&node, &defs, once.as_ref());
        assert_eq!(once, twice);
    }
}
