//! Schema data model and parsing.
//!
//! The engine works on [`SchemaNode`], a tagged structure covering the
//! JSON Schema subset needed to resolve alternatives and compute
//! defaults: `type`, `properties`, `required`, `items`, `enum`, `const`,
//! `additionalProperties`, `$ref`, `default`, `title`, and the
//! `oneOf`/`anyOf` alternative lists (treated identically).
//!
//! Parsing is tolerant: keywords outside the subset are ignored, while
//! malformed fragments inside it surface [`SchemaError::InvalidSchema`].

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::SchemaError;

/// Declared value type of a schema node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaType {
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// Integral JSON number.
    Integer,
    /// JSON boolean.
    Boolean,
    /// JSON null.
    Null,
    /// No `type` keyword declared; compatible with any value.
    #[default]
    Unset,
}

impl SchemaType {
    fn parse(raw: &str, path: &str) -> Result<Self, SchemaError> {
        match raw {
            "object" => Ok(SchemaType::Object),
            "array" => Ok(SchemaType::Array),
            "string" => Ok(SchemaType::String),
            "number" => Ok(SchemaType::Number),
            "integer" => Ok(SchemaType::Integer),
            "boolean" => Ok(SchemaType::Boolean),
            "null" => Ok(SchemaType::Null),
            other => Err(SchemaError::InvalidSchema {
                path: format!("{path}.type"),
                expected: "object/array/string/number/integer/boolean/null".to_string(),
                actual: other.to_string(),
            }),
        }
    }

    /// Whether a runtime JSON value is compatible with this declared type.
    ///
    /// `Unset` matches anything; `Number` accepts integers.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            SchemaType::Object => value.is_object(),
            SchemaType::Array => value.is_array(),
            SchemaType::String => value.is_string(),
            SchemaType::Number => value.is_number(),
            SchemaType::Integer => value.is_i64() || value.is_u64(),
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Null => value.is_null(),
            SchemaType::Unset => true,
        }
    }
}

/// The `additionalProperties` keyword, reduced to the subset the
/// default computer needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AdditionalProperties {
    /// Undeclared properties pass through (keyword absent or `true`).
    #[default]
    Allowed,
    /// Undeclared properties are dropped (`false`).
    Denied,
    /// Undeclared properties are validated by a schema. The engine only
    /// cares that they pass through; the schema is kept for callers.
    Schema(Box<SchemaNode>),
}

impl AdditionalProperties {
    /// Whether undeclared properties survive default computation.
    pub fn passes_through(&self) -> bool {
        !matches!(self, AdditionalProperties::Denied)
    }
}

/// One node of the parsed schema tree.
///
/// A node with [`reference`](Self::reference) set is unresolved until it
/// goes through the [dereferencer](crate::resolve); its other fields are
/// whatever the `$ref` site declared alongside the pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    /// Declared `type`, or `Unset`.
    pub ty: SchemaType,
    /// Declared `properties`, in declaration order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Property names listed under `required`.
    pub required: Vec<String>,
    /// The `items` schema, for arrays.
    pub items: Option<Box<SchemaNode>>,
    /// Allowed literals from `enum`.
    pub enum_values: Vec<Value>,
    /// Allowed literal from `const`.
    pub const_value: Option<Value>,
    /// The `additionalProperties` keyword.
    pub additional: AdditionalProperties,
    /// Declared `default` literal.
    pub default: Option<Value>,
    /// Declared `title`.
    pub title: Option<String>,
    /// The `$ref` pointer, when this node is a reference.
    pub reference: Option<String>,
    /// Sub-schemas from `oneOf` (or `anyOf` when `oneOf` is absent).
    pub alternatives: Vec<SchemaNode>,
    /// Cycle-cut marker produced by the dereferencer; a terminal node
    /// is never expanded further, scores nothing, and defaults to
    /// absent.
    pub terminal: bool,
}

impl SchemaNode {
    /// Parse a schema node from a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] when a keyword inside the
    /// supported subset has an unusable shape.
    pub fn parse(value: &Value) -> Result<Self, SchemaError> {
        Self::parse_at(value, "root")
    }

    /// The degenerate marker node substituted when dereferencing
    /// re-enters a pointer that is already being expanded.
    pub fn terminal() -> Self {
        SchemaNode {
            terminal: true,
            ..SchemaNode::default()
        }
    }

    /// Whether the node describes an object shape, either via an
    /// explicit `type` or by declaring `properties`.
    pub fn is_object_like(&self) -> bool {
        self.ty == SchemaType::Object || !self.properties.is_empty()
    }

    /// Allowed literals: `const` if declared, else the `enum` list.
    /// Empty when neither keyword is declared.
    pub fn allowed_literals(&self) -> &[Value] {
        match &self.const_value {
            Some(v) => std::slice::from_ref(v),
            None => &self.enum_values,
        }
    }

    /// Whether `required` declares the given property name.
    pub fn requires(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    fn parse_at(value: &Value, path: &str) -> Result<Self, SchemaError> {
        let map = match value {
            Value::Object(map) => map,
            // Boolean schemas are outside the subset; `true` and `false`
            // both reduce to the empty node here.
            Value::Bool(_) => return Ok(SchemaNode::default()),
            other => {
                return Err(SchemaError::InvalidSchema {
                    path: path.to_string(),
                    expected: "schema object".to_string(),
                    actual: format!("{other}"),
                });
            }
        };

        let mut node = SchemaNode::default();

        if let Some(ty) = map.get("type") {
            // Non-string forms (type arrays) are outside the subset and
            // fall back to Unset.
            if let Some(raw) = ty.as_str() {
                node.ty = SchemaType::parse(raw, path)?;
            }
        }

        if let Some(props) = map.get("properties") {
            let obj = props
                .as_object()
                .ok_or_else(|| SchemaError::InvalidSchema {
                    path: format!("{path}.properties"),
                    expected: "object".to_string(),
                    actual: format!("{props}"),
                })?;
            let mut parsed = IndexMap::with_capacity(obj.len());
            for (name, child) in obj {
                let child_path = format!("{path}.{name}");
                parsed.insert(name.clone(), Self::parse_at(child, &child_path)?);
            }
            node.properties = parsed;
        }

        if let Some(required) = map.get("required") {
            let arr = required
                .as_array()
                .ok_or_else(|| SchemaError::InvalidSchema {
                    path: format!("{path}.required"),
                    expected: "array of strings".to_string(),
                    actual: format!("{required}"),
                })?;
            for entry in arr {
                match entry.as_str() {
                    Some(name) => node.required.push(name.to_string()),
                    None => {
                        return Err(SchemaError::InvalidSchema {
                            path: format!("{path}.required"),
                            expected: "string".to_string(),
                            actual: format!("{entry}"),
                        });
                    }
                }
            }
        }

        if let Some(items) = map.get("items") {
            // Tuple-form items are outside the subset.
            if !items.is_array() {
                let parsed = Self::parse_at(items, &format!("{path}.items"))?;
                node.items = Some(Box::new(parsed));
            }
        }

        if let Some(enumeration) = map.get("enum") {
            let arr = enumeration
                .as_array()
                .ok_or_else(|| SchemaError::InvalidSchema {
                    path: format!("{path}.enum"),
                    expected: "array".to_string(),
                    actual: format!("{enumeration}"),
                })?;
            node.enum_values = arr.clone();
        }

        node.const_value = map.get("const").cloned();

        if let Some(additional) = map.get("additionalProperties") {
            node.additional = match additional {
                Value::Bool(true) => AdditionalProperties::Allowed,
                Value::Bool(false) => AdditionalProperties::Denied,
                other => {
                    let parsed =
                        Self::parse_at(other, &format!("{path}.additionalProperties"))?;
                    AdditionalProperties::Schema(Box::new(parsed))
                }
            };
        }

        node.default = map.get("default").cloned();
        node.title = map
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);
        node.reference = map
            .get("$ref")
            .and_then(Value::as_str)
            .map(str::to_string);

        // oneOf and anyOf are handled identically; exclusivity is a
        // validation concern, not a selection concern. oneOf wins when
        // both are declared.
        let variants = map.get("oneOf").or_else(|| map.get("anyOf"));
        if let Some(variants) = variants {
            let arr = variants
                .as_array()
                .ok_or_else(|| SchemaError::InvalidSchema {
                    path: format!("{path}.oneOf"),
                    expected: "array of schemas".to_string(),
                    actual: format!("{variants}"),
                })?;
            for (i, entry) in arr.iter().enumerate() {
                let child_path = format!("{path}.oneOf[{i}]");
                node.alternatives.push(Self::parse_at(entry, &child_path)?);
            }
        }

        Ok(node)
    }
}

/// Sections of the schema root that hold reusable definitions.
const DEFINITION_SECTIONS: &[&str] = &["definitions", "$defs", "defs"];

/// Immutable pointer → schema table built once per top-level schema.
///
/// Entries are keyed by full pointer strings (`#/definitions/foo`),
/// collected from the root's `definitions`, `$defs`, and `defs` maps.
#[derive(Debug, Clone, Default)]
pub struct DefinitionsTable {
    entries: HashMap<String, SchemaNode>,
}

impl DefinitionsTable {
    /// An empty table for schemas without definitions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the table from the raw top-level schema value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] when a definitions section
    /// or one of its entries is malformed.
    pub fn from_root(root: &Value) -> Result<Self, SchemaError> {
        let mut entries = HashMap::new();
        let Some(map) = root.as_object() else {
            return Ok(Self::default());
        };

        for section in DEFINITION_SECTIONS {
            let Some(defs) = map.get(*section) else {
                continue;
            };
            let obj = defs.as_object().ok_or_else(|| SchemaError::InvalidSchema {
                path: format!("root.{section}"),
                expected: "object".to_string(),
                actual: format!("{defs}"),
            })?;
            for (name, value) in obj {
                let pointer = format!("#/{section}/{name}");
                let path = format!("root.{section}.{name}");
                entries.insert(pointer, SchemaNode::parse_at(value, &path)?);
            }
        }

        Ok(DefinitionsTable { entries })
    }

    /// Look up a pointer string.
    pub fn get(&self, pointer: &str) -> Option<&SchemaNode> {
        self.entries.get(pointer)
    }

    /// Number of known definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
