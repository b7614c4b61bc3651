//! # oneform
//!
//! Alternative resolution and default engine for JSON Schema driven
//! forms.
//!
//! Schemas may present mutually-exclusive alternatives for a value
//! through `oneOf`/`anyOf`. Keeping a rendered form in sync with such a
//! schema means dereferencing (possibly self-referential) `$ref`
//! pointers, inferring which alternative currently matches the data,
//! computing the selected alternative's defaults, and merging data on
//! every switch without destroying sibling fields. This crate is that
//! engine; widget rendering, event wiring, and full JSON Schema
//! validation stay with the caller.
//!
//! ## Features
//!
//! - Cycle-safe `$ref` dereferencing over `definitions`/`$defs`/`defs`
//! - Score-based alternative matching, stable against the previous
//!   selection while the user is typing
//! - Recursive, idempotent default computation honoring `default`,
//!   `required`, and `additionalProperties`
//! - Merge-on-switch that clears stale branch data while preserving
//!   sibling properties declared outside the `oneOf` block
//! - A plain state machine ([`SelectionTracker`]) emitting
//!   `(index, data)` pairs for the rendering layer to persist
//!
//! ## Quick Start
//!
//! ```rust
//! use oneform::SelectionTracker;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "oneOf": [
//!         { "type": "object",
//!           "properties": { "foo": { "type": "string", "default": "A" } } },
//!         { "type": "object",
//!           "properties": { "foo": { "type": "string", "default": "B" } } },
//!     ],
//! });
//!
//! let mut tracker = SelectionTracker::new(&schema).unwrap();
//! let first = tracker.init(None);
//! assert_eq!((first.index, first.data), (0, Some(json!({ "foo": "A" }))));
//!
//! let switched = tracker.explicit_switch(1).unwrap();
//! assert_eq!((switched.index, switched.data), (1, Some(json!({ "foo": "B" }))));
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Schema data model and parsing
//! - [`resolve`] - Cycle-safe `$ref` dereferencing
//! - [`matcher`] - Alternative match scoring and selection
//! - [`defaults`] - Default data computation
//! - [`merge`] - Merge policy for alternative switches
//! - [`tracker`] - Selection state machine

/// Default data computation for resolved schema nodes.
pub mod defaults;

/// Error types surfaced by the engine.
pub mod error;

/// Alternative match scoring and selection.
pub mod matcher;

/// Merge policy applied when the active alternative changes.
pub mod merge;

/// Cycle-safe `$ref` dereferencing.
pub mod resolve;

/// Schema data model and parsing.
pub mod schema;

/// Selection state machine.
pub mod tracker;

pub use defaults::compute_defaults;
pub use error::SchemaError;
pub use matcher::select;
pub use merge::{merge_on_switch, overlay};
pub use resolve::{resolve, resolve_alternatives, Alternative, SeenRefs};
pub use schema::{AdditionalProperties, DefinitionsTable, SchemaNode, SchemaType};
pub use serde_json::Value;
pub use tracker::{Selection, SelectionTracker};
