//! Selection state machine orchestrating the engine.
//!
//! [`SelectionTracker`] owns the currently selected alternative index
//! and the working data for one schema instance, and is driven by
//! exactly three transitions: [`init`](SelectionTracker::init),
//! [`data_changed`](SelectionTracker::data_changed), and
//! [`explicit_switch`](SelectionTracker::explicit_switch). The
//! rendering layer persists the emitted [`Selection`] pairs as its own
//! state; the engine holds no UI identifiers.
//!
//! One tracker serves one schema version. A changed schema means a new
//! tracker, whose `init` recomputes the index from the data.

use serde::Serialize;
use serde_json::Value;

use crate::defaults::compute_defaults;
use crate::error::SchemaError;
use crate::matcher::select;
use crate::merge::{merge_on_switch, overlay};
use crate::resolve::{resolve, resolve_alternatives, Alternative, SeenRefs};
use crate::schema::{DefinitionsTable, SchemaNode};

/// The `(index, data)` pair emitted after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Selected alternative, `0`-based.
    pub index: usize,
    /// Working form data; `None` means absent.
    pub data: Option<Value>,
}

/// Tracks which alternative of a `oneOf`/`anyOf` schema is active.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    root: SchemaNode,
    definitions: DefinitionsTable,
    alternatives: Vec<Alternative>,
    index: Option<usize>,
    data: Option<Value>,
}

impl SelectionTracker {
    /// Build a tracker from a raw top-level schema value.
    ///
    /// The root may itself be a `$ref`; it is dereferenced against the
    /// schema's own `definitions`/`$defs`/`defs` sections.
    ///
    /// # Errors
    ///
    /// Parsing errors propagate; a schema whose resolved root declares
    /// no `oneOf`/`anyOf` list yields [`SchemaError::NoAlternatives`].
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        let definitions = DefinitionsTable::from_root(schema)?;
        let parsed = SchemaNode::parse(schema)?;

        let mut seen = SeenRefs::new();
        let root = resolve(&parsed, &definitions, &mut seen)?;
        let alternatives = resolve_alternatives(&parsed, &definitions)?;
        if alternatives.is_empty() {
            return Err(SchemaError::NoAlternatives {
                path: "root".to_string(),
            });
        }

        Ok(SelectionTracker {
            root,
            definitions,
            alternatives,
            index: None,
            data: None,
        })
    }

    /// The resolved alternatives, in declaration order.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Currently selected index; `None` before [`init`](Self::init).
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Current working data.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// First resolution: infer the index from `data`, compute defaults
    /// for it, and overlay the data on top.
    pub fn init(&mut self, data: Option<Value>) -> Selection {
        let index = select(&self.alternatives, data.as_ref(), None, &self.definitions);
        let merged = overlay(self.combined_defaults(index), data.as_ref());
        self.commit(index, merged)
    }

    /// A field was edited (or the data replaced) by the external UI.
    ///
    /// When the matcher outcome is unchanged the data is emitted
    /// untouched — editing a field never wipes sibling fields. A
    /// changed outcome is an implicit switch: the new branch's defaults
    /// are merged in, but nothing is cleared (the selection followed
    /// the data, so the old branch has no stale claim on it).
    pub fn data_changed(&mut self, new_data: Option<Value>) -> Selection {
        let Some(previous) = self.index else {
            return self.init(new_data);
        };

        let index = select(
            &self.alternatives,
            new_data.as_ref(),
            Some(previous),
            &self.definitions,
        );
        if index == previous {
            return self.commit(index, new_data);
        }

        let merged = merge_on_switch(
            new_data.as_ref(),
            None,
            &self.alternatives[index].schema,
            self.combined_defaults(index),
        );
        self.commit(index, merged)
    }

    /// The user picked a branch directly; the matcher is bypassed.
    ///
    /// This is the only transition that always clears fields the new
    /// branch does not share, even when the matcher would have inferred
    /// a different index from the resulting data.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidSwitchTarget`] when `target` is out of
    /// range; the tracker state is left unchanged.
    pub fn explicit_switch(&mut self, target: usize) -> Result<Selection, SchemaError> {
        if target >= self.alternatives.len() {
            return Err(SchemaError::InvalidSwitchTarget {
                index: target,
                len: self.alternatives.len(),
            });
        }

        let merged = merge_on_switch(
            self.data.as_ref(),
            self.index.map(|i| &self.alternatives[i].schema),
            &self.alternatives[target].schema,
            self.combined_defaults(target),
        );
        Ok(self.commit(target, merged))
    }

    /// Defaults of the sibling shape (properties declared next to the
    /// `oneOf` block) overlaid by the chosen alternative's defaults.
    fn combined_defaults(&self, index: usize) -> Option<Value> {
        let sibling = compute_defaults(&self.root, &self.definitions, None);
        let alt = compute_defaults(
            &self.alternatives[index].schema,
            &self.definitions,
            None,
        );
        overlay(sibling, alt.as_ref())
    }

    fn commit(&mut self, index: usize, data: Option<Value>) -> Selection {
        self.index = Some(index);
        self.data = data.clone();
        Selection { index, data }
    }
}
