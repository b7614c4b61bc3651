//! Cycle-safe `$ref` dereferencing.
//!
//! Resolution follows pointer chains through the [`DefinitionsTable`]
//! and carries a [`SeenRefs`] set of pointers currently being expanded.
//! Re-entering a pointer already in the set yields the terminal marker
//! node instead of recursing, which bounds traversal depth to the
//! number of distinct pointers and guarantees termination on
//! self-referential schemas.
//!
//! The seen set is scoped to a single logical resolution and must never
//! be shared across unrelated calls.

use std::collections::HashSet;

use log::warn;

use crate::error::SchemaError;
use crate::schema::{DefinitionsTable, SchemaNode};

/// Pointers currently being expanded within one resolution call.
pub type SeenRefs = HashSet<String>;

/// One dereferenced candidate sub-schema with its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    /// The resolved schema (still holds its `$ref` when unresolvable).
    pub schema: SchemaNode,
    /// `title` of the resolved schema, else `"Option <1-based>"`.
    pub label: String,
}

/// Follow the pointer chain of `node`, leaving every followed pointer
/// in `seen` and returning them so the caller can pop them once it is
/// done with the resolved subtree.
pub(crate) fn resolve_tracked(
    node: &SchemaNode,
    definitions: &DefinitionsTable,
    seen: &mut SeenRefs,
) -> Result<(SchemaNode, Vec<String>), SchemaError> {
    let mut followed = Vec::new();
    let mut current = node.clone();

    while let Some(pointer) = current.reference.clone() {
        if seen.contains(&pointer) {
            return Ok((SchemaNode::terminal(), followed));
        }
        let Some(target) = definitions.get(&pointer) else {
            for p in &followed {
                seen.remove(p);
            }
            return Err(SchemaError::UnresolvableRef { pointer });
        };
        seen.insert(pointer.clone());
        followed.push(pointer);
        current = target.clone();
    }

    Ok((current, followed))
}

/// Resolve a single node, returning a dereferenced copy.
///
/// A node without a `$ref` comes back unchanged. Resolution is
/// idempotent and never mutates its input; `seen` is restored before
/// returning, since the expansion completes within this call.
///
/// # Errors
///
/// Returns [`SchemaError::UnresolvableRef`] when a pointer along the
/// chain has no definitions entry.
pub fn resolve(
    node: &SchemaNode,
    definitions: &DefinitionsTable,
    seen: &mut SeenRefs,
) -> Result<SchemaNode, SchemaError> {
    let (resolved, followed) = resolve_tracked(node, definitions, seen)?;
    for pointer in &followed {
        seen.remove(pointer);
    }
    Ok(resolved)
}

/// Dereference a schema's `oneOf`/`anyOf` list into labeled
/// [`Alternative`]s.
///
/// The node itself is dereferenced first (a root may be nothing but a
/// `$ref`), and its pointer chain stays open while the alternatives
/// resolve, so an alternative referring back to the root collapses to
/// the terminal marker instead of looping.
///
/// An alternative whose own `$ref` cannot be resolved is kept in the
/// list unresolved — indices presented to the caller must stay stable —
/// and is reported as a diagnostic; the matcher disqualifies it.
///
/// # Errors
///
/// Returns [`SchemaError::UnresolvableRef`] only when the *root* node
/// itself cannot be resolved.
pub fn resolve_alternatives(
    node: &SchemaNode,
    definitions: &DefinitionsTable,
) -> Result<Vec<Alternative>, SchemaError> {
    let mut seen = SeenRefs::new();
    let (root, _root_chain) = resolve_tracked(node, definitions, &mut seen)?;

    let mut out = Vec::with_capacity(root.alternatives.len());
    for (i, alt) in root.alternatives.iter().enumerate() {
        let fallback = format!("Option {}", i + 1);
        match resolve_tracked(alt, definitions, &mut seen) {
            Ok((schema, followed)) => {
                for pointer in &followed {
                    seen.remove(pointer);
                }
                let label = schema
                    .title
                    .clone()
                    .or_else(|| alt.title.clone())
                    .unwrap_or(fallback);
                out.push(Alternative { schema, label });
            }
            Err(SchemaError::UnresolvableRef { pointer }) => {
                warn!("alternative {i} excluded from matching: unresolvable $ref {pointer:?}");
                out.push(Alternative {
                    schema: alt.clone(),
                    label: alt.title.clone().unwrap_or(fallback),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(out)
}
