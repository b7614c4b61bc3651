//! Inference of which alternative best matches a data value.
//!
//! Each alternative receives a match score against the data: one point
//! for runtime type compatibility, one per `required` property present,
//! one for an `enum`/`const` literal hit, plus recursive partial credit
//! for nested properties present in both the data and the alternative's
//! `properties`. Declaring `enum`/`const` that the present data does not
//! satisfy disqualifies the alternative outright, as does an
//! unresolvable `$ref` anywhere the scoring descends.
//!
//! Ties keep the previously selected index when it is among the maxima,
//! so a selection does not flicker while the user is still typing data
//! that momentarily satisfies several alternatives equally.

use log::debug;
use serde_json::Value;

use crate::resolve::{resolve_tracked, Alternative, SeenRefs};
use crate::schema::{DefinitionsTable, SchemaNode};

/// Pick the best-matching alternative for `data`.
///
/// Absent data selects `previous` when set, else index 0. When every
/// alternative is disqualified the selection falls back to index 0
/// deterministically; that is recoverable and only logged.
///
/// The definitions table is needed because nested property schemas may
/// hold `$ref`s that scoring has to expand.
pub fn select(
    alternatives: &[Alternative],
    data: Option<&Value>,
    previous: Option<usize>,
    definitions: &DefinitionsTable,
) -> usize {
    let previous = previous.filter(|i| *i < alternatives.len());
    let Some(data) = data else {
        return previous.unwrap_or(0);
    };

    let scores: Vec<Option<i64>> = alternatives
        .iter()
        .map(|alt| {
            let mut seen = SeenRefs::new();
            match_score(&alt.schema, data, definitions, &mut seen)
        })
        .collect();

    let Some(best) = scores.iter().flatten().max().copied() else {
        debug!("no alternative matches the data; falling back to index 0");
        return 0;
    };

    if let Some(prev) = previous {
        if scores[prev] == Some(best) {
            return prev;
        }
    }

    scores
        .iter()
        .position(|s| *s == Some(best))
        .unwrap_or(0)
}

/// Score one schema against one data value.
///
/// `None` means disqualified: an `enum`/`const` mismatch, an
/// unresolvable `$ref`, or a disqualified nested property.
pub fn match_score(
    node: &SchemaNode,
    data: &Value,
    definitions: &DefinitionsTable,
    seen: &mut SeenRefs,
) -> Option<i64> {
    let (resolved, followed) = match resolve_tracked(node, definitions, seen) {
        Ok(resolved) => resolved,
        Err(err) => {
            debug!("disqualifying alternative subtree: {err}");
            return None;
        }
    };
    let score = score_resolved(&resolved, data, definitions, seen);
    for pointer in &followed {
        seen.remove(pointer);
    }
    score
}

fn score_resolved(
    node: &SchemaNode,
    data: &Value,
    definitions: &DefinitionsTable,
    seen: &mut SeenRefs,
) -> Option<i64> {
    // A cycle cut carries no signal either way.
    if node.terminal {
        return Some(0);
    }

    let mut score = 0;

    if node.ty.matches(data) {
        score += 1;
    }

    let allowed = node.allowed_literals();
    if !allowed.is_empty() {
        if allowed.contains(data) {
            score += 1;
        } else {
            return None;
        }
    }

    if let Some(object) = data.as_object() {
        for name in &node.required {
            if object.contains_key(name) {
                score += 1;
            }
        }
        for (name, value) in object {
            if let Some(child) = node.properties.get(name) {
                score += match_score(child, value, definitions, seen)?;
            }
        }
    }

    Some(score)
}
