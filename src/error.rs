use thiserror::Error;

/// Errors surfaced by schema parsing, dereferencing, and selection.
///
/// Recoverable conditions (cyclic references, a data value matching no
/// alternative) are handled internally and reported through logging,
/// not through this type.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A `$ref` pointer has no entry in the definitions table.
    #[error("unresolvable $ref pointer {pointer:?}")]
    UnresolvableRef {
        /// The `$ref` pointer string that failed to resolve.
        pointer: String,
    },

    /// A schema fragment does not have the expected shape.
    #[error("invalid schema at {path}: expected {expected}, got {actual}")]
    InvalidSchema {
        /// Dot-separated path of the offending fragment.
        path: String,
        /// Description of the expected shape.
        expected: String,
        /// Description of what was found.
        actual: String,
    },

    /// A schema was handed to the tracker without any `oneOf`/`anyOf` list.
    #[error("schema at {path} declares no oneOf/anyOf alternatives")]
    NoAlternatives {
        /// Dot-separated path of the schema root.
        path: String,
    },

    /// An explicit switch targeted an index outside the alternatives list.
    ///
    /// This is a caller contract violation; the tracker state is left
    /// unchanged.
    #[error("switch target {index} out of range (alternatives: {len})")]
    InvalidSwitchTarget {
        /// The requested index.
        index: usize,
        /// Number of alternatives currently known.
        len: usize,
    },
}
