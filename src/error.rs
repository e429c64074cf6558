use crate::validator::ValidationIssue;
use std::fmt;

/// Fatal generation error
///
/// Any of these aborts the whole run. Expected non-matches (wrong arity,
/// missing or unregistered manager) are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// A qualified name was looked up that the registry does not contain
    TypeNotFound {
        /// The unresolved qualified name
        name: String,
    },
    /// A compound type (pointer, slice, map, channel) has no element type
    MissingElement {
        /// The compound type
        name: String,
    },
    /// Alias chain loops back onto itself
    ///
    /// `chain` lists the aliases in the order they were unwrapped, ending
    /// with the first repeated name.
    AliasCycle {
        /// Unwrap order
        chain: Vec<String>,
    },
    /// A field's structural kind has no projection rule
    UnsupportedKind {
        /// Struct that owns the field
        owner: String,
        /// Field name
        field: String,
        /// Kind that could not be projected
        kind: String,
    },
    /// An interface embedded into a projected struct
    EmbeddedInterface {
        /// Struct that owns the field
        owner: String,
        /// Field name
        field: String,
    },
    /// An alias of a pointer slice whose pointee lives outside the source namespace
    PointerOutsideSource {
        /// The alias being projected
        owner: String,
        /// The pointee's qualified name
        elem: String,
        /// Source namespace of the run
        namespace: String,
    },
    /// Two kept fields of one projected struct serialize under the same name
    DuplicateSerializationName {
        /// Struct that owns the fields
        owner: String,
        /// The colliding serialization name
        name: String,
        /// Field that claimed the name first
        first: String,
        /// Field that collided with it
        second: String,
    },
    /// The input graph failed structural validation
    InvalidGraph {
        /// Every problem found, in discovery order
        issues: Vec<ValidationIssue>,
    },
}

impl GenerateError {
    /// Stable snake_case identifier, used as the lint issue kind
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::TypeNotFound { .. } => "type_not_found",
            GenerateError::MissingElement { .. } => "missing_element",
            GenerateError::AliasCycle { .. } => "alias_cycle",
            GenerateError::UnsupportedKind { .. } => "unsupported_field_kind",
            GenerateError::EmbeddedInterface { .. } => "embedded_interface",
            GenerateError::PointerOutsideSource { .. } => "pointer_outside_source",
            GenerateError::DuplicateSerializationName { .. } => "duplicate_serialization_name",
            GenerateError::InvalidGraph { .. } => "invalid_graph",
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::TypeNotFound { name } => {
                write!(f, "type '{}' not found in registry", name)
            }
            GenerateError::MissingElement { name } => {
                write!(f, "compound type '{}' has no element type", name)
            }
            GenerateError::AliasCycle { chain } => {
                write!(f, "alias cycle detected: {}", chain.join(" -> "))
            }
            GenerateError::UnsupportedKind { owner, field, kind } => {
                write!(
                    f,
                    "unsupported kind '{}' for field '{}' of '{}'",
                    kind, field, owner
                )
            }
            GenerateError::EmbeddedInterface { owner, field } => {
                write!(
                    f,
                    "field '{}' of '{}' embeds an interface, which cannot be projected",
                    field, owner
                )
            }
            GenerateError::PointerOutsideSource {
                owner,
                elem,
                namespace,
            } => {
                write!(
                    f,
                    "alias '{}' points at '{}', which is not in namespace '{}'",
                    owner, elem, namespace
                )
            }
            GenerateError::DuplicateSerializationName {
                owner,
                name,
                first,
                second,
            } => {
                write!(
                    f,
                    "fields '{}' and '{}' of '{}' both serialize as '{}'",
                    first, second, owner, name
                )
            }
            GenerateError::InvalidGraph { issues } => {
                write!(f, "type graph is invalid: {} issue(s)", issues.len())?;
                for issue in issues {
                    write!(f, "\n  [{}] {}: {}", issue.kind, issue.location, issue.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GenerateError {}
