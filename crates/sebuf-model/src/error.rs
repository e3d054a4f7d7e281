//! Typed errors for the annotation model, unwrap resolution, validation, and
//! codec planning layers (`spec.md` §7, kinds 1–4).

/// Errors produced while building and validating the intermediate model.
/// Every variant carries enough context (message/field name, reason) to
/// build a descriptive plugin error without the caller re-deriving it.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// An annotation references a field/message of the wrong shape.
    #[error("invalid annotation on {message}{}: {reason}", field_suffix(field))]
    InvalidAnnotation {
        message: String,
        field: Option<String>,
        reason: String,
    },

    /// A flatten or oneof-discriminator promotion collides with a sibling
    /// JSON key.
    #[error("name collision in {message}: {reason}")]
    NameCollision { message: String, reason: String },

    /// A message would need two custom JSON codecs at once.
    #[error("message {message} has both {first} and {second} — only one custom-JSON feature is supported per message")]
    IncompatibleCombination {
        message: String,
        first: String,
        second: String,
    },

    /// A malformed `unwrap` annotation surfaced during the cross-file
    /// pre-pass. Never silently continues.
    #[error("invalid unwrap annotation on {message}{}: {reason}", field_suffix(field))]
    CrossFileUnwrapFailure {
        message: String,
        field: Option<String>,
        reason: String,
    },
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(".{name}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
