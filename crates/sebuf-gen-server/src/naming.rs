//! Proto-qualified-name → Go identifier conversions shared by every render
//! module in this crate (and re-used verbatim by `sebuf-gen-client-go` for
//! byte-identical codec output).

use sebuf_model::model::{Cardinality, FieldKind, Message, ScalarType, WELL_KNOWN_TIMESTAMP};

/// Render a fully-qualified message/enum name (`.pkg.v1.Outer.Inner`) as a Go
/// type identifier (`Outer_Inner`). Proto package segments are lowercase by
/// convention, message/enum segments are PascalCase, so the split point is
/// the first segment that starts with an uppercase letter.
#[must_use]
pub fn go_type_name(qualified_name: &str) -> String {
    let trimmed = qualified_name.trim_start_matches('.');
    let segments: Vec<&str> = trimmed
        .split('.')
        .skip_while(|s| s.chars().next().is_some_and(char::is_lowercase))
        .collect();
    if segments.is_empty() {
        trimmed.to_string()
    } else {
        segments.join("_")
    }
}

/// The Go package name derived from a proto file's package, e.g. `pkg.v1` →
/// `v1` (the last dotted segment, matching the common `protoc-gen-go`
/// convention of one Go package per proto package).
#[must_use]
pub fn go_package_name(proto_package: &str) -> String {
    proto_package
        .rsplit('.')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("sebufgen")
        .to_string()
}

#[must_use]
pub fn go_scalar_type(scalar: &ScalarType) -> &'static str {
    match scalar {
        ScalarType::Double => "float64",
        ScalarType::Float => "float32",
        ScalarType::Int32 => "int32",
        ScalarType::Int64 => "int64",
        ScalarType::Uint32 => "uint32",
        ScalarType::Uint64 => "uint64",
        ScalarType::Bool => "bool",
        ScalarType::String => "string",
        ScalarType::Bytes => "[]byte",
    }
}

/// The Go type of a field's value, honoring cardinality (`*T` for explicit
/// optional scalars/enums, `[]T` for repeated, `map[K]V` for maps).
#[must_use]
pub fn go_field_type(kind: &FieldKind, cardinality: Cardinality) -> String {
    let base = go_value_type(kind);
    match (cardinality, kind) {
        (Cardinality::Repeated, FieldKind::Map { .. }) => base,
        (Cardinality::Repeated, _) => format!("[]{base}"),
        (Cardinality::Optional, FieldKind::Scalar(_) | FieldKind::Enum(_)) => format!("*{base}"),
        _ => base,
    }
}

/// Whether any field in `messages` (or their nested messages) is a
/// `.google.protobuf.Timestamp`, i.e. whether the generated file needs the
/// `timestamppb` import.
#[must_use]
pub fn messages_use_timestamp(messages: &[Message]) -> bool {
    messages.iter().any(|message| {
        message
            .fields
            .iter()
            .any(|f| matches!(&f.kind, FieldKind::Message(name) if name == WELL_KNOWN_TIMESTAMP))
            || messages_use_timestamp(&message.nested_messages)
    })
}

fn go_value_type(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Scalar(scalar) => go_scalar_type(scalar).to_string(),
        FieldKind::Message(name) if name == WELL_KNOWN_TIMESTAMP => "*timestamppb.Timestamp".to_string(),
        FieldKind::Message(name) => format!("*{}", go_type_name(name)),
        FieldKind::Enum(name) => go_type_name(name),
        FieldKind::Group => "[]byte".to_string(),
        FieldKind::Map { key, value } => format!("map[{}]{}", go_scalar_type(key), go_value_type(value)),
    }
}
