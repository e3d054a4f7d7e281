//! Proto-qualified-name → `OpenAPI` component-schema name conversions.

/// Render a fully-qualified message/enum name (`.pkg.v1.Outer.Inner`) as a
/// `components.schemas` key (`Outer_Inner`). Mirrors the other emitters'
/// flattening convention so cross-generated-artifact names line up.
#[must_use]
pub fn schema_name(qualified_name: &str) -> String {
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

/// A `$ref` pointer into `components.schemas` for a message/enum type.
#[must_use]
pub fn schema_ref(qualified_name: &str) -> String {
    format!("#/components/schemas/{}", schema_name(qualified_name))
}
