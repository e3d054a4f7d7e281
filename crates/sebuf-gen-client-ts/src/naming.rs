//! Proto-qualified-name → TypeScript identifier conversions.

use sebuf_model::model::Enum;

/// Render a fully-qualified message/enum name as a TypeScript type
/// identifier, the same flattening convention the Go emitters use
/// (`.pkg.v1.Outer.Inner` → `Outer_Inner`) so a reader can cross-reference
/// the two languages' generated output for the same message.
#[must_use]
pub fn ts_type_name(qualified_name: &str) -> String {
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

/// A string-literal union type for an enum's JSON values (custom value if
/// present, else the proto name) — used whenever a field's `enum_encoding`
/// is `STRING` (the default) instead of `NUMBER`.
#[must_use]
pub fn enum_string_union(e: &Enum) -> String {
    e.values
        .iter()
        .map(|v| format!("\"{}\"", v.custom_json.clone().unwrap_or_else(|| v.name.clone())))
        .collect::<Vec<_>>()
        .join(" | ")
}
