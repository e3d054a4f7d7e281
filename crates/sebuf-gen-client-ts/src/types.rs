//! Renders TypeScript interfaces/type aliases for messages, enums, and
//! discriminated oneofs (`spec.md` §4.7).

use sebuf_model::model::{
    Cardinality, Enum, EnumEncoding, Field, FieldKind, Int64Encoding, Message, Program, ScalarType,
};

use crate::naming::{enum_string_union, ts_type_name};

/// Render every declaration (interfaces + enum unions) a message needs,
/// including the discriminated-union variant for any oneof carrying a
/// [`sebuf_model::model::OneofConfig`].
#[must_use]
pub fn render_message_declarations(message: &Message, program: &Program) -> String {
    let mut out = String::new();
    let oneof_field_indices: std::collections::HashSet<usize> = message
        .oneofs
        .iter()
        .filter(|o| o.config.is_some())
        .flat_map(|o| o.field_indices.iter().copied())
        .collect();

    let plain_fields: Vec<&Field> = message
        .fields
        .iter()
        .enumerate()
        .filter(|(i, _)| !oneof_field_indices.contains(i))
        .map(|(_, f)| f)
        .collect();

    for oneof in message.oneofs.iter().filter(|o| o.config.is_some()) {
        out.push_str(&render_discriminated_union(message, oneof, program));
        out.push('\n');
    }

    let type_name = ts_type_name(&message.qualified_name);
    match message.oneofs.iter().find(|o| o.config.is_some()) {
        // The discriminator and its variant fields are merged into the
        // message's own JSON object (spec.md §4.5's OneofDiscriminator
        // encoding), so the message's own type is an intersection with the
        // union, not a nested field.
        Some(oneof) => {
            out.push_str(&format!("export type {type_name} = {{\n"));
            for field in &plain_fields {
                out.push_str(&render_field_line(field, program));
            }
            out.push_str(&format!("}} & {type_name}_{};\n", oneof.name));
        }
        None => {
            out.push_str(&format!("export interface {type_name} {{\n"));
            for field in &plain_fields {
                out.push_str(&render_field_line(field, program));
            }
            out.push_str("}\n");
        }
    }
    out
}

fn render_discriminated_union(message: &Message, oneof: &sebuf_model::model::Oneof, program: &Program) -> String {
    let config = oneof.config.as_ref().expect("filtered by caller");
    let union_name = format!("{}_{}", ts_type_name(&message.qualified_name), oneof.name);
    let mut variants = Vec::new();
    for &idx in &oneof.field_indices {
        let field = &message.fields[idx];
        let tag = sebuf_model::annotations::get_oneof_variant_value(field);
        let payload_type = ts_field_type(field, program);
        if config.flatten {
            variants.push(format!(
                "{{ {disc}: \"{tag}\" }} & {payload_type}",
                disc = config.discriminator
            ));
        } else {
            variants.push(format!(
                "{{ {disc}: \"{tag}\"; {name}: {payload_type} }}",
                disc = config.discriminator,
                name = field.json_name
            ));
        }
    }
    format!("export type {union_name} =\n\t| {}\n", variants.join("\n\t| "))
}

fn render_field_line(field: &Field, program: &Program) -> String {
    let optional = matches!(field.cardinality, Cardinality::Optional) && !field.annotations.nullable;
    let marker = if optional { "?" } else { "" };
    format!(
        "\t{}{}: {};\n",
        field.json_name,
        marker,
        ts_field_type(field, program)
    )
}

/// The TypeScript type for one field, honoring nullable/repeated/map
/// cardinality and `int64_encoding`/`enum_encoding` annotations.
#[must_use]
pub fn ts_field_type(field: &Field, program: &Program) -> String {
    let base = ts_value_type(&field.kind, field, program);
    let base = if field.annotations.nullable { format!("{base} | null") } else { base };
    match field.cardinality {
        Cardinality::Repeated if !field.is_map() => format!("{base}[]"),
        _ => base,
    }
}

fn ts_value_type(kind: &FieldKind, field: &Field, program: &Program) -> String {
    match kind {
        FieldKind::Scalar(scalar) => ts_scalar_type(scalar, field),
        FieldKind::Message(name) => ts_type_name(name),
        FieldKind::Enum(name) => ts_enum_value_type(name, field, program),
        FieldKind::Group => "unknown".to_string(),
        FieldKind::Map { key, value } => {
            let key_ty = match key {
                ScalarType::String => "string".to_string(),
                _ => "string".to_string(), // JSON object keys are always strings
            };
            format!("Record<{key_ty}, {}>", ts_value_type(value, field, program))
        }
    }
}

fn ts_scalar_type(scalar: &ScalarType, field: &Field) -> String {
    match scalar {
        ScalarType::Int64 | ScalarType::Uint64 => match field.annotations.int64_encoding {
            Int64Encoding::Number => "number".to_string(),
            Int64Encoding::String | Int64Encoding::Unspecified => "string".to_string(),
        },
        ScalarType::Double | ScalarType::Float | ScalarType::Int32 | ScalarType::Uint32 => "number".to_string(),
        ScalarType::Bool => "boolean".to_string(),
        ScalarType::String => "string".to_string(),
        ScalarType::Bytes => "string".to_string(),
    }
}

fn ts_enum_value_type(qualified_name: &str, field: &Field, program: &Program) -> String {
    if field.annotations.enum_encoding == EnumEncoding::Number {
        return "number".to_string();
    }
    match program.find_enum(qualified_name) {
        Some(e) => enum_string_union(e),
        None => ts_type_name(qualified_name),
    }
}

/// Render an enum as a plain string-literal-union type alias (the canonical
/// proto3 JSON representation — uppercase proto names, no custom codec
/// needed for TypeScript since string literal unions already express it).
#[must_use]
pub fn render_enum_declaration(e: &Enum) -> String {
    format!("export type {} = {};\n", ts_type_name(&e.qualified_name), enum_string_union(e))
}
