//! Renders Go struct/enum type declarations for one message or enum. Pulled
//! out from the codec/route renderers so `sebuf-gen-client-go` can reuse the
//! exact same type text (clients and servers marshal the same wire shape).

use sebuf_model::model::{Enum, Field, FieldKind, Message, ScalarType};

use crate::naming::{go_field_type, go_type_name};

/// Render a Go struct for `message`, one field per proto field, JSON tags
/// driven by `field.json_name` (the canonical proto3 JSON name — synthetic
/// codecs patch the raw map afterward, so the base struct tags never need to
/// know about a `CodecPlan`).
#[must_use]
pub fn render_message_struct(message: &Message) -> String {
    let mut out = String::new();
    out.push_str(&format!("type {} struct {{\n", go_type_name(&message.qualified_name)));
    for field in &message.fields {
        out.push_str(&render_struct_field(field));
    }
    out.push_str("}\n");
    out
}

fn render_struct_field(field: &Field) -> String {
    let go_type = go_field_type(&field.kind, field.cardinality);
    let mut tag_opts = String::new();
    if matches!(field.cardinality, sebuf_model::model::Cardinality::Optional) || field.is_repeated() {
        tag_opts.push_str(",omitempty");
    }
    // proto3 JSON's canonical int64/uint64 default is a quoted decimal
    // string, not a bare number; `,string` gets the base struct there for
    // free so a `CodecPlan::Int64Number` override only has to undo it for
    // the fields explicitly annotated `int64_encoding=NUMBER`.
    if is_int64_like(&field.kind) {
        tag_opts.push_str(",string");
    }
    format!(
        "\t{} {} `json:\"{}{}\"`\n",
        field.target_name, go_type, field.json_name, tag_opts
    )
}

fn is_int64_like(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Scalar(ScalarType::Int64 | ScalarType::Uint64))
}

/// Render a Go `int32`-based enum type with its named constants.
#[must_use]
pub fn render_enum_type(e: &Enum) -> String {
    let type_name = go_type_name(&e.qualified_name);
    let mut out = String::new();
    out.push_str(&format!("type {type_name} int32\n\n"));
    out.push_str("const (\n");
    for value in &e.values {
        out.push_str(&format!("\t{}_{} {type_name} = {}\n", type_name, value.name, value.number));
    }
    out.push_str(")\n");
    out
}
