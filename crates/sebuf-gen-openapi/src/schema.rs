//! JSON-Schema (`OpenAPI` 3.1 / `2020-12`) synthesis for messages, enums, and
//! fields (`spec.md` §4.8). Builds one `serde_json::Value` tree; the
//! top-level document module serializes it to YAML or JSON depending on the
//! plugin's `format=` option.

use serde_json::{Map, Value, json};

use sebuf_model::model::{
    BytesEncoding, Cardinality, Enum, EnumEncoding, Field, FieldKind, Int64Encoding, Message,
    Program, ScalarType, TimestampFormat, ValidateConstraints,
};

use crate::naming::{schema_name, schema_ref};

/// Every named schema a message contributes to `components.schemas`: its own
/// schema plus any synthesized flatten-oneof-variant schemas.
pub struct MessageSchemas {
    pub entries: Vec<(String, Value)>,
}

/// Build every component schema for one message, recursing into nested
/// messages/enums (`spec.md` §3, "nested types are flattened into the
/// top-level component namespace by the emitters that need flat names").
#[must_use]
pub fn collect_message_schemas(message: &Message, program: &Program) -> MessageSchemas {
    let mut entries = Vec::new();
    build_message_schema(message, program, &mut entries);
    for nested in &message.nested_messages {
        entries.extend(collect_message_schemas(nested, program).entries);
    }
    for nested in &message.nested_enums {
        entries.push((schema_name(&nested.qualified_name), enum_schema(nested)));
    }
    MessageSchemas { entries }
}

fn build_message_schema(message: &Message, program: &Program, entries: &mut Vec<(String, Value)>) {
    let name = schema_name(&message.qualified_name);

    if let Some(info) = program.unwrap_table.get(&message.qualified_name) {
        if info.is_root_unwrap {
            let element = element_schema(&info.element_type_ref, program);
            entries.push((name, json!({ "type": "array", "items": element })));
            return;
        }
    }

    if let Some(oneof) = message.oneofs.iter().find(|o| o.config.is_some()) {
        let schema = oneof_discriminator_schema(message, oneof, program, entries);
        entries.push((name, schema));
        return;
    }

    let flatten_fields: Vec<&Field> = message.fields.iter().filter(|f| f.annotations.flatten).collect();
    if !flatten_fields.is_empty() {
        entries.push((name, flatten_schema(message, &flatten_fields, program)));
        return;
    }

    entries.push((name, plain_object_schema(&message.fields, program)));
}

fn plain_object_schema(fields: &[&Field], program: &Program) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(field.json_name.clone(), field_schema(field, program));
        if is_required(field) {
            required.push(Value::String(field.json_name.clone()));
        }
    }
    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

fn is_required(field: &Field) -> bool {
    matches!(field.cardinality, Cardinality::Singular)
        && field.annotations.empty_behavior != sebuf_model::model::EmptyBehavior::Omit
}

/// Flatten (`spec.md` §4.8, "Flatten → allOf"): a base object for the
/// message's non-flatten fields plus one `allOf` entry per flattened field,
/// whose properties are prefixed with [`sebuf_model::annotations::get_flatten_prefix`].
fn flatten_schema(message: &Message, flatten_fields: &[&Field], program: &Program) -> Value {
    let plain: Vec<&Field> = message.fields.iter().filter(|f| !f.annotations.flatten).collect();
    let mut members = vec![plain_object_schema(&plain, program)];

    for field in flatten_fields {
        let FieldKind::Message(target) = &field.kind else {
            continue;
        };
        let Some(target_message) = program.find_message(target) else {
            continue;
        };
        let prefix = sebuf_model::annotations::get_flatten_prefix(field);
        let mut properties = Map::new();
        let mut required = Vec::new();
        for inner in &target_message.fields {
            let key = format!("{prefix}{}", inner.json_name);
            properties.insert(key.clone(), field_schema(inner, program));
            if is_required(inner) {
                required.push(Value::String(key));
            }
        }
        let mut entry = json!({ "type": "object", "properties": properties });
        if !required.is_empty() {
            entry["required"] = Value::Array(required);
        }
        members.push(entry);
    }

    json!({ "allOf": members })
}

/// Oneof-with-discriminator (`spec.md` §4.8). Non-flatten nests each
/// variant's payload under its own field name; flatten merges the variant
/// message's own properties directly into the parent object and synthesizes
/// a named schema per variant carrying the `OpenAPI` `discriminator` mapping.
fn oneof_discriminator_schema(
    message: &Message,
    oneof: &sebuf_model::model::Oneof,
    program: &Program,
    entries: &mut Vec<(String, Value)>,
) -> Value {
    let config = oneof.config.as_ref().expect("filtered by caller");
    let disc = &config.discriminator;
    let plain: Vec<&Field> = message
        .fields
        .iter()
        .enumerate()
        .filter(|(i, _)| !oneof.field_indices.contains(i))
        .map(|(_, f)| f)
        .collect();

    if config.flatten {
        let mut mapping = Map::new();
        let mut variant_refs = Vec::new();
        for &idx in &oneof.field_indices {
            let field = &message.fields[idx];
            let tag = sebuf_model::annotations::get_oneof_variant_value(field);
            let variant_name = format!("{}_{}_{}", schema_name(&message.qualified_name), oneof.name, tag);
            let mut members = vec![json!({
                "type": "object",
                "properties": { disc.clone(): { "const": tag } },
                "required": [disc.clone()],
            })];
            let mut base_properties = Map::new();
            let mut base_required = Vec::new();
            for plain_field in &plain {
                base_properties.insert(plain_field.json_name.clone(), field_schema(plain_field, program));
                if is_required(plain_field) {
                    base_required.push(Value::String(plain_field.json_name.clone()));
                }
            }
            if !base_properties.is_empty() {
                let mut base = json!({ "type": "object", "properties": base_properties });
                if !base_required.is_empty() {
                    base["required"] = Value::Array(base_required);
                }
                members.push(base);
            }
            match &field.kind {
                FieldKind::Message(target) if program.find_message(target).is_some() => {
                    members.push(json!({ "$ref": schema_ref(target) }));
                }
                _ => members.push(field_schema(field, program)),
            }
            entries.push((variant_name.clone(), json!({ "allOf": members })));
            let variant_ref = format!("#/components/schemas/{variant_name}");
            mapping.insert(tag, Value::String(variant_ref.clone()));
            variant_refs.push(json!({ "$ref": variant_ref }));
        }
        json!({
            "oneOf": variant_refs,
            "discriminator": { "propertyName": disc, "mapping": mapping },
        })
    } else {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for plain_field in &plain {
            properties.insert(plain_field.json_name.clone(), field_schema(plain_field, program));
            if is_required(plain_field) {
                required.push(Value::String(plain_field.json_name.clone()));
            }
        }
        let tags: Vec<Value> = oneof
            .field_indices
            .iter()
            .map(|&idx| Value::String(sebuf_model::annotations::get_oneof_variant_value(&message.fields[idx])))
            .collect();
        properties.insert(disc.clone(), json!({ "type": "string", "enum": tags }));

        let variants: Vec<Value> = oneof
            .field_indices
            .iter()
            .map(|&idx| {
                let field = &message.fields[idx];
                json!({
                    "type": "object",
                    "properties": { field.json_name.clone(): field_schema(field, program) },
                    "required": [field.json_name.clone()],
                })
            })
            .collect();

        let mut schema = json!({ "type": "object", "properties": properties, "oneOf": variants });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        schema
    }
}

/// Schema for one field, honoring cardinality, `nullable`, `empty_behavior`,
/// unwrap-valued maps, field-level `examples`, and `buf.validate`
/// constraints.
#[must_use]
pub fn field_schema(field: &Field, program: &Program) -> Value {
    let value = if field.annotations.timestamp_format != TimestampFormat::Unspecified {
        timestamp_schema(field.annotations.timestamp_format)
    } else {
        value_schema(&field.kind, field, program)
    };
    let mut schema = match &field.cardinality {
        Cardinality::Repeated if !field.is_map() => json!({ "type": "array", "items": value }),
        _ => value,
    };

    if field.annotations.nullable {
        if let Some(ty) = schema.get("type").cloned() {
            schema["type"] = json!([ty, "null"]);
        }
    }

    if field.annotations.empty_behavior == sebuf_model::model::EmptyBehavior::Null
        && matches!(field.kind, FieldKind::Message(_))
    {
        schema = json!({ "oneOf": [schema, { "type": "null" }] });
    }

    if !field.annotations.examples.is_empty() {
        let examples: Vec<Value> = field.annotations.examples.iter().cloned().map(Value::String).collect();
        schema["examples"] = Value::Array(examples);
    }

    apply_validate_constraints(&mut schema, &field.annotations.validate);

    schema
}

fn value_schema(kind: &FieldKind, field: &Field, program: &Program) -> Value {
    match kind {
        FieldKind::Scalar(scalar) => scalar_schema(scalar, field),
        FieldKind::Message(name) => message_value_schema(name, program),
        FieldKind::Enum(name) => enum_value_schema(name, field, program),
        FieldKind::Group => json!({ "type": "object" }),
        FieldKind::Map { value, .. } => {
            let value_kind: &FieldKind = value;
            let additional = if let FieldKind::Message(name) = value_kind {
                if program.unwrap_table.is_root_unwrap(name) {
                    json!({ "type": "array", "items": element_schema(name, program) })
                } else {
                    json!({ "$ref": schema_ref(name) })
                }
            } else {
                map_value_schema(value_kind, field, program)
            };
            json!({ "type": "object", "additionalProperties": additional })
        }
    }
}

fn map_value_schema(kind: &FieldKind, field: &Field, program: &Program) -> Value {
    match kind {
        FieldKind::Scalar(scalar) => scalar_schema(scalar, field),
        FieldKind::Enum(name) => enum_value_schema(name, field, program),
        FieldKind::Message(name) => message_value_schema(name, program),
        FieldKind::Group => json!({ "type": "object" }),
        FieldKind::Map { .. } => json!({ "type": "object" }),
    }
}

fn message_value_schema(qualified_name: &str, program: &Program) -> Value {
    if program.unwrap_table.is_root_unwrap(qualified_name) {
        if let Some(info) = program.unwrap_table.get(qualified_name) {
            return json!({ "type": "array", "items": element_schema(&info.element_type_ref, program) });
        }
    }
    json!({ "$ref": schema_ref(qualified_name) })
}

/// The schema for an unwrap field's element type (the referenced message,
/// not the wrapper).
fn element_schema(element_type_ref: &str, _program: &Program) -> Value {
    json!({ "$ref": schema_ref(element_type_ref) })
}

fn scalar_schema(scalar: &ScalarType, field: &Field) -> Value {
    match scalar {
        ScalarType::Double => json!({ "type": "number", "format": "double" }),
        ScalarType::Float => json!({ "type": "number", "format": "float" }),
        ScalarType::Int32 => json!({ "type": "integer", "format": "int32" }),
        ScalarType::Uint32 => json!({ "type": "integer", "format": "int32", "minimum": 0 }),
        ScalarType::Int64 | ScalarType::Uint64 => int64_schema(field.annotations.int64_encoding),
        ScalarType::Bool => json!({ "type": "boolean" }),
        ScalarType::String => json!({ "type": "string" }),
        ScalarType::Bytes => bytes_schema(field.annotations.bytes_encoding),
    }
}

fn int64_schema(encoding: Int64Encoding) -> Value {
    match encoding {
        Int64Encoding::Number => json!({
            "type": "integer",
            "format": "int64",
            "description": "Warning: Values > 2^53 may lose precision in JavaScript",
        }),
        Int64Encoding::String | Int64Encoding::Unspecified => json!({ "type": "string", "format": "int64" }),
    }
}

fn timestamp_schema(format: TimestampFormat) -> Value {
    match format {
        TimestampFormat::Rfc3339 | TimestampFormat::Unspecified => {
            json!({ "type": "string", "format": "date-time" })
        }
        TimestampFormat::UnixSeconds => {
            json!({ "type": "integer", "description": "Unix timestamp, in seconds" })
        }
        TimestampFormat::UnixMillis => {
            json!({ "type": "integer", "description": "Unix timestamp, in milliseconds" })
        }
        TimestampFormat::Date => json!({ "type": "string", "format": "date" }),
    }
}

fn bytes_schema(encoding: BytesEncoding) -> Value {
    match encoding {
        BytesEncoding::Hex => json!({ "type": "string", "format": "hex" }),
        _ => json!({ "type": "string", "format": "byte" }),
    }
}

fn enum_value_schema(qualified_name: &str, field: &Field, program: &Program) -> Value {
    if field.annotations.enum_encoding == EnumEncoding::Number {
        let numbers: Vec<Value> = program
            .find_enum(qualified_name)
            .map(|e| e.values.iter().map(|v| json!(v.number)).collect())
            .unwrap_or_default();
        return json!({ "type": "integer", "enum": numbers });
    }
    // Unspecified/STRING encoding is the enum's canonical JSON shape, so it
    // references the shared `components.schemas` entry rather than inlining.
    json!({ "$ref": schema_ref(qualified_name) })
}

fn enum_value_strings(e: &Enum) -> Vec<Value> {
    e.values
        .iter()
        .map(|v| Value::String(sebuf_model::annotations::get_enum_value_mapping(v)))
        .collect()
}

/// Top-level enum schema for `components.schemas`.
#[must_use]
pub fn enum_schema(e: &Enum) -> Value {
    json!({ "type": "string", "enum": enum_value_strings(e) })
}

fn apply_validate_constraints(schema: &mut Value, constraints: &ValidateConstraints) {
    if constraints.is_empty() {
        return;
    }
    if let Some(min_len) = constraints.min_len {
        schema["minLength"] = json!(min_len);
    }
    if let Some(max_len) = constraints.max_len {
        schema["maxLength"] = json!(max_len);
    }
    if let Some(pattern) = &constraints.pattern {
        schema["pattern"] = json!(pattern);
    }
    if constraints.email {
        schema["format"] = json!("email");
    }
    if constraints.uuid {
        schema["format"] = json!("uuid");
    }
    if let Some(gt) = constraints.numeric_gt {
        schema["exclusiveMinimum"] = json!(gt);
    }
    if let Some(gte) = constraints.numeric_gte {
        schema["minimum"] = json!(gte);
    }
    if let Some(lt) = constraints.numeric_lt {
        schema["exclusiveMaximum"] = json!(lt);
    }
    if let Some(lte) = constraints.numeric_lte {
        schema["maximum"] = json!(lte);
    }
}
