//! Builds the intermediate model (`crate::model`) from a decoded
//! `CodeGeneratorRequest`'s descriptors. Pure translation: no validation, no
//! codec planning, no cross-file unwrap resolution — those are separate
//! passes (`crate::validate`, `crate::codec_plan`, `crate::unwrap`) that run
//! over the tree this module produces.

use std::collections::HashSet;

use sebuf_core::descriptor;
use sebuf_core::plugin::CodeGeneratorRequest;

use crate::annotations::{
    build_annotation_set, get_method_headers, get_method_http_config, get_oneof_config,
    get_service_base_path, get_service_headers,
};
use crate::error::{ModelError, Result};
use crate::model::{
    Cardinality, Enum, EnumValue, Field, FieldKind, Message, Method, Oneof, ProtoFile,
    ScalarType, Service, TimestampFormat, WELL_KNOWN_TIMESTAMP,
};

/// Translate every `FileDescriptorProto` on the request into a [`ProtoFile`].
/// Includes files the request didn't ask to generate (its dependencies) so
/// later passes can resolve cross-file type references by qualified name.
pub fn build_files(request: &CodeGeneratorRequest) -> Result<Vec<ProtoFile>> {
    request.proto_file.iter().map(build_file).collect()
}

fn build_file(file: &descriptor::FileDescriptorProto) -> Result<ProtoFile> {
    let package = file.package.clone().unwrap_or_default();

    let messages = file
        .message_type
        .iter()
        .map(|m| build_message(m, &package, None))
        .collect::<Result<Vec<_>>>()?;

    let enums = file
        .enum_type
        .iter()
        .map(|e| build_enum(e, &package, None))
        .collect();

    let services = file
        .service
        .iter()
        .map(|s| build_service(s, &package))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProtoFile {
        name: file.name.clone().unwrap_or_default(),
        package,
        dependencies: file.dependency.clone(),
        messages,
        enums,
        services,
    })
}

fn qualify(package: &str, parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{name}"),
        None if package.is_empty() => format!(".{name}"),
        None => format!(".{package}.{name}"),
    }
}

fn build_message(
    raw: &descriptor::DescriptorProto,
    package: &str,
    parent_qualified: Option<&str>,
) -> Result<Message> {
    let name = raw.name.clone().unwrap_or_default();
    let qualified_name = qualify(package, parent_qualified, &name);

    // proto3 `optional` fields get a synthetic single-field oneof that protoc
    // generates alongside any real, user-declared oneofs on the same
    // message. Those synthetic entries never surface as a model `Oneof`.
    let synthetic_oneof_indices: HashSet<i32> = raw
        .field
        .iter()
        .filter(|f| f.proto3_optional == Some(true))
        .filter_map(|f| f.oneof_index)
        .collect();

    let mut oneof_new_index = vec![None; raw.oneof_decl.len()];
    let mut next_index = 0usize;
    for (idx, _) in raw.oneof_decl.iter().enumerate() {
        if !synthetic_oneof_indices.contains(&(idx as i32)) {
            oneof_new_index[idx] = Some(next_index);
            next_index += 1;
        }
    }

    let mut fields = raw
        .field
        .iter()
        .map(|f| build_field(f, raw, package, &qualified_name))
        .collect::<Result<Vec<_>>>()?;

    for (field, raw_field) in fields.iter_mut().zip(raw.field.iter()) {
        if raw_field.proto3_optional == Some(true) {
            continue;
        }
        field.oneof_index = raw_field
            .oneof_index
            .and_then(|idx| oneof_new_index.get(idx as usize).copied().flatten());
    }

    let mut oneofs: Vec<Oneof> = raw
        .oneof_decl
        .iter()
        .enumerate()
        .filter(|(idx, _)| !synthetic_oneof_indices.contains(&(*idx as i32)))
        .map(|(_, decl)| Oneof {
            name: decl.name.clone().unwrap_or_default(),
            field_indices: Vec::new(),
            config: get_oneof_config(decl.options.as_ref()),
        })
        .collect();

    for (field_idx, raw_field) in raw.field.iter().enumerate() {
        if raw_field.proto3_optional == Some(true) {
            continue;
        }
        if let Some(raw_oneof_idx) = raw_field.oneof_index {
            if let Some(Some(new_idx)) = oneof_new_index.get(raw_oneof_idx as usize) {
                oneofs[*new_idx].field_indices.push(field_idx);
            }
        }
    }

    let nested_messages = raw
        .nested_type
        .iter()
        .filter(|nested| !is_map_entry(nested))
        .map(|nested| build_message(nested, package, Some(&qualified_name)))
        .collect::<Result<Vec<_>>>()?;

    let nested_enums = raw
        .enum_type
        .iter()
        .map(|e| build_enum(e, package, Some(&qualified_name)))
        .collect();

    Ok(Message {
        name,
        qualified_name,
        fields,
        nested_messages,
        nested_enums,
        oneofs,
    })
}

fn is_map_entry(nested: &descriptor::DescriptorProto) -> bool {
    let has_key = nested.field.iter().any(|f| f.name.as_deref() == Some("key") && f.number == Some(1));
    let has_value = nested.field.iter().any(|f| f.name.as_deref() == Some("value") && f.number == Some(2));
    has_key && has_value && nested.field.len() == 2
}

fn find_map_entry<'a>(
    owner: &'a descriptor::DescriptorProto,
    type_name: &str,
) -> Option<&'a descriptor::DescriptorProto> {
    let last_segment = type_name.rsplit('.').next().unwrap_or(type_name);
    owner
        .nested_type
        .iter()
        .find(|nested| nested.name.as_deref() == Some(last_segment) && is_map_entry(nested))
}

fn build_field(
    raw: &descriptor::FieldDescriptorProto,
    owner: &descriptor::DescriptorProto,
    package: &str,
    owner_qualified: &str,
) -> Result<Field> {
    let name = raw.name.clone().unwrap_or_default();
    let _ = package;
    let _ = owner_qualified;

    let map_entry = raw
        .type_name
        .as_deref()
        .and_then(|type_name| find_map_entry(owner, type_name));

    let kind = if let Some(entry) = map_entry {
        let key_field = entry
            .field
            .iter()
            .find(|f| f.name.as_deref() == Some("key"))
            .ok_or_else(|| ModelError::InvalidAnnotation {
                message: owner_qualified.to_string(),
                field: Some(name.clone()),
                reason: "map entry is missing its key field".to_string(),
            })?;
        let value_field = entry
            .field
            .iter()
            .find(|f| f.name.as_deref() == Some("value"))
            .ok_or_else(|| ModelError::InvalidAnnotation {
                message: owner_qualified.to_string(),
                field: Some(name.clone()),
                reason: "map entry is missing its value field".to_string(),
            })?;
        let key_kind = scalar_field_kind(key_field)?;
        let ScalarFieldKind::Scalar(key_scalar) = key_kind else {
            return Err(ModelError::InvalidAnnotation {
                message: owner_qualified.to_string(),
                field: Some(name.clone()),
                reason: "map keys must be scalar".to_string(),
            });
        };
        FieldKind::Map {
            key: key_scalar,
            value: Box::new(raw_field_kind(value_field)?),
        }
    } else {
        raw_field_kind(raw)?
    };

    let cardinality = if raw.proto3_optional == Some(true) {
        Cardinality::Optional
    } else if raw.label == Some(descriptor::label::REPEATED) {
        Cardinality::Repeated
    } else {
        Cardinality::Singular
    };

    let json_name = raw.json_name.clone().unwrap_or_else(|| lower_camel_case(&name));
    let target_name = pascal_case(&name);

    let mut annotations = build_annotation_set(raw.options.as_ref());
    // `Timestamp`'s canonical proto3 JSON mapping is an RFC 3339 string, not
    // its underlying seconds/nanos fields; an unannotated field still needs
    // that codec; only an explicit `timestamp_format` overrides it.
    if matches!(&kind, FieldKind::Message(name) if name == WELL_KNOWN_TIMESTAMP)
        && annotations.timestamp_format == TimestampFormat::Unspecified
    {
        annotations.timestamp_format = TimestampFormat::Rfc3339;
    }

    Ok(Field {
        name,
        json_name,
        target_name,
        number: raw.number.unwrap_or(0),
        cardinality,
        kind,
        oneof_index: None,
        annotations,
    })
}

enum ScalarFieldKind {
    Scalar(ScalarType),
    Other(FieldKind),
}

fn scalar_field_kind(raw: &descriptor::FieldDescriptorProto) -> Result<ScalarFieldKind> {
    match raw_field_kind(raw)? {
        FieldKind::Scalar(s) => Ok(ScalarFieldKind::Scalar(s)),
        other => Ok(ScalarFieldKind::Other(other)),
    }
}

fn raw_field_kind(raw: &descriptor::FieldDescriptorProto) -> Result<FieldKind> {
    use sebuf_core::descriptor::field_type as t;

    Ok(match raw.r#type {
        Some(v) if v == t::DOUBLE => FieldKind::Scalar(ScalarType::Double),
        Some(v) if v == t::FLOAT => FieldKind::Scalar(ScalarType::Float),
        Some(v) if v == t::INT64 || v == t::SINT64 || v == t::SFIXED64 => {
            FieldKind::Scalar(ScalarType::Int64)
        }
        Some(v) if v == t::UINT64 => FieldKind::Scalar(ScalarType::Uint64),
        Some(v) if v == t::INT32 || v == t::SINT32 || v == t::SFIXED32 => {
            FieldKind::Scalar(ScalarType::Int32)
        }
        Some(v) if v == t::UINT32 => FieldKind::Scalar(ScalarType::Uint32),
        Some(v) if v == t::BOOL => FieldKind::Scalar(ScalarType::Bool),
        Some(v) if v == t::STRING => FieldKind::Scalar(ScalarType::String),
        Some(v) if v == t::BYTES => FieldKind::Scalar(ScalarType::Bytes),
        Some(v) if v == t::GROUP => FieldKind::Group,
        Some(v) if v == t::MESSAGE => {
            FieldKind::Message(raw.type_name.clone().unwrap_or_default())
        }
        Some(v) if v == t::ENUM => FieldKind::Enum(raw.type_name.clone().unwrap_or_default()),
        _ => FieldKind::Scalar(ScalarType::String),
    })
}

fn build_enum(raw: &descriptor::EnumDescriptorProto, package: &str, parent_qualified: Option<&str>) -> Enum {
    let name = raw.name.clone().unwrap_or_default();
    let qualified_name = qualify(package, parent_qualified, &name);
    Enum {
        name,
        qualified_name,
        values: raw
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name.clone().unwrap_or_default(),
                number: v.number.unwrap_or(0),
                custom_json: v.options.as_ref().and_then(|o| o.enum_value.clone()),
            })
            .collect(),
    }
}

fn build_service(raw: &descriptor::ServiceDescriptorProto, package: &str) -> Result<Service> {
    let _ = package;
    Ok(Service {
        name: raw.name.clone().unwrap_or_default(),
        base_path: get_service_base_path(raw.options.as_ref()),
        headers: get_service_headers(raw.options.as_ref()),
        methods: raw.method.iter().map(build_method).collect(),
    })
}

fn build_method(raw: &descriptor::MethodDescriptorProto) -> Method {
    let name = raw.name.clone().unwrap_or_default();
    Method {
        http: Some(get_method_http_config(&name, raw.options.as_ref())),
        headers: get_method_headers(raw.options.as_ref()),
        name,
        request_type: raw.input_type.clone().unwrap_or_default(),
        response_type: raw.output_type.clone().unwrap_or_default(),
    }
}

/// Convert a proto field name (`user_id`) to lowerCamelCase (`userId`), the
/// fallback `protoc` itself uses to compute `json_name` when the source
/// doesn't override it.
fn lower_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize_next = false;
    for ch in name.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert a proto field name (`user_id`) to PascalCase (`UserId`), used as
/// the exported field name in generated Go structs.
fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize_next = true;
    for ch in name.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sebuf_core::descriptor::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, label, field_type};

    fn string_field(name: &str, number: i32) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(label::OPTIONAL),
            r#type: Some(field_type::STRING),
            type_name: None,
            json_name: None,
            oneof_index: None,
            proto3_optional: None,
            options: None,
        }
    }

    #[test]
    fn builds_nested_qualified_names() {
        let file = FileDescriptorProto {
            name: Some("test.proto".to_string()),
            package: Some("pkg.v1".to_string()),
            dependency: vec![],
            message_type: vec![DescriptorProto {
                name: Some("Outer".to_string()),
                field: vec![string_field("id", 1)],
                nested_type: vec![DescriptorProto {
                    name: Some("Inner".to_string()),
                    field: vec![string_field("value", 1)],
                    nested_type: vec![],
                    enum_type: vec![],
                    oneof_decl: vec![],
                }],
                enum_type: vec![],
                oneof_decl: vec![],
            }],
            enum_type: vec![],
            service: vec![],
        };

        let built = build_file(&file).unwrap();
        assert_eq!(built.messages[0].qualified_name, ".pkg.v1.Outer");
        assert_eq!(
            built.messages[0].nested_messages[0].qualified_name,
            ".pkg.v1.Outer.Inner"
        );
    }

    #[test]
    fn detects_map_fields() {
        let map_field = FieldDescriptorProto {
            name: Some("labels".to_string()),
            number: Some(1),
            label: Some(label::REPEATED),
            r#type: Some(field_type::MESSAGE),
            type_name: Some(".pkg.v1.Thing.LabelsEntry".to_string()),
            json_name: Some("labels".to_string()),
            oneof_index: None,
            proto3_optional: None,
            options: None,
        };
        let entry = DescriptorProto {
            name: Some("LabelsEntry".to_string()),
            field: vec![
                FieldDescriptorProto {
                    name: Some("key".to_string()),
                    number: Some(1),
                    label: Some(label::OPTIONAL),
                    r#type: Some(field_type::STRING),
                    type_name: None,
                    json_name: Some("key".to_string()),
                    oneof_index: None,
                    proto3_optional: None,
                    options: None,
                },
                FieldDescriptorProto {
                    name: Some("value".to_string()),
                    number: Some(2),
                    label: Some(label::OPTIONAL),
                    r#type: Some(field_type::STRING),
                    type_name: None,
                    json_name: Some("value".to_string()),
                    oneof_index: None,
                    proto3_optional: None,
                    options: None,
                },
            ],
            nested_type: vec![],
            enum_type: vec![],
            oneof_decl: vec![],
        };
        let message = DescriptorProto {
            name: Some("Thing".to_string()),
            field: vec![map_field],
            nested_type: vec![entry],
            enum_type: vec![],
            oneof_decl: vec![],
        };

        let built = build_message(&message, "pkg.v1", None).unwrap();
        assert!(built.nested_messages.is_empty());
        assert!(matches!(
            built.fields[0].kind,
            FieldKind::Map { key: ScalarType::String, .. }
        ));
    }

    #[test]
    fn proto3_optional_does_not_produce_a_model_oneof() {
        let field = FieldDescriptorProto {
            proto3_optional: Some(true),
            oneof_index: Some(0),
            ..string_field("middle_name", 1)
        };
        let message = DescriptorProto {
            name: Some("Person".to_string()),
            field: vec![field],
            nested_type: vec![],
            enum_type: vec![],
            oneof_decl: vec![sebuf_core::descriptor::OneofDescriptorProto {
                name: Some("_middle_name".to_string()),
                options: None,
            }],
        };

        let built = build_message(&message, "pkg.v1", None).unwrap();
        assert!(built.oneofs.is_empty());
        assert_eq!(built.fields[0].cardinality, Cardinality::Optional);
    }

    #[test]
    fn pascal_and_camel_case_conversions() {
        assert_eq!(pascal_case("user_id"), "UserId");
        assert_eq!(lower_camel_case("user_id"), "userId");
    }

    #[test]
    fn unannotated_timestamp_field_defaults_to_rfc3339() {
        let field = FieldDescriptorProto {
            name: Some("created_at".to_string()),
            number: Some(1),
            label: Some(label::OPTIONAL),
            r#type: Some(field_type::MESSAGE),
            type_name: Some(WELL_KNOWN_TIMESTAMP.to_string()),
            json_name: Some("createdAt".to_string()),
            oneof_index: None,
            proto3_optional: None,
            options: None,
        };
        let message = DescriptorProto {
            name: Some("Event".to_string()),
            field: vec![field],
            nested_type: vec![],
            enum_type: vec![],
            oneof_decl: vec![],
        };

        let built = build_message(&message, "pkg.v1", None).unwrap();
        assert_eq!(built.fields[0].annotations.timestamp_format, TimestampFormat::Rfc3339);
    }
}
