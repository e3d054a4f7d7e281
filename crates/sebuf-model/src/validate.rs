//! Cross-cutting invariants enforced before any emitter runs (`spec.md`
//! §4.3). Every validator here carries message+field context in its error;
//! nothing is silently downgraded to a warning.

use std::collections::HashMap;

use crate::annotations::{
    get_oneof_variant_value, has_conflicting_enum_annotations, is_flatten_field,
    validate_empty_behavior, validate_nullable,
};
use crate::error::{ModelError, Result};
use crate::model::{Cardinality, Field, FieldKind, Message, Program};

/// Run every validator over every message in the program. Returns the first
/// error encountered; validators do not try to continue past a violation.
pub fn validate_program(program: &Program) -> Result<()> {
    for file in &program.files {
        validate_messages(&file.messages, program)?;
    }
    Ok(())
}

fn validate_messages(messages: &[Message], program: &Program) -> Result<()> {
    for message in messages {
        validate_message(message, program)?;
        validate_messages(&message.nested_messages, program)?;
    }
    Ok(())
}

fn validate_message(message: &Message, program: &Program) -> Result<()> {
    for field in &message.fields {
        validate_nullable(field, message)?;
        validate_empty_behavior(field, message)?;
        validate_flatten_placement(field, message)?;

        if let FieldKind::Enum(enum_name) = &field.kind {
            if let Some(referenced) = program.find_enum(enum_name) {
                if has_conflicting_enum_annotations(field, referenced) {
                    return Err(ModelError::IncompatibleCombination {
                        message: message.qualified_name.clone(),
                        first: "enum_encoding=NUMBER".to_string(),
                        second: "enum_value mapping".to_string(),
                    });
                }
            }
        }
    }

    validate_flatten_collisions(message)?;
    validate_oneof_discriminators(message)?;
    validate_single_codec_feature(message)?;

    Ok(())
}

fn validate_flatten_placement(field: &Field, message: &Message) -> Result<()> {
    if !is_flatten_field(field) {
        return Ok(());
    }
    let singular = matches!(field.cardinality, Cardinality::Singular | Cardinality::Optional);
    let is_message = matches!(field.kind, FieldKind::Message(_));
    if singular && is_message && !field.is_map() {
        Ok(())
    } else {
        Err(ModelError::InvalidAnnotation {
            message: message.qualified_name.clone(),
            field: Some(field.name.clone()),
            reason: "flatten is only valid on a singular, non-repeated, non-map message field"
                .to_string(),
        })
    }
}

fn flatten_key(field: &Field) -> String {
    let prefix = &field.annotations.flatten_prefix;
    if prefix.is_empty() {
        field.json_name.clone()
    } else {
        format!("{prefix}{}", field.json_name)
    }
}

fn validate_flatten_collisions(message: &Message) -> Result<()> {
    let flatten_fields: Vec<&Field> = message.fields.iter().filter(|f| is_flatten_field(f)).collect();
    if flatten_fields.is_empty() {
        return Ok(());
    }

    let sibling_names: Vec<&str> = message
        .fields
        .iter()
        .filter(|f| !is_flatten_field(f))
        .map(|f| f.json_name.as_str())
        .collect();

    let mut seen: HashMap<String, String> = HashMap::new();
    for field in &flatten_fields {
        let key = flatten_key(field);
        if sibling_names.contains(&key.as_str()) {
            return Err(ModelError::NameCollision {
                message: message.qualified_name.clone(),
                reason: format!(
                    "flatten field {} promotes key \"{key}\" which collides with a sibling field — use flatten_prefix",
                    field.name
                ),
            });
        }
        if let Some(other) = seen.insert(key.clone(), field.name.clone()) {
            return Err(ModelError::NameCollision {
                message: message.qualified_name.clone(),
                reason: format!(
                    "flatten fields {other} and {} both promote key \"{key}\" — use flatten_prefix",
                    field.name
                ),
            });
        }
    }
    Ok(())
}

fn validate_oneof_discriminators(message: &Message) -> Result<()> {
    let sibling_names: Vec<&str> = message.fields.iter().map(|f| f.json_name.as_str()).collect();

    for oneof in &message.oneofs {
        let Some(config) = &oneof.config else { continue };

        if sibling_names.contains(&config.discriminator.as_str()) {
            return Err(ModelError::NameCollision {
                message: message.qualified_name.clone(),
                reason: format!(
                    "oneof {} discriminator \"{}\" collides with a parent field",
                    oneof.name, config.discriminator
                ),
            });
        }

        if config.flatten {
            for &idx in &oneof.field_indices {
                let variant = &message.fields[idx];
                if !matches!(variant.kind, FieldKind::Message(_)) {
                    return Err(ModelError::InvalidAnnotation {
                        message: message.qualified_name.clone(),
                        field: Some(variant.name.clone()),
                        reason: "flattened oneof variants must all be message types".to_string(),
                    });
                }
                let variant_value = get_oneof_variant_value(variant);
                if variant_value == config.discriminator || sibling_names.contains(&variant_value.as_str()) {
                    return Err(ModelError::NameCollision {
                        message: message.qualified_name.clone(),
                        reason: format!(
                            "oneof variant \"{variant_value}\" collides with the discriminator or a parent field"
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}

/// A message's codec plan is at most one variant (`spec.md` §3/§4.3). Detect
/// when a message would need more than one and reject before the codec
/// planner has to choose.
fn validate_single_codec_feature(message: &Message) -> Result<()> {
    let mut features = Vec::new();

    if message.fields.iter().any(|f| f.annotations.int64_encoding != Default::default()) {
        features.push("int64_encoding");
    }
    if message.fields.iter().any(|f| f.annotations.enum_encoding != Default::default()) {
        features.push("enum_encoding");
    }
    if message.fields.iter().any(|f| f.annotations.nullable) {
        features.push("nullable");
    }
    if message
        .fields
        .iter()
        .any(|f| crate::annotations::has_empty_behavior(f))
    {
        features.push("empty_behavior");
    }
    if message
        .fields
        .iter()
        .any(|f| f.annotations.timestamp_format != Default::default())
    {
        features.push("timestamp_format");
    }
    if message
        .fields
        .iter()
        .any(|f| f.annotations.bytes_encoding != Default::default())
    {
        features.push("bytes_encoding");
    }
    if message.fields.iter().any(|f| f.annotations.unwrap) {
        features.push("unwrap");
    }
    if message.oneofs.iter().any(|o| o.config.is_some()) {
        features.push("oneof_discriminator");
    }
    if message.fields.iter().any(|f| is_flatten_field(f)) {
        features.push("flatten");
    }

    if features.len() > 1 {
        return Err(ModelError::IncompatibleCombination {
            message: message.qualified_name.clone(),
            first: features[0].to_string(),
            second: features[1].to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationSet, Cardinality, Oneof, OneofConfig, ScalarType};

    fn base_message() -> Message {
        Message {
            name: "M".to_string(),
            qualified_name: ".pkg.v1.M".to_string(),
            fields: vec![],
            nested_messages: vec![],
            nested_enums: vec![],
            oneofs: vec![],
        }
    }

    fn scalar_field(name: &str) -> Field {
        Field {
            name: name.to_string(),
            json_name: name.to_string(),
            target_name: name.to_string(),
            number: 1,
            cardinality: Cardinality::Singular,
            kind: FieldKind::Scalar(ScalarType::String),
            oneof_index: None,
            annotations: AnnotationSet::default(),
        }
    }

    fn message_field(name: &str, type_name: &str) -> Field {
        Field {
            kind: FieldKind::Message(type_name.to_string()),
            ..scalar_field(name)
        }
    }

    #[test]
    fn flatten_collision_with_sibling_is_rejected() {
        let mut message = base_message();
        message.fields = vec![scalar_field("street"), message_field("billing", ".pkg.v1.Address")];
        message.fields[1].annotations.flatten = true;
        message.fields[1].json_name = "street".to_string();
        let program = Program {
            files: vec![],
            unwrap_table: Default::default(),
        };
        let err = validate_message(&message, &program);
        assert!(matches!(err, Err(ModelError::NameCollision { .. })));
    }

    #[test]
    fn flatten_with_prefix_avoids_collision() {
        let mut message = base_message();
        message.fields = vec![scalar_field("street"), message_field("billing", ".pkg.v1.Address")];
        message.fields[1].annotations.flatten = true;
        message.fields[1].annotations.flatten_prefix = "billing_".to_string();
        let program = Program {
            files: vec![],
            unwrap_table: Default::default(),
        };
        assert!(validate_message(&message, &program).is_ok());
    }

    #[test]
    fn two_codec_features_on_one_message_rejected() {
        let mut message = base_message();
        let mut nullable_field = scalar_field("middle_name");
        nullable_field.cardinality = Cardinality::Optional;
        nullable_field.annotations.nullable = true;
        let mut flatten_field = message_field("billing", ".pkg.v1.Address");
        flatten_field.annotations.flatten = true;
        message.fields = vec![nullable_field, flatten_field];
        let program = Program {
            files: vec![],
            unwrap_table: Default::default(),
        };
        assert!(matches!(
            validate_message(&message, &program),
            Err(ModelError::IncompatibleCombination { .. })
        ));
    }

    #[test]
    fn oneof_discriminator_collision_with_parent_field_rejected() {
        let mut message = base_message();
        message.fields = vec![scalar_field("type"), message_field("text", ".pkg.v1.Text")];
        message.oneofs = vec![Oneof {
            name: "content".to_string(),
            field_indices: vec![1],
            config: Some(OneofConfig {
                discriminator: "type".to_string(),
                flatten: false,
            }),
        }];
        let program = Program {
            files: vec![],
            unwrap_table: Default::default(),
        };
        assert!(matches!(
            validate_message(&message, &program),
            Err(ModelError::NameCollision { .. })
        ));
    }
}
