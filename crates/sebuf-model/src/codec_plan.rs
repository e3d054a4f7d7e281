//! Codec planner (`spec.md` §4.4): the sole input to every emitter's
//! "synthesize custom JSON codec" step. Validation has already rejected any
//! message that would need more than one [`CodecPlan`] variant, so this
//! module only has to recognize which single feature (if any) is present.

use crate::annotations::{get_oneof_variant_value, has_empty_behavior, is_flatten_field};
use crate::model::{CodecPlan, CodecPlans, Enum, EnumCodecPlan, Message, Program};

/// Build the per-message and per-enum codec plans for the whole program.
/// Assumes `program` already passed [`crate::validate::validate_program`].
#[must_use]
pub fn build_codec_plans(program: &Program) -> CodecPlans {
    let mut plans = CodecPlans::default();
    for file in &program.files {
        plan_messages(&file.messages, &mut plans);
        for e in &file.enums {
            plan_enum(e, &mut plans);
        }
        collect_nested_enums(&file.messages, &mut plans);
    }
    plans
}

fn collect_nested_enums(messages: &[Message], plans: &mut CodecPlans) {
    for message in messages {
        for e in &message.nested_enums {
            plan_enum(e, plans);
        }
        collect_nested_enums(&message.nested_messages, plans);
    }
}

fn plan_messages(messages: &[Message], plans: &mut CodecPlans) {
    for message in messages {
        let plan = plan_message(message);
        if plan != CodecPlan::None {
            plans.messages.insert(message.qualified_name.clone(), plan);
        }
        plan_messages(&message.nested_messages, plans);
    }
}

fn plan_message(message: &Message) -> CodecPlan {
    let int64_fields: Vec<String> = message
        .fields
        .iter()
        .filter(|f| crate::annotations::is_int64_number_encoding(f))
        .map(|f| f.name.clone())
        .collect();
    if !int64_fields.is_empty() {
        return CodecPlan::Int64Number(int64_fields);
    }

    let enum_fields: Vec<String> = message
        .fields
        .iter()
        .filter(|f| f.annotations.enum_encoding != Default::default())
        .map(|f| f.name.clone())
        .collect();
    if !enum_fields.is_empty() {
        return CodecPlan::EnumEncoding(enum_fields);
    }

    let nullable_fields: Vec<String> = message
        .fields
        .iter()
        .filter(|f| f.annotations.nullable)
        .map(|f| f.name.clone())
        .collect();
    if !nullable_fields.is_empty() {
        return CodecPlan::Nullable(nullable_fields);
    }

    let empty_behavior_fields: Vec<(String, crate::model::EmptyBehavior)> = message
        .fields
        .iter()
        .filter(|f| has_empty_behavior(f))
        .map(|f| (f.name.clone(), f.annotations.empty_behavior))
        .collect();
    if !empty_behavior_fields.is_empty() {
        return CodecPlan::EmptyBehavior(empty_behavior_fields);
    }

    let timestamp_fields: Vec<(String, crate::model::TimestampFormat)> = message
        .fields
        .iter()
        .filter(|f| f.annotations.timestamp_format != Default::default())
        .map(|f| (f.name.clone(), f.annotations.timestamp_format))
        .collect();
    if !timestamp_fields.is_empty() {
        return CodecPlan::Timestamp(timestamp_fields);
    }

    let bytes_fields: Vec<(String, crate::model::BytesEncoding)> = message
        .fields
        .iter()
        .filter(|f| f.annotations.bytes_encoding != Default::default())
        .map(|f| (f.name.clone(), f.annotations.bytes_encoding))
        .collect();
    if !bytes_fields.is_empty() {
        return CodecPlan::Bytes(bytes_fields);
    }

    if let Some(field) = message.fields.iter().find(|f| f.annotations.unwrap) {
        return CodecPlan::Unwrap {
            field: field.name.clone(),
            is_map_valued: field.is_map(),
        };
    }

    if let Some(oneof) = message.oneofs.iter().find(|o| o.config.is_some()) {
        let config = oneof.config.as_ref().expect("checked by find");
        return CodecPlan::OneofDiscriminator {
            oneof: oneof.name.clone(),
            flatten: config.flatten,
        };
    }

    let flatten_fields: Vec<(String, String)> = message
        .fields
        .iter()
        .filter(|f| is_flatten_field(f))
        .map(|f| (f.name.clone(), f.annotations.flatten_prefix.clone()))
        .collect();
    if !flatten_fields.is_empty() {
        return CodecPlan::Flatten(flatten_fields);
    }

    CodecPlan::None
}

fn plan_enum(e: &Enum, plans: &mut CodecPlans) {
    let has_custom_values = crate::annotations::has_any_enum_value_mapping(e);
    // Numeric encoding is requested per-field (`enum_encoding=NUMBER`), not
    // on the enum itself; the enum-level plan only records whether *any*
    // value carries a custom JSON mapping. Fields asking for NUMBER
    // encoding are handled via the message-level `EnumEncoding` plan and
    // don't need the enum's own codec to do anything beyond that.
    //
    // Every enum gets a plan, with or without custom values: Go's plain
    // `int32`-backed enum type has no string-name JSON representation on
    // its own, so the canonical proto3 JSON default (the value's name, not
    // its number) always needs a synthesized codec to produce it.
    let plan = EnumCodecPlan {
        has_custom_values,
        numeric: false,
    };
    plans.enums.insert(e.qualified_name.clone(), plan);
}

/// Resolve the JSON discriminator value to emit for a oneof variant,
/// defaulting to the proto field name — shared by the server and client-A
/// emitters so their discriminator output is byte-identical.
#[must_use]
pub fn oneof_variant_json_value(field: &crate::model::Field) -> String {
    get_oneof_variant_value(field)
}
