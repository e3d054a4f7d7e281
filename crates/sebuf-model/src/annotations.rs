//! The annotation model (`spec.md` §4.1): well-typed getters over the raw
//! descriptor extension fields, plus a handful of queries over the already
//! built [`crate::model`] types that every emitter shares instead of
//! re-deriving. No emitter parses raw option bytes directly — everything
//! goes through here or through [`crate::ingest`], which calls these
//! extraction functions while building a [`crate::model::Program`].

use sebuf_core::descriptor;

use crate::error::{ModelError, Result};
use crate::model::{
    AnnotationSet, BytesEncoding, EmptyBehavior, Enum, EnumEncoding, EnumValue, HeaderSpec,
    HeaderValueType, HttpConfig, Int64Encoding, Message, OneofConfig, QueryConfig,
    TimestampFormat, ValidateConstraints,
};
use crate::paths::{build_http_path, ensure_leading_slash, extract_path_params, snake_case_method_name};

/// Build a field's [`AnnotationSet`] from its descriptor options. Unknown
/// enum-extension values fall back to their `Unspecified` variant rather
/// than erroring (`spec.md` §4.3, "unknown/invalid enum values ... treat as
/// UNSPEC").
#[must_use]
pub fn build_annotation_set(options: Option<&descriptor::FieldOptions>) -> AnnotationSet {
    let Some(options) = options else {
        return AnnotationSet::default();
    };

    AnnotationSet {
        query: options.query.as_ref().map(|q| QueryConfig {
            param_name: q.name.clone().unwrap_or_default(),
            required: q.required.unwrap_or(false),
        }),
        unwrap: options.unwrap.unwrap_or(false),
        int64_encoding: decode_int64_encoding(options.int64_encoding),
        enum_encoding: decode_enum_encoding(options.enum_encoding),
        nullable: options.nullable.unwrap_or(false),
        empty_behavior: decode_empty_behavior(options.empty_behavior),
        timestamp_format: decode_timestamp_format(options.timestamp_format),
        bytes_encoding: decode_bytes_encoding(options.bytes_encoding),
        flatten: options.flatten.unwrap_or(false),
        flatten_prefix: options.flatten_prefix.clone().unwrap_or_default(),
        oneof_variant_value: options.oneof_value.clone(),
        examples: options.field_examples.clone(),
        validate: decode_validate_constraints(options.rules.as_ref()),
    }
}

/// Collapse the descriptor's per-type `buf.validate` rule oneof into the
/// handful of constraint shapes the OpenAPI emitter maps to JSON Schema
/// keywords (`spec.md` §4.8). Only documented, never enforced.
fn decode_validate_constraints(rules: Option<&descriptor::FieldRules>) -> ValidateConstraints {
    let Some(rules) = rules else {
        return ValidateConstraints::default();
    };

    if let Some(string) = rules.string.as_ref() {
        return ValidateConstraints {
            min_len: string.min_len,
            max_len: string.max_len,
            pattern: string.pattern.clone(),
            email: string.email.unwrap_or(false),
            uuid: string.uuid.unwrap_or(false),
            ..ValidateConstraints::default()
        };
    }

    let numeric = rules
        .int32
        .as_ref()
        .map(|r| (r.gt.map(f64::from), r.gte.map(f64::from), r.lt.map(f64::from), r.lte.map(f64::from)))
        .or_else(|| {
            rules
                .uint32
                .as_ref()
                .map(|r| (r.gt.map(f64::from), r.gte.map(f64::from), r.lt.map(f64::from), r.lte.map(f64::from)))
        })
        .or_else(|| {
            rules.uint64.as_ref().map(|r| {
                (
                    r.gt.map(|v| v as f64),
                    r.gte.map(|v| v as f64),
                    r.lt.map(|v| v as f64),
                    r.lte.map(|v| v as f64),
                )
            })
        });

    match numeric {
        Some((gt, gte, lt, lte)) => ValidateConstraints {
            numeric_gt: gt,
            numeric_gte: gte,
            numeric_lt: lt,
            numeric_lte: lte,
            ..ValidateConstraints::default()
        },
        None => ValidateConstraints::default(),
    }
}

fn decode_int64_encoding(raw: Option<i32>) -> Int64Encoding {
    use descriptor::wire::int64_encoding as w;
    match raw {
        Some(v) if v == w::STRING => Int64Encoding::String,
        Some(v) if v == w::NUMBER => Int64Encoding::Number,
        _ => Int64Encoding::Unspecified,
    }
}

fn decode_enum_encoding(raw: Option<i32>) -> EnumEncoding {
    use descriptor::wire::enum_encoding as w;
    match raw {
        Some(v) if v == w::STRING => EnumEncoding::String,
        Some(v) if v == w::NUMBER => EnumEncoding::Number,
        _ => EnumEncoding::Unspecified,
    }
}

fn decode_empty_behavior(raw: Option<i32>) -> EmptyBehavior {
    use descriptor::wire::empty_behavior as w;
    match raw {
        Some(v) if v == w::PRESERVE => EmptyBehavior::Preserve,
        Some(v) if v == w::NULL => EmptyBehavior::Null,
        Some(v) if v == w::OMIT => EmptyBehavior::Omit,
        _ => EmptyBehavior::Unspecified,
    }
}

fn decode_timestamp_format(raw: Option<i32>) -> TimestampFormat {
    use descriptor::wire::timestamp_format as w;
    match raw {
        Some(v) if v == w::RFC3339 => TimestampFormat::Rfc3339,
        Some(v) if v == w::UNIX_SECONDS => TimestampFormat::UnixSeconds,
        Some(v) if v == w::UNIX_MILLIS => TimestampFormat::UnixMillis,
        Some(v) if v == w::DATE => TimestampFormat::Date,
        _ => TimestampFormat::Unspecified,
    }
}

fn decode_bytes_encoding(raw: Option<i32>) -> BytesEncoding {
    use descriptor::wire::bytes_encoding as w;
    match raw {
        Some(v) if v == w::BASE64 => BytesEncoding::Base64,
        Some(v) if v == w::BASE64_RAW => BytesEncoding::Base64Raw,
        Some(v) if v == w::BASE64URL => BytesEncoding::Base64Url,
        Some(v) if v == w::BASE64URL_RAW => BytesEncoding::Base64UrlRaw,
        Some(v) if v == w::HEX => BytesEncoding::Hex,
        _ => BytesEncoding::Unspecified,
    }
}

/// `get_method_http_config`. Every method gets an [`HttpConfig`], annotated
/// or not: an unannotated method defaults to `POST` against a path derived
/// from its snake-cased name, which is what the pre-annotation generator
/// always did (the backward-compatibility invariant in `spec.md` §8).
#[must_use]
pub fn get_method_http_config(method_name: &str, options: Option<&descriptor::MethodOptions>) -> HttpConfig {
    let pattern = options.and_then(|o| o.http.as_ref());
    match pattern.and_then(descriptor_http_pattern) {
        Some((verb, path)) => HttpConfig {
            verb: verb.to_string(),
            path_params: extract_path_params(path),
            path: path.to_string(),
        },
        None => HttpConfig {
            verb: "POST".to_string(),
            path: ensure_leading_slash(&snake_case_method_name(method_name)),
            path_params: Vec::new(),
        },
    }
}

fn descriptor_http_pattern(rule: &descriptor::HttpRule) -> Option<(&'static str, &str)> {
    use descriptor::HttpPattern;
    Some(match rule.pattern.as_ref()? {
        HttpPattern::Get(p) => ("GET", p.as_str()),
        HttpPattern::Put(p) => ("PUT", p.as_str()),
        HttpPattern::Post(p) => ("POST", p.as_str()),
        HttpPattern::Delete(p) => ("DELETE", p.as_str()),
        HttpPattern::Patch(p) => ("PATCH", p.as_str()),
    })
}

/// `get_service_base_path`.
#[must_use]
pub fn get_service_base_path(options: Option<&descriptor::ServiceOptions>) -> Option<String> {
    options.and_then(|o| o.base_path.clone())
}

fn build_header_spec(raw: &descriptor::HeaderSpec) -> HeaderSpec {
    use descriptor::wire::header_value_type as w;
    let value_type = match raw.value_type {
        v if v == w::INTEGER => HeaderValueType::Integer,
        v if v == w::BOOLEAN => HeaderValueType::Boolean,
        v if v == w::NUMBER => HeaderValueType::Number,
        _ => HeaderValueType::String,
    };
    HeaderSpec {
        name: raw.name.clone(),
        value_type,
        format: raw.format.clone(),
        required: raw.required,
        default_value: raw.default_value.clone(),
    }
}

/// `get_service_headers`.
#[must_use]
pub fn get_service_headers(options: Option<&descriptor::ServiceOptions>) -> Vec<HeaderSpec> {
    options
        .map(|o| o.headers.iter().map(build_header_spec).collect())
        .unwrap_or_default()
}

/// `get_method_headers`.
#[must_use]
pub fn get_method_headers(options: Option<&descriptor::MethodOptions>) -> Vec<HeaderSpec> {
    options
        .map(|o| o.headers.iter().map(build_header_spec).collect())
        .unwrap_or_default()
}

/// `combine_headers`: method headers override service headers of the same
/// name; the result is sorted lexicographically by name. Idempotent and
/// commutative on disjoint name sets (`spec.md` §8, header combination law).
#[must_use]
pub fn combine_headers(service: &[HeaderSpec], method: &[HeaderSpec]) -> Vec<HeaderSpec> {
    let mut combined: Vec<HeaderSpec> = service.to_vec();
    for header in method {
        if let Some(existing) = combined.iter_mut().find(|h| h.name == header.name) {
            *existing = header.clone();
        } else {
            combined.push(header.clone());
        }
    }
    combined.sort_by(|a, b| a.name.cmp(&b.name));
    combined
}

fn build_oneof_config(options: Option<&descriptor::OneofOptions>) -> Option<OneofConfig> {
    let config = options.and_then(|o| o.oneof_config.as_ref())?;
    Some(OneofConfig {
        discriminator: config
            .discriminator
            .clone()
            .unwrap_or_else(|| "type".to_string()),
        flatten: config.flatten.unwrap_or(false),
    })
}

/// `get_oneof_config`.
#[must_use]
pub fn get_oneof_config(options: Option<&descriptor::OneofOptions>) -> Option<OneofConfig> {
    build_oneof_config(options)
}

fn build_enum_value(raw: &descriptor::EnumValueDescriptorProto) -> EnumValue {
    EnumValue {
        name: raw.name.clone().unwrap_or_default(),
        number: raw.number.unwrap_or(0),
        custom_json: raw
            .options
            .as_ref()
            .and_then(|o| o.enum_value.clone()),
    }
}

/// Build every [`EnumValue`] for an enum descriptor, applied during ingest.
#[must_use]
pub fn build_enum_values(values: &[descriptor::EnumValueDescriptorProto]) -> Vec<EnumValue> {
    values.iter().map(build_enum_value).collect()
}

// --- Queries over the already-built model -------------------------------

/// `get_query_params`: one entry per field carrying a query annotation.
#[must_use]
pub fn get_query_params(message: &Message) -> Vec<(&crate::model::Field, &QueryConfig)> {
    message
        .fields
        .iter()
        .filter_map(|f| f.annotations.query.as_ref().map(|q| (f, q)))
        .collect()
}

/// `find_unwrap_field`: simple lookup, no validation.
#[must_use]
pub fn find_unwrap_field(message: &Message) -> Option<&crate::model::Field> {
    message.fields.iter().find(|f| f.annotations.unwrap)
}

/// `get_unwrap_field`: validated lookup. A field with `unwrap=true` must be
/// repeated; a message may have at most one unwrap field.
pub fn get_unwrap_field<'a>(message: &'a Message) -> Result<Option<&'a crate::model::Field>> {
    let candidates: Vec<&crate::model::Field> = message
        .fields
        .iter()
        .filter(|f| f.annotations.unwrap)
        .collect();

    match candidates.as_slice() {
        [] => Ok(None),
        [field] => {
            if !field.is_repeated() {
                return Err(ModelError::InvalidAnnotation {
                    message: message.qualified_name.clone(),
                    field: Some(field.name.clone()),
                    reason: "unwrap is only valid on a repeated field".to_string(),
                });
            }
            Ok(Some(field))
        }
        _ => Err(ModelError::InvalidAnnotation {
            message: message.qualified_name.clone(),
            field: None,
            reason: "a message may have at most one unwrap field".to_string(),
        }),
    }
}

/// `get_field_examples`.
#[must_use]
pub fn get_field_examples(field: &crate::model::Field) -> &[String] {
    &field.annotations.examples
}

/// `get_int64_encoding`.
#[must_use]
pub fn get_int64_encoding(field: &crate::model::Field) -> Int64Encoding {
    field.annotations.int64_encoding
}

/// `is_int64_number_encoding`.
#[must_use]
pub fn is_int64_number_encoding(field: &crate::model::Field) -> bool {
    field.annotations.int64_encoding == Int64Encoding::Number
}

/// `get_enum_encoding`.
#[must_use]
pub fn get_enum_encoding(field: &crate::model::Field) -> EnumEncoding {
    field.annotations.enum_encoding
}

/// `get_enum_value_mapping`: the custom JSON string for one enum value, or
/// its proto name if unmapped.
#[must_use]
pub fn get_enum_value_mapping(value: &crate::model::EnumValue) -> String {
    value.custom_json.clone().unwrap_or_else(|| value.name.clone())
}

/// `has_any_enum_value_mapping`.
#[must_use]
pub fn has_any_enum_value_mapping(e: &Enum) -> bool {
    e.values.iter().any(|v| v.custom_json.is_some())
}

/// `has_conflicting_enum_annotations`: `enum_encoding=NUMBER` together with
/// any custom `enum_value` mapping on the referenced enum is rejected.
#[must_use]
pub fn has_conflicting_enum_annotations(field: &crate::model::Field, referenced_enum: &Enum) -> bool {
    field.annotations.enum_encoding == EnumEncoding::Number
        && has_any_enum_value_mapping(referenced_enum)
}

/// `is_nullable_field`.
#[must_use]
pub fn is_nullable_field(field: &crate::model::Field) -> bool {
    field.annotations.nullable
}

/// `validate_nullable`: only valid on a proto3 explicit-optional, primitive
/// (non-message) field.
pub fn validate_nullable(field: &crate::model::Field, message: &Message) -> Result<()> {
    if !field.annotations.nullable {
        return Ok(());
    }
    use crate::model::{Cardinality, FieldKind};
    let is_optional = matches!(field.cardinality, Cardinality::Optional);
    let is_primitive = matches!(field.kind, FieldKind::Scalar(_) | FieldKind::Enum(_));
    if is_optional && is_primitive {
        Ok(())
    } else {
        Err(ModelError::InvalidAnnotation {
            message: message.qualified_name.clone(),
            field: Some(field.name.clone()),
            reason: "nullable is only valid on a proto3 explicit-optional primitive field".to_string(),
        })
    }
}

/// `get_empty_behavior`.
#[must_use]
pub fn get_empty_behavior(field: &crate::model::Field) -> EmptyBehavior {
    field.annotations.empty_behavior
}

/// `has_empty_behavior`.
#[must_use]
pub fn has_empty_behavior(field: &crate::model::Field) -> bool {
    field.annotations.empty_behavior != EmptyBehavior::Unspecified
}

/// `validate_empty_behavior`: only valid on a singular message field.
pub fn validate_empty_behavior(field: &crate::model::Field, message: &Message) -> Result<()> {
    if !has_empty_behavior(field) {
        return Ok(());
    }
    use crate::model::{Cardinality, FieldKind};
    let singular = matches!(field.cardinality, Cardinality::Singular | Cardinality::Optional);
    let is_message = matches!(field.kind, FieldKind::Message(_));
    if singular && is_message && !field.is_map() {
        Ok(())
    } else {
        Err(ModelError::InvalidAnnotation {
            message: message.qualified_name.clone(),
            field: Some(field.name.clone()),
            reason: "empty_behavior is only valid on a singular message field".to_string(),
        })
    }
}

/// `get_timestamp_format`.
#[must_use]
pub fn get_timestamp_format(field: &crate::model::Field) -> TimestampFormat {
    field.annotations.timestamp_format
}

/// `get_bytes_encoding`.
#[must_use]
pub fn get_bytes_encoding(field: &crate::model::Field) -> BytesEncoding {
    field.annotations.bytes_encoding
}

/// `get_oneof_variant_value`: the discriminator value for one variant field,
/// defaulting to the proto field name.
#[must_use]
pub fn get_oneof_variant_value(field: &crate::model::Field) -> String {
    field
        .annotations
        .oneof_variant_value
        .clone()
        .unwrap_or_else(|| field.name.clone())
}

/// `is_flatten_field`.
#[must_use]
pub fn is_flatten_field(field: &crate::model::Field) -> bool {
    field.annotations.flatten
}

/// `get_flatten_prefix`.
#[must_use]
pub fn get_flatten_prefix(field: &crate::model::Field) -> &str {
    &field.annotations.flatten_prefix
}

/// `has_flatten_fields`.
#[must_use]
pub fn has_flatten_fields(message: &Message) -> bool {
    message.fields.iter().any(|f| f.annotations.flatten)
}

/// Uppercase an HTTP verb string (method-string helper).
#[must_use]
pub fn uppercase_verb(verb: &str) -> String {
    verb.to_ascii_uppercase()
}

/// Lowercase an HTTP verb string, used when emitting OpenAPI path items.
#[must_use]
pub fn lowercase_verb(verb: &str) -> String {
    verb.to_ascii_lowercase()
}

// re-exported for callers that only need the path helpers via this module
pub use crate::paths::build_http_path as combine_base_and_method_path;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, Field, FieldKind, ScalarType};

    fn scalar_field(name: &str, nullable: bool, optional: bool) -> Field {
        Field {
            name: name.to_string(),
            json_name: name.to_string(),
            target_name: name.to_string(),
            number: 1,
            cardinality: if optional {
                Cardinality::Optional
            } else {
                Cardinality::Singular
            },
            kind: FieldKind::Scalar(ScalarType::String),
            oneof_index: None,
            annotations: AnnotationSet {
                nullable,
                ..Default::default()
            },
        }
    }

    #[test]
    fn unspecified_int64_encoding_decodes_as_unspecified() {
        assert_eq!(decode_int64_encoding(None), Int64Encoding::Unspecified);
        assert_eq!(decode_int64_encoding(Some(99)), Int64Encoding::Unspecified);
        assert_eq!(decode_int64_encoding(Some(2)), Int64Encoding::Number);
    }

    #[test]
    fn method_without_http_option_defaults_to_post_snake_case() {
        let config = get_method_http_config("GetUser", None);
        assert_eq!(config.verb, "POST");
        assert_eq!(config.path, "/get_user");
        assert!(config.path_params.is_empty());
    }

    #[test]
    fn method_with_http_option_uses_explicit_verb_and_path() {
        let options = descriptor::MethodOptions {
            http: Some(descriptor::HttpRule {
                pattern: Some(descriptor::HttpPattern::Get("/users/{user_id}".to_string())),
            }),
            headers: vec![],
        };
        let config = get_method_http_config("GetUser", Some(&options));
        assert_eq!(config.verb, "GET");
        assert_eq!(config.path, "/users/{user_id}");
        assert_eq!(config.path_params, vec!["user_id".to_string()]);
    }

    #[test]
    fn combine_headers_sorts_and_lets_method_win() {
        let service = vec![
            HeaderSpec {
                name: "X-Tenant".to_string(),
                value_type: HeaderValueType::String,
                format: None,
                required: true,
                default_value: None,
            },
            HeaderSpec {
                name: "X-Request-Id".to_string(),
                value_type: HeaderValueType::String,
                format: None,
                required: false,
                default_value: None,
            },
        ];
        let method = vec![HeaderSpec {
            name: "X-Tenant".to_string(),
            value_type: HeaderValueType::String,
            format: None,
            required: false,
            default_value: Some("default".to_string()),
        }];
        let combined = combine_headers(&service, &method);
        let names: Vec<&str> = combined.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["X-Request-Id", "X-Tenant"]);
        let tenant = combined.iter().find(|h| h.name == "X-Tenant").unwrap();
        assert!(!tenant.required);
        assert_eq!(tenant.default_value.as_deref(), Some("default"));
    }

    #[test]
    fn validate_nullable_rejects_repeated_field() {
        let mut field = scalar_field("tags", true, true);
        field.cardinality = Cardinality::Repeated;
        let message = Message {
            name: "M".to_string(),
            qualified_name: ".pkg.M".to_string(),
            fields: vec![field.clone()],
            nested_messages: vec![],
            nested_enums: vec![],
            oneofs: vec![],
        };
        assert!(validate_nullable(&field, &message).is_err());
    }

    #[test]
    fn validate_nullable_accepts_optional_scalar() {
        let field = scalar_field("middle_name", true, true);
        let message = Message {
            name: "M".to_string(),
            qualified_name: ".pkg.M".to_string(),
            fields: vec![field.clone()],
            nested_messages: vec![],
            nested_enums: vec![],
            oneofs: vec![],
        };
        assert!(validate_nullable(&field, &message).is_ok());
    }

    #[test]
    fn oneof_variant_value_defaults_to_field_name() {
        let field = scalar_field("text", false, false);
        assert_eq!(get_oneof_variant_value(&field), "text");
    }
}
