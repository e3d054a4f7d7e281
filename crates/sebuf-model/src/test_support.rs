//! Fixture builders for the intermediate model, enabled by the
//! `test-support` feature so every `sebuf-gen-*` emitter crate can build the
//! same scenario fixtures in its golden tests without re-deriving
//! boilerplate `Message`/`Field`/`Service` literals.

use crate::model::{
    AnnotationSet, Cardinality, Enum, EnumValue, Field, FieldKind, HeaderSpec, HeaderValueType,
    HttpConfig, Message, Method, Oneof, OneofConfig, Program, ProtoFile, QueryConfig, ScalarType,
    Service, UnwrapTable,
};

/// Build a scalar field with default annotations.
#[must_use]
pub fn make_field(name: &str, number: i32, kind: FieldKind, cardinality: Cardinality) -> Field {
    Field {
        name: name.to_string(),
        json_name: to_lower_camel(name),
        target_name: to_pascal(name),
        number,
        cardinality,
        kind,
        oneof_index: None,
        annotations: AnnotationSet::default(),
    }
}

/// Like [`make_field`] but with a caller-supplied [`AnnotationSet`].
#[must_use]
pub fn make_annotated_field(
    name: &str,
    number: i32,
    kind: FieldKind,
    cardinality: Cardinality,
    annotations: AnnotationSet,
) -> Field {
    Field {
        annotations,
        ..make_field(name, number, kind, cardinality)
    }
}

#[must_use]
pub fn make_message(name: &str, qualified_name: &str, fields: Vec<Field>) -> Message {
    Message {
        name: name.to_string(),
        qualified_name: qualified_name.to_string(),
        fields,
        nested_messages: Vec::new(),
        nested_enums: Vec::new(),
        oneofs: Vec::new(),
    }
}

#[must_use]
pub fn make_message_with_oneof(
    name: &str,
    qualified_name: &str,
    fields: Vec<Field>,
    oneof_name: &str,
    field_indices: Vec<usize>,
    config: Option<OneofConfig>,
) -> Message {
    Message {
        oneofs: vec![Oneof {
            name: oneof_name.to_string(),
            field_indices,
            config,
        }],
        ..make_message(name, qualified_name, fields)
    }
}

#[must_use]
pub fn make_enum(name: &str, qualified_name: &str, values: Vec<(&str, i32, Option<&str>)>) -> Enum {
    Enum {
        name: name.to_string(),
        qualified_name: qualified_name.to_string(),
        values: values
            .into_iter()
            .map(|(value_name, number, custom_json)| EnumValue {
                name: value_name.to_string(),
                number,
                custom_json: custom_json.map(str::to_string),
            })
            .collect(),
    }
}

#[must_use]
pub fn make_http_config(verb: &str, path: &str) -> HttpConfig {
    HttpConfig {
        verb: verb.to_string(),
        path_params: crate::paths::extract_path_params(path),
        path: path.to_string(),
    }
}

#[must_use]
pub fn make_method(
    name: &str,
    request_type: &str,
    response_type: &str,
    http: Option<HttpConfig>,
) -> Method {
    Method {
        name: name.to_string(),
        request_type: request_type.to_string(),
        response_type: response_type.to_string(),
        http,
        headers: Vec::new(),
    }
}

#[must_use]
pub fn make_service(name: &str, base_path: Option<&str>, methods: Vec<Method>) -> Service {
    Service {
        name: name.to_string(),
        base_path: base_path.map(str::to_string),
        headers: Vec::new(),
        methods,
    }
}

#[must_use]
pub fn make_header(name: &str, value_type: HeaderValueType, required: bool) -> HeaderSpec {
    HeaderSpec {
        name: name.to_string(),
        value_type,
        format: None,
        required,
        default_value: None,
    }
}

#[must_use]
pub fn make_query_config(param_name: &str, required: bool) -> QueryConfig {
    QueryConfig {
        param_name: param_name.to_string(),
        required,
    }
}

/// Wrap a single file's worth of messages/enums/services into a [`Program`]
/// with an empty unwrap table — callers that need unwrap resolution should
/// run [`crate::unwrap::collect_global_unwrap_info`] over the result.
#[must_use]
pub fn make_program(package: &str, messages: Vec<Message>, enums: Vec<Enum>, services: Vec<Service>) -> Program {
    Program {
        files: vec![ProtoFile {
            name: format!("{}.proto", package.replace('.', "_")),
            package: package.to_string(),
            dependencies: Vec::new(),
            messages,
            enums,
            services,
        }],
        unwrap_table: UnwrapTable::default(),
    }
}

/// `Address { street, city }`, used by the flatten scenario.
#[must_use]
pub fn address_message(qualified_name: &str) -> Message {
    make_message(
        "Address",
        qualified_name,
        vec![
            make_field("street", 1, FieldKind::Scalar(ScalarType::String), Cardinality::Singular),
            make_field("city", 2, FieldKind::Scalar(ScalarType::String), Cardinality::Singular),
        ],
    )
}

fn to_lower_camel(name: &str) -> String {
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

fn to_pascal(name: &str) -> String {
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
