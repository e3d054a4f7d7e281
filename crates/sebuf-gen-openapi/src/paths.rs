//! `paths.{path}.{verb}` operation synthesis (`spec.md` §4.8).

use serde_json::{Map, Value, json};

use sebuf_model::annotations::{combine_headers, get_query_params, lowercase_verb};
use sebuf_model::model::{HeaderSpec, HeaderValueType, HttpConfig, Method, Program, Service};

use crate::naming::schema_ref;
use crate::schema::field_schema;

/// Build `paths` for one service: one path item per method, keyed by the
/// method's computed HTTP path (`spec.md` §4.2, `combine_base_and_method_path`).
#[must_use]
pub fn build_paths(service: &Service, program: &Program) -> Map<String, Value> {
    let mut paths: Map<String, Value> = Map::new();
    for method in &service.methods {
        let http = default_http(method);
        let path_item = paths.entry(http.path.clone()).or_insert_with(|| json!({})).as_object_mut().unwrap();
        let verb = lowercase_verb(&http.verb);
        path_item.insert(verb, build_operation(service, method, &http, program));
    }
    paths
}

/// Every [`Method`] coming out of `sebuf_model::ingest` carries an
/// [`HttpConfig`] (an unannotated method still defaults to `POST` against a
/// path derived from its name); fixtures built directly through
/// `test_support` may omit it, so this falls back the same way.
fn default_http(method: &Method) -> HttpConfig {
    method.http.clone().unwrap_or_else(|| HttpConfig {
        verb: "POST".to_string(),
        path: format!("/{}", method.name.to_ascii_lowercase()),
        path_params: Vec::new(),
    })
}

fn build_operation(service: &Service, method: &Method, http: &HttpConfig, program: &Program) -> Value {
    let headers = combine_headers(&service.headers, &method.headers);

    let mut parameters = Vec::new();
    for name in &http.path_params {
        parameters.push(json!({
            "name": name,
            "in": "path",
            "required": true,
            "schema": { "type": "string" },
        }));
    }

    if let Some(request) = program.find_message(&method.request_type) {
        for (field, query) in get_query_params(request) {
            parameters.push(json!({
                "name": query.param_name,
                "in": "query",
                "required": query.required,
                "schema": field_schema(field, program),
            }));
        }
    }

    for header in &headers {
        parameters.push(header_parameter(header));
    }

    let mut operation = json!({
        "summary": method.name,
        "operationId": method.name,
        "parameters": parameters,
        "responses": build_responses(method),
    });

    if expects_request_body(&http.verb) {
        operation["requestBody"] = json!({
            "required": true,
            "content": {
                "application/json": { "schema": { "$ref": schema_ref(&method.request_type) } }
            }
        });
    }

    operation
}

fn expects_request_body(verb: &str) -> bool {
    !matches!(verb, "GET" | "DELETE")
}

fn header_parameter(header: &HeaderSpec) -> Value {
    let schema_type = match header.value_type {
        HeaderValueType::Integer => "integer",
        HeaderValueType::Boolean => "boolean",
        HeaderValueType::Number => "number",
        HeaderValueType::String => "string",
    };
    let mut schema = json!({ "type": schema_type });
    if let Some(format) = &header.format {
        schema["format"] = json!(format);
    }
    if let Some(default) = &header.default_value {
        schema["default"] = json!(default);
    }
    json!({
        "name": header.name,
        "in": "header",
        "required": header.required,
        "schema": schema,
    })
}

fn build_responses(method: &Method) -> Value {
    json!({
        "200": {
            "description": "Successful response",
            "content": {
                "application/json": { "schema": { "$ref": schema_ref(&method.response_type) } }
            }
        },
        "400": {
            "description": "Validation error",
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/ValidationError" } }
            }
        },
        "default": {
            "description": "Unexpected error",
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/ApiError" } }
            }
        },
    })
}

/// Component schemas shared by every operation's error responses
/// (`spec.md` §6, the `ValidationError`/`ApiError` wire contract).
#[must_use]
pub fn error_schemas() -> Vec<(String, Value)> {
    vec![
        (
            "ValidationError".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "violations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "field": { "type": "string" },
                                "description": { "type": "string" },
                            },
                            "required": ["field", "description"],
                        }
                    }
                },
                "required": ["violations"],
            }),
        ),
        (
            "ApiError".to_string(),
            json!({
                "type": "object",
                "properties": { "message": { "type": "string" } },
                "required": ["message"],
            }),
        ),
    ]
}
