//! Top-level `OpenAPI` 3.1 document assembly: one document per service
//! (`spec.md` §4.8, "Produces one `OpenAPI` 3.1 document per service").

use serde_json::{Map, Value, json};

use sebuf_model::model::{Program, Service};

use crate::paths::{build_paths, error_schemas};
use crate::schema::collect_message_schemas;

/// Build the full `OpenAPI` document for one service: `info`, `paths`, and
/// `components.schemas` containing every message/enum transitively
/// referenced by the service's methods.
#[must_use]
pub fn build_document(service: &Service, program: &Program) -> Value {
    let mut schemas: Map<String, Value> = Map::new();
    for (name, schema) in error_schemas() {
        schemas.insert(name, schema);
    }

    for method in &service.methods {
        collect_referenced(&method.request_type, program, &mut schemas);
        collect_referenced(&method.response_type, program, &mut schemas);
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": service.name,
            "version": "1.0.0",
        },
        "paths": build_paths(service, program),
        "components": { "schemas": schemas },
    })
}

/// Recursively register a message's schema (and every message/enum type its
/// fields reference) into `schemas`, skipping types already seen.
fn collect_referenced(qualified_name: &str, program: &Program, schemas: &mut Map<String, Value>) {
    let name = crate::naming::schema_name(qualified_name);
    if schemas.contains_key(&name) {
        return;
    }

    if let Some(e) = program.find_enum(qualified_name) {
        schemas.insert(name, crate::schema::enum_schema(e));
        return;
    }

    let Some(message) = program.find_message(qualified_name) else {
        return;
    };
    for (entry_name, schema) in collect_message_schemas(message, program).entries {
        schemas.entry(entry_name).or_insert(schema);
    }
    for field in &message.fields {
        for referenced in field_referenced_types(field) {
            collect_referenced(&referenced, program, schemas);
        }
    }
}

fn field_referenced_types(field: &sebuf_model::model::Field) -> Vec<String> {
    fn walk(kind: &sebuf_model::model::FieldKind, out: &mut Vec<String>) {
        match kind {
            sebuf_model::model::FieldKind::Message(name) | sebuf_model::model::FieldKind::Enum(name) => {
                out.push(name.clone());
            }
            sebuf_model::model::FieldKind::Map { value, .. } => walk(value, out),
            _ => {}
        }
    }
    let mut out = Vec::new();
    walk(&field.kind, &mut out);
    out
}
