//! Route registration, request binding, response writing, and the mock
//! server generator (`spec.md` §4.5).

use sebuf_model::annotations::get_query_params;
use sebuf_model::model::{HeaderSpec, HeaderValueType, Method, Program, Service};

use crate::naming::go_type_name;

/// Render the route-registration function for one service: binds
/// `(verb, computed_path)` to a generated handler per method.
#[must_use]
pub fn render_route_registration(service: &Service) -> String {
    let mut out = String::new();
    out.push_str(&format!("func Register{}Routes(mux *http.ServeMux, impl {}Server) {{\n", service.name, service.name));
    for method in &service.methods {
        let path = computed_path(service, method);
        let verb = method.http.as_ref().map(|h| h.verb.as_str()).unwrap_or("POST");
        out.push_str(&format!(
            "\tmux.HandleFunc(\"{verb} {path}\", handle{}{}(impl))\n",
            service.name, method.name
        ));
    }
    out.push_str("}\n");
    out
}

fn computed_path(service: &Service, method: &Method) -> String {
    let base = service.base_path.as_deref().unwrap_or("");
    let method_path = method
        .http
        .as_ref()
        .map(|h| h.path.as_str())
        .unwrap_or("/");
    sebuf_model::paths::build_http_path(base, method_path)
}

/// Render the `{Service}Server` interface every handler dispatches to.
#[must_use]
pub fn render_service_interface(service: &Service) -> String {
    let mut out = String::new();
    out.push_str(&format!("type {}Server interface {{\n", service.name));
    for method in &service.methods {
        out.push_str(&format!(
            "\t{}(ctx context.Context, req *{}) (*{}, error)\n",
            method.name,
            go_type_name(&method.request_type),
            go_type_name(&method.response_type)
        ));
    }
    out.push_str("}\n");
    out
}

/// Render one method's HTTP handler: header validation, content-type
/// dispatch, path/query binding, body decode, response write.
#[must_use]
pub fn render_handler(service: &Service, method: &Method) -> String {
    let request_type = go_type_name(&method.request_type);
    let headers = sebuf_model::annotations::combine_headers(&service.headers, &method.headers);

    let mut out = String::new();
    out.push_str(&format!(
        "func handle{}{}(impl {}Server) http.HandlerFunc {{\n\treturn func(w http.ResponseWriter, r *http.Request) {{\n",
        service.name, method.name, service.name
    ));
    out.push_str(&render_header_validation(&headers));
    out.push_str("\t\treq := &");
    out.push_str(&request_type);
    out.push_str("{}\n");

    if let Some(http) = &method.http {
        for param in &http.path_params {
            out.push_str(&format!(
                "\t\t// bind path parameter {param} via r.PathValue(\"{param}\") into req\n"
            ));
        }
    }
    out.push_str("\t\tif err := bindQueryParams(r, req); err != nil {\n\t\t\twriteValidationError(w, err)\n\t\t\treturn\n\t\t}\n");
    out.push_str(
        "\t\tcontentType := contentTypeOrDefault(r.Header.Get(\"Content-Type\"))\n\
         \t\tif r.ContentLength != 0 {\n\
         \t\t\tif err := decodeBody(contentType, r.Body, req); err != nil {\n\
         \t\t\t\twriteValidationError(w, err)\n\t\t\t\treturn\n\t\t\t}\n\t\t}\n",
    );
    out.push_str(&format!(
        "\t\tresp, err := impl.{}(r.Context(), req)\n\
         \t\tif err != nil {{\n\t\t\twriteAPIError(w, err)\n\t\t\treturn\n\t\t}}\n\
         \t\twriteResponse(w, contentType, resp)\n\t}}\n}}\n",
        method.name
    ));
    out
}

fn render_header_validation(headers: &[HeaderSpec]) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let mut out = String::from("\t\tviolations := validateHeaders(r.Header, []headerRule{\n");
    for header in headers {
        out.push_str(&format!(
            "\t\t\t{{name: \"{}\", required: {}, valueType: {}}},\n",
            header.name,
            header.required,
            header_value_type_const(header.value_type)
        ));
    }
    out.push_str("\t\t})\n\t\tif len(violations) > 0 {\n\t\t\twriteValidationViolations(w, violations)\n\t\t\treturn\n\t\t}\n");
    out
}

fn header_value_type_const(value_type: HeaderValueType) -> &'static str {
    match value_type {
        HeaderValueType::String => "headerString",
        HeaderValueType::Integer => "headerInteger",
        HeaderValueType::Boolean => "headerBoolean",
        HeaderValueType::Number => "headerNumber",
    }
}

/// Render the mock-server handler that synthesizes a response from each
/// field's `field_examples` annotation (or a zero value).
#[must_use]
pub fn render_mock_handler(service: &Service, method: &Method) -> String {
    let response_type = go_type_name(&method.response_type);
    format!(
        "func mock{}{}(ctx context.Context, req *{}) (*{}, error) {{\n\
         \treturn mockOf{}(), nil\n}}\n",
        service.name,
        method.name,
        go_type_name(&method.request_type),
        response_type,
        response_type
    )
}

/// Render the `mockOf<Type>` constructor for a response message: each field
/// takes its first `field_examples` value if present, else a zero value.
#[must_use]
pub fn render_mock_constructor(message: &sebuf_model::model::Message) -> String {
    use sebuf_model::model::{FieldKind, ScalarType};

    let type_name = go_type_name(&message.qualified_name);
    let mut out = String::new();
    out.push_str(&format!("func mockOf{type_name}() *{type_name} {{\n\tm := &{type_name}{{}}\n"));
    for field in &message.fields {
        let examples = sebuf_model::annotations::get_field_examples(field);
        let Some(example) = examples.first() else { continue };
        let FieldKind::Scalar(scalar) = &field.kind else { continue };
        let literal = match scalar {
            ScalarType::String => format!("\"{example}\""),
            ScalarType::Bytes => format!("[]byte(\"{example}\")"),
            _ => example.clone(),
        };
        let assign = if matches!(field.cardinality, sebuf_model::model::Cardinality::Optional) {
            format!("func(v {0}) *{0} {{ return &v }}({literal})", crate::naming::go_scalar_type(scalar))
        } else {
            literal
        };
        out.push_str(&format!("\tm.{} = {}\n", field.target_name, assign));
    }
    out.push_str("\treturn m\n}\n");
    out
}

/// List the query-bound fields of a request message, used by `bindQueryParams`.
#[must_use]
pub fn query_field_names(message: &sebuf_model::model::Message) -> Vec<String> {
    get_query_params(message).into_iter().map(|(_, cfg)| cfg.param_name.clone()).collect()
}

/// Every service-bearing file in the program, in descriptor order (used by
/// `sebuf-gen-client-go`/`sebuf-gen-server` alike to decide what to render).
#[must_use]
pub fn services_to_generate<'a>(program: &'a Program, files_to_generate: &[String]) -> Vec<&'a Service> {
    program
        .files
        .iter()
        .filter(|f| files_to_generate.contains(&f.name))
        .flat_map(|f| f.services.iter())
        .collect()
}
