//! Renders the TypeScript service client class (`spec.md` §4.7):
//! constructor options for service headers, per-method options for method
//! headers, per-call overrides, and the unwrap return-type transform.

use sebuf_model::model::{Method, Program, Service};

use crate::naming::ts_type_name;
use crate::types::ts_field_type;

/// Render the `{Service}Client` class.
#[must_use]
pub fn render_client_class(service: &Service, program: &Program) -> String {
    let mut out = String::new();
    out.push_str(&format!("export interface {}ClientOptions {{\n", service.name));
    out.push_str("\tbaseUrl: string;\n\theaders?: Record<string, string>;\n\tfetch?: typeof fetch;\n}\n\n");

    out.push_str(&format!("export class {}Client {{\n", service.name));
    out.push_str("\tprivate readonly baseUrl: string;\n\tprivate readonly headers: Record<string, string>;\n\tprivate readonly fetchImpl: typeof fetch;\n\n");
    out.push_str(&format!(
        "\tconstructor(options: {}ClientOptions) {{\n\
         \t\tthis.baseUrl = options.baseUrl;\n\
         \t\tthis.headers = options.headers ?? {{}};\n\
         \t\tthis.fetchImpl = options.fetch ?? fetch;\n\t}}\n\n",
        service.name
    ));

    for method in &service.methods {
        out.push_str(&render_method(service, method, program));
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

fn render_method(service: &Service, method: &Method, program: &Program) -> String {
    let request_type = ts_type_name(&method.request_type);
    let is_unwrap = program.unwrap_table.is_root_unwrap(&method.response_type);
    let response_type = if is_unwrap {
        unwrap_element_type(program, &method.response_type)
    } else {
        ts_type_name(&method.response_type)
    };
    let path = method.http.as_ref().map(|h| h.path.as_str()).unwrap_or("/");
    let verb = method.http.as_ref().map(|h| h.verb.as_str()).unwrap_or("POST");

    let mut out = String::new();
    out.push_str(&format!(
        "\tasync {method_name}(req: {request_type}, options?: CallOptions): Promise<{response_type}> {{\n",
        method_name = lower_first(&method.name),
    ));
    out.push_str(&format!("\t\tlet path: string = \"{path}\";\n"));
    if let Some(http) = &method.http {
        for param in &http.path_params {
            out.push_str(&format!(
                "\t\tpath = path.replace(\"{{{param}}}\", encodeURIComponent(String((req as any).{param})));\n"
            ));
        }
    }
    out.push_str(
        "\t\tconst query = new URLSearchParams();\n\
         \t\taddQueryParams(query, req);\n\
         \t\tconst url = this.baseUrl + path + (query.toString() ? \"?\" + query.toString() : \"\");\n\
         \t\tconst headers: Record<string, string> = { \"Content-Type\": options?.contentType ?? \"application/json\", ...this.headers, ...options?.headers };\n",
    );
    out.push_str(&format!(
        "\t\tconst resp = await this.fetchImpl(url, {{\n\t\t\tmethod: \"{verb}\",\n\t\t\theaders,\n\t\t\tbody: JSON.stringify(req),\n\t\t\tsignal: options?.signal,\n\t\t}});\n"
    ));
    out.push_str(
        "\t\tif (!resp.ok) {\n\t\t\tthrow await decodeError(resp);\n\t\t}\n\
         \t\tconst body = await resp.json();\n",
    );
    if is_unwrap {
        out.push_str("\t\treturn body as ");
        out.push_str(&response_type);
        out.push_str(";\n");
    } else {
        out.push_str("\t\treturn body as ");
        out.push_str(&response_type);
        out.push_str(";\n");
    }
    out.push_str("\t}\n");
    let _ = service;
    out
}

fn unwrap_element_type(program: &Program, response_qualified_name: &str) -> String {
    let Some(message) = program.find_message(response_qualified_name) else {
        return format!("{}[]", ts_type_name(response_qualified_name));
    };
    let Some(field) = message.fields.iter().find(|f| f.annotations.unwrap) else {
        return format!("{}[]", ts_type_name(response_qualified_name));
    };
    format!("{}[]", ts_field_type(field, program).trim_end_matches("[]"))
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
