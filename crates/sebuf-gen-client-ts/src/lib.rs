//! TypeScript HTTP client emitter (`spec.md` §4.7). Unlike the Go emitters,
//! TypeScript's native JSON types are expressive enough to represent every
//! `CodecPlan`'s wire shape directly (nullable unions, string-literal enum
//! unions, discriminated unions) — no synthetic codec is generated, only
//! type declarations and a fetch-based client class.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod naming;
pub mod runtime;
pub mod types;

use sebuf_driver::{DriverError, Emitter, GeneratedFile, PluginOptions};
use sebuf_model::model::{CodecPlans, Message, Program, ProtoFile};

/// The TypeScript HTTP client [`Emitter`].
#[derive(Debug, Default)]
pub struct ClientTsEmitter;

impl Emitter for ClientTsEmitter {
    fn name(&self) -> &'static str {
        "client-ts"
    }

    fn emit(
        &self,
        program: &Program,
        _plans: &CodecPlans,
        files_to_generate: &[String],
        _options: &PluginOptions,
    ) -> Result<Vec<GeneratedFile>, DriverError> {
        let mut out = Vec::new();
        for file in &program.files {
            if !files_to_generate.contains(&file.name) || file.services.is_empty() {
                continue;
            }
            out.push(render_file(file, program));
        }
        Ok(out)
    }
}

fn render_file(file: &ProtoFile, program: &Program) -> GeneratedFile {
    let mut body = String::new();
    body.push_str(runtime::render_runtime_support());
    body.push('\n');

    render_message_declarations(&file.messages, program, &mut body);
    for e in &file.enums {
        body.push_str(&types::render_enum_declaration(e));
    }
    body.push('\n');

    for service in &file.services {
        body.push_str(&client::render_client_class(service, program));
        body.push('\n');
    }

    GeneratedFile {
        name: output_name(&file.name),
        content: body,
    }
}

fn render_message_declarations(messages: &[Message], program: &Program, body: &mut String) {
    for message in messages {
        body.push_str(&types::render_message_declarations(message, program));
        body.push('\n');
        for e in &message.nested_enums {
            body.push_str(&types::render_enum_declaration(e));
        }
        render_message_declarations(&message.nested_messages, program, body);
    }
}

fn output_name(proto_file_name: &str) -> String {
    let stem = proto_file_name.trim_end_matches(".proto");
    format!("{stem}_client.ts")
}
