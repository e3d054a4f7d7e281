//! Go HTTP server emitter (`spec.md` §4.5): route registration, request
//! binding, response writing, a mock server, and the synthetic JSON codecs
//! `spec.md`'s codec-plan table names. `sebuf-gen-client-go` depends on this
//! crate to reuse [`codec::render_message_codec`]/[`codec::render_enum_codec`]
//! verbatim, which is what makes the two emitters' codec text byte-identical.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod naming;
pub mod routes;
pub mod runtime;
pub mod types;

use sebuf_driver::{DriverError, Emitter, GeneratedFile, PluginOptions};
use sebuf_model::model::{CodecPlans, Message, Program, ProtoFile};

use naming::{go_package_name, messages_use_timestamp};

/// The Go HTTP server [`Emitter`].
#[derive(Debug, Default)]
pub struct ServerEmitter;

impl Emitter for ServerEmitter {
    fn name(&self) -> &'static str {
        "server"
    }

    fn emit(
        &self,
        program: &Program,
        plans: &CodecPlans,
        files_to_generate: &[String],
        _options: &PluginOptions,
    ) -> Result<Vec<GeneratedFile>, DriverError> {
        let mut out = Vec::new();
        for file in &program.files {
            if !files_to_generate.contains(&file.name) || file.services.is_empty() {
                continue;
            }
            out.push(render_file(file, plans));
        }
        Ok(out)
    }
}

fn render_file(file: &ProtoFile, plans: &CodecPlans) -> GeneratedFile {
    let package = go_package_name(&file.package);
    let mut body = String::new();
    body.push_str(&format!("package {package}\n\n"));
    body.push_str(
        "import (\n\t\"context\"\n\t\"encoding/base64\"\n\t\"encoding/hex\"\n\t\"encoding/json\"\n\t\"fmt\"\n\t\"io\"\n\t\"net/http\"\n\t\"reflect\"\n\t\"strconv\"\n\t\"strings\"\n\t\"time\"\n\n\t\"google.golang.org/protobuf/proto\"\n",
    );
    if messages_use_timestamp(&file.messages) {
        body.push_str("\t\"google.golang.org/protobuf/types/known/timestamppb\"\n");
    }
    body.push_str(")\n\n");
    body.push_str(runtime::render_runtime_support());
    body.push('\n');

    render_messages_and_codecs(&file.messages, plans, &mut body);
    for e in &file.enums {
        body.push_str(&types::render_enum_type(e));
        body.push('\n');
        body.push_str(&codec::render_enum_codec(e));
        body.push('\n');
    }

    for service in &file.services {
        body.push_str(&routes::render_service_interface(service));
        body.push('\n');
        body.push_str(&routes::render_route_registration(service));
        body.push('\n');
        for method in &service.methods {
            body.push_str(&routes::render_handler(service, method));
            body.push('\n');
            body.push_str(&routes::render_mock_handler(service, method));
            body.push('\n');
        }
    }

    GeneratedFile {
        name: output_name(&file.name),
        content: body,
    }
}

fn render_messages_and_codecs(messages: &[Message], plans: &CodecPlans, body: &mut String) {
    for message in messages {
        body.push_str(&types::render_message_struct(message));
        body.push('\n');
        if let Some(codec) = codec::render_message_codec(message, plans) {
            body.push_str(&codec);
            body.push('\n');
        }
        if message
            .fields
            .iter()
            .any(|f| !sebuf_model::annotations::get_field_examples(f).is_empty())
        {
            body.push_str(&routes::render_mock_constructor(message));
            body.push('\n');
        }
        render_messages_and_codecs(&message.nested_messages, plans, body);
        for e in &message.nested_enums {
            body.push_str(&types::render_enum_type(e));
            body.push('\n');
            body.push_str(&codec::render_enum_codec(e));
            body.push('\n');
        }
    }
}

fn output_name(proto_file_name: &str) -> String {
    let stem = proto_file_name.trim_end_matches(".proto");
    format!("{stem}_http.go")
}
