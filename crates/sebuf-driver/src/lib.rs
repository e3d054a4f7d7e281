//! The shared driver every `sebuf-gen-*` binary runs (`spec_full.md` §4.9):
//! read a `CodeGeneratorRequest`, run the core pipeline once, hand the
//! result to one [`Emitter`], write back a `CodeGeneratorResponse`.
//!
//! A plugin binary's `main` is just:
//!
//! ```ignore
//! fn main() {
//!     sebuf_driver::run_plugin(my_emitter::ServerEmitter::default());
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod options;

use std::io::{Read, Write};
use std::process::ExitCode;

use prost::Message as _;
use sebuf_core::plugin::{CodeGeneratorRequest, CodeGeneratorResponse};
use sebuf_model::model::{CodecPlans, Program};

pub use error::DriverError;
pub use options::PluginOptions;

/// One generated output file, ready to be written into the plugin response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// A uniform capability every emitter implements (`spec.md` §9,
/// "Polymorphism over emitters"): `emit_file(program, plans) -> [OutputFile]`.
/// Implementors never parse raw descriptor options — everything they need
/// comes through `sebuf_model`.
pub trait Emitter {
    /// Short identifier used in log lines and panic messages, e.g. `"server"`.
    fn name(&self) -> &'static str;

    /// Produce every output file for the files named in `files_to_generate`.
    /// `program` and `plans` cover the whole request, including transitive
    /// imports, so the emitter can resolve cross-file type references.
    fn emit(
        &self,
        program: &Program,
        plans: &CodecPlans,
        files_to_generate: &[String],
        options: &PluginOptions,
    ) -> Result<Vec<GeneratedFile>, DriverError>;
}

/// Run one emitter as a standalone `protoc`/`buf` plugin: decode the
/// request from stdin, run the core pipeline, invoke `emitter`, encode the
/// response to stdout. Per the plugin protocol, this always exits `0` —
/// failures are reported through `CodeGeneratorResponse.error`, never
/// through the process exit code, so `protoc`/`buf` can surface the
/// message themselves.
pub fn run_plugin<E: Emitter>(emitter: E) -> ExitCode {
    init_logging();

    let response = match run(&emitter) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(emitter = emitter.name(), error = %err, "generation failed");
            CodeGeneratorResponse::from_error(err.to_string())
        }
    };

    if let Err(write_err) = write_response(&response) {
        tracing::error!(emitter = emitter.name(), error = %write_err, "failed to write response");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run<E: Emitter>(emitter: &E) -> Result<CodeGeneratorResponse, DriverError> {
    let request = read_request()?;
    run_with_request(emitter, &request)
}

fn run_with_request<E: Emitter>(
    emitter: &E,
    request: &CodeGeneratorRequest,
) -> Result<CodeGeneratorResponse, DriverError> {
    let plugin_options = options::parse_parameter(request.parameter.as_deref())?;

    let (program, plans) = sebuf_model::build(request)?;

    let files = emitter.emit(&program, &plans, &request.file_to_generate, &plugin_options)?;

    let mut response = CodeGeneratorResponse::new();
    for file in files {
        response.push_file(file.name, file.content);
    }
    Ok(response)
}

fn read_request() -> Result<CodeGeneratorRequest, DriverError> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf).map_err(DriverError::Read)?;
    CodeGeneratorRequest::decode(buf.as_slice()).map_err(DriverError::Decode)
}

fn write_response(response: &CodeGeneratorResponse) -> Result<(), DriverError> {
    let bytes = response.encode_to_vec();
    std::io::stdout().write_all(&bytes).map_err(DriverError::Write)
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoEmitter;

    impl Emitter for EchoEmitter {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn emit(
            &self,
            program: &Program,
            _plans: &CodecPlans,
            _files_to_generate: &[String],
            _options: &PluginOptions,
        ) -> Result<Vec<GeneratedFile>, DriverError> {
            Ok(vec![GeneratedFile {
                name: "echo.txt".to_string(),
                content: format!("{} files", program.files.len()),
            }])
        }
    }

    #[test]
    fn run_builds_a_response_from_an_empty_request() {
        let request = CodeGeneratorRequest::default();
        let response = run_with_request(&EchoEmitter, &request).unwrap();
        assert_eq!(response.file.len(), 1);
        assert_eq!(response.file[0].content.as_deref(), Some("0 files"));
    }

    #[test]
    fn unknown_plugin_option_aborts_before_emission() {
        let request = CodeGeneratorRequest {
            parameter: Some("bogus=1".to_string()),
            ..Default::default()
        };
        assert!(run_with_request(&EchoEmitter, &request).is_err());
    }
}
