//! `OpenAPI` 3.1 document emitter (`spec.md` §4.8): one document per
//! service, serialized to YAML or JSON depending on the plugin's `format=`
//! option.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod document;
pub mod naming;
pub mod paths;
pub mod schema;

use sebuf_driver::options::OutputFormat;
use sebuf_driver::{DriverError, Emitter, GeneratedFile, PluginOptions};
use sebuf_model::model::{CodecPlans, Program};

/// The `OpenAPI` 3.1 [`Emitter`].
#[derive(Debug, Default)]
pub struct OpenApiEmitter;

impl Emitter for OpenApiEmitter {
    fn name(&self) -> &'static str {
        "openapi"
    }

    fn emit(
        &self,
        program: &Program,
        _plans: &CodecPlans,
        files_to_generate: &[String],
        options: &PluginOptions,
    ) -> Result<Vec<GeneratedFile>, DriverError> {
        let mut out = Vec::new();
        for file in &program.files {
            if !files_to_generate.contains(&file.name) {
                continue;
            }
            for service in &file.services {
                out.push(render_service(service, program, options.format)?);
            }
        }
        Ok(out)
    }
}

fn render_service(
    service: &sebuf_model::model::Service,
    program: &Program,
    format: OutputFormat,
) -> Result<GeneratedFile, DriverError> {
    let document = document::build_document(service, program);
    let content = match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(&document).map_err(|e| DriverError::Serialize(e.to_string()))?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&document).map_err(|e| DriverError::Serialize(e.to_string()))?
        }
    };
    Ok(GeneratedFile {
        name: output_name(&service.name, format),
        content,
    })
}

fn output_name(service_name: &str, format: OutputFormat) -> String {
    let ext = match format {
        OutputFormat::Yaml => "yaml",
        OutputFormat::Json => "json",
    };
    format!("{service_name}.openapi.{ext}")
}
