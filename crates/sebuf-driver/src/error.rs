//! Driver-level errors (`spec.md` §7, kind 5: `PluginIO`).

/// Everything that can abort a plugin invocation before or after the model
/// pipeline runs.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Reading the request from the plugin's input channel failed.
    #[error("failed to read plugin request: {0}")]
    Read(#[source] std::io::Error),

    /// The request bytes were not a valid `CodeGeneratorRequest`.
    #[error("failed to decode plugin request: {0}")]
    Decode(#[source] prost::DecodeError),

    /// Writing the response to the plugin's output channel failed.
    #[error("failed to write plugin response: {0}")]
    Write(#[source] std::io::Error),

    /// The plugin parameter string contained an option the emitter doesn't
    /// recognize (`spec.md` §6, "CLI").
    #[error("unknown plugin option: {0}")]
    UnknownOption(String),

    /// Annotation model / validation / codec-planning failure.
    #[error(transparent)]
    Model(#[from] sebuf_model::error::ModelError),

    /// An emitter failed to serialize a generated document (e.g. the
    /// OpenAPI emitter's YAML/JSON output).
    #[error("failed to serialize generated document: {0}")]
    Serialize(String),
}
