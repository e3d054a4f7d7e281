//! The `protoc` compiler-plugin wire protocol (`plugin.proto`).
//!
//! `prost_types` mirrors `descriptor.proto` but not `plugin.proto`, so these
//! two messages are hand-rolled the same way the rest of `descriptor` is:
//! only the fields sebuf's drivers actually read or write, named after the
//! upstream proto so the mapping is obvious.

use prost::Message;

use crate::descriptor::FileDescriptorProto;

/// What a `protoc`/`buf` invocation sends to a plugin on stdin.
#[derive(Clone, PartialEq, Message)]
pub struct CodeGeneratorRequest {
    /// Names of the files directly named on the `protoc` command line (as
    /// opposed to their transitive imports, which also appear in
    /// `proto_file` but should not themselves be generated for).
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    /// The plugin parameter string, e.g. `"paths=source_relative,format=yaml"`.
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    /// Every file needed to type-check `file_to_generate`, transitive
    /// imports included, topologically sorted (dependencies before
    /// dependents).
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}

/// What a plugin sends back to `protoc`/`buf` on stdout.
#[derive(Clone, PartialEq, Message)]
pub struct CodeGeneratorResponse {
    /// Set to abort the run; `protoc` reports this to the user and treats
    /// the invocation as failed. Mutually exclusive in practice with `file`,
    /// though the wire format does not enforce that.
    #[prost(string, optional, tag = "1")]
    pub error: Option<String>,
    #[prost(message, repeated, tag = "15")]
    pub file: Vec<code_generator_response::File>,
}

/// Nested types for [`CodeGeneratorResponse`].
pub mod code_generator_response {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct File {
        /// Output file path, relative to the configured output directory.
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "15")]
        pub content: Option<String>,
    }
}

impl CodeGeneratorResponse {
    /// An empty, error-free response — callers push files or set `error`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A response carrying a single fatal error; no files are emitted.
    #[must_use]
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            file: Vec::new(),
        }
    }

    pub fn push_file(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.file.push(code_generator_response::File {
            name: Some(name.into()),
            content: Some(content.into()),
        });
    }
}

impl Default for CodeGeneratorResponse {
    fn default() -> Self {
        Self {
            error: None,
            file: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_file_appends_name_and_content() {
        let mut response = CodeGeneratorResponse::new();
        response.push_file("foo_http.go", "package foo");
        assert_eq!(response.file.len(), 1);
        assert_eq!(response.file[0].name.as_deref(), Some("foo_http.go"));
        assert_eq!(response.file[0].content.as_deref(), Some("package foo"));
        assert!(response.error.is_none());
    }

    #[test]
    fn from_error_carries_no_files() {
        let response = CodeGeneratorResponse::from_error("boom");
        assert_eq!(response.error.as_deref(), Some("boom"));
        assert!(response.file.is_empty());
    }

    #[test]
    fn round_trip_request() {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["foo.proto".to_string()],
            parameter: Some("paths=source_relative".to_string()),
            proto_file: vec![],
        };
        let bytes = request.encode_to_vec();
        let decoded = CodeGeneratorRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(request, decoded);
    }
}
