//! Minimal protobuf descriptor types with sebuf extension support.
//!
//! Standard `prost_types` descriptor types drop extension fields during
//! decoding because prost doesn't retain unknown fields. These custom types
//! read exactly the fields the generator core needs, including the sebuf
//! extension family (50001–50020, see `spec_full.md` §6 / `wire` module
//! below) which `prost_types` would otherwise silently discard.
//!
//! Used by `sebuf-model` and every `sebuf-gen-*` emitter crate.

#[allow(clippy::all, clippy::pedantic, clippy::nursery)]
mod types {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorSet {
        #[prost(message, repeated, tag = "1")]
        pub file: Vec<FileDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub package: Option<String>,
        #[prost(string, repeated, tag = "3")]
        pub dependency: Vec<String>,
        #[prost(message, repeated, tag = "4")]
        pub message_type: Vec<DescriptorProto>,
        #[prost(message, repeated, tag = "5")]
        pub enum_type: Vec<EnumDescriptorProto>,
        #[prost(message, repeated, tag = "6")]
        pub service: Vec<ServiceDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct DescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub field: Vec<FieldDescriptorProto>,
        #[prost(message, repeated, tag = "3")]
        pub nested_type: Vec<DescriptorProto>,
        #[prost(message, repeated, tag = "4")]
        pub enum_type: Vec<EnumDescriptorProto>,
        #[prost(message, repeated, tag = "8")]
        pub oneof_decl: Vec<OneofDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FieldDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(int32, optional, tag = "3")]
        pub number: Option<i32>,
        /// `LABEL_OPTIONAL = 1`, `LABEL_REQUIRED = 2`, `LABEL_REPEATED = 3`.
        #[prost(int32, optional, tag = "4")]
        pub label: Option<i32>,
        /// Protobuf field type enum: 1=double, 5=int32, 9=string, 11=message, 14=enum, …
        #[prost(int32, optional, tag = "5")]
        pub r#type: Option<i32>,
        /// Fully-qualified type name for message/enum fields (e.g., `.pkg.v1.Foo`).
        #[prost(string, optional, tag = "6")]
        pub type_name: Option<String>,
        /// Field's `json_name` as computed by `protoc` (camelCase of `name`
        /// unless the proto source overrides it).
        #[prost(string, optional, tag = "10")]
        pub json_name: Option<String>,
        /// Index into the owning message's `oneof_decl`. Present for both real
        /// oneofs and proto3-optional's synthetic one-field oneof.
        #[prost(int32, optional, tag = "9")]
        pub oneof_index: Option<i32>,
        /// True iff this field was declared `optional` in proto3 syntax (as
        /// opposed to being a member of a user-written `oneof`).
        #[prost(bool, optional, tag = "17")]
        pub proto3_optional: Option<bool>,
        /// Field options, including sebuf and `buf.validate` extensions.
        #[prost(message, optional, tag = "8")]
        pub options: Option<FieldOptions>,
    }

    /// `google.protobuf.FieldDescriptorProto.Label`.
    pub mod label {
        pub const OPTIONAL: i32 = 1;
        pub const REQUIRED: i32 = 2;
        pub const REPEATED: i32 = 3;
    }

    /// Field-level options: the sebuf extension family plus a minimal mirror
    /// of `buf.validate.FieldRules` (read-only, documentation purposes only).
    #[derive(Clone, PartialEq, Message)]
    pub struct FieldOptions {
        /// `(sebuf.query)` — query parameter configuration. Tag 50005.
        #[prost(message, optional, tag = "50005")]
        pub query: Option<QueryConfig>,
        /// `(sebuf.field_examples)` — example values for docs/mocking. Tag 50006.
        #[prost(string, repeated, tag = "50006")]
        pub field_examples: Vec<String>,
        /// `(sebuf.unwrap)`. Tag 50009.
        #[prost(bool, optional, tag = "50009")]
        pub unwrap: Option<bool>,
        /// `(sebuf.int64_encoding)`. Tag 50010. See `wire::int64_encoding`.
        #[prost(int32, optional, tag = "50010")]
        pub int64_encoding: Option<i32>,
        /// `(sebuf.enum_encoding)`. Tag 50011. See `wire::enum_encoding`.
        #[prost(int32, optional, tag = "50011")]
        pub enum_encoding: Option<i32>,
        /// `(sebuf.nullable)`. Tag 50013.
        #[prost(bool, optional, tag = "50013")]
        pub nullable: Option<bool>,
        /// `(sebuf.empty_behavior)`. Tag 50014. See `wire::empty_behavior`.
        #[prost(int32, optional, tag = "50014")]
        pub empty_behavior: Option<i32>,
        /// `(sebuf.timestamp_format)`. Tag 50015. See `wire::timestamp_format`.
        #[prost(int32, optional, tag = "50015")]
        pub timestamp_format: Option<i32>,
        /// `(sebuf.bytes_encoding)`. Tag 50016. See `wire::bytes_encoding`.
        #[prost(int32, optional, tag = "50016")]
        pub bytes_encoding: Option<i32>,
        /// `(sebuf.oneof_value)` — custom discriminator value for this variant. Tag 50018.
        #[prost(string, optional, tag = "50018")]
        pub oneof_value: Option<String>,
        /// `(sebuf.flatten)`. Tag 50019.
        #[prost(bool, optional, tag = "50019")]
        pub flatten: Option<bool>,
        /// `(sebuf.flatten_prefix)`. Tag 50020.
        #[prost(string, optional, tag = "50020")]
        pub flatten_prefix: Option<String>,
        /// `validate.rules` extension (tag 1071 from validate.proto). Read for
        /// OpenAPI documentation only; never executed.
        #[prost(message, optional, tag = "1071")]
        pub rules: Option<FieldRules>,
    }

    /// `(sebuf.query)` — field 50005.
    #[derive(Clone, PartialEq, Message)]
    pub struct QueryConfig {
        /// Override for the query parameter name (defaults to the field's proto name).
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(bool, optional, tag = "2")]
        pub required: Option<bool>,
    }

    /// Minimal `validate.FieldRules` mirror — only the rules mapped to OpenAPI.
    #[derive(Clone, PartialEq, Message)]
    pub struct FieldRules {
        #[prost(message, optional, tag = "17")]
        pub message: Option<MessageRules>,
        #[prost(message, optional, tag = "3")]
        pub int32: Option<Int32Rules>,
        #[prost(message, optional, tag = "5")]
        pub uint32: Option<UInt32Rules>,
        #[prost(message, optional, tag = "6")]
        pub uint64: Option<UInt64Rules>,
        #[prost(message, optional, tag = "14")]
        pub string: Option<StringRules>,
        #[prost(message, optional, tag = "16")]
        pub r#enum: Option<EnumRules>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct MessageRules {
        #[prost(bool, optional, tag = "2")]
        pub required: Option<bool>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct StringRules {
        #[prost(uint64, optional, tag = "2")]
        pub min_len: Option<u64>,
        #[prost(uint64, optional, tag = "3")]
        pub max_len: Option<u64>,
        #[prost(string, optional, tag = "6")]
        pub pattern: Option<String>,
        #[prost(string, repeated, tag = "10")]
        pub r#in: Vec<String>,
        /// `well_known` oneof: `email = true` means the field must be a valid email.
        #[prost(bool, optional, tag = "12")]
        pub email: Option<bool>,
        /// `well_known` oneof: `uuid = true` means the field must be a valid UUID.
        #[prost(bool, optional, tag = "22")]
        pub uuid: Option<bool>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Int32Rules {
        #[prost(int32, optional, tag = "2")]
        pub lt: Option<i32>,
        #[prost(int32, optional, tag = "3")]
        pub lte: Option<i32>,
        #[prost(int32, optional, tag = "4")]
        pub gt: Option<i32>,
        #[prost(int32, optional, tag = "5")]
        pub gte: Option<i32>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct UInt32Rules {
        #[prost(uint32, optional, tag = "2")]
        pub lt: Option<u32>,
        #[prost(uint32, optional, tag = "3")]
        pub lte: Option<u32>,
        #[prost(uint32, optional, tag = "4")]
        pub gt: Option<u32>,
        #[prost(uint32, optional, tag = "5")]
        pub gte: Option<u32>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct UInt64Rules {
        #[prost(uint64, optional, tag = "2")]
        pub lt: Option<u64>,
        #[prost(uint64, optional, tag = "3")]
        pub lte: Option<u64>,
        #[prost(uint64, optional, tag = "4")]
        pub gt: Option<u64>,
        #[prost(uint64, optional, tag = "5")]
        pub gte: Option<u64>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct EnumRules {
        #[prost(int32, repeated, tag = "4")]
        pub not_in: Vec<i32>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct OneofDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, optional, tag = "2")]
        pub options: Option<OneofOptions>,
    }

    /// Oneof-level options carrying `(sebuf.oneof_config)`. Tag 50017.
    #[derive(Clone, PartialEq, Message)]
    pub struct OneofOptions {
        #[prost(message, optional, tag = "50017")]
        pub oneof_config: Option<OneofConfig>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct OneofConfig {
        #[prost(string, optional, tag = "1")]
        pub discriminator: Option<String>,
        #[prost(bool, optional, tag = "2")]
        pub flatten: Option<bool>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct EnumDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub value: Vec<EnumValueDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct EnumValueDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(int32, optional, tag = "2")]
        pub number: Option<i32>,
        #[prost(message, optional, tag = "3")]
        pub options: Option<EnumValueOptions>,
    }

    /// Enum-value options carrying `(sebuf.enum_value)`. Tag 50012.
    #[derive(Clone, PartialEq, Message)]
    pub struct EnumValueOptions {
        #[prost(string, optional, tag = "50012")]
        pub enum_value: Option<String>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ServiceDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub method: Vec<MethodDescriptorProto>,
        #[prost(message, optional, tag = "3")]
        pub options: Option<ServiceOptions>,
    }

    /// Service-level options: base path (tag 50002) and service headers (tag 50003).
    #[derive(Clone, PartialEq, Message)]
    pub struct ServiceOptions {
        #[prost(string, optional, tag = "50002")]
        pub base_path: Option<String>,
        #[prost(message, repeated, tag = "50003")]
        pub headers: Vec<HeaderSpec>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct MethodDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub input_type: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub output_type: Option<String>,
        #[prost(message, optional, tag = "4")]
        pub options: Option<MethodOptions>,
    }

    /// Method options: the HTTP rule (tag 50001) and method headers (tag 50004).
    #[derive(Clone, PartialEq, Message)]
    pub struct MethodOptions {
        #[prost(message, optional, tag = "50001")]
        pub http: Option<HttpRule>,
        #[prost(message, repeated, tag = "50004")]
        pub headers: Vec<HeaderSpec>,
    }

    /// A single HTTP verb + path mapping for a method. `(sebuf.http)`.
    #[derive(Clone, PartialEq, Message)]
    pub struct HttpRule {
        #[prost(oneof = "HttpPattern", tags = "1, 2, 3, 4, 5")]
        pub pattern: Option<HttpPattern>,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum HttpPattern {
        #[prost(string, tag = "1")]
        Get(String),
        #[prost(string, tag = "2")]
        Put(String),
        #[prost(string, tag = "3")]
        Post(String),
        #[prost(string, tag = "4")]
        Delete(String),
        #[prost(string, tag = "5")]
        Patch(String),
    }

    /// A header declared at service or method scope. Used for both
    /// `ServiceOptions.headers` and `MethodOptions.headers`.
    #[derive(Clone, PartialEq, Message)]
    pub struct HeaderSpec {
        #[prost(string, tag = "1")]
        pub name: String,
        /// See `wire::header_value_type`.
        #[prost(int32, tag = "2")]
        pub value_type: i32,
        #[prost(string, optional, tag = "3")]
        pub format: Option<String>,
        #[prost(bool, tag = "4")]
        pub required: bool,
        #[prost(string, optional, tag = "5")]
        pub default_value: Option<String>,
    }
}

pub use types::*;

/// Proto field type constants (from `google.protobuf.FieldDescriptorProto.Type`).
pub mod field_type {
    /// `TYPE_DOUBLE = 1`
    pub const DOUBLE: i32 = 1;
    /// `TYPE_FLOAT = 2`
    pub const FLOAT: i32 = 2;
    /// `TYPE_INT64 = 3`
    pub const INT64: i32 = 3;
    /// `TYPE_UINT64 = 4`
    pub const UINT64: i32 = 4;
    /// `TYPE_INT32 = 5`
    pub const INT32: i32 = 5;
    /// `TYPE_BOOL = 8`
    pub const BOOL: i32 = 8;
    /// `TYPE_STRING = 9`
    pub const STRING: i32 = 9;
    /// `TYPE_GROUP = 10` (unsupported; rejected wherever encountered)
    pub const GROUP: i32 = 10;
    /// `TYPE_MESSAGE = 11`
    pub const MESSAGE: i32 = 11;
    /// `TYPE_BYTES = 12`
    pub const BYTES: i32 = 12;
    /// `TYPE_UINT32 = 13`
    pub const UINT32: i32 = 13;
    /// `TYPE_ENUM = 14`
    pub const ENUM: i32 = 14;
    /// `TYPE_SFIXED32 = 15`
    pub const SFIXED32: i32 = 15;
    /// `TYPE_SFIXED64 = 16`
    pub const SFIXED64: i32 = 16;
    /// `TYPE_SINT32 = 17`
    pub const SINT32: i32 = 17;
    /// `TYPE_SINT64 = 18`
    pub const SINT64: i32 = 18;
}

/// Wire-level constants for the sebuf enum extensions (50010, 50011, 50014,
/// 50015, 50016) and the `HeaderSpec.value_type` field. Each mirrors the
/// `UNSPEC|...` enum named in `spec.md` §3, with `UNSPEC = 0` by protobuf
/// convention so an absent option decodes the same as an explicit default.
pub mod wire {
    /// `(sebuf.int64_encoding)` values.
    pub mod int64_encoding {
        pub const UNSPEC: i32 = 0;
        pub const STRING: i32 = 1;
        pub const NUMBER: i32 = 2;
    }

    /// `(sebuf.enum_encoding)` values.
    pub mod enum_encoding {
        pub const UNSPEC: i32 = 0;
        pub const STRING: i32 = 1;
        pub const NUMBER: i32 = 2;
    }

    /// `(sebuf.empty_behavior)` values.
    pub mod empty_behavior {
        pub const UNSPEC: i32 = 0;
        pub const PRESERVE: i32 = 1;
        pub const NULL: i32 = 2;
        pub const OMIT: i32 = 3;
    }

    /// `(sebuf.timestamp_format)` values.
    pub mod timestamp_format {
        pub const UNSPEC: i32 = 0;
        pub const RFC3339: i32 = 1;
        pub const UNIX_SECONDS: i32 = 2;
        pub const UNIX_MILLIS: i32 = 3;
        pub const DATE: i32 = 4;
    }

    /// `(sebuf.bytes_encoding)` values.
    pub mod bytes_encoding {
        pub const UNSPEC: i32 = 0;
        pub const BASE64: i32 = 1;
        pub const BASE64_RAW: i32 = 2;
        pub const BASE64URL: i32 = 3;
        pub const BASE64URL_RAW: i32 = 4;
        pub const HEX: i32 = 5;
    }

    /// `HeaderSpec.value_type` values.
    pub mod header_value_type {
        pub const STRING: i32 = 0;
        pub const INTEGER: i32 = 1;
        pub const BOOLEAN: i32 = 2;
        pub const NUMBER: i32 = 3;
    }
}

/// Extract `(http_method, path)` from a method's `(sebuf.http)` annotation.
#[must_use]
pub fn extract_http_pattern(method: &MethodDescriptorProto) -> Option<(&'static str, &str)> {
    let pattern = method
        .options
        .as_ref()
        .and_then(|o| o.http.as_ref())
        .and_then(|h| h.pattern.as_ref())?;

    Some(match pattern {
        HttpPattern::Get(p) => ("GET", p.as_str()),
        HttpPattern::Put(p) => ("PUT", p.as_str()),
        HttpPattern::Post(p) => ("POST", p.as_str()),
        HttpPattern::Delete(p) => ("DELETE", p.as_str()),
        HttpPattern::Patch(p) => ("PATCH", p.as_str()),
    })
}

#[cfg(test)]
mod tests {
    use prost::Message as _;

    use super::*;

    fn method_with_pattern(pattern: HttpPattern) -> MethodDescriptorProto {
        MethodDescriptorProto {
            name: Some("TestMethod".to_string()),
            input_type: Some(".test.v1.Request".to_string()),
            output_type: Some(".test.v1.Response".to_string()),
            options: Some(MethodOptions {
                http: Some(HttpRule {
                    pattern: Some(pattern),
                }),
                headers: vec![],
            }),
        }
    }

    #[test]
    fn extract_get_pattern() {
        let method = method_with_pattern(HttpPattern::Get("/v1/items".to_string()));
        let (http_method, path) = extract_http_pattern(&method).unwrap();
        assert_eq!(http_method, "GET");
        assert_eq!(path, "/v1/items");
    }

    #[test]
    fn extract_post_pattern() {
        let method = method_with_pattern(HttpPattern::Post("/v1/items".to_string()));
        let (http_method, path) = extract_http_pattern(&method).unwrap();
        assert_eq!(http_method, "POST");
        assert_eq!(path, "/v1/items");
    }

    #[test]
    fn returns_none_without_options() {
        let method = MethodDescriptorProto {
            name: Some("NoOptions".to_string()),
            input_type: Some(".test.v1.Request".to_string()),
            output_type: Some(".test.v1.Response".to_string()),
            options: None,
        };
        assert!(extract_http_pattern(&method).is_none());
    }

    #[test]
    fn returns_none_without_pattern() {
        let method = MethodDescriptorProto {
            name: Some("NoPattern".to_string()),
            input_type: Some(".test.v1.Request".to_string()),
            output_type: Some(".test.v1.Response".to_string()),
            options: Some(MethodOptions {
                http: Some(HttpRule { pattern: None }),
                headers: vec![],
            }),
        };
        assert!(extract_http_pattern(&method).is_none());
    }

    #[test]
    fn field_type_constants() {
        assert_eq!(field_type::STRING, 9);
        assert_eq!(field_type::ENUM, 14);
    }

    /// Round-trip: encode → decode a `FileDescriptorSet` with sebuf annotations,
    /// proving extension fields survive a full encode/decode cycle.
    #[test]
    fn descriptor_round_trip() {
        let original = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("test.proto".to_string()),
                package: Some("test.v1".to_string()),
                dependency: vec![],
                message_type: vec![DescriptorProto {
                    name: Some("Req".to_string()),
                    field: vec![FieldDescriptorProto {
                        name: Some("name".to_string()),
                        number: Some(1),
                        label: Some(label::OPTIONAL),
                        r#type: Some(field_type::STRING),
                        type_name: None,
                        json_name: Some("name".to_string()),
                        oneof_index: None,
                        proto3_optional: None,
                        options: Some(FieldOptions {
                            query: None,
                            field_examples: vec!["Ada".to_string()],
                            unwrap: None,
                            int64_encoding: None,
                            enum_encoding: None,
                            nullable: None,
                            empty_behavior: None,
                            timestamp_format: None,
                            bytes_encoding: None,
                            oneof_value: None,
                            flatten: None,
                            flatten_prefix: None,
                            rules: None,
                        }),
                    }],
                    nested_type: vec![],
                    enum_type: vec![],
                    oneof_decl: vec![],
                }],
                enum_type: vec![],
                service: vec![ServiceDescriptorProto {
                    name: Some("Svc".to_string()),
                    method: vec![method_with_pattern(HttpPattern::Post(
                        "/v1/test".to_string(),
                    ))],
                    options: None,
                }],
            }],
        };

        let bytes = original.encode_to_vec();
        let decoded = FileDescriptorSet::decode(bytes.as_slice()).unwrap();
        assert_eq!(original, decoded);
    }
}
