//! The language-agnostic intermediate model (`spec.md` §3).
//!
//! Everything here is built once by [`crate::ingest::build_program`] and
//! never mutated afterward: emitters only ever see `&Program`.

use std::collections::BTreeMap;

/// `google/protobuf/timestamp.proto`'s `Timestamp` message. Never appears
/// among `program.files[].messages` (it has no `.proto` file in this
/// generation run), so any code walking a [`FieldKind::Message`] has to
/// special-case this qualified name rather than look it up like an ordinary
/// message.
pub const WELL_KNOWN_TIMESTAMP: &str = ".google.protobuf.Timestamp";

/// The root of one generation invocation: every input file plus the derived
/// cross-file unwrap table. Owns every [`Message`]/[`Enum`]/[`Service`] in
/// the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub files: Vec<ProtoFile>,
    pub unwrap_table: UnwrapTable,
}

impl Program {
    /// Find a message by its fully-qualified name (`.pkg.Name` or `.pkg.Outer.Inner`).
    #[must_use]
    pub fn find_message(&self, qualified_name: &str) -> Option<&Message> {
        for file in &self.files {
            if let Some(found) = find_message_recursive(&file.messages, qualified_name) {
                return Some(found);
            }
        }
        None
    }

    /// Find an enum by its fully-qualified name.
    #[must_use]
    pub fn find_enum(&self, qualified_name: &str) -> Option<&Enum> {
        for file in &self.files {
            if let Some(found) = find_enum_recursive(&file.messages, &file.enums, qualified_name) {
                return Some(found);
            }
        }
        None
    }
}

fn find_message_recursive<'a>(messages: &'a [Message], qualified_name: &str) -> Option<&'a Message> {
    for message in messages {
        if message.qualified_name == qualified_name {
            return Some(message);
        }
        if let Some(found) = find_message_recursive(&message.nested_messages, qualified_name) {
            return Some(found);
        }
    }
    None
}

fn find_enum_recursive<'a>(
    messages: &'a [Message],
    top_level_enums: &'a [Enum],
    qualified_name: &str,
) -> Option<&'a Enum> {
    for e in top_level_enums {
        if e.qualified_name == qualified_name {
            return Some(e);
        }
    }
    for message in messages {
        for e in &message.nested_enums {
            if e.qualified_name == qualified_name {
                return Some(e);
            }
        }
        if let Some(found) = find_enum_recursive(&message.nested_messages, &[], qualified_name) {
            return Some(found);
        }
    }
    None
}

/// One input `.proto` file: a set of messages, enums, services, imports, and
/// a package namespace. Lifetime is one generation invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoFile {
    pub name: String,
    pub package: String,
    pub dependencies: Vec<String>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    pub services: Vec<Service>,
}

/// Invariant: field numbers unique; field JSON names unique within a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub qualified_name: String,
    pub fields: Vec<Field>,
    pub nested_messages: Vec<Message>,
    pub nested_enums: Vec<Enum>,
    pub oneofs: Vec<Oneof>,
}

impl Message {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    /// Proto3 explicit-presence (`optional T x`).
    Optional,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bool,
    String,
    Bytes,
}

/// What kind of value a field (or a map's value side) holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    /// Fully-qualified message type name.
    Message(String),
    /// Fully-qualified enum type name.
    Enum(String),
    /// Unsupported proto2 group; only ever rejected by the validator.
    Group,
    /// A `map<key, value>` field; `key` is always a scalar per the protobuf
    /// spec, `value` may be any [`FieldKind`].
    Map {
        key: ScalarType,
        value: Box<FieldKind>,
    },
}

/// Name (proto), external JSON name, target (Go-exported) name, cardinality,
/// kind, containing oneof reference, and an [`AnnotationSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub json_name: String,
    pub target_name: String,
    pub number: i32,
    pub cardinality: Cardinality,
    pub kind: FieldKind,
    pub oneof_index: Option<usize>,
    pub annotations: AnnotationSet,
}

impl Field {
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self.kind, FieldKind::Map { .. })
    }

    #[must_use]
    pub fn is_repeated(&self) -> bool {
        matches!(self.cardinality, Cardinality::Repeated) && !self.is_map()
    }
}

/// Name, member fields, optional [`OneofConfig`] annotation. Invariant:
/// exactly one member set at any time; JSON encoding obeys the discriminator
/// contract in `spec.md` §4.5.
#[derive(Debug, Clone, PartialEq)]
pub struct Oneof {
    pub name: String,
    /// Indices into the owning [`Message::fields`].
    pub field_indices: Vec<usize>,
    pub config: Option<OneofConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofConfig {
    pub discriminator: String,
    pub flatten: bool,
}

/// Ordered list of values; each has a name, number, and optional custom JSON
/// string. Invariant: proto names and numbers unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub qualified_name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub custom_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub base_path: Option<String>,
    pub headers: Vec<HeaderSpec>,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub request_type: String,
    pub response_type: String,
    pub http: Option<HttpConfig>,
    pub headers: Vec<HeaderSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub verb: String,
    pub path: String,
    /// Path parameter names extracted from `path`'s `{name}` segments, in
    /// the order they appear.
    pub path_params: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderValueType {
    String,
    Integer,
    Boolean,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpec {
    pub name: String,
    pub value_type: HeaderValueType,
    pub format: Option<String>,
    pub required: bool,
    pub default_value: Option<String>,
}

/// Carries the canonical query parameter name (defaults to the field's
/// proto name), a `required` flag, and a back-reference to the field's kind
/// for emitter-specific rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub param_name: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Int64Encoding {
    #[default]
    Unspecified,
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumEncoding {
    #[default]
    Unspecified,
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyBehavior {
    #[default]
    Unspecified,
    Preserve,
    Null,
    Omit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    #[default]
    Unspecified,
    Rfc3339,
    UnixSeconds,
    UnixMillis,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BytesEncoding {
    #[default]
    Unspecified,
    Base64,
    Base64Raw,
    Base64Url,
    Base64UrlRaw,
    Hex,
}

/// Every annotation a field may carry. `Unspecified`/`None`/`false`/empty
/// values mean "fall through to the canonical proto3 JSON default" and must
/// produce byte-identical output to a proto with no annotation at all (the
/// backward-compatibility invariant in `spec.md` §8).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationSet {
    pub query: Option<QueryConfig>,
    pub unwrap: bool,
    pub int64_encoding: Int64Encoding,
    pub enum_encoding: EnumEncoding,
    pub nullable: bool,
    pub empty_behavior: EmptyBehavior,
    pub timestamp_format: TimestampFormat,
    pub bytes_encoding: BytesEncoding,
    pub flatten: bool,
    pub flatten_prefix: String,
    pub oneof_variant_value: Option<String>,
    pub examples: Vec<String>,
    /// `buf.validate` constraints, read for OpenAPI documentation only
    /// (`spec.md` §4.8) — never enforced by the generator itself.
    pub validate: ValidateConstraints,
}

/// A field's `buf.validate` constraints, translated into the handful of
/// shapes the OpenAPI emitter maps to JSON Schema keywords. All-`None`/empty
/// means the field carries no `buf.validate` rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidateConstraints {
    pub min_len: Option<u64>,
    pub max_len: Option<u64>,
    pub pattern: Option<String>,
    pub email: bool,
    pub uuid: bool,
    pub numeric_gt: Option<f64>,
    pub numeric_gte: Option<f64>,
    pub numeric_lt: Option<f64>,
    pub numeric_lte: Option<f64>,
}

impl ValidateConstraints {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A global per-generation entry for a message that is eligible for unwrap
/// treatment: it has exactly one field marked `unwrap=true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapInfo {
    pub is_root_unwrap: bool,
    pub is_map_valued: bool,
    pub element_type_ref: String,
}

/// A global per-generation map from a message's qualified name to its
/// [`UnwrapInfo`], populated by [`crate::unwrap::collect_global_unwrap_info`]
/// so an unwrap declared in file A can be honored when referenced from file
/// B in the same package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwrapTable {
    entries: BTreeMap<String, UnwrapInfo>,
}

impl UnwrapTable {
    #[must_use]
    pub fn get(&self, qualified_message_name: &str) -> Option<&UnwrapInfo> {
        self.entries.get(qualified_message_name)
    }

    pub fn insert(&mut self, qualified_message_name: String, info: UnwrapInfo) {
        self.entries.insert(qualified_message_name, info);
    }

    #[must_use]
    pub fn is_root_unwrap(&self, qualified_message_name: &str) -> bool {
        self.entries
            .get(qualified_message_name)
            .is_some_and(|info| info.is_root_unwrap)
    }
}

/// What a message's codec plan is (`spec.md` §3/§4.4). A message needing
/// more than one variant at once is rejected by the validator before this is
/// produced (at most one `CodecPlan` per message).
#[derive(Debug, Clone, PartialEq)]
pub enum CodecPlan {
    None,
    Int64Number(Vec<String>),
    /// Field names whose enum type needs custom string/number JSON handling.
    EnumEncoding(Vec<String>),
    Nullable(Vec<String>),
    EmptyBehavior(Vec<(String, EmptyBehavior)>),
    Timestamp(Vec<(String, TimestampFormat)>),
    Bytes(Vec<(String, BytesEncoding)>),
    Unwrap {
        field: String,
        is_map_valued: bool,
    },
    OneofDiscriminator {
        oneof: String,
        flatten: bool,
    },
    Flatten(Vec<(String, String)>),
}

/// A standalone, message-independent codec plan for one enum type: does its
/// JSON representation need a custom `MarshalJSON`/`UnmarshalJSON` at all,
/// and is it numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumCodecPlan {
    pub has_custom_values: bool,
    pub numeric: bool,
}

impl EnumCodecPlan {
    #[must_use]
    pub fn needs_custom_codec(self) -> bool {
        self.has_custom_values || self.numeric
    }
}

/// Per-generation codec plans: one entry per message that needs a synthetic
/// codec, one entry per enum that needs one. Messages/enums absent from
/// these maps use the canonical proto3 JSON codec unmodified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodecPlans {
    pub messages: BTreeMap<String, CodecPlan>,
    pub enums: BTreeMap<String, EnumCodecPlan>,
}

impl CodecPlans {
    #[must_use]
    pub fn message_plan(&self, qualified_name: &str) -> &CodecPlan {
        self.messages.get(qualified_name).unwrap_or(&CodecPlan::None)
    }

    #[must_use]
    pub fn enum_plan(&self, qualified_name: &str) -> Option<EnumCodecPlan> {
        self.enums.get(qualified_name).copied()
    }
}
