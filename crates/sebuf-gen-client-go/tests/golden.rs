use pretty_assertions::assert_eq;
use sebuf_driver::{Emitter, PluginOptions};
use sebuf_gen_client_go::ClientGoEmitter;
use sebuf_gen_server::ServerEmitter;
use sebuf_model::model::{AnnotationSet, Cardinality, FieldKind, Int64Encoding, ScalarType, TimestampFormat, WELL_KNOWN_TIMESTAMP};
use sebuf_model::test_support::*;

fn build(program: sebuf_model::model::Program) -> (sebuf_model::model::Program, sebuf_model::model::CodecPlans) {
    let mut program = program;
    program.unwrap_table = sebuf_model::unwrap::collect_global_unwrap_info(&program).unwrap();
    sebuf_model::validate::validate_program(&program).unwrap();
    let plans = sebuf_model::codec_plan::build_codec_plans(&program);
    (program, plans)
}

/// The server and client-go emitters must produce byte-identical
/// `MarshalJSON`/`UnmarshalJSON` methods for the same message, since both
/// call into `sebuf_gen_server::codec` directly.
#[test]
fn server_and_client_codecs_are_byte_identical() {
    let field = make_annotated_field(
        "id",
        1,
        FieldKind::Scalar(ScalarType::Int64),
        Cardinality::Singular,
        AnnotationSet {
            int64_encoding: Int64Encoding::Number,
            ..Default::default()
        },
    );
    let message = make_message("Tweet", ".pkg.v1.Tweet", vec![field]);
    let method = make_method("GetTweet", ".pkg.v1.Tweet", ".pkg.v1.Tweet", None);
    let service = make_service("TweetService", None, vec![method]);
    let program = make_program("pkg.v1", vec![message], vec![], vec![service]);
    let (program, plans) = build(program);

    let server_files = ServerEmitter
        .emit(&program, &plans, &["pkg_v1.proto".to_string()], &PluginOptions::default())
        .unwrap();
    let client_files = ClientGoEmitter
        .emit(&program, &plans, &["pkg_v1.proto".to_string()], &PluginOptions::default())
        .unwrap();

    let server_codec = extract_codec_block(&server_files[0].content);
    let client_codec = extract_codec_block(&client_files[0].content);
    assert_eq!(server_codec, client_codec);
}

fn extract_codec_block(content: &str) -> &str {
    let start = content.find("func (m *Tweet) MarshalJSON").expect("codec present");
    let end = content.find("\ntype ").unwrap_or(content.len());
    let service_start = content.find("type TweetServiceServer").unwrap_or(content.len());
    let client_start = content.find("type TweetServiceClient").unwrap_or(content.len());
    let boundary = end.min(service_start).min(client_start);
    &content[start..boundary]
}

/// Int64 NUMBER round-trip: the struct tag carries the base `,string` quoting
/// and the synthetic codec strips/re-adds the quotes around `id`, on the
/// client the same as the server (both call the same `sebuf-gen-server`
/// codec renderer).
#[test]
fn client_int64_number_field_matches_server_quoting() {
    let field = make_annotated_field(
        "id",
        1,
        FieldKind::Scalar(ScalarType::Int64),
        Cardinality::Singular,
        AnnotationSet {
            int64_encoding: Int64Encoding::Number,
            ..Default::default()
        },
    );
    let message = make_message("Tweet", ".pkg.v1.Tweet", vec![field]);
    let method = make_method("GetTweet", ".pkg.v1.Tweet", ".pkg.v1.Tweet", None);
    let service = make_service("TweetService", None, vec![method]);
    let program = make_program("pkg.v1", vec![message], vec![], vec![service]);
    let (program, plans) = build(program);

    let client_files = ClientGoEmitter
        .emit(&program, &plans, &["pkg_v1.proto".to_string()], &PluginOptions::default())
        .unwrap();

    let content = &client_files[0].content;
    assert!(content.contains("Id int64 `json:\"id,string\"`"));
    assert!(content.contains("data[\"id\"] = json.RawMessage(quoted)"));
}

/// The client emits a correctly-importable, non-`*Timestamp` type for
/// `.google.protobuf.Timestamp` fields, with the same RFC 3339 codec as the
/// server.
#[test]
fn client_timestamp_field_gets_real_type_and_codec() {
    let field = make_annotated_field(
        "created_at",
        1,
        FieldKind::Message(WELL_KNOWN_TIMESTAMP.to_string()),
        Cardinality::Singular,
        AnnotationSet {
            timestamp_format: TimestampFormat::Rfc3339,
            ..Default::default()
        },
    );
    let message = make_message("Event", ".pkg.v1.Event", vec![field]);
    let method = make_method("GetEvent", ".pkg.v1.Event", ".pkg.v1.Event", None);
    let service = make_service("EventService", None, vec![method]);
    let program = make_program("pkg.v1", vec![message], vec![], vec![service]);
    let (program, plans) = build(program);

    let client_files = ClientGoEmitter
        .emit(&program, &plans, &["pkg_v1.proto".to_string()], &PluginOptions::default())
        .unwrap();

    let content = &client_files[0].content;
    assert!(content.contains("\"google.golang.org/protobuf/types/known/timestamppb\""));
    assert!(content.contains("CreatedAt *timestamppb.Timestamp `json:\"createdAt\"`"));
    assert!(content.contains("m.CreatedAt = timestamppb.New(t)"));
}

#[test]
fn client_enum_without_custom_values_still_gets_a_name_codec() {
    let e = make_enum("Status", ".pkg.v1.Status", vec![("ACTIVE", 0, None)]);
    let field = make_field("status", 1, FieldKind::Enum(".pkg.v1.Status".to_string()), Cardinality::Singular);
    let message = make_message("Account", ".pkg.v1.Account", vec![field]);
    let method = make_method("GetAccount", ".pkg.v1.Account", ".pkg.v1.Account", None);
    let service = make_service("AccountService", None, vec![method]);
    let program = make_program("pkg.v1", vec![message], vec![e], vec![service]);
    let (program, plans) = build(program);

    let client_files = ClientGoEmitter
        .emit(&program, &plans, &["pkg_v1.proto".to_string()], &PluginOptions::default())
        .unwrap();

    assert!(client_files[0].content.contains("case Status_ACTIVE:\n\t\treturn []byte(`\"ACTIVE\"`), nil"));
}
