use pretty_assertions::assert_eq;
use sebuf_driver::{Emitter, PluginOptions};
use sebuf_gen_client_ts::ClientTsEmitter;
use sebuf_model::model::{AnnotationSet, Cardinality, FieldKind, Int64Encoding, ScalarType};
use sebuf_model::test_support::*;

fn build(program: sebuf_model::model::Program) -> (sebuf_model::model::Program, sebuf_model::model::CodecPlans) {
    let mut program = program;
    program.unwrap_table = sebuf_model::unwrap::collect_global_unwrap_info(&program).unwrap();
    sebuf_model::validate::validate_program(&program).unwrap();
    let plans = sebuf_model::codec_plan::build_codec_plans(&program);
    (program, plans)
}

#[test]
fn renders_nullable_field_as_union_with_null() {
    let field = make_annotated_field(
        "middle_name",
        1,
        FieldKind::Scalar(ScalarType::String),
        Cardinality::Optional,
        AnnotationSet {
            nullable: true,
            ..Default::default()
        },
    );
    let message = make_message("Person", ".pkg.v1.Person", vec![field]);
    let method = make_method("GetPerson", ".pkg.v1.Person", ".pkg.v1.Person", None);
    let service = make_service("PersonService", None, vec![method]);
    let program = make_program("pkg.v1", vec![message], vec![], vec![service]);
    let (program, plans) = build(program);

    let files = ClientTsEmitter
        .emit(&program, &plans, &["pkg_v1.proto".to_string()], &PluginOptions::default())
        .unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].content.contains("export interface Person"));
    assert!(files[0].content.contains("middleName: string | null;"));
    assert!(files[0].content.contains("export class PersonServiceClient"));
}

#[test]
fn renders_discriminated_union_for_flatten_oneof() {
    let text_field = make_field("text", 1, FieldKind::Scalar(ScalarType::String), Cardinality::Singular);
    let image_field = make_field("image", 2, FieldKind::Scalar(ScalarType::String), Cardinality::Singular);
    let config = sebuf_model::model::OneofConfig {
        discriminator: "type".to_string(),
        flatten: false,
    };
    let message = make_message_with_oneof(
        "Content",
        ".pkg.v1.Content",
        vec![text_field, image_field],
        "payload",
        vec![0, 1],
        Some(config),
    );
    let program = make_program("pkg.v1", vec![message], vec![], vec![]);
    let (program, _plans) = build(program);

    let ts = sebuf_gen_client_ts::types::render_message_declarations(&program.files[0].messages[0], &program);
    assert!(ts.contains("export type Content_payload ="));
    assert!(ts.contains("{ type: \"text\"; text: string }"));
    assert!(ts.contains("{ type: \"image\"; image: string }"));
}

/// Int64 NUMBER round-trip: the field's default TS type (`string`, honoring
/// proto3 JSON's canonical quoted-int64 default) switches to `number` only
/// when the field is explicitly annotated `int64_encoding=NUMBER`.
#[test]
fn int64_field_type_depends_on_encoding_annotation() {
    let default_field = make_field("id", 1, FieldKind::Scalar(ScalarType::Int64), Cardinality::Singular);
    let number_field = make_annotated_field(
        "id",
        1,
        FieldKind::Scalar(ScalarType::Int64),
        Cardinality::Singular,
        AnnotationSet {
            int64_encoding: Int64Encoding::Number,
            ..Default::default()
        },
    );
    let program = make_program("pkg.v1", vec![], vec![], vec![]);

    assert_eq!(sebuf_gen_client_ts::types::ts_field_type(&default_field, &program), "string");
    assert_eq!(sebuf_gen_client_ts::types::ts_field_type(&number_field, &program), "number");
}

#[test]
fn enum_renders_as_a_string_literal_union_of_its_own_names() {
    let e = make_enum("Status", ".pkg.v1.Status", vec![("ACTIVE", 0, None), ("INACTIVE", 1, None)]);
    let ts = sebuf_gen_client_ts::types::render_enum_declaration(&e);
    assert_eq!(ts, "export type Status = \"ACTIVE\" | \"INACTIVE\";\n");
}

#[test]
fn enum_with_custom_value_mapping_uses_the_custom_string_in_the_union() {
    let e = make_enum("Status", ".pkg.v1.Status", vec![("ACTIVE", 0, Some("on")), ("INACTIVE", 1, Some("off"))]);
    let ts = sebuf_gen_client_ts::types::render_enum_declaration(&e);
    assert_eq!(ts, "export type Status = \"on\" | \"off\";\n");
}

#[test]
fn unwrap_root_message_call_site_returns_the_element_array_type() {
    let bars = make_annotated_field(
        "bars",
        1,
        FieldKind::Message(".pkg.v1.OptionBar".to_string()),
        Cardinality::Repeated,
        AnnotationSet {
            unwrap: true,
            ..Default::default()
        },
    );
    let option_bar = make_message(
        "OptionBar",
        ".pkg.v1.OptionBar",
        vec![make_field("strike", 1, FieldKind::Scalar(ScalarType::String), Cardinality::Singular)],
    );
    let list = make_message("OptionBarsList", ".pkg.v1.OptionBarsList", vec![bars]);
    let method = make_method("ListBars", ".pkg.v1.OptionBarsList", ".pkg.v1.OptionBarsList", None);
    let service = make_service("OptionService", None, vec![method]);
    let mut program = make_program("pkg.v1", vec![list, option_bar], vec![], vec![service]);
    program.unwrap_table = sebuf_model::unwrap::collect_global_unwrap_info(&program).unwrap();

    let files = ClientTsEmitter
        .emit(
            &program,
            &sebuf_model::model::CodecPlans::default(),
            &["pkg_v1.proto".to_string()],
            &PluginOptions::default(),
        )
        .unwrap();

    // The call site's declared return type is the unwrapped element array,
    // not the `OptionBarsList` wrapper type — it matches the `{"bars":[...]}`
    // shape the server/client-go codecs actually put on the wire.
    assert!(files[0].content.contains("Promise<OptionBar[]>"));
}
