//! Synthesizes `MarshalJSON`/`UnmarshalJSON` Go source for every
//! [`CodecPlan`] variant (`spec.md` §4.5's codec synthesis table). Factored
//! out of the route/handler renderer so `sebuf-gen-client-go` can call these
//! same functions and get byte-identical codec text without duplicating the
//! table.

use sebuf_model::model::{BytesEncoding, CodecPlan, CodecPlans, EmptyBehavior, Enum, Message, TimestampFormat};

use crate::naming::go_type_name;

/// Render the synthetic `MarshalJSON`/`UnmarshalJSON` pair for `message`, or
/// `None` if its plan is [`CodecPlan::None`] (use the canonical codec
/// unmodified).
#[must_use]
pub fn render_message_codec(message: &Message, plans: &CodecPlans) -> Option<String> {
    let plan = plans.message_plan(&message.qualified_name);
    if *plan == CodecPlan::None {
        return None;
    }
    let type_name = go_type_name(&message.qualified_name);
    let (marshal_body, unmarshal_body) = render_plan_bodies(message, plan, &type_name);
    Some(format!(
        "func (m *{type_name}) MarshalJSON() ([]byte, error) {{\n{marshal_body}}}\n\n\
         func (m *{type_name}) UnmarshalJSON(b []byte) error {{\n{unmarshal_body}}}\n"
    ))
}

/// Render the synthetic enum codec for `e`: every enum needs one, since Go's
/// plain `int32`-backed enum type has no string-name JSON representation of
/// its own and proto3 JSON's canonical default is the value's name, not its
/// number. An enum with no custom `enum_value` mappings still gets this
/// codec; it just maps each value to its own proto name.
#[must_use]
pub fn render_enum_codec(e: &Enum) -> String {
    let type_name = go_type_name(&e.qualified_name);
    let mut to_json = String::new();
    let mut from_json = String::new();
    for value in &e.values {
        let custom = value.custom_json.clone().unwrap_or_else(|| value.name.clone());
        to_json.push_str(&format!(
            "\tcase {type_name}_{name}:\n\t\treturn []byte(`\"{custom}\"`), nil\n",
            name = value.name
        ));
        from_json.push_str(&format!(
            "\tcase \"{custom}\", \"{name}\":\n\t\t*v = {type_name}_{name}\n\t\treturn nil\n",
            name = value.name
        ));
    }
    format!(
        "func (v {type_name}) MarshalJSON() ([]byte, error) {{\n\
         \tswitch v {{\n{to_json}\tdefault:\n\t\treturn []byte(strconv.FormatInt(int64(v), 10)), nil\n\t}}\n}}\n\n\
         func (v *{type_name}) UnmarshalJSON(b []byte) error {{\n\
         \tvar s string\n\
         \tif err := json.Unmarshal(b, &s); err == nil {{\n\
         \t\tswitch s {{\n{from_json}\t\t}}\n\
         \t\treturn fmt.Errorf(\"unknown {type_name} value %q\", s)\n\
         \t}}\n\
         \tvar n int64\n\
         \tif err := json.Unmarshal(b, &n); err != nil {{\n\
         \t\treturn err\n\
         \t}}\n\
         \t*v = {type_name}(n)\n\
         \treturn nil\n}}\n"
    )
}

fn render_plan_bodies(message: &Message, plan: &CodecPlan, type_name: &str) -> (String, String) {
    match plan {
        CodecPlan::None => (String::new(), String::new()),
        CodecPlan::Int64Number(fields) => int64_number_bodies(message, type_name, fields),
        CodecPlan::EnumEncoding(fields) => enum_encoding_bodies(message, type_name, fields),
        CodecPlan::Nullable(fields) => nullable_bodies(message, type_name, fields),
        CodecPlan::EmptyBehavior(fields) => empty_behavior_bodies(message, type_name, fields),
        CodecPlan::Timestamp(fields) => timestamp_bodies(message, type_name, fields),
        CodecPlan::Bytes(fields) => bytes_bodies(message, type_name, fields),
        CodecPlan::Unwrap { field, is_map_valued } => unwrap_bodies(message, type_name, field, *is_map_valued),
        CodecPlan::OneofDiscriminator { oneof, flatten } => {
            oneof_discriminator_bodies(message, type_name, oneof, *flatten)
        }
        CodecPlan::Flatten(fields) => flatten_bodies(message, type_name, fields),
    }
}

fn raw_map_preamble(type_name: &str) -> String {
    format!(
        "\ttype alias {type_name}\n\
         \tbaseJSON, err := json.Marshal((*alias)(m))\n\
         \tif err != nil {{\n\t\treturn nil, err\n\t}}\n\
         \tdata := map[string]json.RawMessage{{}}\n\
         \tif err := json.Unmarshal(baseJSON, &data); err != nil {{\n\t\treturn nil, err\n\t}}\n"
    )
}

fn raw_map_epilogue() -> &'static str {
    "\treturn json.Marshal(data)\n"
}

fn raw_map_unmarshal_preamble() -> &'static str {
    "\tdata := map[string]json.RawMessage{}\n\
     \tif err := json.Unmarshal(b, &data); err != nil {\n\t\treturn err\n\t}\n"
}

fn raw_map_unmarshal_epilogue(type_name: &str) -> String {
    format!(
        "\trewritten, err := json.Marshal(data)\n\
         \tif err != nil {{\n\t\treturn err\n\t}}\n\
         \ttype alias {type_name}\n\
         \treturn json.Unmarshal(rewritten, (*alias)(m))\n"
    )
}

fn int64_number_bodies(message: &Message, type_name: &str, fields: &[String]) -> (String, String) {
    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    for name in fields {
        let json_name = json_name_of(message, name);
        marshal.push_str(&format!(
            "\t// generation-time warning: {json_name} may lose precision above 2^53 in JavaScript\n\
             \tif raw, ok := data[\"{json_name}\"]; ok {{\n\
             \t\tvar quoted string\n\
             \t\tif err := json.Unmarshal(raw, &quoted); err == nil {{\n\
             \t\t\tdata[\"{json_name}\"] = json.RawMessage(quoted)\n\t\t}}\n\t}}\n"
        ));
        unmarshal.push_str(&format!(
            "\tif raw, ok := data[\"{json_name}\"]; ok {{\n\
             \t\tdata[\"{json_name}\"] = json.RawMessage(`\"` + string(raw) + `\"`)\n\t}}\n"
        ));
    }
    marshal.push_str(raw_map_epilogue());
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

fn enum_encoding_bodies(message: &Message, type_name: &str, fields: &[String]) -> (String, String) {
    // Field-level NUMBER encoding just forces the enum through its integer
    // representation; the enum's own MarshalJSON/UnmarshalJSON (see
    // `render_enum_codec`) already knows how to fall back to a numeric
    // literal, so the message codec only needs to force that path.
    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    for name in fields {
        let json_name = json_name_of(message, name);
        marshal.push_str(&format!(
            "\tif raw, ok := data[\"{json_name}\"]; ok {{\n\
             \t\tvar n int64\n\
             \t\tif err := json.Unmarshal(raw, &n); err == nil {{\n\
             \t\t\tdata[\"{json_name}\"] = json.RawMessage(strconv.FormatInt(n, 10))\n\t\t}}\n\t}}\n"
        ));
        unmarshal.push_str(&format!("\t_ = data[\"{json_name}\"] // decoded via the enum's own UnmarshalJSON\n"));
    }
    marshal.push_str(raw_map_epilogue());
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

fn nullable_bodies(message: &Message, type_name: &str, fields: &[String]) -> (String, String) {
    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    for name in fields {
        let field = message.field(name).expect("planned field exists");
        let json_name = &field.json_name;
        let target = &field.target_name;
        marshal.push_str(&format!(
            "\tif m.{target} == nil {{\n\t\tdata[\"{json_name}\"] = json.RawMessage(\"null\")\n\t}}\n"
        ));
        unmarshal.push_str(&format!(
            "\tif raw, ok := data[\"{json_name}\"]; ok && string(raw) == \"null\" {{\n\t\tdelete(data, \"{json_name}\")\n\t}}\n"
        ));
    }
    marshal.push_str(raw_map_epilogue());
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

fn empty_behavior_bodies(message: &Message, type_name: &str, fields: &[(String, EmptyBehavior)]) -> (String, String) {
    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    for (name, behavior) in fields {
        let field = message.field(name).expect("planned field exists");
        let json_name = &field.json_name;
        let target = &field.target_name;
        match behavior {
            EmptyBehavior::Null => {
                marshal.push_str(&format!(
                    "\tif m.{target} != nil && isZeroMessage(m.{target}) {{\n\t\tdata[\"{json_name}\"] = json.RawMessage(\"null\")\n\t}}\n"
                ));
                unmarshal.push_str(&format!(
                    "\tif raw, ok := data[\"{json_name}\"]; ok && string(raw) == \"null\" {{\n\t\tdata[\"{json_name}\"] = json.RawMessage(\"{{}}\")\n\t}}\n"
                ));
            }
            EmptyBehavior::Omit => {
                marshal.push_str(&format!(
                    "\tif m.{target} != nil && isZeroMessage(m.{target}) {{\n\t\tdelete(data, \"{json_name}\")\n\t}}\n"
                ));
            }
            EmptyBehavior::Preserve | EmptyBehavior::Unspecified => {}
        }
    }
    marshal.push_str(raw_map_epilogue());
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

// `*timestamppb.Timestamp` is a plain generated protobuf message (`Seconds
// int64`, `Nanos int32`); it has no `MarshalJSON`/`UnmarshalJSON` of its own,
// so its stdlib default JSON shape is `{"seconds":...,"nanos":...}`, not
// RFC 3339. Every format below — including the canonical default — therefore
// needs an active codec: marshal writes the wire representation straight
// into `data`, and unmarshal parses it back into a `time.Time` and assigns
// `m.{target}` directly via `timestamppb.New`, deleting the key from `data`
// so the final alias round-trip never sees it (the alias's default
// unmarshal can't consume anything but the `{"seconds":...}` shape).
fn timestamp_bodies(message: &Message, type_name: &str, fields: &[(String, TimestampFormat)]) -> (String, String) {
    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    for (name, format) in fields {
        let field = message.field(name).expect("planned field exists");
        let json_name = &field.json_name;
        let target = &field.target_name;
        match format {
            TimestampFormat::UnixSeconds => {
                marshal.push_str(&format!(
                    "\tif m.{target} != nil {{\n\t\tdata[\"{json_name}\"] = json.RawMessage(strconv.FormatInt(m.{target}.AsTime().Unix(), 10))\n\t}}\n"
                ));
                unmarshal.push_str(&format!(
                    "\tif raw, ok := data[\"{json_name}\"]; ok {{\n\t\tvar secs int64\n\t\tif err := json.Unmarshal(raw, &secs); err == nil {{\n\t\t\tm.{target} = timestamppb.New(time.Unix(secs, 0).UTC())\n\t\t}}\n\t\tdelete(data, \"{json_name}\")\n\t}}\n"
                ));
            }
            TimestampFormat::UnixMillis => {
                marshal.push_str(&format!(
                    "\tif m.{target} != nil {{\n\t\tdata[\"{json_name}\"] = json.RawMessage(strconv.FormatInt(m.{target}.AsTime().UnixMilli(), 10))\n\t}}\n"
                ));
                unmarshal.push_str(&format!(
                    "\tif raw, ok := data[\"{json_name}\"]; ok {{\n\t\tvar millis int64\n\t\tif err := json.Unmarshal(raw, &millis); err == nil {{\n\t\t\tm.{target} = timestamppb.New(time.UnixMilli(millis).UTC())\n\t\t}}\n\t\tdelete(data, \"{json_name}\")\n\t}}\n"
                ));
            }
            TimestampFormat::Date => {
                marshal.push_str(&format!(
                    "\tif m.{target} != nil {{\n\t\tdata[\"{json_name}\"] = json.RawMessage(`\"` + m.{target}.AsTime().UTC().Format(\"2006-01-02\") + `\"`)\n\t}}\n"
                ));
                unmarshal.push_str(&format!(
                    "\tif raw, ok := data[\"{json_name}\"]; ok {{\n\t\tvar s string\n\t\tif err := json.Unmarshal(raw, &s); err == nil {{\n\t\t\tif t, err := time.Parse(\"2006-01-02\", s); err == nil {{\n\t\t\t\tm.{target} = timestamppb.New(t)\n\t\t\t}}\n\t\t}}\n\t\tdelete(data, \"{json_name}\")\n\t}}\n"
                ));
            }
            TimestampFormat::Rfc3339 | TimestampFormat::Unspecified => {
                marshal.push_str(&format!(
                    "\tif m.{target} != nil {{\n\t\tquoted, _ := json.Marshal(m.{target}.AsTime().UTC().Format(time.RFC3339Nano))\n\t\tdata[\"{json_name}\"] = quoted\n\t}}\n"
                ));
                unmarshal.push_str(&format!(
                    "\tif raw, ok := data[\"{json_name}\"]; ok {{\n\t\tvar s string\n\t\tif err := json.Unmarshal(raw, &s); err == nil {{\n\t\t\tif t, err := time.Parse(time.RFC3339Nano, s); err == nil {{\n\t\t\t\tm.{target} = timestamppb.New(t)\n\t\t\t}}\n\t\t}}\n\t\tdelete(data, \"{json_name}\")\n\t}}\n"
                ));
            }
        }
    }
    marshal.push_str(raw_map_epilogue());
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

fn bytes_bodies(message: &Message, type_name: &str, fields: &[(String, BytesEncoding)]) -> (String, String) {
    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    for (name, encoding) in fields {
        let field = message.field(name).expect("planned field exists");
        let json_name = &field.json_name;
        let target = &field.target_name;
        let (encoder, decoder) = bytes_encoder_decoder(*encoding);
        marshal.push_str(&format!(
            "\tif m.{target} != nil {{\n\t\tencoded, _ := json.Marshal({encoder}(m.{target}))\n\t\tdata[\"{json_name}\"] = encoded\n\t}}\n"
        ));
        unmarshal.push_str(&format!(
            "\tif raw, ok := data[\"{json_name}\"]; ok {{\n\t\tvar s string\n\t\tif err := json.Unmarshal(raw, &s); err == nil {{\n\t\t\tif decoded, err := {decoder}(s); err == nil {{\n\t\t\t\tquoted, _ := json.Marshal(base64.StdEncoding.EncodeToString(decoded))\n\t\t\t\tdata[\"{json_name}\"] = quoted\n\t\t\t}}\n\t\t}}\n\t}}\n"
        ));
    }
    marshal.push_str(raw_map_epilogue());
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

fn bytes_encoder_decoder(encoding: BytesEncoding) -> (&'static str, &'static str) {
    match encoding {
        BytesEncoding::Base64UrlRaw => ("base64.RawURLEncoding.EncodeToString", "base64.RawURLEncoding.DecodeString"),
        BytesEncoding::Base64Url => ("base64.URLEncoding.EncodeToString", "base64.URLEncoding.DecodeString"),
        BytesEncoding::Base64Raw => ("base64.RawStdEncoding.EncodeToString", "base64.RawStdEncoding.DecodeString"),
        BytesEncoding::Hex => ("hex.EncodeToString", "hex.DecodeString"),
        BytesEncoding::Base64 | BytesEncoding::Unspecified => {
            ("base64.StdEncoding.EncodeToString", "base64.StdEncoding.DecodeString")
        }
    }
}

fn unwrap_bodies(message: &Message, type_name: &str, field: &str, is_map_valued: bool) -> (String, String) {
    let f = message.field(field).expect("planned field exists");
    let target = &f.target_name;
    if is_map_valued {
        // The containing map's value type is this message; the map itself
        // carries the flattened-array shape, this message's own codec is a
        // pass-through so its own struct still round-trips when used on its
        // own (e.g. inside a non-map context).
        let marshal = format!("\treturn json.Marshal(m.{target})\n");
        let unmarshal = format!(
            "\tvar items []json.RawMessage\n\
             \tif err := json.Unmarshal(b, &items); err != nil {{\n\t\treturn err\n\t}}\n\
             \traw, err := json.Marshal(items)\n\
             \tif err != nil {{\n\t\treturn err\n\t}}\n\
             \treturn json.Unmarshal(raw, &m.{target})\n"
        );
        (marshal, unmarshal)
    } else {
        let marshal = format!("\treturn json.Marshal(m.{target})\n");
        let unmarshal = format!("\treturn json.Unmarshal(b, &m.{target})\n");
        let _ = type_name;
        (marshal, unmarshal)
    }
}

fn oneof_discriminator_bodies(message: &Message, type_name: &str, oneof_name: &str, flatten: bool) -> (String, String) {
    let oneof = message.oneofs.iter().find(|o| o.name == oneof_name).expect("planned oneof exists");
    let discriminator = oneof
        .config
        .as_ref()
        .map(|c| c.discriminator.clone())
        .unwrap_or_else(|| "type".to_string());

    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    marshal.push_str("\tswitch {\n");
    unmarshal.push_str(&format!(
        "\tvar discriminator struct {{ Type string `json:\"{discriminator}\"` }}\n\
         \tif err := json.Unmarshal(b, &discriminator); err != nil {{\n\t\treturn err\n\t}}\n\
         \tswitch discriminator.Type {{\n"
    ));

    for &idx in &oneof.field_indices {
        let field = &message.fields[idx];
        let variant_value = sebuf_model::annotations::get_oneof_variant_value(field);
        let target = &field.target_name;
        let json_name = &field.json_name;

        if flatten {
            marshal.push_str(&format!(
                "\tcase m.{target} != nil:\n\
                 \t\tdelete(data, \"{json_name}\")\n\
                 \t\tvariantJSON, err := json.Marshal(m.{target})\n\
                 \t\tif err != nil {{\n\t\t\treturn nil, err\n\t\t}}\n\
                 \t\tvariantData := map[string]json.RawMessage{{}}\n\
                 \t\tif err := json.Unmarshal(variantJSON, &variantData); err != nil {{\n\t\t\treturn nil, err\n\t\t}}\n\
                 \t\tfor k, v := range variantData {{\n\t\t\tdata[k] = v\n\t\t}}\n\
                 \t\tquoted, _ := json.Marshal(\"{variant_value}\")\n\
                 \t\tdata[\"{discriminator}\"] = quoted\n"
            ));
            unmarshal.push_str(&format!(
                "\tcase \"{variant_value}\":\n\
                 \t\tvariantJSON, err := json.Marshal(data)\n\
                 \t\tif err != nil {{\n\t\t\treturn err\n\t\t}}\n\
                 \t\treturn json.Unmarshal(variantJSON, &m.{target})\n"
            ));
        } else {
            marshal.push_str(&format!(
                "\tcase m.{target} != nil:\n\
                 \t\tquoted, _ := json.Marshal(\"{variant_value}\")\n\
                 \t\tdata[\"{discriminator}\"] = quoted\n"
            ));
            unmarshal.push_str(&format!(
                "\tcase \"{variant_value}\":\n\
                 \t\tif raw, ok := data[\"{json_name}\"]; ok {{\n\t\t\treturn json.Unmarshal(raw, &m.{target})\n\t\t}}\n\
                 \t\treturn nil\n"
            ));
        }
    }
    marshal.push_str("\tdefault:\n\t\t// oneof unset, no discriminator\n\t}\n");
    unmarshal.push_str(&format!(
        "\tdefault:\n\t\treturn fmt.Errorf(\"unknown {type_name} discriminator %q\", discriminator.Type)\n\t}}\n"
    ));
    marshal.push_str(raw_map_epilogue());

    // The switch above already returns for every matched variant; add the
    // alias round-trip as an unreachable fallback to keep the function's
    // control flow well-typed.
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

fn flatten_bodies(message: &Message, type_name: &str, fields: &[(String, String)]) -> (String, String) {
    let mut marshal = raw_map_preamble(type_name);
    let mut unmarshal = raw_map_unmarshal_preamble().to_string();
    for (name, prefix) in fields {
        let field = message.field(name).expect("planned field exists");
        let json_name = &field.json_name;
        let target = &field.target_name;
        marshal.push_str(&format!(
            "\tdelete(data, \"{json_name}\")\n\
             \tif m.{target} != nil {{\n\
             \t\tchildJSON, err := json.Marshal(m.{target})\n\
             \t\tif err != nil {{\n\t\t\treturn nil, err\n\t\t}}\n\
             \t\tchildData := map[string]json.RawMessage{{}}\n\
             \t\tif err := json.Unmarshal(childJSON, &childData); err != nil {{\n\t\t\treturn nil, err\n\t\t}}\n\
             \t\tfor k, v := range childData {{\n\t\t\tdata[\"{prefix}\"+k] = v\n\t\t}}\n\t}}\n"
        ));
        unmarshal.push_str(&format!(
            "\tchildData := map[string]json.RawMessage{{}}\n\
             \tfor k, v := range data {{\n\
             \t\tif strings.HasPrefix(k, \"{prefix}\") {{\n\
             \t\t\tchildData[strings.TrimPrefix(k, \"{prefix}\")] = v\n\
             \t\t\tdelete(data, k)\n\t\t}}\n\t}}\n\
             \tif len(childData) > 0 {{\n\
             \t\tchildJSON, err := json.Marshal(childData)\n\
             \t\tif err != nil {{\n\t\t\treturn err\n\t\t}}\n\
             \t\tif err := json.Unmarshal(childJSON, &m.{target}); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t}}\n"
        ));
    }
    marshal.push_str(raw_map_epilogue());
    unmarshal.push_str(&raw_map_unmarshal_epilogue(type_name));
    (marshal, unmarshal)
}

fn json_name_of(message: &Message, proto_name: &str) -> String {
    message
        .field(proto_name)
        .map(|f| f.json_name.clone())
        .unwrap_or_else(|| proto_name.to_string())
}
