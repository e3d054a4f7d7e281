//! Cross-file unwrap resolution (`spec.md` §4.2): the one analysis in the
//! annotation model that needs knowledge of every input file at once, so it
//! runs as a dedicated pre-pass before validation or codec planning.

use crate::annotations::get_unwrap_field;
use crate::error::Result;
use crate::model::{Field, FieldKind, Message, Program, ScalarType, UnwrapInfo, UnwrapTable};

/// Walk every message across every file, in input order, and record root-
/// unwrap status for each. A message is root-unwrap when exactly one field
/// carries `unwrap=true` (and that field is repeated — enforced by
/// [`get_unwrap_field`]). Errors abort immediately; no partial table is
/// returned on failure.
pub fn collect_global_unwrap_info(program: &Program) -> Result<UnwrapTable> {
    let mut table = UnwrapTable::default();
    for file in &program.files {
        collect_from_messages(&file.messages, &mut table)?;
    }
    Ok(table)
}

fn collect_from_messages(messages: &[Message], table: &mut UnwrapTable) -> Result<()> {
    for message in messages {
        if let Some(field) = get_unwrap_field(message)? {
            table.insert(message.qualified_name.clone(), unwrap_info_for(field));
        }
        collect_from_messages(&message.nested_messages, table)?;
    }
    Ok(())
}

fn unwrap_info_for(field: &Field) -> UnwrapInfo {
    let is_map_valued = field.is_map();
    let element_type_ref = element_type_ref(field);
    UnwrapInfo {
        is_root_unwrap: true,
        is_map_valued,
        element_type_ref,
    }
}

fn element_type_ref(field: &Field) -> String {
    match &field.kind {
        FieldKind::Scalar(s) => scalar_type_ref(*s),
        FieldKind::Message(name) | FieldKind::Enum(name) => name.clone(),
        FieldKind::Group => String::new(),
        FieldKind::Map { value, .. } => match value.as_ref() {
            FieldKind::Scalar(s) => scalar_type_ref(*s),
            FieldKind::Message(name) | FieldKind::Enum(name) => name.clone(),
            FieldKind::Group => String::new(),
            FieldKind::Map { .. } => String::new(),
        },
    }
}

fn scalar_type_ref(scalar: ScalarType) -> String {
    match scalar {
        ScalarType::Double => "double",
        ScalarType::Float => "float",
        ScalarType::Int32 => "int32",
        ScalarType::Int64 => "int64",
        ScalarType::Uint32 => "uint32",
        ScalarType::Uint64 => "uint64",
        ScalarType::Bool => "bool",
        ScalarType::String => "string",
        ScalarType::Bytes => "bytes",
    }
    .to_string()
}
