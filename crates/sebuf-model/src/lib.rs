//! The sebuf generator core's intermediate model: descriptor ingestion,
//! the annotation model, cross-file unwrap resolution, validation, and
//! codec planning (`spec_full.md` §4.1–4.4). Every `sebuf-gen-*` emitter
//! depends on this crate and never parses raw descriptor options itself.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod annotations;
pub mod codec_plan;
pub mod error;
pub mod ingest;
pub mod model;
pub mod paths;
pub mod unwrap;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use sebuf_core::plugin::CodeGeneratorRequest;

use error::Result;
use model::{CodecPlans, Program};

/// Run the full core pipeline over a decoded plugin request: ingest
/// descriptors, resolve cross-file unwrap info, validate, and plan codecs.
/// Every emitter calls this once per generation invocation; none of the
/// four stages run more than once.
pub fn build(request: &CodeGeneratorRequest) -> Result<(Program, CodecPlans)> {
    let files = ingest::build_files(request)?;
    let mut program = Program {
        files,
        unwrap_table: model::UnwrapTable::default(),
    };
    program.unwrap_table = unwrap::collect_global_unwrap_info(&program)?;
    validate::validate_program(&program)?;
    let plans = codec_plan::build_codec_plans(&program);
    Ok((program, plans))
}
