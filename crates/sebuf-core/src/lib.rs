//! Shared protobuf descriptor and plugin-protocol types for sebuf.
//!
//! This crate provides custom [`prost::Message`] types that preserve the
//! sebuf extension fields (50001–50020) which standard `prost_types`
//! descriptor types drop during decoding, plus a hand-rolled mirror of the
//! `protoc` compiler-plugin wire protocol (`CodeGeneratorRequest` /
//! `CodeGeneratorResponse`).
//!
//! `sebuf-model`, `sebuf-driver`, and every `sebuf-gen-*` emitter crate
//! depend on these shared types. You should not need to depend on this
//! crate directly in application code — use `sebuf-model` instead.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod descriptor;
pub mod plugin;
