//! `protoc-gen-sebuf-openapi`: the `OpenAPI` 3.1 document `protoc`/`buf` plugin.

use std::process::ExitCode;

fn main() -> ExitCode {
    sebuf_driver::run_plugin(sebuf_gen_openapi::OpenApiEmitter)
}
