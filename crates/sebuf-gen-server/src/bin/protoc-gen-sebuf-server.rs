//! `protoc-gen-sebuf-server`: the Go HTTP server `protoc`/`buf` plugin.

use std::process::ExitCode;

fn main() -> ExitCode {
    sebuf_driver::run_plugin(sebuf_gen_server::ServerEmitter)
}
