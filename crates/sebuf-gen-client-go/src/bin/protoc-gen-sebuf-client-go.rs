//! `protoc-gen-sebuf-client-go`: the Go HTTP client `protoc`/`buf` plugin.

use std::process::ExitCode;

fn main() -> ExitCode {
    sebuf_driver::run_plugin(sebuf_gen_client_go::ClientGoEmitter)
}
