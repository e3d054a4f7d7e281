//! `protoc-gen-sebuf-client-ts`: the TypeScript HTTP client `protoc`/`buf` plugin.

use std::process::ExitCode;

fn main() -> ExitCode {
    sebuf_driver::run_plugin(sebuf_gen_client_ts::ClientTsEmitter)
}
