// SPDX-License-Identifier: Apache-2.0

// Example: read a definition request, answer it, and print the wire text.
// Run with RUST_LOG=trace to watch frames being pushed and popped.

use rpcjson::protocol::{
    DefinitionResult, Location, Range, RequestMessage, ResponseError, ResponseMessage,
};
use rpcjson::{deserialize_into, to_string, Nullable, ParseOptions};

fn main() {
    env_logger::init();

    let wire = br#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "textDocument/definition",
        "params": {
            "textDocument": {"uri": "file:///src/lib.rs"},
            "position": {"line": 12, "character": 8},
            "workDoneToken": "ignored"
        }
    }"#;

    let mut request = RequestMessage::default();
    let response = match deserialize_into(wire, &mut request, ParseOptions::default()) {
        Ok(stats) => {
            println!(
                "📥 {} #{} ({} frames pushed, peak depth {})",
                request.method, request.id, stats.pushes, stats.peak_frames
            );
            match request.params {
                Some(params) => ResponseMessage::success(
                    request.id,
                    DefinitionResult::Location(Location {
                        uri: params.text_document.uri,
                        range: Range {
                            start: params.position,
                            end: params.position,
                        },
                    }),
                ),
                None => ResponseMessage::success(request.id, DefinitionResult::Null),
            }
        }
        Err(e) => ResponseMessage::failure(
            Nullable::Null,
            ResponseError {
                code: -32700,
                message: e.to_string(),
                data: None,
            },
        ),
    };

    match to_string(&response) {
        Ok(text) => println!("📤 {text}"),
        Err(e) => eprintln!("❌ {e}"),
    }
}
