// SPDX-License-Identifier: Apache-2.0

// Example: drive the tokenizer directly and print each event it reports.

use rpcjson::{Event, EventHandler, SyntaxError, Tokenizer};

struct Printer {
    indent: usize,
}

impl EventHandler<SyntaxError> for Printer {
    fn handle_event(&mut self, event: Event<'_>) -> Result<(), SyntaxError> {
        match event {
            Event::EndObject | Event::EndArray => self.indent = self.indent.saturating_sub(1),
            _ => {}
        }
        println!("{}{:?}", "  ".repeat(self.indent), event);
        if matches!(event, Event::StartObject | Event::StartArray) {
            self.indent += 1;
        }
        Ok(())
    }
}

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r#"{"id":1,"result":[{"uri":"aé"},null,2.5]}"#.to_string());

    let mut printer = Printer { indent: 0 };
    if let Err(e) = Tokenizer::new().parse(input.as_bytes(), &mut printer) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
