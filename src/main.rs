//! Nodelink - catalog and node-configuration bridge for script graphs
//!
//! Line-oriented driver: one JSON request per stdin line, one JSON
//! response per stdout line. Framing is deliberately trivial; the engine
//! behind it does the work.

use nodelink::graph::{PinType, ScriptDocument, VariableDecl};
use nodelink::Engine;
use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut engine = Engine::new();

    // A playground document so the channel is usable immediately
    let mut document = ScriptDocument::new("Playground", "Actor");
    document.add_variable(VariableDecl::new("Health", PinType::new("float")));
    document.add_variable(VariableDecl::new("IsOpen", PinType::new("bool")));
    engine.open_document(document);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str(&line) {
            Ok(request) => engine.handle(&request),
            Err(err) => serde_json::json!({
                "success": false,
                "error": format!("request is not valid JSON: {}", err),
                "usage_hint": "send one {\"action\": ..., \"params\": {...}} object per line",
            }),
        };
        serde_json::to_writer(&mut out, &response)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }
    Ok(())
}
