//! Answer chunking and event framing for SSE delivery

use serde::{Deserialize, Serialize};

/// Event emitted over a streamed response
///
/// A well-formed stream is exactly one `start`, zero or more `chunk` events
/// in original-text order, then one terminal `done` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Start,
    Chunk { content: String },
    Done,
    Error { error: String },
}

/// Split an answer into sentence-aligned chunks of at most `budget` characters.
///
/// A sentence ends at '.', '!' or '?' followed by a space. Whole sentences are
/// packed greedily; a single sentence longer than the budget becomes its own
/// chunk rather than being split. Concatenating the chunks reproduces the
/// answer modulo trailing whitespace.
pub fn chunk_text(text: &str, budget: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let marked = text
        .replace("? ", "?|")
        .replace("! ", "!|")
        .replace(". ", ".|");

    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in marked.split('|') {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if !current.is_empty() && current.len() + sentence.len() > budget {
            chunks.push(current.clone());
            current.clear();
        }
        current.push_str(sentence);
        current.push(' ');
    }

    let last = current.trim_end();
    if !last.is_empty() {
        chunks.push(last.to_string());
    }

    chunks
}
