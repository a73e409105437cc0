// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing

//! Performance sanity checks for the text buffer.
//!
//! These tests verify that basic operations complete within reasonable time bounds.
//! They are not formal benchmarks but guard against obvious performance regressions.

use lite_lex_buffer::TextBuffer;
use std::time::{Duration, Instant};

#[test]
fn typing_20k_chars_under_500ms() {
    let mut buffer = TextBuffer::new();
    let start = Instant::now();

    for _ in 0..20_000 {
        let end = buffer.len();
        buffer.insert(end, "x");
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(500),
        "Typing 20K characters took {:?}, expected < 500ms",
        elapsed
    );

    assert_eq!(buffer.len(), 20_000);
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn line_access_performance() {
    let content: String = (0..1000)
        .map(|i| format!("Line number {}", i))
        .collect::<Vec<_>>()
        .join("\n");

    let buffer = TextBuffer::from_str(&content);
    let start = Instant::now();

    for _ in 0..100 {
        for line in 0..buffer.line_count() {
            let _ = buffer.line_content(line);
        }
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(500),
        "Accessing {} lines 100 times took {:?}, expected < 500ms",
        buffer.line_count(),
        elapsed
    );
}

#[test]
fn editing_in_the_middle_of_a_large_buffer() {
    let content = "let value = 42;\n".repeat(10_000);
    let mut buffer = TextBuffer::from_str(&content);
    let middle = buffer.len() / 2;
    let start = Instant::now();

    // Type a word, then delete it again, many times at the same spot
    for _ in 0..1_000 {
        buffer.insert(middle, "word");
        buffer.delete(middle..middle + 4);
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(500),
        "2K edits in a 10K line buffer took {:?}, expected < 500ms",
        elapsed
    );
    assert_eq!(buffer.content(), content);
}
