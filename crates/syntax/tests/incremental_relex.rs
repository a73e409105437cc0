// Chunk: docs/chunks/incremental_lexing - Resync-based incremental relexing

//! Incremental relexing against tokenizing from scratch.
//!
//! Every edit sequence must leave the index exactly as `set_text` of the
//! final text would, the index must tile the text, and small edits inside a
//! large file must only touch a handful of intervals.

use lite_lex_syntax::{
    replace_event, CStyleLexer, EditEvent, HighlightError, Highlighter, HighlighterConfig, Interval,
    SyntaxTheme,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::rc::Rc;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn highlighter_with_margin(margin: usize) -> Highlighter {
    Highlighter::new(
        Box::new(CStyleLexer::new()),
        Rc::new(SyntaxTheme::catppuccin_mocha()),
        HighlighterConfig { resync_margin: margin },
    )
}

fn fresh(text: &[char]) -> Vec<Interval> {
    let mut hl = Highlighter::with_lexer(Box::new(CStyleLexer::new()));
    hl.set_text(text);
    hl.intervals()
}

fn named(hl: &Highlighter) -> Vec<(usize, usize, String)> {
    hl.intervals()
        .iter()
        .map(|i| (i.start, i.end, hl.kinds().name(i.datum.kind()).to_string()))
        .collect()
}

/// Applies an edit to `text` and returns the event describing it. Seeds are
/// folded into the current text bounds.
fn splice(text: &mut Vec<char>, offset_seed: usize, len_seed: usize, insert: &[char]) -> EditEvent {
    let offset = offset_seed % (text.len() + 1);
    let old_len = len_seed % (text.len() - offset + 1);
    text.splice(offset..offset + old_len, insert.iter().copied());
    EditEvent::new(offset, old_len, insert.len())
}

fn assert_tiles(intervals: &[Interval], len: usize) {
    let mut covered = 0;
    for interval in intervals {
        assert_eq!(interval.start, covered, "gap or overlap at {covered}");
        covered = interval.end;
    }
    assert_eq!(covered, len);
}

// ==================== Scenarios ====================

#[test]
fn comment_scenario_keeps_neighbours() {
    let mut hl = highlighter_with_margin(2);
    let mut text = chars("a/*b*/c");
    hl.set_text(&text);
    assert_eq!(
        named(&hl),
        vec![
            (0, 1, "identifier".to_string()),
            (1, 3, "comment.block.start".to_string()),
            (3, 4, "comment.block".to_string()),
            (4, 6, "comment.block.end".to_string()),
            (6, 7, "identifier".to_string()),
        ]
    );

    let event = splice(&mut text, 4, 0, &chars("xyz"));
    let outcome = hl.apply_edit(&text, event).unwrap();
    let after = named(&hl);
    assert_eq!(after[0], (0, 1, "identifier".to_string()));
    assert_eq!(after[4], (9, 10, "identifier".to_string()));
    assert_eq!(outcome.change.old_count, 1);
    assert_eq!(outcome.change.new_count, 1);
    assert_eq!(hl.intervals(), fresh(&text));
}

#[test]
fn deleting_comment_end_runs_to_end_of_buffer() {
    let mut hl = highlighter_with_margin(2);
    let mut text = chars("a/*b*/c");
    hl.set_text(&text);

    let event = splice(&mut text, 4, 2, &[]);
    let outcome = hl.apply_edit(&text, event).unwrap();
    assert_eq!(text.iter().collect::<String>(), "a/*bc");
    assert_eq!(hl.intervals(), fresh(&text));
    assert_eq!(
        named(&hl).last(),
        Some(&(3, 5, "comment.block".to_string()))
    );
    assert_eq!(outcome.repaint.end, 5);
}

#[test]
fn reopening_comment_matches_fresh_text() {
    let mut hl = highlighter_with_margin(2);
    let mut text = chars("a/*b*/c");
    hl.set_text(&text);

    // Replace "*/" with "/*", leaving the comment unterminated
    let event = splice(&mut text, 4, 2, &chars("/*"));
    hl.apply_edit(&text, event).unwrap();
    assert_eq!(text.iter().collect::<String>(), "a/*b/*c");
    assert_eq!(hl.intervals(), fresh(&text));
}

#[test]
fn stale_text_is_rejected() {
    let mut hl = highlighter_with_margin(2);
    let text = chars("int x;");
    hl.set_text(&text);
    let before = hl.intervals();

    let err = hl.apply_edit(&text, replace_event(2, 0, "yy")).unwrap_err();
    assert_eq!(err, HighlightError::LengthMismatch { expected: 8, actual: 6 });
    assert_eq!(hl.intervals(), before);
}

// ==================== Locality ====================

#[test]
fn edit_inside_identifier_touches_one_interval() {
    let source = "int alpha = 42;\n".repeat(2_000);
    let mut text = chars(&source);
    let mut hl = highlighter_with_margin(2);
    hl.set_text(&text);
    let tokens = hl.index().len();

    // Middle of "alpha" on line 1000
    let offset = 1_000 * 16 + 6;
    let event = splice(&mut text, offset, 0, &['z']);
    let outcome = hl.apply_edit(&text, event).unwrap();

    assert_eq!(outcome.change.old_count, 1);
    assert_eq!(outcome.change.new_count, 1);
    assert_eq!(outcome.repaint, 1_000 * 16 + 4..1_000 * 16 + 10);
    assert_eq!(hl.index().len(), tokens);
    assert_eq!(hl.intervals(), fresh(&text));
}

#[test]
fn locality_holds_for_every_margin() {
    let source = "x = 1;\n".repeat(500);
    for margin in [0, 1, 2, 8] {
        let mut text = chars(&source);
        let mut hl = highlighter_with_margin(margin);
        hl.set_text(&text);

        let event = splice(&mut text, 7 * 250 + 4, 1, &chars("99"));
        let outcome = hl.apply_edit(&text, event).unwrap();
        assert!(
            outcome.change.old_count <= 1 + margin && outcome.change.new_count <= 1 + margin,
            "margin {margin} touched {:?}",
            outcome.change
        );
        assert_eq!(hl.intervals(), fresh(&text));
    }
}

// ==================== Properties ====================

const ALPHABET: &[char] = &['a', 'b', '1', ' ', '\n', '/', '*', '"', '\\', '+', ';'];

fn text_strategy() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..48)
}

fn edits_strategy() -> impl Strategy<Value = Vec<(usize, usize, Vec<char>)>> {
    prop::collection::vec((any::<usize>(), 0usize..6, text_strategy().prop_map(|mut t| {
        t.truncate(4);
        t
    })), 1..12)
}

proptest! {
    #[test]
    fn incremental_matches_fresh(
        initial in text_strategy(),
        edits in edits_strategy(),
        margin in 0usize..4,
    ) {
        let mut text = initial;
        let mut hl = highlighter_with_margin(margin);
        hl.set_text(&text);

        for (offset, len, insert) in &edits {
            let event = splice(&mut text, *offset, *len, insert);
            let outcome = hl.apply_edit(&text, event).unwrap();
            prop_assert!(outcome.repaint.end <= text.len());
            prop_assert_eq!(hl.intervals(), fresh(&text));
        }
    }

    #[test]
    fn intervals_tile_the_text(initial in text_strategy(), edits in edits_strategy()) {
        let mut text = initial;
        let mut hl = highlighter_with_margin(2);
        hl.set_text(&text);
        assert_tiles(&hl.intervals(), text.len());

        for (offset, len, insert) in &edits {
            let event = splice(&mut text, *offset, *len, insert);
            hl.apply_edit(&text, event).unwrap();
            assert_tiles(&hl.intervals(), text.len());

            let joined: String = hl
                .intervals()
                .iter()
                .map(|i| text[i.range()].iter().collect::<String>())
                .collect();
            prop_assert_eq!(joined, text.iter().collect::<String>());
        }
    }
}
