mod common;

use common::{cursor, editor_with, editor_with_options, feed, lines};
use core_actions::EditorOptions;
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn counted_x_at_end_of_row_stops_at_row_bounds() {
    let mut ed = editor_with(&["hello"]);
    ed.state_mut().cursor = Position::new(0, 5);
    feed(&mut ed, "3x");
    assert_eq!(lines(&ed), vec!["hell"]);
    assert_eq!(ed.state().yank_buffer().unwrap().text, "o");
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["hello"]);
}

#[test]
fn counted_x_is_one_undo_group() {
    let mut ed = editor_with(&["abcdef"]);
    feed(&mut ed, "4x");
    assert_eq!(lines(&ed), vec!["ef"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["abcdef"]);
}

#[test]
fn leading_zero_is_line_start_motion() {
    let mut ed = editor_with(&["abcdef"]);
    feed(&mut ed, "$0");
    assert_eq!(cursor(&ed), (0, 0));
    feed(&mut ed, "10l");
    assert_eq!(cursor(&ed), (0, 5));
}

#[test]
fn count_with_g_and_gg_jumps_to_line() {
    let rows: Vec<String> = (1..=20).map(|i| format!("line {i}")).collect();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let mut ed = editor_with(&refs);
    feed(&mut ed, "7G");
    assert_eq!(cursor(&ed).0, 6);
    feed(&mut ed, "G");
    assert_eq!(cursor(&ed).0, 19);
    feed(&mut ed, "gg");
    assert_eq!(cursor(&ed).0, 0);
    feed(&mut ed, "12gg");
    assert_eq!(cursor(&ed).0, 11);
}

#[test]
fn counted_dd_deletes_and_yanks_lines() {
    let mut ed = editor_with(&["a", "b", "c", "d"]);
    feed(&mut ed, "j2dd");
    assert_eq!(lines(&ed), vec!["a", "d"]);
    assert_eq!(ed.state().yank_buffer().unwrap().text, "b\nc\n");
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["a", "b", "c", "d"]);
}

#[test]
fn cancelled_prefix_swallows_the_key() {
    let mut ed = editor_with(&["abc", "def"]);
    feed(&mut ed, "dj");
    assert_eq!(lines(&ed), vec!["abc", "def"]);
    assert_eq!(cursor(&ed), (0, 0));
    assert_eq!(ed.pending_keys(), "");
    feed(&mut ed, "gx");
    assert_eq!(lines(&ed), vec!["abc", "def"]);
}

#[test]
fn pending_keys_show_count_and_prefix() {
    let mut ed = editor_with(&["abc"]);
    feed(&mut ed, "3d");
    assert_eq!(ed.pending_keys(), "3d");
    feed(&mut ed, "<Esc>");
    assert_eq!(ed.pending_keys(), "");
    assert_eq!(ed.current_mode(), Mode::Normal);
}

#[test]
fn count_is_capped() {
    let mut ed = editor_with_options(
        &["abcdefghij"],
        EditorOptions {
            max_count: 3,
            ..EditorOptions::default()
        },
    );
    feed(&mut ed, "99x");
    assert_eq!(lines(&ed), vec!["defghij"]);
}

#[test]
fn counted_paste_repeats_in_one_group() {
    let mut ed = editor_with(&["x"]);
    feed(&mut ed, "yy3p");
    assert_eq!(lines(&ed), vec!["x", "x", "x", "x"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["x"]);
}
