mod common;

use common::{cursor, editor_with, editor_with_options, feed, lines};
use core_actions::EditorOptions;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn split_is_undone_with_cursor_restored() {
    let mut ed = editor_with(&["helloworld"]);
    ed.state_mut().cursor = Position::new(0, 5);
    feed(&mut ed, "i<CR><Esc>");
    assert_eq!(lines(&ed), vec!["hello", "world"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["helloworld"]);
    assert_eq!(cursor(&ed), (0, 5));
    assert_eq!(ed.status_message(), "1 change undone");
}

#[test]
fn whole_insert_session_undoes_at_once() {
    let mut ed = editor_with(&[""]);
    feed(&mut ed, "iabc<CR>def<Esc>");
    assert_eq!(lines(&ed), vec!["abc", "def"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec![""]);
    feed(&mut ed, "u");
    assert_eq!(ed.status_message(), "Already at oldest change");
}

#[test]
fn separate_sessions_are_separate_groups() {
    let mut ed = editor_with(&[""]);
    feed(&mut ed, "iab<Esc>");
    feed(&mut ed, "acd<Esc>");
    assert_eq!(lines(&ed), vec!["abcd"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["ab"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec![""]);
}

#[test]
fn counted_undo_reverts_several_groups() {
    let mut ed = editor_with(&["abcdef"]);
    feed(&mut ed, "xxx");
    assert_eq!(lines(&ed), vec!["def"]);
    feed(&mut ed, "2u");
    assert_eq!(lines(&ed), vec!["bcdef"]);
}

#[test]
fn open_below_undoes_with_its_insert_session() {
    let mut ed = editor_with(&["first"]);
    feed(&mut ed, "onext<Esc>");
    assert_eq!(lines(&ed), vec!["first", "next"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["first"]);
}

#[test]
fn undo_capacity_drops_oldest_groups() {
    let mut ed = editor_with_options(
        &["abcdef"],
        EditorOptions {
            undo_capacity: 2,
            ..EditorOptions::default()
        },
    );
    feed(&mut ed, "xxx");
    feed(&mut ed, "uuu");
    assert_eq!(lines(&ed), vec!["bcdef"]);
    assert_eq!(ed.status_message(), "Already at oldest change");
}

#[test]
fn backspace_join_is_undone() {
    let mut ed = editor_with(&["ab", "cd"]);
    ed.state_mut().cursor = Position::new(1, 0);
    feed(&mut ed, "i<BS><Esc>");
    assert_eq!(lines(&ed), vec!["abcd"]);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["ab", "cd"]);
}
