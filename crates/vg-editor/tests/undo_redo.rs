//! Integration tests: snapshot undo/redo through the session.
//!
//! Every assertion compares serialized snapshots, which is exactly the
//! fidelity the undo stack promises.

use pretty_assertions::assert_eq;
use vg_editor::{EditorConfig, Modifiers, Session};

fn session() -> Session {
    let mut s = Session::new(EditorConfig::default()).unwrap();
    s.load_document(include_str!("fixtures/single_rect.svg"))
        .unwrap();
    s
}

fn drag_rect(s: &mut Session, from: (f64, f64), to: (f64, f64)) {
    s.activate("rectangle").unwrap();
    s.pointer_down(from.0, from.1, Modifiers::NONE).unwrap();
    s.pointer_move(to.0, to.1, Modifiers::NONE).unwrap();
    s.pointer_up(to.0, to.1, Modifiers::NONE).unwrap();
}

#[test]
fn undo_restores_state_before_action_and_redo_after() {
    let mut s = session();
    let before = s.snapshot().unwrap();
    drag_rect(&mut s, (10.0, 10.0), (50.0, 50.0));
    let after = s.snapshot().unwrap();
    assert_ne!(before, after);

    assert!(s.undo().unwrap());
    assert_eq!(s.snapshot().unwrap(), before);
    assert!(s.redo().unwrap());
    assert_eq!(s.snapshot().unwrap(), after);
    assert!(!s.redo().unwrap());
}

#[test]
fn undo_with_empty_history_is_a_no_op() {
    let mut s = session();
    let before = s.snapshot().unwrap();
    assert!(!s.undo().unwrap());
    assert_eq!(s.snapshot().unwrap(), before);
}

#[test]
fn new_action_after_undo_clears_redo() {
    let mut s = session();
    drag_rect(&mut s, (10.0, 10.0), (50.0, 50.0));
    s.undo().unwrap();
    assert!(s.history().can_redo());

    drag_rect(&mut s, (100.0, 100.0), (150.0, 150.0));
    assert!(!s.history().can_redo());
    assert!(!s.redo().unwrap());
}

#[test]
fn history_is_capped_at_fifty() {
    let mut s = session();
    s.activate("text").unwrap();
    for i in 0..55 {
        let y = 20.0 + f64::from(i) * 10.0;
        s.pointer_down(20.0, y, Modifiers::NONE).unwrap();
    }
    assert_eq!(s.history().undo_len(), 50);

    let mut undone = 0;
    while s.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 50);

    // The five oldest additions could not be undone.
    let texts = s
        .graph()
        .walk()
        .into_iter()
        .filter(|idx| s.graph().graph[*idx].kind.type_name() == "text")
        .count();
    assert_eq!(texts, 5);
}

#[test]
fn undo_mid_gesture_discards_the_gesture_first() {
    let mut s = session();
    let start = s.snapshot().unwrap();
    drag_rect(&mut s, (10.0, 10.0), (50.0, 50.0));

    s.pointer_down(100.0, 100.0, Modifiers::NONE).unwrap();
    s.pointer_move(150.0, 150.0, Modifiers::NONE).unwrap();
    assert!(s.history().in_gesture());

    assert!(s.undo().unwrap());
    assert_eq!(s.snapshot().unwrap(), start);
    assert!(!s.history().in_gesture());
    assert_eq!(s.history().redo_len(), 1);

    // The release that follows belongs to no gesture.
    s.pointer_up(150.0, 150.0, Modifiers::NONE).unwrap();
    assert_eq!(s.snapshot().unwrap(), start);
}

#[test]
fn delete_then_undo_restores_and_prunes_selection() {
    let mut s = session();
    assert!(s.select_all().unwrap());
    assert_eq!(s.delete_selected().unwrap(), 1);
    assert!(s.graph().find_by_name("card").is_none());

    s.undo().unwrap();
    assert!(s.graph().find_by_name("card").is_some());
    // The selection is not part of the snapshot.
    assert!(s.selection().is_empty());
}

#[test]
fn configured_depth_is_honored() {
    let config = EditorConfig::from_json(r#"{"undoDepth": 2, "showGrid": false}"#).unwrap();
    let mut s = Session::new(config).unwrap();
    for i in 0..4 {
        let x = f64::from(i) * 60.0;
        drag_rect(&mut s, (x, 0.0), (x + 50.0, 50.0));
    }
    assert_eq!(s.history().undo_len(), 2);
    assert_eq!(s.graph().item_count(), 4);
}
