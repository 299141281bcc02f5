use super::*;
use crate::geom::Rect;
use crate::store::GameState;

fn store_with(frames: &[(u64, GameKind)]) -> SurfaceStore {
    let mut store = SurfaceStore::new();
    for (n, kind) in frames {
        store.put_game_frame(
            FrameId::from_counter(*n),
            Rect::new(0.0, 0.0, 400.0, 300.0),
            GameState::unconfigured(*kind),
            false,
        );
    }
    store
}

fn focused_ids(store: &SurfaceStore) -> Vec<FrameId> {
    store.frames().filter(|f| f.focused).map(|f| f.id.clone()).collect()
}

#[test]
fn focus_shows_settings_for_the_frame_kind() {
    let mut store = store_with(&[(0, GameKind::Memory)]);
    let mut focus = FocusArbitrator::new();
    let a = FrameId::from_counter(0);
    assert_eq!(focus.focus(&mut store, &a), Some(SettingsChange::Show { frame: a.clone(), kind: GameKind::Memory }));
    assert_eq!(focus.focus(&mut store, &a), Some(SettingsChange::Unchanged));
}

#[test]
fn last_focus_wins_despite_interleaved_moves() {
    let mut store = store_with(&[(0, GameKind::Puzzle), (1, GameKind::Memory), (2, GameKind::Puzzle)]);
    let mut focus = FocusArbitrator::new();
    let (a, b, c) = (FrameId::from_counter(0), FrameId::from_counter(1), FrameId::from_counter(2));

    focus.focus(&mut store, &a);
    store.move_game_frame(&c, 10.0, 10.0);
    focus.focus(&mut store, &b);
    store.move_game_frame(&c, 20.0, 20.0);

    assert_eq!(focused_ids(&store), vec![b.clone()]);
    assert_eq!(focus.showing(), Some(&b));
}

#[test]
fn blur_of_last_focused_frame_clears_settings() {
    let mut store = store_with(&[(0, GameKind::Puzzle)]);
    let mut focus = FocusArbitrator::new();
    let a = FrameId::from_counter(0);
    focus.focus(&mut store, &a);
    assert_eq!(focus.blur(&mut store, &a), Some(SettingsChange::Clear));
    assert!(focused_ids(&store).is_empty());
    assert_eq!(focus.blur(&mut store, &a), Some(SettingsChange::Unchanged));
}

#[test]
fn blur_of_an_unfocused_frame_keeps_settings() {
    let mut store = store_with(&[(0, GameKind::Puzzle), (1, GameKind::Puzzle)]);
    let mut focus = FocusArbitrator::new();
    let (a, b) = (FrameId::from_counter(0), FrameId::from_counter(1));
    focus.focus(&mut store, &a);
    assert_eq!(focus.blur(&mut store, &b), Some(SettingsChange::Unchanged));
    assert_eq!(focused_ids(&store), vec![a]);
}

#[test]
fn unknown_frames_change_nothing() {
    let mut store = store_with(&[(0, GameKind::Puzzle)]);
    let mut focus = FocusArbitrator::new();
    let a = FrameId::from_counter(0);
    focus.focus(&mut store, &a);
    let ghost = FrameId::from_counter(9);
    assert_eq!(focus.focus(&mut store, &ghost), None);
    assert_eq!(focus.blur(&mut store, &ghost), None);
    assert_eq!(focused_ids(&store), vec![a]);
}

#[test]
fn forgetting_the_shown_frame_clears_settings() {
    let mut store = store_with(&[(0, GameKind::Puzzle)]);
    let mut focus = FocusArbitrator::new();
    let a = FrameId::from_counter(0);
    focus.focus(&mut store, &a);
    store.delete_game_frame(&a);
    assert_eq!(focus.forget(&store, &a), SettingsChange::Clear);
    assert_eq!(focus.showing(), None);
}

#[test]
fn reset_clears_only_when_something_was_shown() {
    let mut focus = FocusArbitrator::new();
    assert_eq!(focus.reset(), SettingsChange::Unchanged);
    let mut store = store_with(&[(0, GameKind::Puzzle)]);
    focus.focus(&mut store, &FrameId::from_counter(0));
    assert_eq!(focus.reset(), SettingsChange::Clear);
}
