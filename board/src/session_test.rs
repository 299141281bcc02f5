#![allow(clippy::float_cmp)]

use wire::GameKind;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn open_session() -> BoardSession {
    let mut s = BoardSession::with_seed("lobby", SessionConfig::default(), 7);
    s.set_surface_open(true);
    s
}

fn surface_sent(actions: &[Action]) -> Vec<SurfaceMessage> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Send(Outbound::Surface(m)) => Some(m.clone()),
            _ => None,
        })
        .collect()
}

fn has(actions: &[Action], wanted: &Action) -> bool {
    actions.iter().any(|a| a == wanted)
}

/// A decoded image at the default geometry, received from a peer.
fn with_remote_image(s: &mut BoardSession, id: ImageId) {
    let actions = s.apply_surface(SurfaceMessage::Image {
        id,
        x: 50.0,
        y: 50.0,
        width: 200.0,
        height: 200.0,
        data_url: "data:image/png;base64,AAAA".to_owned(),
    });
    assert!(has(&actions, &Action::DecodeImage { id, data_url: "data:image/png;base64,AAAA".to_owned() }));
    s.image_decoded(id);
}

fn frame0() -> FrameId {
    FrameId::from_counter(0)
}

// =============================================================
// Outbound
// =============================================================

#[test]
fn outbound_knows_its_channel_path() {
    let out = Outbound::Puzzle { frame: FrameId::from_counter(2), message: PuzzleMessage::PuzzleStateRequest {} };
    assert_eq!(out.path("lobby"), "/ws/puzzle_on_board/lobby/game-2");
    assert!(out.encode().unwrap().contains("\"puzzle_state_request\""));
    assert_eq!(Outbound::Surface(SurfaceMessage::Clear {}).path("lobby"), "/ws/whiteboard/lobby");
}

// =============================================================
// Strokes
// =============================================================

#[test]
fn every_move_sends_one_segment() {
    let mut s = open_session();
    s.set_color("#ff0000");
    s.set_line_width(4.0);
    s.pointer_down(Point::new(10.0, 10.0));
    let first = s.pointer_move(Point::new(12.0, 13.0));
    let second = s.pointer_move(Point::new(15.0, 15.0));

    let sent = surface_sent(&second);
    let [SurfaceMessage::Draw(stroke)] = sent.as_slice() else {
        panic!("expected one draw, got {sent:?}");
    };
    assert_eq!((stroke.x0, stroke.y0, stroke.x1, stroke.y1), (12.0, 13.0, 15.0, 15.0));
    assert_eq!(stroke.color, "#ff0000");
    assert_eq!(stroke.line_width, 4.0);
    assert_eq!(surface_sent(&first).len(), 1);
    assert!(matches!(second[0], Action::StrokeSegment(_)));

    assert!(s.pointer_up(Point::new(15.0, 15.0)).is_empty());
    assert_eq!(*s.input_mode(), InputMode::Idle);
}

#[test]
fn eraser_strokes_paint_background_color() {
    let mut s = open_session();
    s.set_tool(Tool::Eraser);
    s.set_color("#ff0000");
    s.pointer_down(Point::new(0.0, 0.0));
    let sent = surface_sent(&s.pointer_move(Point::new(1.0, 1.0)));
    let SurfaceMessage::Draw(stroke) = &sent[0] else {
        panic!("expected draw");
    };
    assert_eq!(stroke.color, "#ffffff");
    assert_eq!(stroke.tool, Tool::Eraser);
}

#[test]
fn remote_eraser_strokes_are_recolored() {
    let mut s = open_session();
    let actions = s.apply_surface(SurfaceMessage::Draw(Stroke {
        x0: 0.0,
        y0: 0.0,
        x1: 5.0,
        y1: 5.0,
        color: "#123456".to_owned(),
        line_width: 10.0,
        tool: Tool::Eraser,
    }));
    let [Action::StrokeSegment(stroke)] = actions.as_slice() else {
        panic!("expected one segment");
    };
    assert_eq!(stroke.color, "#ffffff");
}

#[test]
fn closed_surface_channel_still_applies_locally() {
    let mut s = BoardSession::with_seed("lobby", SessionConfig::default(), 1);
    s.pointer_down(Point::new(0.0, 0.0));
    let actions = s.pointer_move(Point::new(3.0, 4.0));
    assert!(surface_sent(&actions).is_empty());
    assert!(matches!(actions.as_slice(), [Action::StrokeSegment(_)]));
}

// =============================================================
// Images
// =============================================================

#[test]
fn upload_is_announced_only_after_decode() {
    let mut s = open_session();
    let actions = s.upload_image("data:image/png;base64,BBBB");
    assert_eq!(actions, vec![Action::DecodeImage { id: 0, data_url: "data:image/png;base64,BBBB".to_owned() }]);
    assert!(s.store().image(0).is_none());
    assert!(s.is_image_pending(0));

    let sent = surface_sent(&s.image_decoded(0));
    assert_eq!(
        sent,
        vec![SurfaceMessage::Image {
            id: 0,
            x: 50.0,
            y: 50.0,
            width: 200.0,
            height: 200.0,
            data_url: "data:image/png;base64,BBBB".to_owned(),
        }]
    );
    assert_eq!(s.store().image(0).unwrap().rect, Rect::new(50.0, 50.0, 200.0, 200.0));
}

#[test]
fn failed_decode_drops_the_image() {
    let mut s = open_session();
    s.upload_image("data:broken");
    assert!(s.image_decode_failed(0).is_empty());
    assert!(s.store().is_empty());
    assert!(!s.is_image_pending(0));
    assert!(s.image_decoded(0).is_empty());
}

#[test]
fn remote_images_are_stored_without_echo() {
    let mut s = open_session();
    s.apply_surface(SurfaceMessage::Image {
        id: 4,
        x: 1.0,
        y: 2.0,
        width: 30.0,
        height: 40.0,
        data_url: "data:x".to_owned(),
    });
    assert!(surface_sent(&s.image_decoded(4)).is_empty());
    assert_eq!(s.store().image(4).unwrap().rect, Rect::new(1.0, 2.0, 30.0, 40.0));
    assert_eq!(s.upload_image("data:y")[0], Action::DecodeImage { id: 5, data_url: "data:y".to_owned() });
}

#[test]
fn move_for_unknown_image_with_data_recreates_it() {
    let mut s = open_session();
    let actions = s.apply_surface(SurfaceMessage::MoveImage {
        id: 5,
        x: 1.0,
        y: 2.0,
        data_url: Some("data:z".to_owned()),
    });
    assert_eq!(actions, vec![Action::DecodeImage { id: 5, data_url: "data:z".to_owned() }]);
    s.image_decoded(5);
    assert_eq!(s.store().image(5).unwrap().rect, Rect::new(1.0, 2.0, 200.0, 200.0));
}

#[test]
fn update_for_unknown_image_without_data_is_ignored() {
    let mut s = open_session();
    assert!(s.apply_surface(SurfaceMessage::ImageDragUpdate { id: 9, x: 1.0, y: 1.0 }).is_empty());
    assert!(s.store().is_empty());
}

#[test]
fn geometry_received_while_decoding_is_kept() {
    let mut s = open_session();
    s.apply_surface(SurfaceMessage::Image {
        id: 2,
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        data_url: "data:x".to_owned(),
    });
    s.apply_surface(SurfaceMessage::MoveImage { id: 2, x: 40.0, y: 60.0, data_url: None });
    s.image_decoded(2);
    assert_eq!(s.store().image(2).unwrap().rect, Rect::new(40.0, 60.0, 100.0, 100.0));
}

#[test]
fn delete_image_sends_and_removes() {
    let mut s = open_session();
    with_remote_image(&mut s, 3);
    let sent = surface_sent(&s.delete_image(3));
    assert_eq!(sent, vec![SurfaceMessage::DeleteImage { id: 3 }]);
    assert!(s.store().image(3).is_none());
    assert!(s.delete_image(3).is_empty());
}

// =============================================================
// Drag and resize
// =============================================================

#[test]
fn drag_coalesces_interim_updates_and_always_sends_final() {
    let mut s = open_session();
    with_remote_image(&mut s, 0);
    assert!(s.pointer_down(Point::new(100.0, 100.0)).is_empty());

    let first = s.pointer_move(Point::new(110.0, 120.0));
    assert_eq!(first, vec![Action::RenderNeeded, Action::RequestAnimationFrame]);
    let second = s.pointer_move(Point::new(120.0, 130.0));
    assert_eq!(second, vec![Action::RenderNeeded]);

    let frame = surface_sent(&s.animation_frame());
    assert_eq!(frame, vec![SurfaceMessage::ImageDragUpdate { id: 0, x: 70.0, y: 80.0 }]);
    assert!(s.animation_frame().is_empty());

    s.pointer_move(Point::new(130.0, 140.0));
    let up = surface_sent(&s.pointer_up(Point::new(130.0, 140.0)));
    assert_eq!(
        up,
        vec![SurfaceMessage::MoveImage {
            id: 0,
            x: 80.0,
            y: 90.0,
            data_url: Some("data:image/png;base64,AAAA".to_owned()),
        }]
    );
    assert!(s.animation_frame().is_empty());
    assert_eq!(s.store().image(0).unwrap().rect.origin(), Point::new(80.0, 90.0));
}

#[test]
fn image_resize_clamps_to_minimum() {
    let mut s = open_session();
    with_remote_image(&mut s, 0);
    s.pointer_down(Point::new(245.0, 245.0));
    assert!(matches!(s.input_mode(), InputMode::Resizing { .. }));

    s.pointer_move(Point::new(0.0, 0.0));
    assert_eq!(s.store().image(0).unwrap().rect, Rect::new(50.0, 50.0, 10.0, 10.0));
    let sent = surface_sent(&s.pointer_up(Point::new(0.0, 0.0)));
    assert!(matches!(
        sent.as_slice(),
        [SurfaceMessage::ResizeImage { id: 0, width, height, data_url: Some(_), .. }] if *width == 10.0 && *height == 10.0
    ));
}

#[test]
fn frame_resize_never_shrinks_below_default_size() {
    let mut s = open_session();
    s.add_game(GameKind::Puzzle);
    s.pointer_down(Point::new(495.0, 395.0));
    let sent = surface_sent(&s.pointer_up(Point::new(300.0, 300.0)));
    assert_eq!(
        sent,
        vec![SurfaceMessage::ResizeGameElement { id: frame0(), x: 100.0, y: 100.0, width: 400.0, height: 300.0 }]
    );

    s.pointer_down(Point::new(495.0, 395.0));
    s.pointer_up(Point::new(545.0, 425.0));
    assert_eq!(s.store().frame(&frame0()).unwrap().rect, Rect::new(100.0, 100.0, 450.0, 330.0));
}

#[test]
fn frame_drag_sends_frame_messages() {
    let mut s = open_session();
    s.add_game(GameKind::Memory);
    s.pointer_down(Point::new(200.0, 200.0));
    s.pointer_move(Point::new(210.0, 200.0));
    assert_eq!(
        surface_sent(&s.animation_frame()),
        vec![SurfaceMessage::GameElementDragUpdate { id: frame0(), x: 110.0, y: 100.0 }]
    );
    assert_eq!(
        surface_sent(&s.pointer_up(Point::new(220.0, 200.0))),
        vec![SurfaceMessage::MoveGameElement { id: frame0(), x: 120.0, y: 100.0 }]
    );
}

#[test]
fn frames_are_grabbed_before_images_beneath_them() {
    let mut s = open_session();
    with_remote_image(&mut s, 0);
    s.add_game(GameKind::Puzzle);
    s.pointer_down(Point::new(150.0, 150.0));
    assert_eq!(s.input_mode().target(), Some(&Target::Frame(frame0())));
}

// =============================================================
// Frames and focus
// =============================================================

#[test]
fn add_game_announces_opens_channel_and_focuses() {
    let mut s = open_session();
    let actions = s.add_game(GameKind::Puzzle);
    assert_eq!(
        surface_sent(&actions),
        vec![
            SurfaceMessage::AddGameElement {
                id: frame0(),
                game_name: GameKind::Puzzle,
                x: 100.0,
                y: 100.0,
                width: 400.0,
                height: 300.0,
            },
            SurfaceMessage::GameElementFocus { id: frame0() },
        ]
    );
    assert!(has(&actions, &Action::OpenGameChannel { frame: frame0(), kind: GameKind::Puzzle }));
    assert!(has(&actions, &Action::ShowSettings { frame: frame0(), kind: GameKind::Puzzle }));

    let frame = s.store().frame(&frame0()).unwrap();
    assert!(frame.authored);
    assert!(frame.focused);
    assert!(frame.game.is_configured());
}

#[test]
fn clicking_empty_surface_blurs_the_focused_frame() {
    let mut s = open_session();
    s.add_game(GameKind::Puzzle);
    let actions = s.pointer_down(Point::new(10.0, 10.0));
    assert_eq!(surface_sent(&actions), vec![SurfaceMessage::GameElementBlur { id: frame0() }]);
    assert!(has(&actions, &Action::ClearSettings));
    assert_eq!(s.focused_frame(), None);
    assert!(matches!(s.input_mode(), InputMode::Drawing { .. }));
}

#[test]
fn refocusing_the_focused_frame_sends_nothing() {
    let mut s = open_session();
    s.add_game(GameKind::Puzzle);
    assert!(s.focus_frame(&frame0()).is_empty());
}

#[test]
fn remote_focus_moves_settings_between_frames() {
    let mut s = open_session();
    s.add_game(GameKind::Puzzle);
    s.add_game(GameKind::Memory);
    let second = FrameId::from_counter(1);
    let actions = s.apply_surface(SurfaceMessage::GameElementFocus { id: frame0() });
    assert!(has(&actions, &Action::ShowSettings { frame: frame0(), kind: GameKind::Puzzle }));
    assert!(!s.store().frame(&second).unwrap().focused);
    assert!(surface_sent(&actions).is_empty());
}

#[test]
fn remote_add_creates_unconfigured_frame_and_observes_id() {
    let mut s = open_session();
    let id = FrameId::from("game-3");
    let actions = s.apply_surface(SurfaceMessage::AddGameElement {
        id: id.clone(),
        game_name: GameKind::Memory,
        x: 0.0,
        y: 0.0,
        width: 400.0,
        height: 300.0,
    });
    assert!(has(&actions, &Action::OpenGameChannel { frame: id.clone(), kind: GameKind::Memory }));
    let frame = s.store().frame(&id).unwrap();
    assert!(!frame.authored);
    assert!(!frame.game.is_configured());

    s.add_game(GameKind::Puzzle);
    assert!(s.store().frame(&FrameId::from_counter(4)).is_some());
}

#[test]
fn deleting_a_frame_releases_its_channel_and_gesture() {
    let mut s = open_session();
    s.add_game(GameKind::Memory);
    s.game_channel_opened(&frame0());
    s.pointer_down(Point::new(200.0, 200.0));

    let actions = s.apply_surface(SurfaceMessage::DeleteGameElement { id: frame0() });
    assert!(has(&actions, &Action::CloseGameChannel { frame: frame0() }));
    assert!(has(&actions, &Action::StopTimer { frame: frame0() }));
    assert!(has(&actions, &Action::ClearSettings));
    assert_eq!(*s.input_mode(), InputMode::Idle);
    assert!(!s.is_game_channel_open(&frame0()));
    assert!(s.delete_game(&frame0()).is_empty());
}

// =============================================================
// Clear
// =============================================================

#[test]
fn clear_wipes_everything_and_resets_ids() {
    let mut s = open_session();
    with_remote_image(&mut s, 6);
    s.add_game(GameKind::Memory);
    s.game_channel_opened(&FrameId::from_counter(0));

    let actions = s.clear();
    assert_eq!(surface_sent(&actions), vec![SurfaceMessage::Clear {}]);
    assert!(has(&actions, &Action::CloseGameChannel { frame: frame0() }));
    assert!(has(&actions, &Action::StopTimer { frame: frame0() }));
    assert!(has(&actions, &Action::ClearSettings));
    assert!(has(&actions, &Action::ClearStrokes));
    assert!(s.store().is_empty());
    assert!(!s.is_game_channel_open(&frame0()));
    assert_eq!(s.upload_image("data:x")[0], Action::DecodeImage { id: 0, data_url: "data:x".to_owned() });
}

#[test]
fn remote_clear_does_not_echo() {
    let mut s = open_session();
    with_remote_image(&mut s, 1);
    let actions = s.apply_surface(SurfaceMessage::Clear {});
    assert!(surface_sent(&actions).is_empty());
    assert!(s.store().is_empty());
}

// =============================================================
// Inbound decoding
// =============================================================

#[test]
fn malformed_inbound_is_dropped() {
    let mut s = open_session();
    assert!(s.receive_surface("{not json").is_empty());
    assert!(s.receive_surface(r#"{"type":"puzzle_piece_click","pieceIndex":1}"#).is_empty());
    assert!(s.receive_surface(r#"{"type":"move_image","id":"seven"}"#).is_empty());
    assert!(s.store().is_empty());
}

#[test]
fn inbound_text_is_decoded_and_applied() {
    let mut s = open_session();
    let actions = s.receive_surface(
        r#"{"type":"add_game_element","id":"game-1","gameName":"puzzles","x":5,"y":5,"width":400,"height":300}"#,
    );
    assert!(has(&actions, &Action::OpenGameChannel { frame: FrameId::from_counter(1), kind: GameKind::Puzzle }));
}
