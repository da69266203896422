use super::state::{CanvasGesture, APP_STATE_KEY};
use super::*;
use crate::constants::GRID_SIZE;
use crate::types::{TileId, TileKind};
use eframe::egui;

/// Run a single headless egui frame with the provided input events and closure.
fn run_ui_with(events: Vec<egui::Event>, mut f: impl FnMut(&egui::Context)) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.events = events;

    let ctx = egui::Context::default();
    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        f(ctx);
    })
}

/// App with screen space equal to world space and a tile of `kind` at `origin`.
fn app_with_tile(kind: TileKind, origin: (f32, f32)) -> (TileCanvasApp, TileId) {
    let mut app = TileCanvasApp::default();
    app.canvas.offset = egui::Vec2::ZERO;
    app.canvas.zoom_factor = 1.0;
    let id = app
        .program
        .add_tile(kind, egui::pos2(origin.0, origin.1), &app.config);
    (app, id)
}

#[test]
fn dragging_handle_onto_tile_binds_connector() {
    // Start at (0,0): anchor (75,30), "next" handle straight down at (75,130)
    let (mut app, start) = app_with_tile(TileKind::EntryPoint, (0.0, 0.0));
    let print = app
        .program
        .add_tile(TileKind::PrintConsole, egui::pos2(300.0, 300.0), &app.config);

    app.press_at(egui::pos2(75.0, 130.0));
    assert_eq!(app.gesture, CanvasGesture::DraggingConnector);
    assert!(app.interaction.is_dragging_connector());

    app.drag_to(egui::pos2(375.0, 330.0));
    assert_eq!(app.program.hovered_tile(), Some(print));

    app.release();
    assert_eq!(app.gesture, CanvasGesture::Idle);
    assert!(!app.interaction.is_dragging_connector());
    assert_eq!(app.program.hovered_tile(), None);
    let connector = app.program.connector(start, "next").unwrap();
    assert_eq!(connector.target_id, Some(print));
    assert!(app.status.is_none());
}

#[test]
fn refused_drop_reports_status_and_keeps_connector_free() {
    let (mut app, print) = app_with_tile(TileKind::PrintConsole, (0.0, 0.0));
    let start = app
        .program
        .add_tile(TileKind::EntryPoint, egui::pos2(300.0, 300.0), &app.config);

    app.press_at(egui::pos2(75.0, 130.0));
    app.drag_to(egui::pos2(375.0, 330.0));
    assert_eq!(app.program.hovered_tile(), Some(start));
    app.release();

    assert!(app.status.is_some(), "a refused connection should be reported");
    assert!(!app.program.connector(print, "next").unwrap().is_bound());
    assert_eq!(app.program.hovered_tile(), None);
}

#[test]
fn dropping_bound_connector_on_empty_canvas_frees_it() {
    let (mut app, start) = app_with_tile(TileKind::EntryPoint, (0.0, 0.0));
    let print = app
        .program
        .add_tile(TileKind::PrintConsole, egui::pos2(300.0, 300.0), &app.config);
    app.program
        .connect(start, "next", print, &app.config)
        .unwrap();

    // A bound handle sits on the target's centre
    app.press_at(egui::pos2(375.0, 330.0));
    assert_eq!(app.gesture, CanvasGesture::DraggingConnector);
    app.drag_to(egui::pos2(-300.0, 30.0));
    app.release();

    assert!(!app.program.connector(start, "next").unwrap().is_bound());
    let end = app
        .interaction
        .endpoint(&app.program, start, "next")
        .unwrap();
    assert!((end.x - -300.0).abs() < 0.01, "end should stay where it was dropped, got {end:?}");
    assert!((end.y - 30.0).abs() < 0.01, "end should stay where it was dropped, got {end:?}");
}

#[test]
fn clicking_handle_without_moving_keeps_binding() {
    let (mut app, start) = app_with_tile(TileKind::EntryPoint, (0.0, 0.0));
    let print = app
        .program
        .add_tile(TileKind::PrintConsole, egui::pos2(300.0, 300.0), &app.config);
    app.program
        .connect(start, "next", print, &app.config)
        .unwrap();

    app.press_at(egui::pos2(375.0, 330.0));
    app.release();

    assert_eq!(
        app.program.connector(start, "next").unwrap().target_id,
        Some(print)
    );
}

#[test]
fn dragging_tile_body_moves_tile() {
    let (mut app, id) = app_with_tile(TileKind::PrintConsole, (0.0, 0.0));

    app.press_at(egui::pos2(10.0, 10.0));
    assert!(matches!(app.gesture, CanvasGesture::DraggingTile { id: dragged, .. } if dragged == id));
    assert_eq!(app.selected_tile, Some(id));

    app.drag_to(egui::pos2(110.0, 60.0));
    app.release();

    let instance = app.program.get(id).unwrap();
    assert_eq!(instance.origin(), egui::pos2(100.0, 50.0));
    assert_eq!(app.gesture, CanvasGesture::Idle);
}

#[test]
fn clicking_canvas_selects_top_most_tile() {
    let (mut app, lower) = app_with_tile(TileKind::Conditional, (0.0, 0.0));
    let upper = app
        .program
        .add_tile(TileKind::Loop, egui::pos2(50.0, 20.0), &app.config);

    app.select_at(egui::pos2(60.0, 30.0));
    assert_eq!(app.selected_tile, Some(upper));

    app.select_at(egui::pos2(10.0, 10.0));
    assert_eq!(app.selected_tile, Some(lower));

    // Selection leaves the stacking order alone
    assert_eq!(app.program.ids(), &[lower, upper]);
    app.select_at(egui::pos2(60.0, 30.0));
    assert_eq!(app.selected_tile, Some(upper));

    app.select_at(egui::pos2(-500.0, -500.0));
    assert_eq!(app.selected_tile, None);
}

#[test]
fn selecting_older_tile_does_not_steal_drop_from_newer_one() {
    let (mut app, start) = app_with_tile(TileKind::EntryPoint, (0.0, 0.0));
    let older = app
        .program
        .add_tile(TileKind::PrintConsole, egui::pos2(250.0, 280.0), &app.config);
    let newer = app
        .program
        .add_tile(TileKind::ExitPoint, egui::pos2(280.0, 290.0), &app.config);

    // Grabbing the older tile selects it
    app.press_at(egui::pos2(255.0, 285.0));
    app.release();
    assert_eq!(app.selected_tile, Some(older));

    app.press_at(egui::pos2(75.0, 130.0));
    app.drag_to(egui::pos2(300.0, 300.0));
    assert_eq!(app.program.hovered_tile(), Some(newer));
    app.release();

    assert_eq!(
        app.program.connector(start, "next").unwrap().target_id,
        Some(newer)
    );
}

#[test]
fn deleting_selected_tile_unbinds_incoming_connectors() {
    let (mut app, start) = app_with_tile(TileKind::EntryPoint, (0.0, 0.0));
    let print = app
        .program
        .add_tile(TileKind::PrintConsole, egui::pos2(300.0, 300.0), &app.config);
    app.program
        .connect(start, "next", print, &app.config)
        .unwrap();

    app.select_tile(Some(print));
    app.delete_selected_tile();

    assert!(!app.program.contains(print));
    assert_eq!(app.selected_tile, None);
    assert!(!app.program.connector(start, "next").unwrap().is_bound());
    assert!(app.interaction.endpoint(&app.program, start, "next").is_ok());
}

#[test]
fn deleting_tile_mid_drag_abandons_gesture() {
    let (mut app, start) = app_with_tile(TileKind::EntryPoint, (0.0, 0.0));
    app.press_at(egui::pos2(75.0, 130.0));
    app.drag_to(egui::pos2(75.0, 400.0));

    app.selected_tile = Some(start);
    app.delete_selected_tile();

    assert_eq!(app.gesture, CanvasGesture::Idle);
    assert!(!app.interaction.is_dragging_connector());
    assert!(app.program.is_empty());
}

#[test]
fn palette_adds_staggered_tiles_at_view_center() {
    let mut app = TileCanvasApp::default();

    app.add_tile_at_view_center(TileKind::EntryPoint);
    app.add_tile_at_view_center(TileKind::ExitPoint);

    let ids = app.program.ids().to_vec();
    assert_eq!(ids.len(), 2);
    let first = app.program.get(ids[0]).unwrap();
    let second = app.program.get(ids[1]).unwrap();
    assert_eq!(first.center(), egui::pos2(0.0, 0.0));
    assert_eq!(second.origin() - first.origin(), egui::vec2(GRID_SIZE, GRID_SIZE));
    assert_eq!(app.selected_tile, Some(ids[1]));
}

#[test]
fn app_state_round_trips_through_json() {
    let (mut app, start) = app_with_tile(TileKind::EntryPoint, (0.0, 0.0));
    let print = app
        .program
        .add_tile(TileKind::PrintConsole, egui::pos2(300.0, 300.0), &app.config);
    app.program
        .connect(start, "next", print, &app.config)
        .unwrap();
    app.canvas.zoom_factor = 2.0;
    app.dark_mode = true;

    let json = app.to_json().unwrap();
    let restored = TileCanvasApp::from_json(&json).unwrap();

    assert_eq!(restored.program.ids(), app.program.ids());
    assert_eq!(
        restored.program.connector(start, "next").unwrap().target_id,
        Some(print)
    );
    assert_eq!(restored.canvas.zoom_factor, 2.0);
    assert!(restored.dark_mode);
    assert_eq!(restored.gesture, CanvasGesture::Idle);
}

#[test]
fn restore_without_storage_starts_empty() {
    let app = TileCanvasApp::restore(None);
    assert!(app.program.is_empty());
    assert_eq!(app.canvas.zoom_factor, 1.0);
    assert_eq!(APP_STATE_KEY, "app_state");
}

#[test]
fn first_canvas_frame_centres_origin() {
    let mut app = TileCanvasApp::default();
    app.add_tile_at_view_center(TileKind::Conditional);

    run_ui_with(vec![], |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });

    let viewport = app.canvas.viewport.expect("canvas should record its viewport");
    assert_eq!(app.canvas.offset, viewport.center().to_vec2());
    assert_eq!(app.gesture, CanvasGesture::Idle);
}
