//! Canvas rendering functionality for tiles, connectors, and grid.
//!
//! This module handles all drawing operations including the grid background,
//! tile rectangles with their hover/selection highlights, and connector lines
//! with their captions and drag handles.

use super::state::TileCanvasApp;
use crate::connector::hit_box;
use crate::geometry::{distance, label_position};
use crate::types::{TileInstance, TileKind};
use eframe::egui;
use eframe::epaint::StrokeKind;
use log::warn;

/// Fill colour of a tile kind.
pub fn tile_fill(kind: TileKind) -> egui::Color32 {
    match kind {
        TileKind::EntryPoint => egui::Color32::from_rgb(0xff, 0xff, 0xff),
        TileKind::ExitPoint => egui::Color32::from_rgb(0xff, 0x9e, 0x8c),
        TileKind::Conditional => egui::Color32::from_rgb(0xd1, 0xf4, 0xff),
        TileKind::Loop => egui::Color32::from_rgb(0xab, 0xff, 0xa1),
        TileKind::InitVariable => egui::Color32::from_rgb(0xff, 0xff, 0xa6),
        TileKind::PrintConsole => egui::Color32::from_rgb(0xe4, 0xd4, 0xff),
    }
}

impl TileCanvasApp {
    /// Renders all canvas elements (grid, tiles, then connectors) on the canvas.
    ///
    /// Connectors are drawn last so their handles stay visible and grabbable
    /// above every tile.
    pub fn render_canvas_elements(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.config.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        for instance in self.program.iter() {
            self.draw_tile(painter, instance);
        }

        for instance in self.program.iter() {
            self.draw_connectors(painter, instance);
        }
    }

    /// Draws a zoom-aware grid on the canvas for visual reference.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let grid_size = crate::constants::GRID_SIZE;
        let screen_grid_size = grid_size * self.canvas.zoom_factor;
        if screen_grid_size < 2.0 {
            // Grid too small to see clearly
            return;
        }
        let stroke = egui::Stroke::new(
            1.0,
            egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32),
        );

        let top_left_world = self.screen_to_world(canvas_rect.min);
        let bottom_right_world = self.screen_to_world(canvas_rect.max);

        let mut x = (top_left_world.x / grid_size).floor() * grid_size;
        while x <= bottom_right_world.x {
            let screen_x = self.world_to_screen(egui::pos2(x, 0.0)).x;
            painter.line_segment(
                [
                    egui::pos2(screen_x, canvas_rect.min.y),
                    egui::pos2(screen_x, canvas_rect.max.y),
                ],
                stroke,
            );
            x += grid_size;
        }

        let mut y = (top_left_world.y / grid_size).floor() * grid_size;
        while y <= bottom_right_world.y {
            let screen_y = self.world_to_screen(egui::pos2(0.0, y)).y;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, screen_y),
                    egui::pos2(canvas_rect.max.x, screen_y),
                ],
                stroke,
            );
            y += grid_size;
        }
    }

    /// Draws one tile with its title, highlighting drop targets and the selection.
    pub fn draw_tile(&self, painter: &egui::Painter, instance: &TileInstance) {
        let rect = self.world_rect_to_screen(instance.rect());
        let corner_radius = crate::constants::TILE_CORNER_RADIUS * self.canvas.zoom_factor;

        painter.rect_filled(rect, corner_radius, tile_fill(instance.model.kind));

        let stroke = if instance.is_connector_hovering {
            egui::Stroke::new(3.0, egui::Color32::from_rgb(100, 150, 255))
        } else if self.selected_tile == Some(instance.id()) {
            egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 165, 0))
        } else {
            egui::Stroke::new(1.0, egui::Color32::BLACK)
        };
        painter.rect_stroke(rect, corner_radius, stroke, StrokeKind::Inside);

        let font_size = (16.0 * self.canvas.zoom_factor).clamp(6.0, 48.0);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &instance.model.title,
            egui::FontId::proportional(font_size),
            egui::Color32::BLACK,
        );
    }

    /// Draws every connector of a tile: line, caption and drag handle.
    pub fn draw_connectors(&self, painter: &egui::Painter, instance: &TileInstance) {
        let line_color = if self.dark_mode {
            egui::Color32::from_gray(220)
        } else {
            egui::Color32::BLACK
        };
        let start = instance.center();

        for connector in instance.model.connectors() {
            let end = match self
                .interaction
                .endpoint(&self.program, instance.id(), &connector.name)
            {
                Ok(end) => end,
                Err(err) => {
                    warn!("Skipping connector: {err}");
                    continue;
                }
            };

            let start_screen = self.world_to_screen(start);
            let end_screen = self.world_to_screen(end);
            painter.line_segment(
                [start_screen, end_screen],
                egui::Stroke::new(1.5 * self.canvas.zoom_factor, line_color),
            );

            let label = label_position(start, end, distance(start, end));
            let font_size = (14.0 * self.canvas.zoom_factor).clamp(6.0, 40.0);
            painter.text(
                self.world_to_screen(label),
                egui::Align2::CENTER_CENTER,
                &connector.name,
                egui::FontId::proportional(font_size),
                line_color,
            );

            let handle = self.world_rect_to_screen(hit_box(end, self.config.handle_size));
            painter.rect_filled(handle, 0.0, line_color);
        }
    }
}
