//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning and zooming, tile dragging, connector
//! dragging and coordinate transformations between screen and world space.
//! Pointer input is converted to world space here and then handed to the
//! connector protocol in [`crate::interaction`].

use super::state::{CanvasGesture, TileCanvasApp};
use crate::connector::hit_box;
use crate::interaction::DropOutcome;
use crate::types::TileId;
use eframe::egui;
use log::warn;

impl TileCanvasApp {
    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Converts a world-space rectangle to screen space.
    pub fn world_rect_to_screen(&self, rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.world_to_screen(rect.min), self.world_to_screen(rect.max))
    }

    /// Handles middle-button canvas panning.
    pub fn handle_canvas_panning(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Middle) {
            self.canvas.offset += response.drag_delta();
        }
    }

    /// Handles scroll wheel zooming functionality.
    ///
    /// Zooms in/out while keeping the mouse cursor position fixed in world space.
    /// Zoom range is clamped between 0.25x and 5.0x.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }
        let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let world_pos_before_zoom = self.screen_to_world(mouse_pos);
        let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
        let old_zoom = self.canvas.zoom_factor;
        self.canvas.zoom_factor = (self.canvas.zoom_factor + zoom_delta).clamp(0.25, 5.0);

        if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
            // Keep the world point under the cursor where it was
            let world_pos_after_zoom = self.world_to_screen(world_pos_before_zoom);
            self.canvas.offset += mouse_pos - world_pos_after_zoom;
        }
    }

    /// Routes primary-button drags on the canvas to tile or connector gestures.
    pub fn handle_pointer_gestures(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let primary = egui::PointerButton::Primary;

        if response.drag_started_by(primary) {
            let press = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(press) = press {
                self.press_at(self.screen_to_world(press));
            }
        }

        if response.dragged_by(primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.drag_to(self.screen_to_world(pos));
            }
        }

        if response.drag_stopped() {
            self.release();
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.select_at(self.screen_to_world(pos));
            }
        }
    }

    /// Finds the connector handle under a world position, top-most tile first.
    pub fn find_handle_at_position(&self, pos: egui::Pos2) -> Option<(TileId, String)> {
        for instance in self.program.iter().rev() {
            for connector in instance.model.connectors() {
                let Ok(end) = self
                    .interaction
                    .endpoint(&self.program, instance.id(), &connector.name)
                else {
                    continue;
                };
                if hit_box(end, self.config.handle_size).contains(pos) {
                    return Some((instance.id(), connector.name.clone()));
                }
            }
        }
        None
    }

    /// Starts a gesture at a world position.
    ///
    /// Handles are drawn above tiles, so they are tested first.
    pub fn press_at(&mut self, world_pos: egui::Pos2) {
        if self.gesture != CanvasGesture::Idle {
            return;
        }

        if let Some((tile, connector)) = self.find_handle_at_position(world_pos) {
            match self.interaction.drag_start(&self.program, tile, &connector) {
                Ok(()) => {
                    self.gesture = CanvasGesture::DraggingConnector;
                    self.status = None;
                }
                Err(err) => warn!("Could not start connector drag: {err}"),
            }
            return;
        }

        if let Some(id) = self.program.tile_at(world_pos) {
            self.select_tile(Some(id));
            if let Some(instance) = self.program.get(id) {
                self.gesture = CanvasGesture::DraggingTile {
                    id,
                    grab_offset: instance.origin() - world_pos,
                };
            }
        }
    }

    /// Continues the current gesture with the pointer at a world position.
    pub fn drag_to(&mut self, world_pos: egui::Pos2) {
        match self.gesture {
            CanvasGesture::Idle => {}
            CanvasGesture::DraggingTile { id, grab_offset } => {
                if let Err(err) = self.program.move_tile(id, world_pos + grab_offset) {
                    warn!("Dragged tile vanished: {err}");
                    self.gesture = CanvasGesture::Idle;
                }
            }
            CanvasGesture::DraggingConnector => {
                if let Err(err) = self
                    .interaction
                    .drag_move(&mut self.program, &self.config, world_pos)
                {
                    warn!("Connector drag failed: {err}");
                }
            }
        }
    }

    /// Ends the current gesture.
    pub fn release(&mut self) {
        let gesture = std::mem::take(&mut self.gesture);
        if gesture != CanvasGesture::DraggingConnector {
            return;
        }
        match self.interaction.drag_stop(&mut self.program, &self.config) {
            Ok(DropOutcome::Rejected { error, .. }) => self.status = Some(error.to_string()),
            Ok(_) => self.status = None,
            Err(err) => warn!("Connector drop failed: {err}"),
        }
    }

    /// Selects the tile under a world position, or clears the selection.
    pub fn select_at(&mut self, world_pos: egui::Pos2) {
        let id = self.program.tile_at(world_pos);
        self.select_tile(id);
    }

    /// Selects a tile. Stacking order is insertion order and never changes here.
    pub fn select_tile(&mut self, id: Option<TileId>) {
        self.selected_tile = id.filter(|id| self.program.contains(*id));
    }

    /// Deletes the selected tile, unbinding every connector that pointed at it.
    pub fn delete_selected_tile(&mut self) {
        let Some(id) = self.selected_tile.take() else {
            return;
        };
        let was_dragging = self.interaction.is_dragging_connector();
        self.interaction.delete_tile(&mut self.program, id);
        if was_dragging && !self.interaction.is_dragging_connector() {
            self.gesture = CanvasGesture::Idle;
        }
        if matches!(self.gesture, CanvasGesture::DraggingTile { id: dragged, .. } if dragged == id) {
            self.gesture = CanvasGesture::Idle;
        }
    }

    /// World position at the centre of the visible canvas.
    pub fn view_center_world(&self) -> egui::Pos2 {
        let screen_center = self
            .canvas
            .viewport
            .map(|rect| rect.center())
            .unwrap_or_else(|| self.canvas.offset.to_pos2());
        self.screen_to_world(screen_center)
    }
}
