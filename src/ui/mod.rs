//! User interface components and rendering logic for the tile canvas.
//!
//! This module contains the main application struct, the palette and property
//! panels, canvas rendering, and pointer handling. All graph rules live in the
//! core modules; the UI only forwards gestures to them.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main TileCanvasApp
//! - `canvas` - Canvas navigation, zooming, panning, and pointer gestures
//! - `rendering` - Drawing tiles, connectors, handles, and the grid

mod canvas;
mod rendering;
mod state;

pub use state::TileCanvasApp;

use self::state::APP_STATE_KEY;

use crate::types::TileKind;
use eframe::egui;
use log::warn;

impl eframe::App for TileCanvasApp {
    /// Persist entire app state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string(APP_STATE_KEY, json),
            Err(err) => warn!("Failed to serialize app state: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// Lays out the palette/properties panel, the status bar and the canvas.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_delete_key(ctx);

        egui::SidePanel::left("palette_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_palette(ui);
                ui.separator();
                self.draw_properties_panel(ui);
            });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} tile(s)", self.program.len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 60), status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl TileCanvasApp {
    /// Handles delete key presses to remove the selected tile.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        // Text fields in the properties panel get the key first
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            self.delete_selected_tile();
        }
    }

    /// Lists every tile kind; clicking one drops a new tile at the centre of the view.
    fn draw_palette(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tiles");
        for kind in TileKind::ALL {
            if ui.button(kind.display_name()).clicked() {
                self.add_tile_at_view_center(kind);
            }
        }
        ui.separator();
        ui.checkbox(&mut self.config.show_grid, "Show grid");
        ui.checkbox(&mut self.dark_mode, "Dark mode");
    }

    /// Places a new tile centred in the visible canvas and selects it.
    pub fn add_tile_at_view_center(&mut self, kind: TileKind) {
        let center = self.view_center_world();
        // Stagger so repeated clicks don't stack tiles exactly on top of each other
        let stagger = (self.program.len() % 5) as f32 * crate::constants::GRID_SIZE;
        let origin = egui::pos2(
            center.x - self.config.tile_width / 2.0 + stagger,
            center.y - self.config.tile_height / 2.0 + stagger,
        );
        let id = self.program.add_tile(kind, origin, &self.config);
        self.select_tile(Some(id));
    }

    /// Shows the selected tile's title, attributes and connector bindings.
    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        let Some(id) = self.selected_tile else {
            ui.label("Select a tile to edit it.");
            return;
        };
        let Some(instance) = self.program.get(id) else {
            self.selected_tile = None;
            return;
        };

        let mut title = instance.model.title.clone();
        let attributes: Vec<(String, String)> = instance
            .model
            .attributes
            .iter()
            .map(|(name, value)| {
                let text = value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string());
                (name.clone(), text)
            })
            .collect();
        let bindings: Vec<(String, Option<String>)> = instance
            .model
            .connectors()
            .iter()
            .map(|connector| {
                let target = connector
                    .target_id
                    .and_then(|target| self.program.get(target))
                    .map(|target| target.model.title.clone());
                (connector.name.clone(), target)
            })
            .collect();

        ui.label(format!("Kind: {}", instance.model.kind.display_name()));
        ui.horizontal(|ui| {
            ui.label("Title:");
            if ui.text_edit_singleline(&mut title).changed() {
                if let Err(err) = self.program.set_title(id, title.clone()) {
                    warn!("Cannot rename tile: {err}");
                }
            }
        });

        for (name, mut text) in attributes {
            ui.horizontal(|ui| {
                ui.label(format!("{name}:"));
                if ui.text_edit_singleline(&mut text).changed() {
                    if let Err(err) =
                        self.program
                            .set_attribute(id, name.clone(), serde_json::Value::String(text.clone()))
                    {
                        warn!("Cannot edit attribute: {err}");
                    }
                }
            });
        }

        if !bindings.is_empty() {
            ui.separator();
            ui.label("Connectors");
        }
        for (name, target) in bindings {
            ui.horizontal(|ui| {
                match target {
                    Some(target) => {
                        ui.label(format!("{name} → {target}"));
                        if ui.small_button("Disconnect").clicked() {
                            if let Err(err) = self.program.unbind(id, &name) {
                                warn!("Cannot disconnect: {err}");
                            }
                        }
                    }
                    None => {
                        ui.label(format!("{name} (free)"));
                    }
                }
            });
        }
    }

    /// Renders the main canvas area and handles user interactions on it.
    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        // Center the origin on the first frame
        if self.canvas.viewport.is_none() && self.canvas.offset == egui::Vec2::ZERO {
            self.canvas.offset = response.rect.center().to_vec2();
        }
        self.canvas.viewport = Some(response.rect);

        self.handle_canvas_panning(&response);
        self.handle_canvas_zoom(ui, &response);
        self.handle_pointer_gestures(ui, &response);

        self.render_canvas_elements(&painter, response.rect);
    }
}

#[cfg(test)]
mod tests;
