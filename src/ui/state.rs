//! Application state management structures.
//!
//! This module contains the state that the canvas front-end keeps next to the
//! program itself: pan/zoom navigation, the pointer gesture in progress and the
//! current selection.

use crate::config::CanvasConfig;
use crate::interaction::InteractionState;
use crate::program::Program;
use crate::types::TileId;
use eframe::egui;
use log::warn;
use serde::{Deserialize, Serialize};

/// Storage key the app state is persisted under.
pub const APP_STATE_KEY: &str = "app_state";

/// State related to canvas navigation and display.
///
/// Tracks the current pan offset and zoom level of the canvas.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current canvas pan offset for navigation (in screen space)
    #[serde(skip)]
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom)
    pub zoom_factor: f32,
    /// Screen rectangle the canvas occupied last frame
    #[serde(skip)]
    pub viewport: Option<egui::Rect>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            viewport: None,
        }
    }
}

/// The pointer gesture currently in progress on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CanvasGesture {
    /// No button held
    #[default]
    Idle,
    /// A tile is following the pointer
    DraggingTile {
        /// The tile being moved
        id: TileId,
        /// Offset from the pointer to the tile's top-left corner (world units)
        grab_offset: egui::Vec2,
    },
    /// A connector end is following the pointer; see [`InteractionState`]
    DraggingConnector,
}

/// The main application structure containing UI state and the program being edited.
///
/// This struct implements the `eframe::App` trait and handles all user interface
/// rendering and interaction logic.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct TileCanvasApp {
    /// The program being edited
    pub program: Program,
    /// Canvas and connector settings
    pub config: CanvasConfig,
    /// Canvas navigation state
    pub canvas: CanvasState,
    /// Connector drag state shared with the core protocol
    #[serde(skip)]
    pub interaction: InteractionState,
    /// Pointer gesture in progress
    #[serde(skip)]
    pub gesture: CanvasGesture,
    /// Currently selected tile, if any
    #[serde(skip)]
    pub selected_tile: Option<TileId>,
    /// Feedback for the last refused connection, shown in the status bar
    #[serde(skip)]
    pub status: Option<String>,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
}

impl Default for TileCanvasApp {
    fn default() -> Self {
        Self {
            program: Program::default(),
            config: CanvasConfig::default(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            gesture: CanvasGesture::default(),
            selected_tile: None,
            status: None,
            dark_mode: false,
        }
    }
}

impl TileCanvasApp {
    /// Serializes the application state to JSON.
    ///
    /// # Returns
    ///
    /// A JSON string representation of the app state, or an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    ///
    /// Free connector geometry is not persisted, so it is recomputed from the
    /// restored config's minimum reach.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut app: Self = serde_json::from_str(json)?;
        app.program
            .reset_free_geometry(app.config.min_connector_length);
        Ok(app)
    }

    /// Restores the app from eframe storage, falling back to a fresh canvas.
    pub fn restore(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(json) = storage.and_then(|s| s.get_string(APP_STATE_KEY)) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(app) => app,
            Err(err) => {
                warn!("Discarding stored app state: {err}");
                Self::default()
            }
        }
    }
}
