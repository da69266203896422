//! # Tile Canvas
//!
//! A visual-programming canvas where programs are built from tiles joined by
//! named connectors. Each tile kind declares its outgoing connectors:
//! - **Start / Exit**: entry and exit points of the program
//! - **Conditional / Loop**: branch on a condition attribute
//! - **Create variable / Print**: simple statements with a single `next`
//!
//! ## Features
//! - Dragging a connector's end onto a tile binds it; dropping it on empty canvas frees it
//! - Free connector ends keep their bearing and reach when their tile moves
//! - Bound connectors follow their target tile
//! - Deleting a tile unbinds every connector that pointed at it
//! - Canvas panning and zooming, with state persisted between runs

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod connector;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod program;
pub mod types;
mod ui;

// Re-export public types and functions
pub use config::CanvasConfig;
pub use error::{DragError, GraphError};
pub use interaction::{ConnectorRef, DropOutcome, InteractionState};
pub use program::Program;
pub use types::*;
pub use ui::TileCanvasApp;

/// Runs the tile canvas application.
///
/// The previous session's canvas is restored from eframe storage when present.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use tile_canvas::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Tile Canvas",
        options,
        Box::new(|cc| Ok(Box::new(TileCanvasApp::restore(cc.storage)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_default() {
        let program = Program::default();
        assert!(program.is_empty());
        assert_eq!(program.hovered_tile(), None);
    }

    #[test]
    fn test_interaction_starts_idle() {
        let interaction = InteractionState::new();
        assert!(!interaction.is_dragging_connector());
        assert!(interaction.active_connector().is_none());
    }
}
