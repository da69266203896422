//! Error types for graph edits and connector drag gestures.

use crate::types::TileId;
use thiserror::Error;

/// Errors raised while reading or editing the tile graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A connector points at a tile that is not on the canvas.
    ///
    /// This only happens when the delete cascade was bypassed, so it is never recovered from.
    #[error("Connector '{connector}' of tile '{source_tile}' targets missing tile '{target}'")]
    BrokenReference {
        /// Tile owning the connector
        source_tile: TileId,
        /// Connector name
        connector: String,
        /// The missing tile
        target: TileId,
    },

    /// A connection request was refused; the connector keeps its previous state.
    #[error("Cannot connect '{connector}' of tile '{source_tile}' to tile '{target}': {reason}")]
    InvalidConnection {
        /// Tile owning the connector
        source_tile: TileId,
        /// Connector name
        connector: String,
        /// Tile the connector was offered to
        target: TileId,
        /// Human-readable refusal
        reason: String,
    },

    /// An item type string that names no tile kind.
    #[error("Unknown tile kind '{0}'")]
    UnknownKind(String),

    /// No tile with this id is on the canvas.
    #[error("Tile '{0}' does not exist")]
    UnknownTile(TileId),

    /// The tile exists but declares no connector by this name.
    #[error("Tile '{tile}' has no connector named '{connector}'")]
    UnknownConnector {
        /// The tile looked in
        tile: TileId,
        /// The name asked for
        connector: String,
    },

    /// A saved program is well-formed JSON but not a valid program.
    #[error("Invalid program document: {0}")]
    InvalidDocument(String),

    /// A saved program is not readable JSON.
    #[error("Failed to parse program JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when connector drag events arrive out of order.
#[derive(Error, Debug)]
pub enum DragError {
    /// A drag started while another one was still active.
    #[error("Connector '{connector}' of tile '{tile}' is already being dragged")]
    AlreadyDragging {
        /// Owner of the connector already being dragged
        tile: TileId,
        /// Name of the connector already being dragged
        connector: String,
    },

    /// A move or stop arrived with no drag active.
    #[error("No connector is being dragged")]
    NotDragging,

    /// The drag touched a tile or connector the graph rejected.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
