//! The connector drag protocol.
//!
//! A drag gesture is strictly `start`, any number of `move`s, then one `stop`.
//! [`InteractionState`] carries the shared "a connector is being dragged" flag
//! and the identity of the dragged connector, and is passed explicitly into each
//! handler together with the [`Program`] it edits.

use crate::config::CanvasConfig;
use crate::connector::{free_endpoint, handle_overlapping_tiles, resolve_endpoint, track_pointer};
use crate::error::{DragError, GraphError};
use crate::program::Program;
use crate::types::*;
use egui::Pos2;
use log::{debug, warn};

/// Identifies one connector of one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorRef {
    /// The owning tile
    pub tile: TileId,
    /// Connector name within the tile
    pub connector: String,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    target: ConnectorRef,
    moved: bool,
}

/// Result of releasing a dragged connector.
#[derive(Debug)]
pub enum DropOutcome {
    /// Dropped on a tile and now bound to it
    Bound {
        /// The tile the connector now targets
        target: TileId,
    },
    /// Dropped on a tile that refused the connection; the connector kept its previous binding
    Rejected {
        /// The tile the connector was dropped on
        target: TileId,
        /// Why the connection was refused
        error: GraphError,
    },
    /// Dropped on empty canvas; the connector is free where it was released
    Free {
        /// The tile it was bound to before the gesture, if any
        previous_target: Option<TileId>,
    },
    /// Released without moving; nothing changed
    Unchanged,
}

/// Drag state shared by every connector on one canvas.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    is_dragging_connector: bool,
    active: Option<ActiveDrag>,
}

impl InteractionState {
    /// Creates an idle interaction state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set while any connector is being dragged, so other canvas gestures stay inactive.
    pub fn is_dragging_connector(&self) -> bool {
        self.is_dragging_connector
    }

    /// The connector currently being dragged.
    pub fn active_connector(&self) -> Option<&ConnectorRef> {
        self.active.as_ref().map(|drag| &drag.target)
    }

    /// Whether `connector` of `tile` is the one being dragged.
    pub fn is_dragging(&self, tile: TileId, connector: &str) -> bool {
        self.active_connector()
            .is_some_and(|active| active.tile == tile && active.connector == connector)
    }

    /// Begins dragging a connector's end.
    ///
    /// # Errors
    ///
    /// [`DragError::AlreadyDragging`] if another drag is still active, or a graph
    /// error if the connector doesn't exist. The state is unchanged on error.
    pub fn drag_start(
        &mut self,
        program: &Program,
        tile: TileId,
        connector: &str,
    ) -> Result<(), DragError> {
        if let Some(active) = &self.active {
            return Err(DragError::AlreadyDragging {
                tile: active.target.tile,
                connector: active.target.connector.clone(),
            });
        }
        program.connector(tile, connector)?;

        self.is_dragging_connector = true;
        self.active = Some(ActiveDrag {
            target: ConnectorRef {
                tile,
                connector: connector.to_string(),
            },
            moved: false,
        });
        debug!("Started dragging '{connector}' of {tile}");
        Ok(())
    }

    /// Follows the pointer with the dragged connector's end and refreshes hover highlights.
    ///
    /// # Returns
    ///
    /// The new position of the connector's end
    pub fn drag_move(
        &mut self,
        program: &mut Program,
        config: &CanvasConfig,
        pointer: Pos2,
    ) -> Result<Pos2, DragError> {
        let active = self.active.as_mut().ok_or(DragError::NotDragging)?;
        let tile = active.target.tile;
        let anchor = program.anchor(tile)?;
        let geometry = track_pointer(anchor, pointer, config.min_connector_length);
        program.set_free_geometry(tile, &active.target.connector, geometry)?;
        active.moved = true;

        let end = free_endpoint(anchor, &geometry);
        handle_overlapping_tiles(program, end, config.handle_size, tile);
        Ok(end)
    }

    /// Releases the dragged connector.
    ///
    /// If a tile is highlighted the connector is bound to it; otherwise the
    /// connector is left free where it was released.
    pub fn drag_stop(
        &mut self,
        program: &mut Program,
        config: &CanvasConfig,
    ) -> Result<DropOutcome, DragError> {
        let active = self.active.take().ok_or(DragError::NotDragging)?;
        self.is_dragging_connector = false;
        let ConnectorRef { tile, connector } = active.target;

        if !active.moved {
            program.clear_hover();
            debug!("Released '{connector}' of {tile} without moving");
            return Ok(DropOutcome::Unchanged);
        }

        let Some(target) = program.hovered_tile() else {
            let previous_target = program.unbind(tile, &connector)?;
            debug!("Dropped '{connector}' of {tile} on empty canvas");
            return Ok(DropOutcome::Free { previous_target });
        };

        // The hover is consumed by the drop whatever the outcome
        program.clear_hover();
        match program.connect(tile, &connector, target, config) {
            Ok(()) => Ok(DropOutcome::Bound { target }),
            Err(error @ GraphError::InvalidConnection { .. }) => {
                warn!("{error}");
                Ok(DropOutcome::Rejected { target, error })
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Where a connector's end should be drawn right now.
    ///
    /// Once the pointer has moved, the dragged connector follows its live free
    /// geometry even when bound; every other connector resolves normally.
    pub fn endpoint(
        &self,
        program: &Program,
        tile: TileId,
        connector: &str,
    ) -> Result<Pos2, GraphError> {
        let following_pointer = self
            .active
            .as_ref()
            .is_some_and(|drag| {
                drag.moved && drag.target.tile == tile && drag.target.connector == connector
            });
        if following_pointer {
            let anchor = program.anchor(tile)?;
            let slot = program.connector(tile, connector)?;
            return Ok(free_endpoint(anchor, &slot.free));
        }
        resolve_endpoint(program, tile, connector)
    }

    /// Deletes a tile, abandoning any drag that belonged to it.
    ///
    /// Hover highlights are cleared so no stale drop target survives the deletion.
    pub fn delete_tile(&mut self, program: &mut Program, id: TileId) -> Option<TileInstance> {
        if self.active_connector().is_some_and(|active| active.tile == id) {
            debug!("Abandoning connector drag of deleted tile {id}");
            self.active = None;
            self.is_dragging_connector = false;
        }
        program.clear_hover();
        program.remove_tile(id)
    }
}
