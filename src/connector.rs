//! Connector endpoint resolution and drop-target hover tracking.
//!
//! A free connector's far end is derived from its anchor and cached
//! [`FreeGeometry`]; a bound connector's far end is the centre of its target tile.
//! While a connector is dragged, [`handle_overlapping_tiles`] keeps at most one
//! tile highlighted as the drop target.

use crate::error::GraphError;
use crate::geometry;
use crate::program::Program;
use crate::types::*;
use egui::Pos2;
use log::{debug, warn};

/// Far end of a free connector anchored at `anchor`.
pub fn free_endpoint(anchor: Pos2, free: &FreeGeometry) -> Pos2 {
    geometry::endpoint(anchor, free.degrees, free.length)
}

/// Resolves where a connector's far end is drawn.
///
/// Bound connectors end at the centre of their target; free ones at their cached
/// bearing and length from the owning tile's current anchor. The free geometry is
/// left untouched in both cases.
///
/// # Errors
///
/// [`GraphError::BrokenReference`] if the target tile no longer exists, plus the
/// lookup errors for an unknown tile or connector.
pub fn resolve_endpoint(program: &Program, tile: TileId, connector: &str) -> Result<Pos2, GraphError> {
    let anchor = program.anchor(tile)?;
    let slot = program.connector(tile, connector)?;
    match slot.target_id {
        Some(target) => match program.get(target) {
            Some(instance) => Ok(instance.center()),
            None => {
                warn!("Connector '{connector}' of {tile} targets missing tile {target}");
                Err(GraphError::BrokenReference {
                    source_tile: tile,
                    connector: connector.to_string(),
                    target,
                })
            }
        },
        None => Ok(free_endpoint(anchor, &slot.free)),
    }
}

/// Free geometry for a connector whose end is being dragged to `pointer`.
///
/// The length never drops below `min_length`, so the handle stays clear of its own tile.
pub fn track_pointer(anchor: Pos2, pointer: Pos2, min_length: f32) -> FreeGeometry {
    FreeGeometry {
        degrees: geometry::bearing(anchor, pointer),
        length: geometry::distance(anchor, pointer).max(min_length),
    }
}

/// Square hit-box of side `size` centred on a connector's end.
pub fn hit_box(end: Pos2, size: f32) -> egui::Rect {
    egui::Rect::from_center_size(end, egui::vec2(size, size))
}

/// Marks the top-most tile under a dragged connector's end as hovered.
///
/// Tiles are scanned top-most first; the first overlap wins and every other tile,
/// including the connector's own tile `ignore`, is cleared in the same pass.
///
/// # Returns
///
/// The hovered tile, if any
pub fn handle_overlapping_tiles(
    program: &mut Program,
    end: Pos2,
    handle_size: f32,
    ignore: TileId,
) -> Option<TileId> {
    let hit = hit_box(end, handle_size);
    let mut found = None;
    program.for_each_top_down_mut(|instance| {
        let overlaps = found.is_none()
            && instance.id() != ignore
            && geometry::rect_overlap(
                hit.min,
                hit.width(),
                hit.height(),
                instance.origin(),
                instance.width,
                instance.height,
            );
        if overlaps {
            found = Some(instance.id());
        }
        if instance.is_connector_hovering != overlaps {
            debug!("Hover on tile {} set to {overlaps}", instance.id());
        }
        instance.is_connector_hovering = overlaps;
    });
    found
}
