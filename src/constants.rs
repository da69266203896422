//! Shared application-wide constants.
//! Centralizes tweakable values used by the tile model, the connector protocol and the canvas.

// Tile dimensions
/// Default tile width in world units.
pub const TILE_WIDTH: f32 = 150.0;
/// Default tile height in world units.
pub const TILE_HEIGHT: f32 = 60.0;
/// Corner radius for tile rectangles (in screen pixels after transform).
pub const TILE_CORNER_RADIUS: f32 = 4.0;

// Connectors
/// Side length of the square drag handle at a connector's free end, in world units.
/// Also the size of the hit-box used for hover resolution.
pub const CONNECTOR_HANDLE_SIZE: f32 = 25.0;
/// Minimum distance between a connector's anchor and its free end.
/// Keeps the handle from being drawn underneath its own tile.
pub const MIN_CONNECTOR_LENGTH: f32 = 100.0;
/// Bearing of a tile's first connector when the tile is created (straight down).
pub const DEFAULT_CONNECTOR_BEARING: f32 = 180.0;
/// Angular spacing between the default bearings of a tile's connectors.
pub const CONNECTOR_FAN_DEGREES: f32 = 45.0;
/// Lines longer than this are labelled at their midpoint instead of beside the handle.
pub const LABEL_MIDPOINT_THRESHOLD: f32 = 200.0;
/// Offset of a short line's label from the handle.
pub const LABEL_OFFSET: f32 = 25.0;
/// Extra downward offset for labels below the anchor, leaving room for the glyph height.
pub const LABEL_BELOW_EXTRA: f32 = 15.0;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;
