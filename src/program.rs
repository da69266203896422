//! The program arena: every tile on the canvas, keyed by id, in render order.
//!
//! [`Program`] is the single source of truth for tile existence. Connectors refer
//! to their targets by id, so existence checks and broken-reference detection are
//! map lookups, and deleting a tile cascades by unbinding everything that pointed
//! at it.

use crate::config::CanvasConfig;
use crate::constants::MIN_CONNECTOR_LENGTH;
use crate::error::GraphError;
use crate::types::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// All tiles of one canvas.
///
/// Insertion order doubles as render order: later tiles are drawn on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "ProgramDocument", try_from = "ProgramDocument")]
pub struct Program {
    tiles: HashMap<TileId, TileInstance>,
    order: Vec<TileId>,
}

/// Serialized shape of a [`Program`]: the tiles as a list in render order.
#[derive(Serialize, Deserialize)]
struct ProgramDocument {
    tiles: Vec<TileDocument>,
}

/// One saved tile. The kind stays a plain item-type string until it is resolved.
#[derive(Serialize, Deserialize)]
struct TileDocument {
    model: NodeDocument,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Serialize, Deserialize)]
struct NodeDocument {
    id: TileId,
    kind: String,
    title: String,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
    connectors: Vec<Connector>,
}

impl From<TileInstance> for TileDocument {
    fn from(instance: TileInstance) -> Self {
        let TileInstance {
            model,
            x,
            y,
            width,
            height,
            ..
        } = instance;
        Self {
            model: NodeDocument {
                id: model.id(),
                kind: model.kind.item_type().to_string(),
                title: model.title.clone(),
                attributes: model.attributes.clone(),
                connectors: model.connectors().to_vec(),
            },
            x,
            y,
            width,
            height,
        }
    }
}

impl TryFrom<TileDocument> for TileInstance {
    type Error = GraphError;

    fn try_from(document: TileDocument) -> Result<Self, Self::Error> {
        let NodeDocument {
            id,
            kind,
            title,
            attributes,
            connectors,
        } = document.model;
        let kind = TileKind::from_item_type(&kind)?;
        let mut model = TileNode::from_parts(id, kind, title, attributes, connectors);
        if !model.has_declared_connectors() {
            return Err(GraphError::InvalidDocument(format!(
                "tile '{id}' does not have the connectors of a '{}' tile",
                kind.item_type()
            )));
        }
        model.reset_free_geometry(MIN_CONNECTOR_LENGTH);
        Ok(TileInstance::with_size(
            model,
            document.x,
            document.y,
            document.width,
            document.height,
        ))
    }
}

impl From<Program> for ProgramDocument {
    fn from(mut program: Program) -> Self {
        let tiles = program
            .order
            .iter()
            .filter_map(|id| program.tiles.remove(id))
            .map(TileDocument::from)
            .collect();
        Self { tiles }
    }
}

impl TryFrom<ProgramDocument> for Program {
    type Error = GraphError;

    fn try_from(document: ProgramDocument) -> Result<Self, Self::Error> {
        let mut program = Program::new();
        for tile in document.tiles {
            program.insert(TileInstance::try_from(tile)?)?;
        }
        program.validate()?;
        Ok(program)
    }
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the program to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate a program.
    ///
    /// Free connector geometry is not stored, so every connector gets the default
    /// fan at the configured minimum reach.
    pub fn from_json(json: &str, config: &CanvasConfig) -> Result<Self, GraphError> {
        let document: ProgramDocument = serde_json::from_str(json)?;
        let mut program = Program::try_from(document)?;
        program.reset_free_geometry(config.min_connector_length);
        Ok(program)
    }

    /// Number of tiles on the canvas.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the canvas has no tiles.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether a tile with this id exists.
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    /// Looks up a tile.
    pub fn get(&self, id: TileId) -> Option<&TileInstance> {
        self.tiles.get(&id)
    }

    /// Looks up a tile, failing with [`GraphError::UnknownTile`].
    pub fn tile(&self, id: TileId) -> Result<&TileInstance, GraphError> {
        self.tiles.get(&id).ok_or(GraphError::UnknownTile(id))
    }

    fn tile_mut(&mut self, id: TileId) -> Result<&mut TileInstance, GraphError> {
        self.tiles.get_mut(&id).ok_or(GraphError::UnknownTile(id))
    }

    /// Tiles in render order, bottom-most first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TileInstance> {
        self.order.iter().filter_map(|id| self.tiles.get(id))
    }

    /// Tile ids in render order, bottom-most first.
    pub fn ids(&self) -> &[TileId] {
        &self.order
    }

    /// Creates a tile of `kind` with its top-left corner at `origin` and appends it on top.
    ///
    /// # Returns
    ///
    /// The id of the new tile
    pub fn add_tile(&mut self, kind: TileKind, origin: egui::Pos2, config: &CanvasConfig) -> TileId {
        let model = TileNode::new(kind, kind.display_name(), config.min_connector_length);
        let instance = TileInstance::with_size(
            model,
            origin.x,
            origin.y,
            config.tile_width,
            config.tile_height,
        );
        let id = instance.id();
        self.tiles.insert(id, instance);
        self.order.push(id);
        info!("Added {} tile {id}", kind.item_type());
        id
    }

    /// Appends an existing instance on top.
    ///
    /// Fails if a tile with the same id is already present.
    pub fn insert(&mut self, instance: TileInstance) -> Result<TileId, GraphError> {
        let id = instance.id();
        if self.tiles.contains_key(&id) {
            return Err(GraphError::InvalidDocument(format!("duplicate tile id '{id}'")));
        }
        self.tiles.insert(id, instance);
        self.order.push(id);
        Ok(id)
    }

    /// Removes a tile and unbinds every connector that targeted it.
    ///
    /// # Returns
    ///
    /// The removed instance, or `None` if the tile didn't exist.
    pub fn remove_tile(&mut self, id: TileId) -> Option<TileInstance> {
        let removed = self.tiles.remove(&id)?;
        self.order.retain(|other| *other != id);

        let mut unbound = 0;
        for instance in self.tiles.values_mut() {
            for connector in instance.model.connectors_mut() {
                if connector.target_id == Some(id) {
                    connector.target_id = None;
                    unbound += 1;
                }
            }
        }
        info!("Removed tile {id}, unbound {unbound} connector(s)");
        Some(removed)
    }

    /// Moves a tile so its top-left corner sits at `origin`.
    pub fn move_tile(&mut self, id: TileId, origin: egui::Pos2) -> Result<(), GraphError> {
        let instance = self.tile_mut(id)?;
        instance.x = origin.x;
        instance.y = origin.y;
        Ok(())
    }

    /// Renames a tile.
    pub fn set_title(&mut self, id: TileId, title: impl Into<String>) -> Result<(), GraphError> {
        self.tile_mut(id)?.model.title = title.into();
        Ok(())
    }

    /// Sets one of a tile's attributes, returning the previous value.
    pub fn set_attribute(
        &mut self,
        id: TileId,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, GraphError> {
        Ok(self.tile_mut(id)?.model.set_attribute(name, value))
    }

    /// The point a tile's connectors start from: the centre of its current rectangle.
    pub fn anchor(&self, id: TileId) -> Result<egui::Pos2, GraphError> {
        Ok(self.tile(id)?.center())
    }

    /// Looks up one connector of a tile.
    pub fn connector(&self, tile: TileId, name: &str) -> Result<&Connector, GraphError> {
        self.tile(tile)?
            .model
            .connector(name)
            .ok_or_else(|| GraphError::UnknownConnector {
                tile,
                connector: name.to_string(),
            })
    }

    fn connector_mut(&mut self, tile: TileId, name: &str) -> Result<&mut Connector, GraphError> {
        self.tile_mut(tile)?
            .model
            .connector_mut(name)
            .ok_or_else(|| GraphError::UnknownConnector {
                tile,
                connector: name.to_string(),
            })
    }

    /// Binds a connector of `source` to `target`.
    ///
    /// The request is refused with [`GraphError::InvalidConnection`] when the target
    /// is the connector's own tile (unless the config allows it) or when the
    /// target's kind accepts no incoming connections. A refused request leaves the
    /// connector untouched.
    pub fn connect(
        &mut self,
        source: TileId,
        connector: &str,
        target: TileId,
        config: &CanvasConfig,
    ) -> Result<(), GraphError> {
        self.connector(source, connector)?;
        let target_kind = self.tile(target)?.model.kind;

        let refuse = |reason: &str| GraphError::InvalidConnection {
            source_tile: source,
            connector: connector.to_string(),
            target,
            reason: reason.to_string(),
        };
        if source == target && !config.allow_self_connections {
            return Err(refuse("a tile cannot connect to itself"));
        }
        if !target_kind.accepts_incoming() {
            return Err(refuse(&format!(
                "'{}' tiles accept no incoming connections",
                target_kind.item_type()
            )));
        }

        self.connector_mut(source, connector)?.target_id = Some(target);
        info!("Connected '{connector}' of {source} to {target}");
        Ok(())
    }

    /// Returns a connector to the free state.
    ///
    /// # Returns
    ///
    /// The tile it was bound to, or `None` if it was already free.
    pub fn unbind(&mut self, source: TileId, connector: &str) -> Result<Option<TileId>, GraphError> {
        let previous = self.connector_mut(source, connector)?.target_id.take();
        if let Some(target) = previous {
            info!("Unbound '{connector}' of {source} from {target}");
        }
        Ok(previous)
    }

    /// Stores a new free-end position for a connector.
    pub(crate) fn set_free_geometry(
        &mut self,
        source: TileId,
        connector: &str,
        geometry: FreeGeometry,
    ) -> Result<(), GraphError> {
        self.connector_mut(source, connector)?.free = geometry;
        Ok(())
    }

    /// Resets every connector's free end to the default fan at `min_length`.
    pub fn reset_free_geometry(&mut self, min_length: f32) {
        for instance in self.tiles.values_mut() {
            instance.model.reset_free_geometry(min_length);
        }
    }

    /// The tile currently highlighted as a drop target, if any.
    pub fn hovered_tile(&self) -> Option<TileId> {
        self.iter()
            .rev()
            .find(|instance| instance.is_connector_hovering)
            .map(TileInstance::id)
    }

    /// Clears every hover highlight.
    pub fn clear_hover(&mut self) {
        for instance in self.tiles.values_mut() {
            instance.is_connector_hovering = false;
        }
    }

    /// Visits tiles top-most first.
    pub(crate) fn for_each_top_down_mut(&mut self, mut f: impl FnMut(&mut TileInstance)) {
        for id in self.order.iter().rev() {
            if let Some(instance) = self.tiles.get_mut(id) {
                f(instance);
            }
        }
    }

    /// Tile at a world position, top-most first.
    pub fn tile_at(&self, pos: egui::Pos2) -> Option<TileId> {
        self.iter()
            .rev()
            .find(|instance| instance.rect().contains(pos))
            .map(TileInstance::id)
    }

    /// Checks that ids are unique and every bound connector targets an existing tile.
    pub fn validate(&self) -> Result<(), GraphError> {
        let unique: HashSet<&TileId> = self.order.iter().collect();
        if unique.len() != self.order.len() || self.order.len() != self.tiles.len() {
            return Err(GraphError::InvalidDocument("tile ids are not unique".to_string()));
        }
        for instance in self.iter() {
            for connector in instance.model.connectors() {
                if let Some(target) = connector.target_id {
                    if !self.contains(target) {
                        return Err(GraphError::BrokenReference {
                            source_tile: instance.id(),
                            connector: connector.name.clone(),
                            target,
                        });
                    }
                }
            }
        }
        debug!("Validated program with {} tile(s)", self.len());
        Ok(())
    }
}
