//! Core data types for tiles and their connectors.
//!
//! This module defines the program graph's building blocks: tile kinds, the
//! [`TileNode`] model with its fixed set of named [`Connector`]s, and the
//! [`TileInstance`] that places a node on the canvas.

use crate::constants::{
    CONNECTOR_FAN_DEGREES, DEFAULT_CONNECTOR_BEARING, MIN_CONNECTOR_LENGTH, TILE_HEIGHT,
    TILE_WIDTH,
};
use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for tiles on the canvas.
pub type TileId = Uuid;

/// The closed set of tile kinds offered by the palette.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Where program execution starts
    #[serde(rename = "entry")]
    EntryPoint,
    /// Where program execution ends
    #[serde(rename = "exit")]
    ExitPoint,
    /// Branches on a condition
    #[serde(rename = "conditional")]
    Conditional,
    /// Repeats its body while a condition holds
    #[serde(rename = "loop")]
    Loop,
    /// Declares a variable with an initial value
    #[serde(rename = "variable_init")]
    InitVariable,
    /// Writes a value to the console
    #[serde(rename = "print_console")]
    PrintConsole,
}

impl TileKind {
    /// Every kind, in palette order.
    pub const ALL: [TileKind; 6] = [
        TileKind::EntryPoint,
        TileKind::InitVariable,
        TileKind::PrintConsole,
        TileKind::Conditional,
        TileKind::Loop,
        TileKind::ExitPoint,
    ];

    /// Stable string key used by the palette and in saved documents.
    pub fn item_type(self) -> &'static str {
        match self {
            TileKind::EntryPoint => "entry",
            TileKind::ExitPoint => "exit",
            TileKind::Conditional => "conditional",
            TileKind::Loop => "loop",
            TileKind::InitVariable => "variable_init",
            TileKind::PrintConsole => "print_console",
        }
    }

    /// Looks a kind up by its item type string.
    ///
    /// Fails with [`GraphError::UnknownKind`] rather than substituting a default.
    pub fn from_item_type(item_type: &str) -> Result<Self, GraphError> {
        TileKind::ALL
            .into_iter()
            .find(|kind| kind.item_type() == item_type)
            .ok_or_else(|| GraphError::UnknownKind(item_type.to_string()))
    }

    /// Name shown in the palette and used as the default tile title.
    pub fn display_name(self) -> &'static str {
        match self {
            TileKind::EntryPoint => "Start",
            TileKind::ExitPoint => "Exit",
            TileKind::Conditional => "Conditional",
            TileKind::Loop => "Loop",
            TileKind::InitVariable => "Create variable",
            TileKind::PrintConsole => "Print",
        }
    }

    /// The connector names a tile of this kind exposes, in display order.
    pub fn connector_names(self) -> &'static [&'static str] {
        match self {
            TileKind::EntryPoint => &["next"],
            TileKind::ExitPoint => &[],
            TileKind::Conditional => &["true", "false"],
            TileKind::Loop => &["body", "next"],
            TileKind::InitVariable => &["next"],
            TileKind::PrintConsole => &["next"],
        }
    }

    /// Attributes a freshly created tile of this kind starts with.
    pub fn default_attributes(self) -> BTreeMap<String, Value> {
        let names: &[&str] = match self {
            TileKind::EntryPoint | TileKind::ExitPoint => &[],
            TileKind::Conditional | TileKind::Loop => &["condition"],
            TileKind::InitVariable => &["name", "value"],
            TileKind::PrintConsole => &["value"],
        };
        names
            .iter()
            .map(|name| (name.to_string(), Value::String(String::new())))
            .collect()
    }

    /// Whether other tiles may connect into a tile of this kind.
    pub fn accepts_incoming(self) -> bool {
        !matches!(self, TileKind::EntryPoint)
    }
}

/// Last known position of a connector's free end, relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeGeometry {
    /// Compass bearing from the anchor (0° = up, clockwise)
    pub degrees: f32,
    /// Distance from the anchor, never below the configured minimum reach
    pub length: f32,
}

impl FreeGeometry {
    /// Default geometry for connector `index` out of `count` on one tile.
    ///
    /// Connectors fan out around straight down so siblings don't overlap.
    pub fn fanned(index: usize, count: usize, length: f32) -> Self {
        let centre = (count.saturating_sub(1)) as f32 / 2.0;
        let degrees = DEFAULT_CONNECTOR_BEARING + (index as f32 - centre) * CONNECTOR_FAN_DEGREES;
        Self {
            degrees: degrees.rem_euclid(360.0),
            length,
        }
    }
}

impl Default for FreeGeometry {
    fn default() -> Self {
        Self {
            degrees: DEFAULT_CONNECTOR_BEARING,
            length: MIN_CONNECTOR_LENGTH,
        }
    }
}

/// A named outgoing edge slot of a tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    /// Name, unique within the owning tile
    pub name: String,
    /// Tile this connector is bound to, or `None` while free
    pub target_id: Option<TileId>,
    /// Where the free end sits while unbound; frozen while bound
    #[serde(skip)]
    pub free: FreeGeometry,
}

impl Connector {
    fn new(name: &str, free: FreeGeometry) -> Self {
        Self {
            name: name.to_string(),
            target_id: None,
            free,
        }
    }

    /// Whether this connector currently forms an edge of the graph.
    pub fn is_bound(&self) -> bool {
        self.target_id.is_some()
    }
}

/// A typed node of the visual program.
#[derive(Debug, Clone)]
pub struct TileNode {
    id: TileId,
    /// The kind, which fixes the connector names
    pub kind: TileKind,
    /// User-facing label
    pub title: String,
    /// Kind-specific settings, such as the value a print tile writes
    pub attributes: BTreeMap<String, Value>,
    connectors: Vec<Connector>,
}

impl TileNode {
    /// Creates a node of the given kind with its declared connectors and attributes.
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of tile
    /// * `title` - Display label
    /// * `min_length` - Initial reach of every free connector
    pub fn new(kind: TileKind, title: impl Into<String>, min_length: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            attributes: kind.default_attributes(),
            connectors: default_connectors(kind, min_length),
        }
    }

    /// Rebuilds a node from saved parts. The caller checks the connector names.
    pub(crate) fn from_parts(
        id: TileId,
        kind: TileKind,
        title: String,
        attributes: BTreeMap<String, Value>,
        connectors: Vec<Connector>,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            attributes,
            connectors,
        }
    }

    /// Unique identifier, fixed for the node's lifetime.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// All connectors in declaration order.
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Looks up a connector by name.
    pub fn connector(&self, name: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.name == name)
    }

    /// Mutable access to a connector's binding and geometry; the set of names cannot change.
    pub(crate) fn connector_mut(&mut self, name: &str) -> Option<&mut Connector> {
        self.connectors.iter_mut().find(|c| c.name == name)
    }

    pub(crate) fn connectors_mut(&mut self) -> impl Iterator<Item = &mut Connector> {
        self.connectors.iter_mut()
    }

    /// Reads an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets an attribute value, returning the previous one.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(name.into(), value)
    }

    /// Checks that the connector names match what the kind declares.
    pub(crate) fn has_declared_connectors(&self) -> bool {
        let names = self.kind.connector_names();
        self.connectors.len() == names.len()
            && self
                .connectors
                .iter()
                .zip(names)
                .all(|(connector, name)| connector.name == *name)
    }

    /// Resets every connector's free geometry to the default fan.
    pub(crate) fn reset_free_geometry(&mut self, min_length: f32) {
        let count = self.connectors.len();
        for (index, connector) in self.connectors.iter_mut().enumerate() {
            connector.free = FreeGeometry::fanned(index, count, min_length);
        }
    }
}

fn default_connectors(kind: TileKind, min_length: f32) -> Vec<Connector> {
    let names = kind.connector_names();
    names
        .iter()
        .enumerate()
        .map(|(index, name)| Connector::new(name, FreeGeometry::fanned(index, names.len(), min_length)))
        .collect()
}

/// A tile placed on the canvas.
#[derive(Debug, Clone)]
pub struct TileInstance {
    /// The node this placement represents
    pub model: TileNode,
    /// Left edge in world units
    pub x: f32,
    /// Top edge in world units
    pub y: f32,
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
    /// Set while a dragged connector end is over this tile and it is the top-most match
    pub is_connector_hovering: bool,
}

impl TileInstance {
    /// Places a node with its top-left corner at `(x, y)` and the default tile size.
    pub fn new(model: TileNode, x: f32, y: f32) -> Self {
        Self::with_size(model, x, y, TILE_WIDTH, TILE_HEIGHT)
    }

    /// Places a node with an explicit size.
    pub fn with_size(model: TileNode, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            model,
            x,
            y,
            width,
            height,
            is_connector_hovering: false,
        }
    }

    /// Shorthand for the model's id.
    pub fn id(&self) -> TileId {
        self.model.id
    }

    /// Top-left corner.
    pub fn origin(&self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    /// Placement rectangle in world space.
    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(self.origin(), egui::vec2(self.width, self.height))
    }

    /// Centre of the placement rectangle; connectors are anchored and bound here.
    pub fn center(&self) -> egui::Pos2 {
        egui::pos2(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_print_console_creation() {
        let node = TileNode::new(TileKind::PrintConsole, "Say hi", MIN_CONNECTOR_LENGTH);

        assert_eq!(node.title, "Say hi");
        assert_eq!(node.kind, TileKind::PrintConsole);
        assert!(!node.id().is_nil());
        assert_eq!(node.attribute("value"), Some(&json!("")));
        assert_eq!(node.connectors().len(), 1);
        assert_eq!(node.connectors()[0].name, "next");
        assert!(!node.connectors()[0].is_bound());
    }

    #[test]
    fn test_conditional_exposes_true_and_false() {
        let node = TileNode::new(TileKind::Conditional, "", MIN_CONNECTOR_LENGTH);
        let names: Vec<&str> = node.connectors().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["true", "false"]);
        assert!(node.connector("true").is_some());
        assert!(node.connector("next").is_none());
    }

    #[test]
    fn test_exit_point_has_no_connectors() {
        let node = TileNode::new(TileKind::ExitPoint, "End", MIN_CONNECTOR_LENGTH);
        assert!(node.connectors().is_empty());
        assert!(node.has_declared_connectors());
    }

    #[test]
    fn test_item_type_lookup() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_item_type(kind.item_type()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_item_type_is_rejected() {
        let result = TileKind::from_item_type("teleport");
        assert!(matches!(result, Err(GraphError::UnknownKind(ref name)) if name == "teleport"));
    }

    #[test]
    fn test_only_entry_point_refuses_incoming() {
        for kind in TileKind::ALL {
            assert_eq!(kind.accepts_incoming(), kind != TileKind::EntryPoint);
        }
    }

    #[test]
    fn test_connectors_fan_around_straight_down() {
        let single = FreeGeometry::fanned(0, 1, 100.0);
        assert_eq!(single.degrees, 180.0);
        assert_eq!(single.length, 100.0);

        let left = FreeGeometry::fanned(0, 2, 100.0);
        let right = FreeGeometry::fanned(1, 2, 100.0);
        assert_eq!(left.degrees, 157.5);
        assert_eq!(right.degrees, 202.5);
    }

    #[test]
    fn test_set_attribute() {
        let mut node = TileNode::new(TileKind::PrintConsole, "", MIN_CONNECTOR_LENGTH);
        let previous = node.set_attribute("value", json!("hello"));
        assert_eq!(previous, Some(json!("")));
        assert_eq!(node.attribute("value"), Some(&json!("hello")));
    }

    #[test]
    fn test_instance_geometry() {
        let node = TileNode::new(TileKind::Loop, "", MIN_CONNECTOR_LENGTH);
        let instance = TileInstance::with_size(node, 10.0, 20.0, 100.0, 40.0);

        assert_eq!(instance.center(), egui::pos2(60.0, 40.0));
        assert_eq!(instance.rect().min, egui::pos2(10.0, 20.0));
        assert_eq!(instance.rect().max, egui::pos2(110.0, 60.0));
        assert!(!instance.is_connector_hovering);
        assert_eq!(instance.id(), instance.model.id());
    }
}
