//! Tunable canvas settings.
//!
//! The config is persisted together with the rest of the app state, so every
//! field falls back to its default when missing from a stored document.

use crate::constants::{CONNECTOR_HANDLE_SIZE, MIN_CONNECTOR_LENGTH, TILE_HEIGHT, TILE_WIDTH};
use serde::{Deserialize, Serialize};

/// Settings shared by the connector protocol and the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Shortest distance a free connector end may sit from its anchor
    pub min_connector_length: f32,
    /// Side of the square hit-box around a connector's free end
    pub handle_size: f32,
    /// Width given to newly placed tiles
    pub tile_width: f32,
    /// Height given to newly placed tiles
    pub tile_height: f32,
    /// Whether a tile may connect one of its connectors to itself
    pub allow_self_connections: bool,
    /// Whether the grid should be displayed on the canvas
    pub show_grid: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_connector_length: MIN_CONNECTOR_LENGTH,
            handle_size: CONNECTOR_HANDLE_SIZE,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            allow_self_connections: false,
            show_grid: true,
        }
    }
}

impl CanvasConfig {
    /// Deserialize a config from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = CanvasConfig::default();
        assert_eq!(config.min_connector_length, MIN_CONNECTOR_LENGTH);
        assert_eq!(config.handle_size, CONNECTOR_HANDLE_SIZE);
        assert!(!config.allow_self_connections);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = CanvasConfig::from_json(r#"{"allow_self_connections": true}"#).unwrap();
        assert!(config.allow_self_connections);
        assert_eq!(config.tile_width, TILE_WIDTH);
        assert_eq!(config.tile_height, TILE_HEIGHT);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(CanvasConfig::from_json("{ not json").is_err());
        assert!(CanvasConfig::from_json(r#"{"handle_size": "big"}"#).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let config = CanvasConfig {
            min_connector_length: 42.0,
            ..Default::default()
        };
        let restored = CanvasConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }
}
