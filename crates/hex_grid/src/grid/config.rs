//! Construction parameters for [`crate::grid::HexGrid`].
use serde_json::Value;

use crate::error::{Error, Result};
use crate::layout::DEFAULT_CELL_SIZE;

/// Configuration for creating a grid.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Radius in rings used by [`crate::grid::HexGrid::generate`].
    pub size: u32,
    /// Hexagon radius in world units.
    pub cell_size: f32,
    /// Display settings carried through persistence untouched.
    pub extrude_settings: Value,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 5,
            cell_size: DEFAULT_CELL_SIZE,
            extrude_settings: Value::Object(Default::default()),
        }
    }
}

impl GridConfig {
    /// Creates a new [`GridConfig`] with the given generation radius.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Sets the generation radius.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets the cell size.
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the opaque extrusion settings.
    pub fn with_extrude_settings(mut self, extrude_settings: Value) -> Self {
        self.extrude_settings = extrude_settings;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(Error::InvalidConfig(
                "cell_size must be finite and > 0".into(),
            ));
        }
        Ok(())
    }
}
