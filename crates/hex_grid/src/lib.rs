#![forbid(unsafe_code)]
//! hex_grid: Hexagonal cell grids in cube coordinates.
//!
//! Modules:
//! - coords: cube coordinates, direction tables, rounding and regions
//! - cell: per-cell state (height, walkability, user data, search scratch fields)
//! - layout: world-space conversion for flat-top hexagons
//! - grid: the sparse cell store with lookup, neighbors, sampling and generation
//! - persist: serializable grid records (JSON)
//! - tile: seam to an external renderer
//!
//! The store is single-threaded and allocation-free on its lookup paths; conversions
//! return values instead of writing into shared scratch objects.
pub mod cell;
pub mod coords;
pub mod error;
pub mod grid;
pub mod layout;
pub mod persist;
pub mod tile;

/// Convenient re-exports for common types. Import with `use hex_grid::prelude::*;`.
pub mod prelude {
    pub use crate::cell::{Cell, UserData, DEFAULT_HEIGHT};
    pub use crate::coords::{cube_round, Cube, FracCube, DIAGONALS, DIRECTIONS};
    pub use crate::error::{Error, Result};
    pub use crate::grid::{cell_to_hash, CellKey, GridConfig, HexGrid};
    pub use crate::layout::{distance, HexLayout, HexShape, DEFAULT_CELL_SIZE};
    pub use crate::persist::{CellRecord, GridRecord, RECORD_VERSION};
    pub use crate::tile::{FnTileSink, TileFactory, TileHandle, TileSink, VecTileSink};
}
