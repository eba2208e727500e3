//! Sparse hexagon cell store.
//!
//! [`HexGrid`] owns every [`Cell`] keyed by [`CellKey`], the packed form of its
//! coordinate, so lookups are O(1) for any coordinate range. The same store backs both
//! procedurally generated hexagon regions and arbitrary sparse maps loaded from records.
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glam::Vec3;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, trace};

use crate::cell::Cell;
use crate::coords::{Cube, FracCube, DIAGONALS, DIRECTIONS};
use crate::error::Result;
use crate::layout::{self, HexLayout};
use crate::tile::{TileFactory, TileHandle, TileSink};

pub mod config;

pub use config::GridConfig;

/// Canonical store key of a coordinate.
///
/// Packs `q` and `r` into one integer; `s` is implied by the zero-sum rule, so distinct
/// coordinates never share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    /// Recovers the coordinate this key was built from.
    pub fn cube(self) -> Cube {
        Cube::new((self.0 >> 32) as u32 as i32, self.0 as u32 as i32)
    }
}

/// The key function used for every store access.
#[inline]
pub fn cell_to_hash(cube: Cube) -> CellKey {
    CellKey(((cube.q() as u32 as u64) << 32) | cube.r() as u32 as u64)
}

/// Hexagonal grid of cells.
#[derive(Debug, Clone)]
pub struct HexGrid {
    cells: HashMap<CellKey, Cell>,
    size: u32,
    layout: HexLayout,
    extrude_settings: Value,
    autogenerated: bool,
}

impl HexGrid {
    /// Creates an empty grid from a validated configuration.
    pub fn try_new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cells: HashMap::new(),
            size: config.size,
            layout: HexLayout::new(config.cell_size)?,
            extrude_settings: config.extrude_settings,
            autogenerated: false,
        })
    }

    /// Number of stored cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cells are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Generation radius in rings.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    pub fn cell_size(&self) -> f32 {
        self.layout.cell_size()
    }

    /// Changes the cell size; derived spacings follow.
    pub fn set_cell_size(&mut self, cell_size: f32) -> Result<()> {
        self.layout.set_cell_size(cell_size)
    }

    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    pub fn extrude_settings(&self) -> &Value {
        &self.extrude_settings
    }

    pub fn set_extrude_settings(&mut self, extrude_settings: Value) {
        self.extrude_settings = extrude_settings;
    }

    /// Whether the current contents came from [`HexGrid::generate`].
    pub fn is_autogenerated(&self) -> bool {
        self.autogenerated
    }

    pub(crate) fn set_autogenerated(&mut self, autogenerated: bool) {
        self.autogenerated = autogenerated;
    }

    /// Store key for `cube`.
    #[inline]
    pub fn cell_to_hash(cube: Cube) -> CellKey {
        cell_to_hash(cube)
    }

    /// Inserts `cell` unless its coordinate is already occupied.
    ///
    /// An occupied coordinate keeps its existing cell and the call returns `None`.
    pub fn add(&mut self, cell: Cell) -> Option<&mut Cell> {
        match self.cells.entry(cell_to_hash(cell.cube())) {
            Entry::Occupied(_) => {
                trace!("Cell {} already present; ignoring add.", cell.cube());
                None
            }
            Entry::Vacant(slot) => Some(slot.insert(cell)),
        }
    }

    /// Removes and returns the cell at `cube`, together with any tile handle it holds.
    pub fn remove(&mut self, cube: Cube) -> Option<Cell> {
        let removed = self.cells.remove(&cell_to_hash(cube));
        if removed.is_some() {
            trace!("Removed cell {}.", cube);
        }
        removed
    }

    pub fn get(&self, cube: Cube) -> Option<&Cell> {
        self.cells.get(&cell_to_hash(cube))
    }

    pub fn get_mut(&mut self, cube: Cube) -> Option<&mut Cell> {
        self.cells.get_mut(&cell_to_hash(cube))
    }

    pub fn contains(&self, cube: Cube) -> bool {
        self.cells.contains_key(&cell_to_hash(cube))
    }

    /// World position of `cell`.
    #[inline]
    pub fn cell_to_pixel(&self, cell: &Cell) -> Vec3 {
        self.layout.cell_to_pixel(cell)
    }

    /// Fractional cube coordinates under a world position.
    #[inline]
    pub fn pixel_to_cell(&self, pos: Vec3) -> FracCube {
        self.layout.pixel_to_cell(pos)
    }

    /// Stored cell under a world position, if any.
    pub fn get_cell_at(&self, pos: Vec3) -> Option<&Cell> {
        self.get(self.layout.pixel_to_cube(pos)?)
    }

    pub fn get_cell_at_mut(&mut self, pos: Vec3) -> Option<&mut Cell> {
        let cube = self.layout.pixel_to_cube(pos)?;
        self.get_mut(cube)
    }

    /// Cube distance plus height difference. See [`layout::distance`].
    #[inline]
    pub fn distance(&self, a: &Cell, b: &Cell) -> f32 {
        layout::distance(a, b)
    }

    /// Stored neighbors of `query` in direction-table order, diagonals appended after the
    /// edge neighbors when requested.
    pub fn neighbors(&self, query: &Cell, include_diagonals: bool) -> Vec<&Cell> {
        self.neighbors_filtered(query, include_diagonals, |_, _| true)
    }

    /// Like [`HexGrid::neighbors`], keeping only candidates accepted by
    /// `filter(query, candidate)`.
    pub fn neighbors_filtered<F>(
        &self,
        query: &Cell,
        include_diagonals: bool,
        filter: F,
    ) -> Vec<&Cell>
    where
        F: FnMut(&Cell, &Cell) -> bool,
    {
        let mut out = Vec::with_capacity(if include_diagonals { 12 } else { 6 });
        self.neighbors_into(query, include_diagonals, filter, &mut out);
        out
    }

    /// Writes the filtered neighbors of `query` into `out`, clearing it first.
    pub fn neighbors_into<'a, F>(
        &'a self,
        query: &Cell,
        include_diagonals: bool,
        mut filter: F,
        out: &mut Vec<&'a Cell>,
    ) where
        F: FnMut(&Cell, &Cell) -> bool,
    {
        out.clear();
        let diagonals: &[Cube] = if include_diagonals { &DIAGONALS } else { &[] };
        for offset in DIRECTIONS.iter().chain(diagonals) {
            let Some(cube) = query.cube().checked_add(*offset) else {
                continue;
            };
            if let Some(candidate) = self.get(cube) {
                if filter(query, candidate) {
                    out.push(candidate);
                }
            }
        }
    }

    /// Stored cells within cube distance `range` of `center`, in unspecified order.
    pub fn cells_in_range(&self, center: Cube, range: u32) -> Vec<&Cell> {
        let area = 3 * (range as u64) * (range as u64) + 3 * range as u64 + 1;
        if area > self.cells.len() as u64 {
            self.cells
                .values()
                .filter(|c| c.cube().distance_to(center) <= range)
                .collect()
        } else {
            center.range(range).filter_map(|c| self.get(c)).collect()
        }
    }

    /// Uniformly random stored cell, or `None` for an empty grid.
    pub fn random_cell<R>(&self, rng: &mut R) -> Option<&Cell>
    where
        R: Rng + ?Sized,
    {
        if self.cells.is_empty() {
            return None;
        }
        let index = ((rng.next_u64() as u128 * self.cells.len() as u128) >> 64) as usize;
        self.cells.values().nth(index)
    }

    /// Resets the search scratch fields of every cell.
    pub fn clear_path(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear_path();
        }
    }

    /// Calls `f` once per cell in store order.
    pub fn traverse<F>(&self, mut f: F)
    where
        F: FnMut(&Cell),
    {
        for cell in self.cells.values() {
            f(cell);
        }
    }

    /// Calls `f` once per cell in store order with mutable access.
    pub fn traverse_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Cell),
    {
        for cell in self.cells.values_mut() {
            f(cell);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> + '_ {
        self.cells.values_mut()
    }

    /// Fills the hexagon of radius [`HexGrid::size`] around the origin.
    ///
    /// Cells already present are kept. Returns the number of cells added.
    pub fn generate(&mut self) -> usize {
        let before = self.cells.len();
        for cube in Cube::ORIGIN.range(self.size) {
            self.add(Cell::at(cube));
        }
        self.autogenerated = true;
        let added = self.cells.len() - before;
        debug!(
            "Generated hexagon of radius {}: {} cells added, {} total.",
            self.size,
            added,
            self.cells.len()
        );
        added
    }

    /// Asks `factory` for a renderable for the cell at `cube` and stores the handle.
    ///
    /// A handle the cell already held is passed to `sink`. Returns `None` if no cell is
    /// stored at `cube`.
    pub fn generate_tile<F, S>(
        &mut self,
        cube: Cube,
        factory: &mut F,
        sink: &mut S,
    ) -> Option<TileHandle>
    where
        F: TileFactory + ?Sized,
        S: TileSink + ?Sized,
    {
        let layout = self.layout;
        let shape = layout.shape();
        let cell = self.cells.get_mut(&cell_to_hash(cube))?;
        let handle = factory.create_tile(cell, layout.cell_to_pixel(cell).into(), &shape);
        if let Some(old) = cell.tile.replace(handle) {
            sink.release(cube, old);
        }
        Some(handle)
    }

    /// Creates renderables for every cell. Returns the number of tiles created.
    pub fn generate_tiles<F, S>(&mut self, factory: &mut F, sink: &mut S) -> usize
    where
        F: TileFactory + ?Sized,
        S: TileSink + ?Sized,
    {
        let layout = self.layout;
        let shape = layout.shape();
        for cell in self.cells.values_mut() {
            let handle = factory.create_tile(cell, layout.cell_to_pixel(cell).into(), &shape);
            if let Some(old) = cell.tile.replace(handle) {
                sink.release(cell.cube(), old);
            }
        }
        debug!("Generated {} tiles.", self.cells.len());
        self.cells.len()
    }

    /// Removes every cell, passing held tile handles to `sink`.
    pub fn clear<S>(&mut self, sink: &mut S)
    where
        S: TileSink + ?Sized,
    {
        for (_, cell) in self.cells.drain() {
            if let Some(tile) = cell.tile {
                sink.release(cell.cube(), tile);
            }
        }
        self.autogenerated = false;
    }

    /// Releases all tile handles through `sink` and drops the grid.
    pub fn dispose<S>(mut self, sink: &mut S)
    where
        S: TileSink + ?Sized,
    {
        let count = self.cells.len();
        self.clear(sink);
        debug!("Disposed grid with {} cells.", count);
    }

    pub(crate) fn replace_cells<S>(&mut self, cells: HashMap<CellKey, Cell>, sink: &mut S)
    where
        S: TileSink + ?Sized,
    {
        self.clear(sink);
        self.cells = cells;
    }
}

impl Default for HexGrid {
    fn default() -> Self {
        let config = GridConfig::default();
        Self {
            cells: HashMap::new(),
            size: config.size,
            layout: HexLayout::default(),
            extrude_settings: config.extrude_settings,
            autogenerated: false,
        }
    }
}
