//! Seam to the rendering collaborator.
//!
//! The grid never builds geometry. A [`TileFactory`] turns a cell into an opaque
//! [`TileHandle`] that the grid stores on the cell, and a [`TileSink`] is told whenever
//! the grid drops a cell that still holds one, so the owner can free the renderable.
use mint::Vector3;

use crate::cell::Cell;
use crate::coords::Cube;
use crate::layout::HexShape;

/// Opaque reference to a renderable owned outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileHandle(pub u64);

/// Builds renderables for cells.
pub trait TileFactory {
    /// Creates a renderable for `cell` at world `position` with outline `shape`.
    fn create_tile(&mut self, cell: &Cell, position: Vector3<f32>, shape: &HexShape)
        -> TileHandle;
}

impl<F> TileFactory for F
where
    F: FnMut(&Cell, Vector3<f32>, &HexShape) -> TileHandle,
{
    fn create_tile(
        &mut self,
        cell: &Cell,
        position: Vector3<f32>,
        shape: &HexShape,
    ) -> TileHandle {
        self(cell, position, shape)
    }
}

/// Receives handles the grid no longer references.
pub trait TileSink {
    fn release(&mut self, cube: Cube, tile: TileHandle);
}

/// A no-op sink, for collaborators whose renderables need no explicit release.
impl TileSink for () {
    #[inline]
    fn release(&mut self, _cube: Cube, _tile: TileHandle) {}
}

/// A sink that forwards to a user-provided closure.
pub struct FnTileSink<F>
where
    F: FnMut(Cube, TileHandle),
{
    f: F,
}

impl<F> FnTileSink<F>
where
    F: FnMut(Cube, TileHandle),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TileSink for FnTileSink<F>
where
    F: FnMut(Cube, TileHandle),
{
    #[inline]
    fn release(&mut self, cube: Cube, tile: TileHandle) {
        (self.f)(cube, tile);
    }
}

/// A sink that collects released handles in a `Vec`.
#[derive(Debug, Default)]
pub struct VecTileSink {
    released: Vec<(Cube, TileHandle)>,
}

impl VecTileSink {
    pub fn new() -> Self {
        Self {
            released: Vec::new(),
        }
    }

    pub fn released(&self) -> &[(Cube, TileHandle)] {
        &self.released
    }

    pub fn len(&self) -> usize {
        self.released.len()
    }

    pub fn is_empty(&self) -> bool {
        self.released.is_empty()
    }

    pub fn into_inner(self) -> Vec<(Cube, TileHandle)> {
        self.released
    }
}

impl TileSink for VecTileSink {
    fn release(&mut self, cube: Cube, tile: TileHandle) {
        self.released.push((cube, tile));
    }
}
