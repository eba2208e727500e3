//! World-space layout of a flat-top hexagon grid.
//!
//! The grid lies in the horizontal X/Z plane with Y up. [`HexLayout`] owns the cell size
//! together with the values derived from it, so the three can only change together.
use glam::{Vec2, Vec3};

use crate::cell::Cell;
use crate::coords::{Cube, FracCube};
use crate::error::{Error, Result};

const SQRT_3: f32 = 1.732_050_8;

/// Cell size used when none is configured.
pub const DEFAULT_CELL_SIZE: f32 = 10.0;

/// Cell size and its derived spacings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    cell_size: f32,
    cell_width: f32,
    cell_length: f32,
}

impl HexLayout {
    /// Creates a layout for hexagons of radius `cell_size`.
    pub fn new(cell_size: f32) -> Result<Self> {
        validate_cell_size(cell_size)?;
        Ok(Self::derive(cell_size))
    }

    fn derive(cell_size: f32) -> Self {
        let cell_width = cell_size * 2.0;
        Self {
            cell_size,
            cell_width,
            cell_length: SQRT_3 * 0.5 * cell_width,
        }
    }

    /// Radius of one hexagon (center to corner) in world units.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Corner-to-corner width, `2 · cell_size`.
    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Edge-to-edge length, `√3/2 · cell_width`.
    #[inline]
    pub fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Replaces the cell size, re-deriving width and length.
    pub fn set_cell_size(&mut self, cell_size: f32) -> Result<()> {
        validate_cell_size(cell_size)?;
        *self = Self::derive(cell_size);
        Ok(())
    }

    /// World position of a lattice point at height `h`.
    #[inline]
    pub fn cube_to_pixel(&self, cube: Cube, h: f32) -> Vec3 {
        Vec3::new(
            cube.q() as f32 * self.cell_width * 0.75,
            h,
            (cube.r() - cube.s()) as f32 * self.cell_length * 0.5,
        )
    }

    /// World position of a cell; its height becomes the Y component.
    #[inline]
    pub fn cell_to_pixel(&self, cell: &Cell) -> Vec3 {
        self.cube_to_pixel(cell.cube(), cell.h)
    }

    /// Fractional cube coordinates under a world position. Y is ignored.
    #[inline]
    pub fn pixel_to_cell(&self, pos: Vec3) -> FracCube {
        let q = pos.x * (2.0 / 3.0) / self.cell_size;
        let r = (-pos.x / 3.0 + (SQRT_3 / 3.0) * pos.z) / self.cell_size;
        FracCube::from_qr(q, r)
    }

    /// Nearest lattice point under a world position, `None` for non-finite positions or
    /// ones beyond the `i32` lattice.
    #[inline]
    pub fn pixel_to_cube(&self, pos: Vec3) -> Option<Cube> {
        self.pixel_to_cell(pos).round()
    }

    /// Outline of one hexagon centered on the origin of the X/Z plane.
    pub fn shape(&self) -> HexShape {
        HexShape::new(self.cell_size)
    }
}

impl Default for HexLayout {
    fn default() -> Self {
        Self::derive(DEFAULT_CELL_SIZE)
    }
}

fn validate_cell_size(cell_size: f32) -> Result<()> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "cell_size must be finite and > 0, got {cell_size}"
        )));
    }
    Ok(())
}

/// Flat-top hexagon outline handed to the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexShape {
    pub cell_size: f32,
    /// Corner offsets in the X/Z plane, counter-clockwise starting on the +X axis.
    pub corners: [Vec2; 6],
}

impl HexShape {
    pub fn new(cell_size: f32) -> Self {
        let corners = std::array::from_fn(|i| {
            let angle = std::f32::consts::TAU / 6.0 * i as f32;
            Vec2::new(cell_size * angle.cos(), cell_size * angle.sin())
        });
        Self { cell_size, corners }
    }
}

/// Cube distance between two cells plus the signed height difference `b.h - a.h`.
pub fn distance(a: &Cell, b: &Cell) -> f32 {
    a.cube().distance_to(b.cube()) as f32 + (b.h - a.h)
}
