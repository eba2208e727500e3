use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec3;
use hex_grid::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Cells in a hexagon of the given radius.
pub fn hexagon_area(radius: u32) -> usize {
    let r = radius as usize;
    3 * r * r + 3 * r + 1
}

/// A unit-size grid filled out to `radius`.
pub fn generated(radius: u32) -> HexGrid {
    let mut grid = HexGrid::try_new(GridConfig::new(radius).with_cell_size(1.0))
        .expect("valid benchmark config");
    grid.generate();
    grid
}

/// Positions scattered over the grid's bounding square, a few landing outside it.
pub fn random_positions(grid: &HexGrid, n: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = grid.size() as f32 * grid.layout().cell_width();
    let mut unit = move || rng.next_u32() as f32 / u32::MAX as f32 - 0.5;
    (0..n)
        .map(|_| Vec3::new(unit() * extent, 0.0, unit() * extent))
        .collect()
}
