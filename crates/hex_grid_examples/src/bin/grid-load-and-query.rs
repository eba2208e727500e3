use std::fs::File;
use std::io::BufReader;

use anyhow::Context;
use glam::Vec3;
use hex_grid::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    hex_grid_examples::init_tracing();
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hex-grid.json".to_string());

    let file = File::open(&path)
        .with_context(|| format!("opening {path}; run grid-generate-and-save first"))?;
    let grid = HexGrid::from_reader(BufReader::new(file))?;
    info!(
        "Loaded {} cells, cell size {}, autogenerated {}.",
        grid.len(),
        grid.cell_size(),
        grid.is_autogenerated()
    );

    for pos in [
        Vec3::ZERO,
        Vec3::new(14.0, 0.0, 9.0),
        Vec3::new(-31.0, 0.0, 20.0),
        Vec3::new(500.0, 0.0, 0.0),
    ] {
        match grid.get_cell_at(pos) {
            Some(cell) => info!(
                "{pos} -> cell {} (h {:.2}, walkable {})",
                cell.cube(),
                cell.h,
                cell.walkable
            ),
            None => warn!("{pos} -> no cell"),
        }
    }

    let mut rng = StdRng::seed_from_u64(7);
    let (Some(a), Some(b)) = (grid.random_cell(&mut rng), grid.random_cell(&mut rng)) else {
        warn!("Grid is empty; nothing to query.");
        return Ok(());
    };
    info!(
        "distance {} -> {} = {:.2}",
        a.cube(),
        b.cube(),
        grid.distance(a, b)
    );

    let open = grid.neighbors_filtered(a, true, |from, to| to.walkable && to.h - from.h <= 1.0);
    info!(
        "{} has {} reachable neighbors: {:?}",
        a.cube(),
        open.len(),
        open.iter().map(|c| c.cube().to_string()).collect::<Vec<_>>()
    );

    let around = grid.cells_in_range(a.cube(), 2);
    info!("{} cells within 2 steps of {}.", around.len(), a.cube());
    Ok(())
}
