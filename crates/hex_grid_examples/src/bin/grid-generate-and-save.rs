use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use hex_grid::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::info;

fn main() -> anyhow::Result<()> {
    hex_grid_examples::init_tracing();
    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hex-grid.json".to_string());

    let config = GridConfig::new(6)
        .with_cell_size(10.0)
        .with_extrude_settings(json!({ "depth": 1, "bevelEnabled": true, "steps": 1 }));
    let mut grid = HexGrid::try_new(config)?;
    let added = grid.generate();
    info!("Generated {} cells (radius {}).", added, grid.size());

    // Rolling terrain: height from a few random bumps, occasional rocks.
    let mut rng = StdRng::seed_from_u64(42);
    let mut bumps: Vec<(Cube, f32)> = Vec::new();
    for _ in 0..4 {
        if let Some(center) = grid.random_cell(&mut rng).map(|c| c.cube()) {
            bumps.push((center, 1.0 + (rng.next_u32() % 3) as f32));
        }
    }
    grid.traverse_mut(|cell| {
        let h: f32 = bumps
            .iter()
            .map(|(center, peak)| (peak - cell.cube().distance_to(*center) as f32 * 0.5).max(0.0))
            .sum();
        cell.h = 0.5 + h;
    });
    for _ in 0..6 {
        let Some(cube) = grid.random_cell(&mut rng).map(|c| c.cube()) else {
            break;
        };
        if let Some(cell) = grid.get_mut(cube) {
            cell.walkable = false;
            cell.user_data.insert("feature".into(), json!("rock"));
        }
    }

    let file = File::create(&out_path).with_context(|| format!("creating {out_path}"))?;
    grid.write_json(BufWriter::new(file))?;
    info!("Wrote {} cells to {}.", grid.len(), out_path);
    Ok(())
}
