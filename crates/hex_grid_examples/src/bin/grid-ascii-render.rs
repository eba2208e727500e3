use hex_grid::prelude::*;
use hex_grid_examples::AsciiTiles;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    hex_grid_examples::init_tracing();

    let mut grid = HexGrid::try_new(GridConfig::new(5).with_cell_size(1.0))?;
    grid.generate();

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..12 {
        if let Some(cube) = grid.random_cell(&mut rng).map(|c| c.cube()) {
            grid.remove(cube);
        }
    }
    for cube in Cube::new(2, -1).ring(1) {
        if let Some(cell) = grid.get_mut(cube) {
            cell.h = 3.5;
        }
    }

    let mut tiles = AsciiTiles::new();
    grid.generate_tiles(&mut tiles, &mut ());
    println!("{}", tiles.render());

    // Swap in a tiny map; the old tiles come back through the sink.
    let mut released = VecTileSink::new();
    grid.load_json_str(
        r#"{ "size": 1, "cellSize": 1, "cells": [ { "q": 0, "r": 0 }, { "q": 1, "r": 0, "walkable": false } ] }"#,
        &mut released,
    )?;
    tiles.release_all(released.released());
    info!("Released {} tiles; {} left.", released.len(), tiles.len());

    grid.generate_tiles(&mut tiles, &mut ());
    println!("{}", tiles.render());
    Ok(())
}
