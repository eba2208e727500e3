//! Text renderer standing in for a real rendering engine in the examples.
use std::collections::HashMap;

use hex_grid::prelude::*;
use mint::Vector3;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs a formatted tracing subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[derive(Clone, Copy, Debug)]
struct Glyph {
    col: i32,
    row: i32,
    ch: char,
}

/// Tile factory that "renders" each cell as one character on a text canvas.
///
/// Columns follow world X in steps of `1.5 · cell_size`; rows follow world Z in steps of
/// `√3/2 · cell_size`, which staggers odd columns by one row like a flat-top layout.
#[derive(Debug, Default)]
pub struct AsciiTiles {
    glyphs: HashMap<TileHandle, Glyph>,
    next: u64,
}

impl AsciiTiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tiles.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Frees tiles the grid reported as released.
    pub fn release_all(&mut self, released: &[(Cube, TileHandle)]) {
        for (_, handle) in released {
            self.glyphs.remove(handle);
        }
    }

    /// Draws every live tile. Two characters per column keep the canvas roughly square.
    pub fn render(&self) -> String {
        let Some(first) = self.glyphs.values().next() else {
            return String::new();
        };
        let (mut min_c, mut max_c) = (first.col, first.col);
        let (mut min_r, mut max_r) = (first.row, first.row);
        for g in self.glyphs.values() {
            min_c = min_c.min(g.col);
            max_c = max_c.max(g.col);
            min_r = min_r.min(g.row);
            max_r = max_r.max(g.row);
        }

        let width = ((max_c - min_c + 1) * 2) as usize;
        let height = (max_r - min_r + 1) as usize;
        let mut canvas = vec![vec![' '; width]; height];
        for g in self.glyphs.values() {
            canvas[(g.row - min_r) as usize][((g.col - min_c) * 2) as usize] = g.ch;
        }

        canvas
            .into_iter()
            .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn glyph_for(cell: &Cell) -> char {
    if !cell.walkable {
        return '#';
    }
    match cell.h {
        h if h < 1.0 => '~',
        h if h < 2.0 => '.',
        h if h < 3.0 => ':',
        _ => '^',
    }
}

impl TileFactory for AsciiTiles {
    fn create_tile(&mut self, cell: &Cell, position: Vector3<f32>, shape: &HexShape) -> TileHandle {
        let col_step = shape.cell_size * 1.5;
        let row_step = shape.cell_size * 3.0_f32.sqrt() * 0.5;
        let glyph = Glyph {
            col: (position.x / col_step).round() as i32,
            row: (position.z / row_step).round() as i32,
            ch: glyph_for(cell),
        };
        self.next += 1;
        let handle = TileHandle(self.next);
        self.glyphs.insert(handle, glyph);
        handle
    }
}
