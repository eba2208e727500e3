//! Serialized grid records.
//!
//! [`GridRecord`] is the portable form of a [`HexGrid`]: grid metadata plus one
//! [`CellRecord`] per cell. The JSON field names are camelCase:
//!
//! ```json
//! { "version": 1, "size": 2, "cellSize": 10.0, "extrudeSettings": {}, "autogenerated": true,
//!   "cells": [ { "q": 0, "r": 0, "s": 0, "h": 1.0, "walkable": true, "userData": {} } ] }
//! ```
//!
//! Records without `version` are accepted as the legacy shape. Only coordinates, height,
//! walkability and user data are stored per cell; tile handles and search scratch fields
//! start from their defaults after a load.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cell::{Cell, UserData, DEFAULT_HEIGHT};
use crate::coords::Cube;
use crate::error::{Error, Result};
use crate::grid::{cell_to_hash, CellKey, GridConfig, HexGrid};
use crate::layout::HexLayout;
use crate::tile::TileSink;

/// Record version written by this crate.
pub const RECORD_VERSION: u32 = 1;

/// Serialized form of a whole grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub size: u32,
    pub cell_size: f32,
    #[serde(default)]
    pub extrude_settings: Value,
    #[serde(default)]
    pub autogenerated: bool,
    pub cells: Vec<CellRecord>,
}

/// Serialized form of one cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub q: i32,
    pub r: i32,
    /// Recomputed from `q` and `r` when absent, validated when present.
    #[serde(default)]
    pub s: Option<i32>,
    #[serde(default = "default_height")]
    pub h: f32,
    #[serde(default = "default_walkable")]
    pub walkable: bool,
    #[serde(default)]
    pub user_data: UserData,
}

fn default_height() -> f32 {
    DEFAULT_HEIGHT
}

fn default_walkable() -> bool {
    true
}

impl CellRecord {
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            q: cell.q(),
            r: cell.r(),
            s: Some(cell.s()),
            h: cell.h,
            walkable: cell.walkable,
            user_data: cell.user_data.clone(),
        }
    }

    /// Rebuilds the cell, enforcing the zero-sum rule.
    pub fn to_cell(&self) -> Result<Cell> {
        let cube = match self.s {
            Some(s) => Cube::try_new(self.q, self.r, s)?,
            None => Cube::try_from_qr(self.q, self.r)?,
        };
        let mut cell = Cell::at(cube);
        cell.h = self.h;
        cell.walkable = self.walkable;
        cell.user_data = self.user_data.clone();
        Ok(cell)
    }
}

impl GridRecord {
    /// Parses a record from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let record: GridRecord = serde_json::from_str(json)?;
        record.check_version()?;
        Ok(record)
    }

    /// Parses a record from a reader producing JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let record: GridRecord = serde_json::from_reader(reader)?;
        record.check_version()?;
        Ok(record)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Rejects records written by a newer format revision.
    pub fn check_version(&self) -> Result<()> {
        match self.version {
            Some(found) if found > RECORD_VERSION => Err(Error::UnsupportedVersion {
                found,
                supported: RECORD_VERSION,
            }),
            _ => Ok(()),
        }
    }

    /// Builds the cell map, failing on the first invalid cell.
    ///
    /// A coordinate listed twice keeps its first entry.
    fn build_cells(&self) -> Result<HashMap<CellKey, Cell>> {
        let mut cells = HashMap::with_capacity(self.cells.len());
        for record in &self.cells {
            let cell = record.to_cell()?;
            match cells.entry(cell_to_hash(cell.cube())) {
                Entry::Occupied(_) => {
                    warn!(
                        "Grid record lists cell {} more than once; keeping the first entry.",
                        cell.cube()
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(cell);
                }
            }
        }
        Ok(cells)
    }
}

impl HexGrid {
    /// Snapshot of the grid's persistent state. Cells are ordered by `(q, r)`.
    pub fn to_record(&self) -> GridRecord {
        let mut cells: Vec<CellRecord> = self.iter().map(CellRecord::from_cell).collect();
        cells.sort_by_key(|c| (c.q, c.r));
        GridRecord {
            version: Some(RECORD_VERSION),
            size: self.size(),
            cell_size: self.cell_size(),
            extrude_settings: self.extrude_settings().clone(),
            autogenerated: self.is_autogenerated(),
            cells,
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.to_record().to_json_string()
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        self.to_record().to_json_string_pretty()
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        self.to_record().write_json(writer)
    }

    /// Builds a new grid from a record.
    pub fn from_record(record: GridRecord) -> Result<Self> {
        let config = GridConfig::new(record.size).with_cell_size(record.cell_size);
        let mut grid = HexGrid::try_new(config)?;
        grid.load(record, &mut ())?;
        Ok(grid)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_record(GridRecord::from_json_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_record(GridRecord::from_reader(reader)?)
    }

    /// Replaces the whole grid with the contents of `record`.
    ///
    /// Tile handles held by the discarded cells go to `sink`. The record is validated in
    /// full before anything changes, so on error the grid is left as it was.
    pub fn load<S>(&mut self, record: GridRecord, sink: &mut S) -> Result<()>
    where
        S: TileSink + ?Sized,
    {
        record.check_version()?;
        let layout = HexLayout::new(record.cell_size)?;
        let cells = record.build_cells()?;

        self.replace_cells(cells, sink);
        self.set_size(record.size);
        self.set_cell_size(layout.cell_size())?;
        self.set_extrude_settings(record.extrude_settings);
        self.set_autogenerated(record.autogenerated);

        debug!(
            "Loaded grid: {} cells, size {}, cell_size {}.",
            self.len(),
            self.size(),
            self.cell_size()
        );
        Ok(())
    }

    /// Parses `json` and loads it. See [`HexGrid::load`].
    pub fn load_json_str<S>(&mut self, json: &str, sink: &mut S) -> Result<()>
    where
        S: TileSink + ?Sized,
    {
        self.load(GridRecord::from_json_str(json)?, sink)
    }

    /// Reads JSON from `reader` and loads it. See [`HexGrid::load`].
    pub fn load_reader<R, S>(&mut self, reader: R, sink: &mut S) -> Result<()>
    where
        R: Read,
        S: TileSink + ?Sized,
    {
        self.load(GridRecord::from_reader(reader)?, sink)
    }
}

impl TryFrom<GridRecord> for HexGrid {
    type Error = Error;

    fn try_from(record: GridRecord) -> Result<Self> {
        HexGrid::from_record(record)
    }
}

impl From<&HexGrid> for GridRecord {
    fn from(grid: &HexGrid) -> Self {
        grid.to_record()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::tile::{TileHandle, VecTileSink};

    type CellTuple = (i32, i32, i32, u32, bool, String);

    fn tuples(grid: &HexGrid) -> HashSet<CellTuple> {
        grid.iter()
            .map(|c| {
                (
                    c.q(),
                    c.r(),
                    c.s(),
                    c.h.to_bits(),
                    c.walkable,
                    Value::Object(c.user_data.clone()).to_string(),
                )
            })
            .collect()
    }

    fn decorated_grid() -> HexGrid {
        let mut grid = HexGrid::try_new(
            GridConfig::new(3)
                .with_cell_size(4.0)
                .with_extrude_settings(json!({ "depth": 2, "bevelEnabled": true })),
        )
        .unwrap();
        grid.generate();
        let mut i = 0;
        grid.traverse_mut(|c| {
            i += 1;
            c.h = i as f32 * 0.5;
            c.walkable = i % 3 != 0;
            if i % 4 == 0 {
                c.user_data.insert("tag".into(), json!({ "n": i }));
            }
            c.visited = true;
            c.tile = Some(TileHandle(i));
        });
        grid
    }

    #[test]
    fn json_round_trip_preserves_cells_and_metadata() {
        let grid = decorated_grid();
        let json = grid.to_json_string().unwrap();
        let back = HexGrid::from_json_str(&json).unwrap();

        assert_eq!(back.len(), grid.len());
        assert_eq!(tuples(&back), tuples(&grid));
        assert_eq!(back.size(), 3);
        assert_eq!(back.cell_size(), 4.0);
        assert_eq!(back.extrude_settings(), &json!({ "depth": 2, "bevelEnabled": true }));
        assert!(back.is_autogenerated());
    }

    #[test]
    fn load_resets_scratch_and_tiles() {
        let grid = decorated_grid();
        let back = HexGrid::from_record(grid.to_record()).unwrap();
        for c in back.iter() {
            assert!(c.tile.is_none());
            assert!(!c.visited);
            assert!(c.parent.is_none());
            assert_eq!(c.calc_cost, 0.0);
        }
    }

    #[test]
    fn empty_grid_round_trips() {
        let grid = HexGrid::default();
        let back = HexGrid::from_json_str(&grid.to_json_string().unwrap()).unwrap();
        assert!(back.is_empty());
        assert!(!back.is_autogenerated());
    }

    #[test]
    fn record_cells_are_sorted_and_versioned() {
        let record = decorated_grid().to_record();
        assert_eq!(record.version, Some(RECORD_VERSION));
        let keys: Vec<(i32, i32)> = record.cells.iter().map(|c| (c.q, c.r)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn accepts_legacy_unversioned_shape() {
        let json = r#"{
            "size": 1,
            "cellSize": 10,
            "extrudeSettings": { "depth": 1 },
            "autogenerated": false,
            "cells": [
                { "q": 0, "r": 0, "s": 0, "h": 2.5, "walkable": false, "userData": { "x": 1 } },
                { "q": 1, "r": -1, "s": 0, "h": 1, "walkable": true, "userData": {} }
            ]
        }"#;
        let grid = HexGrid::from_json_str(json).unwrap();
        assert_eq!(grid.len(), 2);
        let origin = grid.get(Cube::ORIGIN).unwrap();
        assert_eq!(origin.h, 2.5);
        assert!(!origin.walkable);
        assert_eq!(origin.user_data["x"], 1);
    }

    #[test]
    fn missing_s_is_recomputed_and_defaults_apply() {
        let json = r#"{ "size": 0, "cellSize": 1, "cells": [ { "q": 2, "r": -5 } ] }"#;
        let grid = HexGrid::from_json_str(json).unwrap();
        let cell = grid.get(Cube::new(2, -5)).unwrap();
        assert_eq!(cell.s(), 3);
        assert_eq!(cell.h, DEFAULT_HEIGHT);
        assert!(cell.walkable);
        assert!(cell.user_data.is_empty());
    }

    #[test]
    fn rejects_zero_sum_violation() {
        let json = r#"{ "size": 0, "cellSize": 1, "cells": [ { "q": 1, "r": 1, "s": 1 } ] }"#;
        let err = HexGrid::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidCell { q: 1, r: 1, s: 1 }));
    }

    #[test]
    fn rejects_missing_s_that_cannot_be_derived() {
        let json = r#"{ "size": 0, "cellSize": 1, "cells": [ { "q": -2147483648, "r": 0 } ] }"#;
        let err = HexGrid::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidCell { q: i32::MIN, r: 0, .. }));

        let json = r#"{ "size": 0, "cellSize": 1, "cells": [ { "q": 2147483647, "r": 1 } ] }"#;
        assert!(matches!(
            HexGrid::from_json_str(json),
            Err(Error::InvalidCell { .. })
        ));

        let json = r#"{ "size": 0, "cellSize": 1, "cells": [ { "q": 2147483647, "r": -2147483647 } ] }"#;
        let grid = HexGrid::from_json_str(json).unwrap();
        assert!(grid.contains(Cube::new(i32::MAX, -i32::MAX)));
    }

    #[test]
    fn rejects_malformed_records() {
        let missing_cells = r#"{ "size": 1, "cellSize": 1 }"#;
        assert!(matches!(
            HexGrid::from_json_str(missing_cells),
            Err(Error::Json(_))
        ));

        let non_numeric = r#"{ "size": 1, "cellSize": 1, "cells": [ { "q": "a", "r": 0 } ] }"#;
        assert!(matches!(
            HexGrid::from_json_str(non_numeric),
            Err(Error::Json(_))
        ));

        let bad_size = r#"{ "size": 1, "cellSize": 0, "cells": [] }"#;
        assert!(matches!(
            HexGrid::from_json_str(bad_size),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_future_versions() {
        let json = r#"{ "version": 99, "size": 1, "cellSize": 1, "cells": [] }"#;
        assert!(matches!(
            GridRecord::from_json_str(json),
            Err(Error::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn duplicate_record_cells_keep_first() {
        let json = r#"{ "size": 0, "cellSize": 1, "cells": [
            { "q": 0, "r": 0, "h": 3 },
            { "q": 0, "r": 0, "h": 8 }
        ] }"#;
        let grid = HexGrid::from_json_str(json).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(Cube::ORIGIN).unwrap().h, 3.0);
    }

    #[test]
    fn load_replaces_contents_and_releases_tiles() {
        let mut grid = decorated_grid();
        let old_len = grid.len();

        let mut other = HexGrid::try_new(GridConfig::new(1).with_cell_size(2.0)).unwrap();
        other.add(Cell::new(7, 7));
        let mut sink = VecTileSink::new();
        grid.load(other.to_record(), &mut sink).unwrap();

        assert_eq!(sink.len(), old_len);
        assert_eq!(grid.len(), 1);
        assert!(grid.contains(Cube::new(7, 7)));
        assert_eq!(grid.cell_size(), 2.0);
        assert_eq!(grid.layout().cell_width(), 4.0);
        assert_eq!(grid.size(), 1);
        assert!(!grid.is_autogenerated());
    }

    #[test]
    fn failed_load_leaves_grid_untouched() {
        let mut grid = decorated_grid();
        let before = tuples(&grid);
        let bad = r#"{ "size": 9, "cellSize": 1, "cells": [ { "q": 0, "r": 0 }, { "q": 1, "r": 1, "s": 5 } ] }"#;
        let mut sink = VecTileSink::new();

        assert!(grid.load_json_str(bad, &mut sink).is_err());
        assert!(sink.is_empty());
        assert_eq!(tuples(&grid), before);
        assert_eq!(grid.size(), 3);
    }

    #[test]
    fn reader_and_writer_round_trip() {
        let grid = decorated_grid();
        let mut buf = Vec::new();
        grid.write_json(&mut buf).unwrap();

        let mut loaded = HexGrid::default();
        loaded.load_reader(buf.as_slice(), &mut ()).unwrap();
        assert_eq!(tuples(&loaded), tuples(&grid));

        let via_try: HexGrid = GridRecord::from(&grid).try_into().unwrap();
        assert_eq!(via_try.len(), grid.len());
    }
}
