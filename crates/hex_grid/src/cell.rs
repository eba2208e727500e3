//! Grid cells: a fixed cube coordinate plus mutable per-cell state.
use std::hash::{Hash, Hasher};

use serde_json::{Map, Value};

use crate::coords::Cube;
use crate::error::Result;
use crate::tile::TileHandle;

/// Arbitrary key/value data attached to a cell and persisted verbatim.
pub type UserData = Map<String, Value>;

/// Height assigned to cells that do not specify one.
pub const DEFAULT_HEIGHT: f32 = 1.0;

/// A single hexagonal cell.
///
/// The coordinate is fixed at construction; everything else is plain public state that
/// collaborators read and write directly. The `calc_cost`, `priority`, `parent` and
/// `visited` fields are scratch space for an external path search and are reset by
/// [`crate::grid::HexGrid::clear_path`].
///
/// Equality and hashing consider the coordinate only.
#[derive(Clone, Debug)]
pub struct Cell {
    cube: Cube,
    /// Elevation, used as world height and as vertical distance cost.
    pub h: f32,
    pub walkable: bool,
    pub user_data: UserData,
    /// Handle to a renderable owned by the rendering collaborator.
    pub tile: Option<TileHandle>,
    pub calc_cost: f32,
    pub priority: f32,
    /// Coordinate of the cell this one was reached from during a search.
    pub parent: Option<Cube>,
    pub visited: bool,
}

impl Cell {
    /// Creates a cell at `(q, r)`, deriving `s`.
    pub fn new(q: i32, r: i32) -> Self {
        Self::at(Cube::new(q, r))
    }

    /// Creates a cell from a full triple, rejecting coordinates that do not sum to zero.
    pub fn try_new(q: i32, r: i32, s: i32) -> Result<Self> {
        Ok(Self::at(Cube::try_new(q, r, s)?))
    }

    /// Creates a cell with default state at `cube`.
    pub fn at(cube: Cube) -> Self {
        Self {
            cube,
            h: DEFAULT_HEIGHT,
            walkable: true,
            user_data: UserData::new(),
            tile: None,
            calc_cost: 0.0,
            priority: 0.0,
            parent: None,
            visited: false,
        }
    }

    /// Sets the height, builder style.
    pub fn with_height(mut self, h: f32) -> Self {
        self.h = h;
        self
    }

    /// Sets the walkable flag, builder style.
    pub fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }

    /// Inserts a user data entry, builder style.
    pub fn with_user_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.user_data.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn cube(&self) -> Cube {
        self.cube
    }

    #[inline]
    pub fn q(&self) -> i32 {
        self.cube.q()
    }

    #[inline]
    pub fn r(&self) -> i32 {
        self.cube.r()
    }

    #[inline]
    pub fn s(&self) -> i32 {
        self.cube.s()
    }

    /// Overwrites coordinate, height, walkability and user data from `other`.
    ///
    /// Tile handle and search scratch fields are left untouched.
    pub fn copy_from(&mut self, other: &Cell) {
        self.cube = other.cube;
        self.h = other.h;
        self.walkable = other.walkable;
        self.user_data = other.user_data.clone();
    }

    /// Returns a fresh cell offset by `offset`, carrying no state from `self`.
    ///
    /// Used to compute neighbor candidates without touching stored cells.
    pub fn add(&self, offset: Cube) -> Cell {
        Cell::at(self.cube + offset)
    }

    /// Resets the search scratch fields.
    pub fn clear_path(&mut self) {
        self.calc_cost = 0.0;
        self.priority = 0.0;
        self.parent = None;
        self.visited = false;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::at(Cube::ORIGIN)
    }
}

impl From<Cube> for Cell {
    fn from(cube: Cube) -> Self {
        Self::at(cube)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cube == other.cube
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cube.hash(state);
    }
}
