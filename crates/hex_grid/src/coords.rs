//! Cube coordinates for flat-top hexagon grids.
//!
//! [`Cube`] is an integer lattice point whose three components always sum to zero. The
//! third component is derived on construction and cannot be set on its own, so every
//! value of the type is a valid hexagon. [`FracCube`] holds the fractional coordinates
//! produced by continuous position conversion and maps back to the lattice with
//! [`FracCube::round`].
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::error::{Error, Result};

/// Integer cube coordinate with `q + r + s == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cube {
    q: i32,
    r: i32,
    s: i32,
}

/// Offsets of the six edge-adjacent neighbors, in table order.
pub const DIRECTIONS: [Cube; 6] = [
    Cube::new(1, -1),
    Cube::new(1, 0),
    Cube::new(0, 1),
    Cube::new(-1, 1),
    Cube::new(-1, 0),
    Cube::new(0, -1),
];

/// Offsets of the six vertex-adjacent ("diagonal") cells at cube distance 2.
///
/// Entry `i` is `DIRECTIONS[i] + DIRECTIONS[(i + 1) % 6]`.
pub const DIAGONALS: [Cube; 6] = [
    Cube::new(2, -1),
    Cube::new(1, 1),
    Cube::new(-1, 2),
    Cube::new(-2, 1),
    Cube::new(-1, -1),
    Cube::new(1, -2),
];

impl Cube {
    pub const ORIGIN: Cube = Cube { q: 0, r: 0, s: 0 };

    /// Creates a cube coordinate from `q` and `r`, deriving `s = -q - r`.
    ///
    /// Overflows like integer arithmetic when `s` is not representable; use
    /// [`Cube::try_from_qr`] for untrusted input.
    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Like [`Cube::new`], rejecting pairs whose `s` falls outside `i32`.
    pub fn try_from_qr(q: i32, r: i32) -> Result<Self> {
        match q.checked_add(r).and_then(i32::checked_neg) {
            Some(s) => Ok(Self { q, r, s }),
            None => Err(Error::InvalidCell {
                q,
                r,
                s: q.wrapping_add(r).wrapping_neg(),
            }),
        }
    }

    /// Creates a cube coordinate from all three components, rejecting triples that do not
    /// sum to zero.
    pub fn try_new(q: i32, r: i32, s: i32) -> Result<Self> {
        let sum = q as i64 + r as i64 + s as i64;
        if sum != 0 {
            return Err(Error::InvalidCell { q, r, s });
        }
        Ok(Self { q, r, s })
    }

    #[inline]
    pub const fn q(self) -> i32 {
        self.q
    }

    #[inline]
    pub const fn r(self) -> i32 {
        self.r
    }

    #[inline]
    pub const fn s(self) -> i32 {
        self.s
    }

    /// Component-wise sum, or `None` if any component leaves `i32`.
    #[inline]
    pub fn checked_add(self, rhs: Cube) -> Option<Cube> {
        Some(Cube {
            q: self.q.checked_add(rhs.q)?,
            r: self.r.checked_add(rhs.r)?,
            s: self.s.checked_add(rhs.s)?,
        })
    }

    /// Neighbor in direction `dir` (taken modulo 6), `None` past the edge of `i32`.
    #[inline]
    pub fn neighbor(self, dir: usize) -> Option<Cube> {
        self.checked_add(DIRECTIONS[dir % 6])
    }

    /// Diagonal neighbor in direction `dir` (taken modulo 6), `None` past the edge of `i32`.
    #[inline]
    pub fn diagonal(self, dir: usize) -> Option<Cube> {
        self.checked_add(DIAGONALS[dir % 6])
    }

    /// Cube distance from the origin.
    #[inline]
    pub fn length(self) -> u32 {
        self.q
            .unsigned_abs()
            .max(self.r.unsigned_abs())
            .max(self.s.unsigned_abs())
    }

    /// Cube distance `max(|dq|, |dr|, |ds|)` to `other`.
    #[inline]
    pub fn distance_to(self, other: Cube) -> u32 {
        self.q
            .abs_diff(other.q)
            .max(self.r.abs_diff(other.r))
            .max(self.s.abs_diff(other.s))
    }

    /// All coordinates within `radius` of `self`, a hexagon-shaped region of
    /// `3·radius² + 3·radius + 1` cells.
    ///
    /// Iterates `x` in the outer loop and `y` in the inner loop, keeping points where the
    /// derived `z = -x - y` is also within range. Points not representable in `i32` are
    /// skipped.
    pub fn range(self, radius: u32) -> impl Iterator<Item = Cube> {
        let n = i64::from(radius);
        (-n..=n).flat_map(move |x| {
            (-n..=n).filter_map(move |y| {
                let z = -x - y;
                if z.abs() > n {
                    return None;
                }
                self.offset_wide(x, y)
            })
        })
    }

    /// Coordinates at exactly `radius` from `self`. Radius 0 yields `self` alone.
    pub fn ring(self, radius: u32) -> Vec<Cube> {
        if radius == 0 {
            return vec![self];
        }

        let n = i64::from(radius);
        let mut out = Vec::with_capacity(6 * radius as usize);
        let (mut x, mut y) = (-n, 0);
        for dir in DIRECTIONS {
            for _ in 0..radius {
                out.extend(self.offset_wide(x, y));
                x += i64::from(dir.q);
                y += i64::from(dir.r);
            }
        }
        out
    }

    /// `self + (x, y)` computed wide, `None` if the result does not fit `i32`.
    fn offset_wide(self, x: i64, y: i64) -> Option<Cube> {
        let q = i32::try_from(i64::from(self.q) + x).ok()?;
        let r = i32::try_from(i64::from(self.r) + y).ok()?;
        Cube::try_from_qr(q, r).ok()
    }
}

impl Add for Cube {
    type Output = Cube;

    #[inline]
    fn add(self, rhs: Cube) -> Cube {
        Cube {
            q: self.q + rhs.q,
            r: self.r + rhs.r,
            s: self.s + rhs.s,
        }
    }
}

impl AddAssign for Cube {
    #[inline]
    fn add_assign(&mut self, rhs: Cube) {
        *self = *self + rhs;
    }
}

impl Sub for Cube {
    type Output = Cube;

    #[inline]
    fn sub(self, rhs: Cube) -> Cube {
        Cube {
            q: self.q - rhs.q,
            r: self.r - rhs.r,
            s: self.s - rhs.s,
        }
    }
}

impl Neg for Cube {
    type Output = Cube;

    #[inline]
    fn neg(self) -> Cube {
        Cube {
            q: -self.q,
            r: -self.r,
            s: -self.s,
        }
    }
}

impl Mul<i32> for Cube {
    type Output = Cube;

    #[inline]
    fn mul(self, k: i32) -> Cube {
        Cube {
            q: self.q * k,
            r: self.r * k,
            s: self.s * k,
        }
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.q, self.r, self.s)
    }
}

/// Fractional cube coordinate, not necessarily on the lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FracCube {
    pub q: f32,
    pub r: f32,
    pub s: f32,
}

impl FracCube {
    pub fn new(q: f32, r: f32, s: f32) -> Self {
        Self { q, r, s }
    }

    /// Fractional coordinate from `q` and `r`, with `s = -q - r`.
    pub fn from_qr(q: f32, r: f32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Rounds to the nearest lattice point. See [`cube_round`].
    #[inline]
    pub fn round(self) -> Option<Cube> {
        cube_round(self)
    }
}

impl From<Cube> for FracCube {
    fn from(c: Cube) -> Self {
        Self {
            q: c.q as f32,
            r: c.r as f32,
            s: c.s as f32,
        }
    }
}

/// Rounds a fractional cube coordinate to the nearest valid [`Cube`].
///
/// Each component is rounded on its own; the component with the largest rounding error is
/// then recomputed from the other two. The order of the checks is fixed: `q` absorbs the
/// slack only if its error is strictly the largest, otherwise `r` if its error strictly
/// exceeds that of `s`, otherwise `s`.
///
/// Components round half away from zero (`f32::round`), so an exact tie such as `-0.5`
/// goes to `-1`, not `0`.
///
/// Returns `None` for non-finite input or when the result falls outside `i32`.
pub fn cube_round(frac: FracCube) -> Option<Cube> {
    let (fq, fr, fs) = (frac.q.round(), frac.r.round(), frac.s.round());
    let (rq, rr, rs) = (lattice(fq)?, lattice(fr)?, lattice(fs)?);

    let q_diff = (fq - frac.q).abs();
    let r_diff = (fr - frac.r).abs();
    let s_diff = (fs - frac.s).abs();

    let (q, r) = if q_diff > r_diff && q_diff > s_diff {
        (-rr - rs, rr)
    } else if r_diff > s_diff {
        (rq, -rq - rs)
    } else {
        (rq, rr)
    };

    let q = i32::try_from(q).ok()?;
    let r = i32::try_from(r).ok()?;
    Cube::try_from_qr(q, r).ok()
}

/// A rounded component as an integer, if it is finite and near the `i32` range.
fn lattice(v: f32) -> Option<i64> {
    (v.is_finite() && v.abs() <= i32::MAX as f32).then_some(v as i64)
}
