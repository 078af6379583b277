//! Geometry and grid-space types shared by the voxel crates (no host dependency).
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Point/vector in host model units (centimeters for most CAD kernels).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Integer position of a voxel in grid units. Identity key of a world entry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for GridCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<GridCoord> for (i32, i32, i32) {
    fn from(value: GridCoord) -> Self {
        (value.x, value.y, value.z)
    }
}

impl From<[i32; 3]> for GridCoord {
    fn from(value: [i32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<GridCoord> for [i32; 3] {
    fn from(value: GridCoord) -> Self {
        [value.x, value.y, value.z]
    }
}

/// Constant translation (in grid units) added to every coordinate before scaling.
pub type Offset = GridCoord;

/// Grid-to-model transform: `center = (coord + offset) * grid_size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub grid_size: f64,
    pub offset: Offset,
}

impl Placement {
    #[inline]
    pub const fn new(grid_size: f64, offset: Offset) -> Self {
        Self { grid_size, offset }
    }

    /// Model-space center of the cell at `coord`.
    #[inline]
    pub fn real_center(&self, coord: GridCoord) -> Vec3 {
        Vec3::new(
            f64::from(coord.x) + f64::from(self.offset.x),
            f64::from(coord.y) + f64::from(self.offset.y),
            f64::from(coord.z) + f64::from(self.offset.z),
        ) * self.grid_size
    }

    /// Side length of a cube (diameter of a sphere) placed by this transform.
    #[inline]
    pub fn side_length(&self) -> f64 {
        self.grid_size
    }

    /// True when `grid_size` is usable as a scale factor.
    #[inline]
    pub fn is_valid_grid_size(grid_size: f64) -> bool {
        grid_size.is_finite() && grid_size > 0.0
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(1.0, Offset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn coord_tuple_conversions_agree(c: GridCoord) {
            let t: (i32, i32, i32) = c.into();
            let a: [i32; 3] = c.into();
            prop_assert_eq!(GridCoord::from(t), c);
            prop_assert_eq!(GridCoord::from(a), c);
        }

        #[test]
        fn vec3_add_then_sub_restores(
            a in (-1e6f64..1e6, -1e6f64..1e6, -1e6f64..1e6),
            b in (-1e6f64..1e6, -1e6f64..1e6, -1e6f64..1e6),
        ) {
            let a = Vec3::new(a.0, a.1, a.2);
            let b = Vec3::new(b.0, b.1, b.2);
            let r = (a + b) - b;
            prop_assert!((r.x - a.x).abs() <= 1e-6);
            prop_assert!((r.y - a.y).abs() <= 1e-6);
            prop_assert!((r.z - a.z).abs() <= 1e-6);
        }
    }

    #[test]
    fn grid_size_validation() {
        assert!(Placement::is_valid_grid_size(0.5));
        assert!(!Placement::is_valid_grid_size(0.0));
        assert!(!Placement::is_valid_grid_size(-1.0));
        assert!(!Placement::is_valid_grid_size(f64::NAN));
        assert!(!Placement::is_valid_grid_size(f64::INFINITY));
    }

    #[test]
    fn coord_display() {
        assert_eq!(GridCoord::new(1, -2, 3).to_string(), "(1, -2, 3)");
    }
}
