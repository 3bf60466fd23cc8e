use core::fmt;

use crate::math::{FreeCoordinate, FreePoint, GridCoordinate};

/// One block of the world grid: a unit cube whose corners' coordinates are integers,
/// identified by the coordinates of its most negative corner.
///
/// Considered in continuous space, the ranges of coordinates a cube contains are half-open
/// intervals: lower inclusive and upper exclusive.
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
#[allow(missing_docs, clippy::exhaustive_structs)]
pub struct Cube {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl core::hash::Hash for Cube {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        // Hashers work on 64-bit quantities.
        // Therefore, it may be more efficient to provide fewer inputs by packing the data into
        // chunks of at most 64 bits.
        (u64::from(self.x.cast_unsigned()) ^ (u64::from(self.y.cast_unsigned()) << 32)).hash(state);
        self.z.hash(state);
    }
}

impl Cube {
    /// Construct `Cube { x, y, z }` from the given coordinates.
    #[inline]
    pub const fn new(x: GridCoordinate, y: GridCoordinate, z: GridCoordinate) -> Self {
        Self { x, y, z }
    }

    /// Convert a point in space to the unit cube that encloses it.
    ///
    /// Such cubes are defined to be half-open intervals on each axis; that is,
    /// an integer coordinate is counted as part of the cube extending positively
    /// from that coordinate.
    ///
    /// If the point coordinates are outside of the numeric range of [`GridCoordinate`],
    /// returns [`None`].
    ///
    /// ```
    /// # extern crate torque_base as torque;
    /// use torque::math::{FreePoint, Cube};
    ///
    /// assert_eq!(Cube::containing(FreePoint::new(1.0, 1.5, -2.5)), Some(Cube::new(1, 1, -3)));
    /// ```
    #[inline]
    pub fn containing(point: FreePoint) -> Option<Self> {
        Self::from_rounded(point, FreeCoordinate::floor)
    }

    /// Convert a point in space to the cube whose coordinates are the point's coordinates
    /// rounded toward zero.
    ///
    /// This differs from [`Cube::containing()`] for negative coordinates, and is used where
    /// a host world addresses blocks by truncated position.
    ///
    /// ```
    /// # extern crate torque_base as torque;
    /// use torque::math::{FreePoint, Cube};
    ///
    /// assert_eq!(Cube::truncating(FreePoint::new(1.5, -0.5, -2.5)), Some(Cube::new(1, 0, -2)));
    /// ```
    #[inline]
    pub fn truncating(point: FreePoint) -> Option<Self> {
        Self::from_rounded(point, FreeCoordinate::trunc)
    }

    #[inline]
    fn from_rounded(
        point: FreePoint,
        round: impl Fn(FreeCoordinate) -> FreeCoordinate,
    ) -> Option<Self> {
        const MIN_INCLUSIVE: FreeCoordinate = GridCoordinate::MIN as FreeCoordinate;
        const MAX_EXCLUSIVE: FreeCoordinate = GridCoordinate::MAX as FreeCoordinate + 1.0;

        let FreePoint { x, y, z, .. } = point;
        let (x, y, z) = (round(x), round(y), round(z));

        // No short-circuiting because, assuming success is likely, all tests will need to run.
        // NaN fails every comparison and is therefore rejected too.
        if (MIN_INCLUSIVE <= x)
            & (MIN_INCLUSIVE <= y)
            & (MIN_INCLUSIVE <= z)
            & (x < MAX_EXCLUSIVE)
            & (y < MAX_EXCLUSIVE)
            & (z < MAX_EXCLUSIVE)
        {
            Some(Self {
                x: x as GridCoordinate,
                y: y as GridCoordinate,
                z: z as GridCoordinate,
            })
        } else {
            None
        }
    }

    /// Returns the center of the top (+Y) face of this cube.
    ///
    /// ```
    /// # extern crate torque_base as torque;
    /// use torque::math::{FreePoint, Cube};
    ///
    /// assert_eq!(Cube::new(2, 0, -1).top_face_center(), FreePoint::new(2.5, 1.0, -0.5));
    /// ```
    #[inline]
    pub fn top_face_center(self) -> FreePoint {
        let Self { x, y, z } = self;
        FreePoint::new(
            FreeCoordinate::from(x) + 0.5,
            FreeCoordinate::from(y) + 1.0,
            FreeCoordinate::from(z) + 0.5,
        )
    }
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { x, y, z } = self;
        write!(f, "({x:+?}, {y:+?}, {z:+?})")
    }
}
