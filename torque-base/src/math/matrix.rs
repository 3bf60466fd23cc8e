//! Floating-point 3×3 matrices, for inertia tensors and rotations.
//! This module is private but reexported by its parent.

use core::ops;

use euclid::{Angle, Vector3D};

use crate::math::{FreeCoordinate, FreeVector, Rotation};

/// Enumeration of the axes of three-dimensional space.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_enums)]
pub enum Axis {
    /// The X axis; left-right.
    X = 0,
    /// The Y axis; up-down.
    Y = 1,
    /// The Z axis; forward-backward.
    Z = 2,
}

impl Axis {
    /// All three axes in the standard order, [X, Y, Z].
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Returns the unit vector pointing along the positive direction of this axis.
    #[inline]
    pub fn unit_vector(self) -> FreeVector {
        match self {
            Axis::X => Vector3D::new(1., 0., 0.),
            Axis::Y => Vector3D::new(0., 1., 0.),
            Axis::Z => Vector3D::new(0., 0., 1.),
        }
    }
}

/// A 3×3 linear transformation matrix in [`FreeCoordinate`]s.
///
/// Used for inertia tensors (units of kg·m²) and their inverses, as well as the rotation
/// matrices which transform them.
//---
// Design note: `euclid` has no 3×3 matrix type, and `Transform3D` carries a projective row
// which would need to be ignored everywhere.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3 {
    /// First column
    pub x: FreeVector,
    /// Second column
    pub y: FreeVector,
    /// Third column
    pub z: FreeVector,
}

impl Matrix3 {
    /// The zero matrix, which transforms all vectors to zero.
    pub const ZERO: Self = Self {
        x: Vector3D::new(0., 0., 0.),
        y: Vector3D::new(0., 0., 0.),
        z: Vector3D::new(0., 0., 0.),
    };

    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        x: Vector3D::new(1., 0., 0.),
        y: Vector3D::new(0., 1., 0.),
        z: Vector3D::new(0., 0., 1.),
    };

    /// Note: This takes the elements in a column-major ordering, so the argument order
    /// is transposed relative to a conventional textual display of a matrix.
    #[expect(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        x0: FreeCoordinate,
        x1: FreeCoordinate,
        x2: FreeCoordinate,
        y0: FreeCoordinate,
        y1: FreeCoordinate,
        y2: FreeCoordinate,
        z0: FreeCoordinate,
        z1: FreeCoordinate,
        z2: FreeCoordinate,
    ) -> Self {
        Self {
            x: Vector3D::new(x0, x1, x2),
            y: Vector3D::new(y0, y1, y2),
            z: Vector3D::new(z0, z1, z2),
        }
    }

    /// Constructs a matrix from its rows, in conventional reading order.
    #[inline]
    pub const fn from_rows(rows: [[FreeCoordinate; 3]; 3]) -> Self {
        let [[a, b, c], [d, e, f], [g, h, i]] = rows;
        Self::new(a, d, g, b, e, h, c, f, i)
    }

    /// Returns the rows of the matrix, in conventional reading order.
    #[inline]
    pub fn to_rows(&self) -> [[FreeCoordinate; 3]; 3] {
        [
            [self.x.x, self.y.x, self.z.x],
            [self.x.y, self.y.y, self.z.y],
            [self.x.z, self.y.z, self.z.z],
        ]
    }

    /// Constructs a diagonal matrix, which scales each axis independently.
    #[inline]
    pub const fn from_diagonal(diagonal: FreeVector) -> Self {
        Self::new(
            diagonal.x, 0., 0., //
            0., diagonal.y, 0., //
            0., 0., diagonal.z,
        )
    }

    /// Returns the diagonal elements of the matrix.
    #[inline]
    pub fn diagonal(&self) -> FreeVector {
        Vector3D::new(self.x.x, self.y.y, self.z.z)
    }

    /// Constructs the rotation matrix equivalent to the given quaternion.
    ///
    /// The quaternion is assumed to be normalized.
    #[inline]
    pub fn from_rotation(rotation: Rotation) -> Self {
        let Rotation { i, j, k, r, .. } = rotation;
        Self::new(
            1. - 2. * (j * j + k * k),
            2. * (i * j + k * r),
            2. * (i * k - j * r),
            //
            2. * (i * j - k * r),
            1. - 2. * (i * i + k * k),
            2. * (j * k + i * r),
            //
            2. * (i * k + j * r),
            2. * (j * k - i * r),
            1. - 2. * (i * i + j * j),
        )
    }

    /// Constructs a right-handed rotation about a single coordinate axis.
    #[inline]
    pub fn rotation_about(axis: Axis, angle: Angle<FreeCoordinate>) -> Self {
        let (s, c) = angle.sin_cos();
        match axis {
            Axis::X => Self::new(
                1., 0., 0., //
                0., c, s, //
                0., -s, c,
            ),
            Axis::Y => Self::new(
                c, 0., -s, //
                0., 1., 0., //
                s, 0., c,
            ),
            Axis::Z => Self::new(
                c, s, 0., //
                -s, c, 0., //
                0., 0., 1.,
            ),
        }
    }

    /// Computes the outer product `a · bᵀ`.
    #[inline]
    pub fn outer_product(a: FreeVector, b: FreeVector) -> Self {
        Self {
            x: a * b.x,
            y: a * b.y,
            z: a * b.z,
        }
    }

    /// Returns the transpose of this matrix.
    #[must_use]
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_rows([
            [self.x.x, self.x.y, self.x.z],
            [self.y.x, self.y.y, self.y.z],
            [self.z.x, self.z.y, self.z.z],
        ])
    }

    /// Returns the determinant of this matrix.
    #[inline]
    pub fn determinant(&self) -> FreeCoordinate {
        self.x.dot(self.y.cross(self.z))
    }

    /// Returns the inverse of this matrix, or [`None`] if it is singular or not finite.
    ///
    /// ```
    /// # extern crate torque_base as torque;
    /// use torque::math::{FreeVector, Matrix3};
    ///
    /// let m = Matrix3::from_diagonal(FreeVector::new(2.0, 4.0, 8.0));
    /// assert_eq!(
    ///     m.inverse(),
    ///     Some(Matrix3::from_diagonal(FreeVector::new(0.5, 0.25, 0.125))),
    /// );
    /// assert_eq!(Matrix3::ZERO.inverse(), None);
    /// ```
    #[must_use]
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        // The rows of the inverse are the cross products of pairs of columns, divided by the
        // determinant.
        let r0 = self.y.cross(self.z);
        let r1 = self.z.cross(self.x);
        let r2 = self.x.cross(self.y);
        let det = self.x.dot(r0);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inverse_det = 1.0 / det;
        Some(
            Self::from_rows([
                [r0.x, r0.y, r0.z],
                [r1.x, r1.y, r1.z],
                [r2.x, r2.y, r2.z],
            ]) * inverse_det,
        )
    }

    /// Applies this matrix to the given vector, computing `M · v`.
    #[inline]
    pub fn transform_vector(&self, vector: FreeVector) -> FreeVector {
        self.x * vector.x + self.y * vector.y + self.z * vector.z
    }

    /// Computes `M · N · Mᵀ`, which re-expresses a tensor `N` in the coordinate system that
    /// `self` rotates into.
    #[must_use]
    #[inline]
    pub fn conjugate(&self, tensor: &Self) -> Self {
        *self * *tensor * self.transpose()
    }

    /// Returns the largest absolute difference between corresponding elements.
    #[inline]
    pub fn max_abs_difference(&self, other: &Self) -> FreeCoordinate {
        let difference = *self - *other;
        [difference.x, difference.y, difference.z]
            .into_iter()
            .flat_map(|column| [column.x, column.y, column.z])
            .fold(0.0, |acc, element| acc.max(element.abs()))
    }
}

impl Default for Matrix3 {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl ops::Mul<Self> for Matrix3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.transform_vector(rhs.x),
            y: self.transform_vector(rhs.y),
            z: self.transform_vector(rhs.z),
        }
    }
}

impl ops::Mul<FreeCoordinate> for Matrix3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: FreeCoordinate) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl ops::Add<Self> for Matrix3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl ops::AddAssign<Self> for Matrix3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::Sub<Self> for Matrix3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl core::iter::Sum for Matrix3 {
    #[inline]
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}
