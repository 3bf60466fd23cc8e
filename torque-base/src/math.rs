//! Mathematical utilities and decisions.

mod coord;
pub use coord::*;
mod cube;
pub use cube::Cube;
pub mod inertia;
mod matrix;
pub use matrix::*;
mod obb;
pub use obb::*;

/// Threshold below which a length or size is treated as zero.
///
/// Used to short-circuit degenerate geometry rather than produce NaN or empty-but-wrong
/// results.
pub const GEOMETRY_EPSILON: FreeCoordinate = 1e-9;

/// Converts degrees to radians, as [`euclid::Angle`].
#[inline]
pub fn degrees(value: FreeCoordinate) -> euclid::Angle<FreeCoordinate> {
    euclid::Angle::degrees(value)
}

/// Returns whether all components of the vector are finite (neither infinite nor NaN).
#[inline]
pub fn vector_is_finite<U>(vector: euclid::Vector3D<FreeCoordinate, U>) -> bool {
    vector.x.is_finite() && vector.y.is_finite() && vector.z.is_finite()
}
