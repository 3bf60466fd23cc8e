//! Numeric types used for coordinates and related quantities.

use euclid::{Point3D, Rotation3D, Scale, Vector3D};

use crate::math::Cube;

/// Coordinates that are locked to the block grid.
pub type GridCoordinate = i32;

/// Coordinates that are not locked to the block grid, in meters.
///
/// One block of the world grid is one meter on a side.
///
/// Note: Because `GridCoordinate = i32` and `FreeCoordinate = f64`, which has
/// more than 32 bits of mantissa, the infallible conversion
/// `From<GridCoordinate> for FreeCoordinate` exists, which is often convenient.
pub type FreeCoordinate = f64;

/// Positions that are not locked to the block grid but may interact with it.
pub type FreePoint = Point3D<FreeCoordinate, Cube>;

/// Vectors that are not locked to the block grid but may interact with it.
pub type FreeVector = Vector3D<FreeCoordinate, Cube>;

/// Orientations of bodies in world space, as unit quaternions.
pub type Rotation = Rotation3D<FreeCoordinate, Cube, Cube>;

/// Unit of distance used by authored model geometry: 1/16 of a meter.
#[derive(Debug)]
#[expect(clippy::exhaustive_enums)]
pub enum ModelPixel {}

/// Positions in authored model geometry.
pub type ModelPoint = Point3D<FreeCoordinate, ModelPixel>;

/// Vectors in authored model geometry.
pub type ModelVector = Vector3D<FreeCoordinate, ModelPixel>;

/// Number of [`ModelPixel`]s in one meter.
pub const PIXELS_PER_METER: FreeCoordinate = 16.0;

/// Conversion from model geometry units to meters.
pub const PIXELS_TO_METERS: Scale<FreeCoordinate, ModelPixel, Cube> =
    Scale::new(1.0 / PIXELS_PER_METER);
