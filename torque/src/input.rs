//! Control input from whoever is driving a vehicle.

/// The controls a driver is holding during a tick.
///
/// The host sets this on a [`Vehicle`](crate::vehicle::Vehicle) with
/// [`Vehicle::set_driver_input()`](crate::vehicle::Vehicle::set_driver_input) whenever its
/// driver's controls change. It stays in effect until replaced.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct DriverInput {
    /// Accelerate forward.
    pub forward: bool,
    /// Brake, then reverse.
    pub backward: bool,
    /// Turn the steering wheel left.
    pub left: bool,
    /// Turn the steering wheel right.
    pub right: bool,
}

impl DriverInput {
    /// No controls held.
    pub const NONE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };
}
