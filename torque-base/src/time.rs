//! Data types for simulated time.

use core::time::Duration;

/// Number of simulation steps per second of simulated time.
pub const TICKS_PER_SECOND: u32 = 20;

/// Specifies an amount of simulated time passing.
///
/// [`Tick`] values are passed along through the `tick()` operations that advance time.
/// The simulation is stepped at a fixed rate, so ordinarily every tick is
/// [`Tick::STANDARD`]; other lengths exist for testing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tick {
    delta_t: Duration,
    /// Whether simulated time is paused, and `delta_t` should not be considered
    /// as an amount of time passing. See [`Self::paused()`] for details.
    paused: bool,
}

impl Tick {
    /// One step of the fixed-rate simulation: 1/20 of a second.
    pub const STANDARD: Self = Self {
        delta_t: Duration::from_millis(1000 / TICKS_PER_SECOND as u64),
        paused: false,
    };

    /// Construct a non-paused [`Tick`] from a duration expressed in fractional seconds.
    ///
    /// This should only be used for tests.
    #[inline]
    pub fn from_seconds(dt: f64) -> Self {
        Self {
            delta_t: Duration::from_secs_f64(dt),
            paused: false,
        }
    }

    /// Returns the amount of time passed, as a [`Duration`].
    #[inline]
    pub fn delta_t_duration(self) -> Duration {
        self.delta_t
    }

    /// Returns the amount of time passed, as a floating-point number of seconds.
    #[inline]
    pub fn delta_t(self) -> f64 {
        self.delta_t.as_secs_f64()
    }

    /// Set the paused flag. See [`Tick::paused`] for more information.
    #[must_use]
    #[inline]
    pub fn pause(self) -> Self {
        Self {
            paused: true,
            ..self
        }
    }

    /// Returns the "paused" state of this Tick. If true, then tick operations should
    /// not perform any changes that reflect simulated time passing.
    #[inline]
    pub fn paused(&self) -> bool {
        self.paused
    }
}

impl Default for Tick {
    #[inline]
    fn default() -> Self {
        Self::STANDARD
    }
}
