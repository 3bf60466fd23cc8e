use crate::debug::{DebugMarkers, HighlightStyle, Marker};
use crate::math::{Cube, FreeCoordinate, FreePoint, FreeVector, Obb};
use crate::world::World;

/// Velocity components smaller than this (m/s) along an axis are not checked for collision.
const AXIS_VELOCITY_EPSILON: FreeCoordinate = 1e-6;

/// Result of [`step_axes()`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct AxisStep {
    /// The velocity with blocked components removed.
    pub velocity: FreeVector,
    /// If the body should climb onto the block in front of it, the displacement to apply
    /// to its position (one unit along its up axis).
    pub step_up: Option<FreeVector>,
    /// Whether the body was moving down into a block.
    pub on_ground: bool,
    /// Whether any movement was blocked.
    pub colliding: bool,
    /// The highest (greatest Y) collidable cube found, if any.
    pub highest_collision_block: Option<Cube>,
}

/// Cheap collision response which checks each of the hull's local axes separately.
///
/// The velocity is split into components along the hull's right (+X), up (+Y) and
/// backward (+Z) axes. For each component, the face of the hull it moves toward is moved
/// ahead by one tick of that motion and sampled at unit spacing; if any sample is in a
/// collidable cube, the component is zeroed. If the highest collidable cube found is at the
/// height of the hull's bottom, the body may step up onto it, and keeps its horizontal
/// motion.
///
/// This does not rotate the body or account for forces, so it only suits bodies that stay
/// roughly upright.
pub fn step_axes(
    hull: &Obb,
    velocity: FreeVector,
    dt: FreeCoordinate,
    world: &dyn World,
    debug: Option<&mut DebugMarkers>,
) -> AxisStep {
    let mut sampler = Sampler {
        world,
        debug,
        highest: None,
    };
    if let Some(debug) = sampler.debug.as_deref_mut() {
        debug.push(Marker::Obb(*hull));
    }

    let center = hull.center();
    let half = hull.half_size();
    let [right, up, backward] = hull.axes();

    let original_right = velocity.dot(right);
    let original_backward = velocity.dot(backward);
    let mut vel_right = original_right;
    let mut vel_up = velocity.dot(up);
    let mut vel_backward = original_backward;
    let mut on_ground = false;
    let mut colliding = false;

    // The up offsets run from the top down so that a hit near the top ends the search
    // soonest. This assumes the body is roughly upright.

    if vel_right.abs() > AXIS_VELOCITY_EPSILON {
        let offset_right = vel_right * dt + half.x.copysign(vel_right);
        'right: for offset_up in steps_down(half.y) {
            for offset_backward in steps_up(half.z) {
                let point = center + right * offset_right + up * offset_up + backward * offset_backward;
                if sampler.check(point) {
                    vel_right = 0.0;
                    colliding = true;
                    break 'right;
                }
            }
        }
    }

    if vel_up.abs() > AXIS_VELOCITY_EPSILON {
        let offset_up = vel_up * dt + half.y.copysign(vel_up);
        // Every column is checked, so that the highest block below is always found.
        for offset_right in steps_up(half.x) {
            for offset_backward in steps_up(half.z) {
                let point = center + up * offset_up + right * offset_right + backward * offset_backward;
                if sampler.check(point) {
                    if vel_up < 0.0 {
                        on_ground = true;
                    }
                    vel_up = 0.0;
                    colliding = true;
                    break;
                }
            }
        }
    }

    if vel_backward.abs() > AXIS_VELOCITY_EPSILON {
        let offset_backward = vel_backward * dt + half.z.copysign(vel_backward);
        'backward: for offset_up in steps_down(half.y) {
            for offset_right in steps_up(half.x) {
                let point = center + backward * offset_backward + up * offset_up + right * offset_right;
                if sampler.check(point) {
                    vel_backward = 0.0;
                    colliding = true;
                    break 'backward;
                }
            }
        }
    }

    let floor_y = (center - up * half.y).y.floor();
    let step_up = match sampler.highest {
        Some(highest) if FreeCoordinate::from(highest.y) == floor_y => {
            vel_right = original_right;
            vel_backward = original_backward;
            Some(up)
        }
        _ => None,
    };

    AxisStep {
        velocity: right * vel_right + up * vel_up + backward * vel_backward,
        step_up,
        on_ground,
        colliding,
        highest_collision_block: sampler.highest,
    }
}

/// Offsets `-half, -half + 1, ...` not exceeding `half`.
fn steps_up(half: FreeCoordinate) -> impl Iterator<Item = FreeCoordinate> {
    let count = step_count(half);
    (0..count).map(move |i| -half + FreeCoordinate::from(i))
}

/// Offsets `half, half - 1, ...` not going below `-half`.
fn steps_down(half: FreeCoordinate) -> impl Iterator<Item = FreeCoordinate> {
    let count = step_count(half);
    (0..count).map(move |i| half - FreeCoordinate::from(i))
}

fn step_count(half: FreeCoordinate) -> u32 {
    if half >= 0.0 {
        (2.0 * half).floor() as u32 + 1
    } else {
        0
    }
}

struct Sampler<'a> {
    world: &'a dyn World,
    debug: Option<&'a mut DebugMarkers>,
    highest: Option<Cube>,
}

impl Sampler<'_> {
    /// Returns whether `point` is in a collidable cube, keeping track of the highest one.
    fn check(&mut self, point: FreePoint) -> bool {
        let Some(cube) = Cube::containing(point) else {
            return false;
        };
        let collidable = self.world.is_block_collidable(cube);
        if collidable && self.highest.is_none_or(|highest| cube.y > highest.y) {
            self.highest = Some(cube);
        }
        if let Some(debug) = self.debug.as_deref_mut() {
            debug.push(Marker::BlockHighlight {
                cube,
                style: if collidable {
                    HighlightStyle::Full
                } else {
                    HighlightStyle::Small
                },
            });
        }
        collidable
    }
}
