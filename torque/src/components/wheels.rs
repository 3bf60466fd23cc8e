use euclid::{Angle, vec3};

use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::components::SteeringWheel;
use crate::debug::Marker;
use crate::identifier::Identifier;
use crate::math::{FreeCoordinate, FreeVector, GEOMETRY_EPSILON, Rotation};
use crate::physics::RigidBody;
use crate::save::{DataCompound, DataInput, DataOutput};

/// Radians the wheels turn for each radian of the steering wheel.
pub const STEERING_RATIO: FreeCoordinate = 0.1;

/// Engine force, in newtons, shared among the driven wheels while accelerating.
const FORWARD_DRIVE: FreeCoordinate = 10_000.0;

/// Engine force, in newtons, shared among the driven wheels while reversing.
const REVERSE_DRIVE: FreeCoordinate = 5_000.0;

/// Lateral force, in newtons, per radian of slip angle.
const CORNERING_STIFFNESS: FreeCoordinate = 15_000.0;

/// Below this forward speed (m/s) the slip angle is scaled down, so that a vehicle at rest
/// does not oscillate sideways.
const FULL_GRIP_SPEED: FreeCoordinate = 3.0;

// Save data keys
const ROTATION_KEY: &str = "rotation";
const SPEED_KEY: &str = "speed";

/// Where one wheel touches the ground and what it does.
///
/// Descriptors are plain data, usually derived by the host from tags on the vehicle model.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(from = "WheelSchema", into = "WheelSchema")]
#[allow(clippy::exhaustive_structs)]
pub struct WheelDescriptor {
    /// Point where the wheel meets the ground, in meters, relative to the body position and
    /// in the body's frame (−Z forward, +X right).
    pub contact_patch: FreeVector,
    /// Wheel radius in meters.
    pub radius: FreeCoordinate,
    /// Whether the wheel turns with the steering wheel.
    pub steerable: bool,
    /// Whether the engine drives the wheel.
    pub driven: bool,
}

impl WheelDescriptor {
    /// A wheel of radius 0.5 m which neither steers nor is driven.
    pub fn new(contact_patch: FreeVector) -> Self {
        Self {
            contact_patch,
            radius: 0.5,
            steerable: false,
            driven: false,
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
struct WheelSchema {
    contact_patch: [FreeCoordinate; 3],
    #[serde(default = "default_radius")]
    radius: FreeCoordinate,
    #[serde(default)]
    steerable: bool,
    #[serde(default)]
    driven: bool,
}

fn default_radius() -> FreeCoordinate {
    0.5
}

impl From<WheelSchema> for WheelDescriptor {
    fn from(schema: WheelSchema) -> Self {
        Self {
            contact_patch: schema.contact_patch.into(),
            radius: schema.radius,
            steerable: schema.steerable,
            driven: schema.driven,
        }
    }
}

impl From<WheelDescriptor> for WheelSchema {
    fn from(wheel: WheelDescriptor) -> Self {
        Self {
            contact_patch: wheel.contact_patch.to_array(),
            radius: wheel.radius,
            steerable: wheel.steerable,
            driven: wheel.driven,
        }
    }
}

/// Configuration of [`Wheels`].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct WheelsConfig {
    /// The vehicle's wheels. Their saved state is matched to them by position in this list.
    pub wheels: Vec<WheelDescriptor>,
}

impl WheelsConfig {
    #[allow(missing_docs)]
    pub fn new(wheels: Vec<WheelDescriptor>) -> Self {
        Self { wheels }
    }
}

/// One wheel of a [`Wheels`] component and its current motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wheel {
    descriptor: WheelDescriptor,
    rotation: FreeCoordinate,
    speed: FreeCoordinate,
    steer_angle: FreeCoordinate,
}

impl Wheel {
    #[allow(missing_docs)]
    pub fn descriptor(&self) -> &WheelDescriptor {
        &self.descriptor
    }

    /// How far the wheel has rolled, in radians.
    pub fn rotation(&self) -> FreeCoordinate {
        self.rotation
    }

    /// Rate of rolling, in radians per second, as of the last tick.
    pub fn speed(&self) -> FreeCoordinate {
        self.speed
    }

    /// Angle the wheel is steered to, in radians, positive to the right.
    /// Always 0 for wheels that do not steer.
    pub fn steer_angle(&self) -> FreeCoordinate {
        self.steer_angle
    }
}

/// Tire forces: drives the vehicle from [`DriverInput`], and resists sideways sliding.
///
/// Steerable wheels follow [`SteeringWheel::angle()`] with Ackermann geometry: each wheel
/// points at right angles to the line to a common turning center on the rear axle line,
/// so the inner wheel steers more than the outer one.
///
/// [`DriverInput`]: crate::input::DriverInput
#[derive(Clone, Debug, PartialEq)]
pub struct Wheels {
    wheels: Vec<Wheel>,
    /// Distance along Z between the frontmost and rearmost contact patches.
    wheelbase: FreeCoordinate,
    /// Z coordinate of the rearmost contact patch.
    back_axle: FreeCoordinate,
    driven_count: usize,
}

impl Wheels {
    /// Identifier of the wheels component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "wheels");

    /// Constructs wheels at rest.
    pub fn new(config: WheelsConfig) -> Self {
        Self::load(config, DataCompound::empty())
    }

    /// Constructs wheels, restoring each one's rotation and speed from `data`.
    pub fn load(config: WheelsConfig, data: &dyn DataInput) -> Self {
        let wheels: Vec<Wheel> = config
            .wheels
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let saved = data.child(&wheel_key(index));
                Wheel {
                    descriptor,
                    rotation: saved.read_float(ROTATION_KEY, 0.0),
                    speed: saved.read_float(SPEED_KEY, 0.0),
                    steer_angle: 0.0,
                }
            })
            .collect();

        let (front, back) = wheels
            .iter()
            .map(|wheel| wheel.descriptor.contact_patch.z)
            .fold(None, |range, z| match range {
                None => Some((z, z)),
                Some((front, back)) => Some((front.min(z), back.max(z))),
            })
            .unwrap_or((0.0, 0.0));
        let driven_count = wheels.iter().filter(|wheel| wheel.descriptor.driven).count();
        log::trace!("wheelbase {} m, rear axle at z = {back}", back - front);

        Self {
            wheels,
            wheelbase: back - front,
            back_axle: back,
            driven_count,
        }
    }

    /// Returns the component type which builds [`Wheels`] from a [`WheelsConfig`].
    pub fn component_type() -> ComponentType {
        ComponentType::with_config::<WheelsConfig>(Self::IDENTIFIER, |init: ComponentInit<'_>| {
            Box::new(Wheels::load(init.config(), init.data))
        })
    }

    #[allow(missing_docs)]
    pub fn wheels(&self) -> &[Wheel] {
        &self.wheels
    }

    /// Distance along the body's Z axis between the front and rear contact patches.
    pub fn wheelbase(&self) -> FreeCoordinate {
        self.wheelbase
    }
}

fn wheel_key(index: usize) -> String {
    format!("wheel{index}")
}

/// Returns the distance from the rear axle's center line to the turning center, for the
/// given average steering angle of the front wheels. Positive is to the right.
///
/// Returns infinity when going straight.
pub fn turning_radius(wheelbase: FreeCoordinate, steer_angle: FreeCoordinate) -> FreeCoordinate {
    if steer_angle.abs() < 1e-6 {
        FreeCoordinate::INFINITY
    } else {
        wheelbase * (core::f64::consts::FRAC_PI_2 - steer_angle).tan()
    }
}

/// Returns the angle a wheel at `contact_patch` must be steered to for the vehicle to turn
/// about a center `turning_radius` to the side of the rear axle at `back_axle`.
pub fn ackermann_steer_angle(
    contact_patch: FreeVector,
    back_axle: FreeCoordinate,
    turning_radius: FreeCoordinate,
) -> FreeCoordinate {
    let along = back_axle - contact_patch.z;
    if along.abs() < GEOMETRY_EPSILON {
        // On the rear axle line, the wheel already points at right angles to the center.
        return 0.0;
    }
    (along / (turning_radius - contact_patch.x)).atan()
}

impl VehicleComponent for Wheels {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Forces
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        if self.wheels.is_empty() {
            return;
        }
        let dt = context.tick.delta_t();
        let input = context.driver_input;
        let steering = context
            .siblings
            .get::<SteeringWheel>()
            .map_or(0.0, SteeringWheel::angle);
        let Some(body) = context.siblings.get_mut::<RigidBody>() else {
            return;
        };

        let drive = if input.forward {
            FORWARD_DRIVE
        } else if input.backward {
            -REVERSE_DRIVE
        } else {
            0.0
        };
        let forward = body.orientation.transform_vector3d(vec3(0.0, 0.0, -1.0));
        let up = body.orientation.transform_vector3d(vec3(0.0, 1.0, 0.0));
        let radius = turning_radius(self.wheelbase, steering * STEERING_RATIO);
        let position = body.position;
        let velocity = body.velocity;
        let angular_velocity = body.angular_velocity;

        for wheel in &mut self.wheels {
            let WheelDescriptor {
                contact_patch,
                radius: wheel_radius,
                steerable,
                driven,
            } = wheel.descriptor;

            let mut wheel_forward = forward;
            if steerable {
                wheel.steer_angle = ackermann_steer_angle(contact_patch, self.back_axle, radius);
                wheel_forward = Rotation::around_y(Angle::radians(-wheel.steer_angle))
                    .transform_vector3d(forward);
            }
            let wheel_right = wheel_forward.cross(up);
            let contact = position + body.orientation.transform_vector3d(contact_patch);

            if driven && drive != 0.0 {
                let force = wheel_forward * (drive / self.driven_count as FreeCoordinate);
                body.add_force(force, contact);
                if let Some(debug) = context.debug.as_deref_mut() {
                    debug.push(Marker::Vector {
                        origin: contact,
                        vector: force / 1000.0,
                    });
                }
            }

            wheel.rotation += wheel.speed * dt;

            let contact_velocity = velocity + angular_velocity.cross(contact - position);
            let forward_speed = contact_velocity.dot(wheel_forward);
            let lateral_speed = contact_velocity.dot(wheel_right);
            wheel.speed = if wheel_radius > 0.0 {
                forward_speed / wheel_radius
            } else {
                0.0
            };

            let slip_angle = lateral_speed.atan2(forward_speed.abs() + 0.01)
                * (forward_speed.abs() / FULL_GRIP_SPEED).min(1.0);
            let lateral_force = wheel_right * (-slip_angle * CORNERING_STIFFNESS);
            body.add_force(lateral_force, contact);
            if let Some(debug) = context.debug.as_deref_mut() {
                debug.push(Marker::Vector {
                    origin: contact,
                    vector: lateral_force / 1000.0,
                });
            }
        }
    }

    fn save(&self, data: &mut dyn DataOutput) {
        for (index, wheel) in self.wheels.iter().enumerate() {
            let saved = data.child_mut(&wheel_key(index));
            saved.write_float(ROTATION_KEY, wheel.rotation);
            saved.write_float(SPEED_KEY, wheel.speed);
        }
    }
}
