//! Equations of motion for a ball on a (possibly inclined) plane.

use serde::{Deserialize, Serialize};

use super::{Ball, Surface};
use crate::vector::{Vec2, Vec3};

/// Contact-point speed above which the ball counts as slipping.
const SLIP_EPSILON: f64 = 1e-6;

/// Whether static friction can hold the contact point still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionRegime {
    #[default]
    Rolling,
    Slipping,
}

impl MotionRegime {
    pub fn is_slipping(self) -> bool {
        matches!(self, MotionRegime::Slipping)
    }
}

/// Time derivative of the (position, velocity, angular velocity) state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateDerivative {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub angular_acceleration: Vec3,
}

pub fn normal_force(ball: &Ball, surface: &Surface, g: f64) -> f64 {
    ball.mass * g * surface.angle.cos()
}

fn contact_offset(radius: f64) -> Vec3 {
    Vec3::new(0.0, 0.0, -radius)
}

/// True when the contact point moves relative to the surface.
pub fn contact_slips(ball: &Ball) -> bool {
    let spin_velocity = ball.angular_velocity.cross(contact_offset(ball.radius)).xy();
    (ball.velocity - spin_velocity).norm() > SLIP_EPSILON
}

/// Evaluate the equations of motion at the ball's current state.
///
/// The regime is decided by comparing the friction needed for rolling
/// without slipping, (2/7)·m·g·sin θ, against the friction available, μN.
/// Only an incline can push the ball into slipping; on a flat plane the
/// rolling model decelerates the ball at (2/7)·μ·g against its velocity.
pub fn derivative(ball: &Ball, surface: &Surface, g: f64) -> (StateDerivative, MotionRegime) {
    let gravity = Vec2::new(ball.mass * g * surface.angle.sin(), 0.0);
    let normal = normal_force(ball, surface, g);
    let friction_max = surface.friction_coeff * normal;
    let friction_required = (2.0 / 7.0) * gravity.x.abs();

    if friction_required > friction_max && surface.is_inclined() {
        let friction = match ball.velocity.normalized(1e-10) {
            Some(direction) => -direction * friction_max,
            None if gravity.x.abs() > 1e-10 => Vec2::new(-gravity.x.signum() * friction_max, 0.0),
            None => Vec2::ZERO,
        };

        let acceleration = (gravity + friction) / ball.mass;
        let torque = contact_offset(ball.radius).cross(friction.extend());
        let inertia = ball.moment_of_inertia();
        let angular_acceleration = if inertia > 0.0 {
            torque / inertia
        } else {
            Vec3::ZERO
        };

        return (
            StateDerivative {
                velocity: ball.velocity,
                acceleration,
                angular_acceleration,
            },
            MotionRegime::Slipping,
        );
    }

    let acceleration = if surface.is_inclined() {
        Vec2::new((5.0 / 7.0) * g * surface.angle.sin(), 0.0)
    } else {
        match ball.velocity.normalized(1e-8) {
            Some(direction) => -direction * rolling_deceleration(surface, g),
            None => Vec2::ZERO,
        }
    };

    let angular_acceleration = if ball.radius > 1e-10 {
        Vec3::new(
            acceleration.y / ball.radius,
            -acceleration.x / ball.radius,
            0.0,
        )
    } else {
        Vec3::ZERO
    };

    (
        StateDerivative {
            velocity: ball.velocity,
            acceleration,
            angular_acceleration,
        },
        MotionRegime::Rolling,
    )
}

/// Magnitude of the flat-surface rolling deceleration, (2/7)·μ·g.
pub fn rolling_deceleration(surface: &Surface, g: f64) -> f64 {
    (2.0 / 7.0) * surface.friction_coeff * g
}
