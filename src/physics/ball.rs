use serde::{Deserialize, Serialize};

use crate::vector::{Vec2, Vec3};

/// Solid homogeneous sphere resting on the surface plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub mass: f64,
    pub radius: f64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angular_velocity: Vec3,
}

impl Ball {
    pub fn new(
        mass: f64,
        radius: f64,
        position: Vec2,
        velocity: Vec2,
        angular_velocity: Vec3,
    ) -> Self {
        Self {
            mass,
            radius,
            position,
            velocity,
            angular_velocity,
        }
    }

    /// Ball at rest at `position`.
    pub fn at_rest(mass: f64, radius: f64, position: Vec2) -> Self {
        Self::new(mass, radius, position, Vec2::ZERO, Vec3::ZERO)
    }

    /// Ball already rolling without slipping: ω = (vy/R, -vx/R, 0).
    pub fn rolling(mass: f64, radius: f64, position: Vec2, velocity: Vec2) -> Self {
        let angular_velocity = if radius > 0.0 {
            Vec3::new(velocity.y / radius, -velocity.x / radius, 0.0)
        } else {
            Vec3::ZERO
        };
        Self::new(mass, radius, position, velocity, angular_velocity)
    }

    /// I = 2/5 m R²
    pub fn moment_of_inertia(&self) -> f64 {
        0.4 * self.mass * self.radius * self.radius
    }

    pub fn kinetic_energy(&self) -> f64 {
        let translational = 0.5 * self.mass * self.velocity.norm_squared();
        let rotational = 0.5 * self.moment_of_inertia() * self.angular_velocity.norm_squared();
        translational + rotational
    }

    pub fn angular_momentum(&self) -> Vec3 {
        self.angular_velocity * self.moment_of_inertia()
    }

    pub fn linear_momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Mean density in kg/m³.
    pub fn density(&self) -> f64 {
        let volume = 4.0 / 3.0 * std::f64::consts::PI * self.radius.powi(3);
        self.mass / volume
    }
}
