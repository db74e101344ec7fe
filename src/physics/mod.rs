//! Rigid-ball mechanics on a plane
//!
//! Handles:
//! - Ball state and derived quantities (inertia, energy, momenta)
//! - Surface geometry and friction
//! - Equations of motion with rolling/slipping regimes
//! - Wall and ball-ball collision response

mod ball;
mod collision;
mod dynamics;
mod surface;

pub use ball::Ball;
pub use collision::{collide_balls, collide_wall, Axis, Wall};
pub use dynamics::{
    contact_slips, derivative, normal_force, rolling_deceleration, MotionRegime, StateDerivative,
};
pub use surface::{Bounds, Surface};

/// Standard gravity, m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;
