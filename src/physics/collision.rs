//! Collision response: axis-aligned walls and ball-ball impulses.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Ball;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Infinite wall perpendicular to `axis`, located at `position` along it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub position: f64,
    #[serde(default = "default_axis")]
    pub axis: Axis,
}

fn default_axis() -> Axis {
    Axis::X
}

impl Wall {
    pub fn new(position: f64, axis: Axis) -> Self {
        Self { position, axis }
    }

    /// The four walls of a square box at ±half_size.
    pub fn box_walls(half_size: f64) -> Vec<Wall> {
        vec![
            Wall::new(half_size, Axis::X),
            Wall::new(-half_size, Axis::X),
            Wall::new(half_size, Axis::Y),
            Wall::new(-half_size, Axis::Y),
        ]
    }
}

/// Reflect the ball off `wall` if it touches it while moving toward it.
///
/// The ball is placed exactly one radius from the wall on the side its
/// centre is on, so a fast ball cannot stay embedded across steps.
pub fn collide_wall(ball: &mut Ball, wall: &Wall, restitution: f64) -> bool {
    let axis = wall.axis.index();
    let distance = ball.position.get(axis) - wall.position;
    if distance.abs() > ball.radius {
        return false;
    }

    let v = ball.velocity.get(axis);
    let approaching = if distance > 0.0 { v < 0.0 } else { v > 0.0 };
    if !approaching {
        return false;
    }

    ball.velocity.set(axis, -restitution * v);
    let side = if distance > 0.0 { 1.0 } else { -1.0 };
    ball.position.set(axis, wall.position + side * ball.radius);

    debug!(
        axis = ?wall.axis,
        wall = wall.position,
        speed_before = v.abs(),
        "wall collision"
    );
    true
}

/// Resolve a collision between two balls with an impulse along the line
/// of centres, then separate them by half the overlap each.
pub fn collide_balls(a: &mut Ball, b: &mut Ball, restitution: f64) -> bool {
    let delta = a.position - b.position;
    let distance = delta.norm();
    if distance > a.radius + b.radius || distance < 1e-12 {
        return false;
    }

    let normal = delta / distance;
    let v_normal = (a.velocity - b.velocity).dot(normal);
    if v_normal >= 0.0 {
        return false;
    }

    let reduced_mass = a.mass * b.mass / (a.mass + b.mass);
    let impulse = normal * (-(1.0 + restitution) * v_normal * reduced_mass);
    a.velocity += impulse / a.mass;
    b.velocity -= impulse / b.mass;

    let correction = normal * ((a.radius + b.radius - distance) / 2.0);
    a.position += correction;
    b.position -= correction;

    debug!(impulse = impulse.norm(), "ball collision");
    true
}
