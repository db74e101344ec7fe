use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

/// Axis-aligned rectangle on the surface plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Square centred on the origin.
    pub fn square(half_size: f64) -> Self {
        Self {
            x_min: -half_size,
            x_max: half_size,
            y_min: -half_size,
            y_max: half_size,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (self.x_min..=self.x_max).contains(&p.x) && (self.y_min..=self.y_max).contains(&p.y)
    }
}

/// Plane the ball moves on. An incline tilts about the y axis so the
/// downhill direction is +x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub friction_coeff: f64,
    /// Incline angle in radians
    pub angle: f64,
    pub bounds: Option<Bounds>,
}

impl Surface {
    pub fn new(friction_coeff: f64, angle_deg: f64) -> Self {
        Self {
            friction_coeff,
            angle: angle_deg.to_radians(),
            bounds: None,
        }
    }

    pub fn flat(friction_coeff: f64) -> Self {
        Self::new(friction_coeff, 0.0)
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle.to_degrees()
    }

    pub fn is_inclined(&self) -> bool {
        self.angle.abs() > 1e-6
    }

    pub fn is_within_bounds(&self, position: Vec2) -> bool {
        self.bounds.map_or(true, |b| b.contains(position))
    }
}
