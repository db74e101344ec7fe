//! Closed-form predictions and run summaries.

use serde::Serialize;

use crate::physics::{Ball, Surface};
use crate::simulation::{MultiTrajectory, Trajectory, CONSERVATION_TOLERANCE};
use crate::vector::Vec2;

/// Friction coefficient below which a ball slips on an incline of
/// `angle_deg`: μc = (2/7)·tan θ.
pub fn critical_friction(angle_deg: f64) -> f64 {
    (2.0 / 7.0) * angle_deg.to_radians().tan()
}

pub fn will_slip(angle_deg: f64, friction: f64) -> bool {
    friction < critical_friction(angle_deg)
}

pub fn rolling_acceleration(angle_deg: f64, g: f64) -> f64 {
    (5.0 / 7.0) * g * angle_deg.to_radians().sin()
}

pub fn sliding_acceleration(angle_deg: f64, friction: f64, g: f64) -> f64 {
    let angle = angle_deg.to_radians();
    g * (angle.sin() - friction * angle.cos())
}

/// Speed after rolling `distance` down the incline from rest:
/// v = √(10/7 · g · h).
pub fn rolling_speed_after(distance: f64, angle_deg: f64, g: f64) -> f64 {
    let height = distance * angle_deg.to_radians().sin();
    ((10.0 / 7.0) * g * height).sqrt()
}

/// What theory expects on an incline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub critical_friction: f64,
    pub will_slip: bool,
    pub acceleration: f64,
}

impl Prediction {
    /// `None` on a flat surface.
    pub fn for_surface(surface: &Surface, g: f64) -> Option<Self> {
        if !surface.is_inclined() {
            return None;
        }
        let angle = surface.angle_deg();
        let slip = will_slip(angle, surface.friction_coeff);
        Some(Self {
            critical_friction: critical_friction(angle),
            will_slip: slip,
            acceleration: if slip {
                sliding_acceleration(angle, surface.friction_coeff, g)
            } else {
                rolling_acceleration(angle, g)
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub initial_position: Vec2,
    pub final_position: Vec2,
    pub initial_speed: f64,
    pub final_speed: f64,
    pub distance: f64,
    pub duration: f64,
    pub initial_energy: f64,
    pub final_energy: f64,
    /// Percentage of initial kinetic energy lost, `None` when the ball
    /// started at rest
    pub energy_loss_percent: Option<f64>,
    pub slip_fraction: f64,
    pub energy_conserved: bool,
    pub angular_momentum_conserved: bool,
    pub prediction: Option<Prediction>,
}

impl Summary {
    pub fn of(trajectory: &Trajectory, initial: &Ball, surface: &Surface) -> Self {
        let (first, last) = match (trajectory.first(), trajectory.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Self {
                    initial_position: initial.position,
                    final_position: initial.position,
                    initial_speed: initial.speed(),
                    final_speed: initial.speed(),
                    distance: 0.0,
                    duration: 0.0,
                    initial_energy: initial.kinetic_energy(),
                    final_energy: initial.kinetic_energy(),
                    energy_loss_percent: None,
                    slip_fraction: 0.0,
                    energy_conserved: true,
                    angular_momentum_conserved: true,
                    prediction: Prediction::for_surface(surface, trajectory.g),
                }
            }
        };

        let energy_loss_percent = (first.kinetic_energy > 0.0)
            .then(|| (1.0 - last.kinetic_energy / first.kinetic_energy) * 100.0);

        Self {
            initial_position: first.position,
            final_position: last.position,
            initial_speed: first.velocity.norm(),
            final_speed: last.velocity.norm(),
            distance: (last.position - first.position).norm(),
            duration: last.time,
            initial_energy: first.kinetic_energy,
            final_energy: last.kinetic_energy,
            energy_loss_percent,
            slip_fraction: trajectory.slip_fraction(),
            energy_conserved: trajectory.check_energy_conservation(CONSERVATION_TOLERANCE),
            angular_momentum_conserved: trajectory
                .check_angular_momentum_conservation(CONSERVATION_TOLERANCE),
            prediction: Prediction::for_surface(surface, trajectory.g),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiSummary {
    pub balls: usize,
    pub duration: f64,
    pub initial_momentum: Vec2,
    pub final_momentum: Vec2,
    pub final_positions: Vec<Vec2>,
}

impl MultiSummary {
    pub fn of(trajectory: &MultiTrajectory) -> Self {
        let last = trajectory.len().saturating_sub(1);
        Self {
            balls: trajectory.ball_count(),
            duration: trajectory.time.last().copied().unwrap_or(0.0),
            initial_momentum: trajectory.total_momentum_at(0).unwrap_or_default(),
            final_momentum: trajectory.total_momentum_at(last).unwrap_or_default(),
            final_positions: trajectory
                .positions
                .iter()
                .filter_map(|p| p.last().copied())
                .collect(),
        }
    }
}
