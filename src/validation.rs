//! Physical plausibility checks for scenario parameters
//!
//! Hard limits reject values the model cannot represent sensibly (negative
//! mass, restitution above one, more than five balls). Soft limits only
//! produce warnings: a 50 kg ball the size of a marble is allowed but
//! almost certainly a typo.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::scenario::{BallSpec, Scenario, ScenarioKind};

pub const SPEED_OF_LIGHT: f64 = 3e8;
pub const MAX_REASONABLE_SPEED: f64 = 100.0;
pub const HIGH_SPEED_WARNING: f64 = 50.0;
pub const MIN_REASONABLE_MASS: f64 = 0.001;
pub const MAX_REASONABLE_MASS: f64 = 1000.0;
pub const MIN_REASONABLE_RADIUS: f64 = 0.001;
pub const MAX_REASONABLE_RADIUS: f64 = 10.0;
pub const MAX_REASONABLE_TIME: f64 = 3600.0;
pub const MAX_FRICTION_COEFF: f64 = 2.0;
pub const MIN_DENSITY: f64 = 10.0;
pub const MAX_DENSITY: f64 = 22000.0;
pub const STEEP_ANGLE_WARNING: f64 = 75.0;
pub const MIN_BALLS: usize = 2;
pub const MAX_BALLS: usize = 5;
/// Upper bound on recorded steps, `total_time / dt`.
pub const MAX_STEPS: f64 = 1e7;
pub const MAX_SUBSTEPS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(
        "mass {0} kg is outside {min}..={max} kg",
        min = MIN_REASONABLE_MASS,
        max = MAX_REASONABLE_MASS
    )]
    Mass(f64),

    #[error(
        "radius {0} m is outside {min}..={max} m",
        min = MIN_REASONABLE_RADIUS,
        max = MAX_REASONABLE_RADIUS
    )]
    Radius(f64),

    #[error("friction coefficient {0} is outside 0..={max}", max = MAX_FRICTION_COEFF)]
    Friction(f64),

    #[error("incline angle {0}° is outside 0..=90°")]
    Angle(f64),

    #[error("restitution {0} is outside 0..=1")]
    Restitution(f64),

    #[error(
        "simulation time {0} s must be positive and at most {max} s",
        max = MAX_REASONABLE_TIME
    )]
    Time(f64),

    #[error("time step {0} s must be positive and no longer than the simulation")]
    TimeStep(f64),

    #[error("{0:.2e} steps requested, at most {max:.0e} allowed; raise dt", max = MAX_STEPS)]
    TooManySteps(f64),

    #[error("substeps {0} is outside 1..={max}", max = MAX_SUBSTEPS)]
    Substeps(usize),

    #[error("gravity {0} m/s² must be positive")]
    Gravity(f64),

    #[error("speed component {0} m/s exceeds ±{max} m/s", max = MAX_REASONABLE_SPEED)]
    Speed(f64),

    #[error("speed {0:.2e} m/s exceeds the speed of light; relativistic effects are not modelled")]
    Superluminal(f64),

    #[error("wall box half-size {0} m must be at least 0.5 m")]
    Walls(f64),

    #[error(
        "multi-ball scenarios take {min}..={max} balls, got {0}",
        min = MIN_BALLS,
        max = MAX_BALLS
    )]
    BallCount(usize),

    #[error("ball {0} starts outside the wall box")]
    OutsideWalls(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "density", rename_all = "snake_case")]
pub enum DensityCheck {
    Ok(f64),
    TooLow(f64),
    TooHigh(f64),
}

impl DensityCheck {
    pub fn density(self) -> f64 {
        match self {
            DensityCheck::Ok(d) | DensityCheck::TooLow(d) | DensityCheck::TooHigh(d) => d,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, DensityCheck::Ok(_))
    }
}

pub fn check_density(mass: f64, radius: f64) -> DensityCheck {
    let volume = 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3);
    let density = mass / volume;
    if density < MIN_DENSITY {
        DensityCheck::TooLow(density)
    } else if density > MAX_DENSITY {
        DensityCheck::TooHigh(density)
    } else {
        DensityCheck::Ok(density)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedCheck {
    Ok,
    TooFast,
    Superluminal,
}

pub fn check_speed(speed: f64) -> SpeedCheck {
    let speed = speed.abs();
    if speed > SPEED_OF_LIGHT {
        SpeedCheck::Superluminal
    } else if speed > MAX_REASONABLE_SPEED {
        SpeedCheck::TooFast
    } else {
        SpeedCheck::Ok
    }
}

/// Non-fatal observations about a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum Warning {
    Density { ball: usize, check: DensityCheck },
    SteepAngle { angle_deg: f64 },
    HighFriction { friction: f64 },
    HighSpeed { ball: usize, speed: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Density { ball, check } => match check {
                DensityCheck::TooLow(d) => write!(
                    f,
                    "ball {}: density {:.1} kg/m³ is too low (< {} kg/m³, lighter than air)",
                    ball + 1,
                    d,
                    MIN_DENSITY
                ),
                DensityCheck::TooHigh(d) => write!(
                    f,
                    "ball {}: density {:.1} kg/m³ is too high (> {} kg/m³, denser than osmium)",
                    ball + 1,
                    d,
                    MAX_DENSITY
                ),
                DensityCheck::Ok(d) => write!(f, "ball {}: density {:.1} kg/m³", ball + 1, d),
            },
            Warning::SteepAngle { angle_deg } => {
                write!(f, "incline of {angle_deg}° is very steep")
            }
            Warning::HighFriction { friction } => write!(
                f,
                "μ = {friction:.2} > 1 (rubber or adhesive surfaces)"
            ),
            Warning::HighSpeed { ball, speed } => write!(
                f,
                "ball {}: high speed {:.1} m/s ({:.1} km/h)",
                ball + 1,
                speed,
                speed * 3.6
            ),
        }
    }
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

fn validate_ball(
    index: usize,
    ball: &BallSpec,
    warnings: &mut Vec<Warning>,
) -> Result<(), ValidationError> {
    if !in_range(ball.mass, MIN_REASONABLE_MASS, MAX_REASONABLE_MASS) {
        return Err(ValidationError::Mass(ball.mass));
    }
    if !in_range(ball.radius, MIN_REASONABLE_RADIUS, MAX_REASONABLE_RADIUS) {
        return Err(ValidationError::Radius(ball.radius));
    }
    for component in [ball.velocity.x, ball.velocity.y] {
        match check_speed(component) {
            SpeedCheck::Superluminal => return Err(ValidationError::Superluminal(component)),
            SpeedCheck::TooFast => return Err(ValidationError::Speed(component)),
            SpeedCheck::Ok if !component.is_finite() => {
                return Err(ValidationError::Speed(component))
            }
            SpeedCheck::Ok => {}
        }
    }

    let density = check_density(ball.mass, ball.radius);
    if !density.is_ok() {
        warnings.push(Warning::Density {
            ball: index,
            check: density,
        });
    }
    let speed = ball.velocity.norm();
    if speed > HIGH_SPEED_WARNING {
        warnings.push(Warning::HighSpeed { ball: index, speed });
    }
    Ok(())
}

/// Check every parameter of `scenario`. Returns the soft warnings when all
/// hard limits hold.
pub fn validate_scenario(scenario: &Scenario) -> Result<Vec<Warning>, ValidationError> {
    let mut warnings = Vec::new();

    if scenario.kind == ScenarioKind::Multiball || scenario.is_multi() {
        let n = scenario.balls.len();
        if !(MIN_BALLS..=MAX_BALLS).contains(&n) {
            return Err(ValidationError::BallCount(n));
        }
    }

    for (i, ball) in scenario.balls.iter().enumerate() {
        validate_ball(i, ball, &mut warnings)?;
    }

    let surface = &scenario.surface;
    if !in_range(surface.angle_deg, 0.0, 90.0) {
        return Err(ValidationError::Angle(surface.angle_deg));
    }
    if !in_range(surface.friction, 0.0, MAX_FRICTION_COEFF) {
        return Err(ValidationError::Friction(surface.friction));
    }
    if !in_range(scenario.restitution, 0.0, 1.0) {
        return Err(ValidationError::Restitution(scenario.restitution));
    }

    let sim = &scenario.simulation;
    if !(sim.total_time > 0.0 && sim.total_time <= MAX_REASONABLE_TIME) {
        return Err(ValidationError::Time(sim.total_time));
    }
    if !(sim.dt > 0.0 && sim.dt <= sim.total_time) {
        return Err(ValidationError::TimeStep(sim.dt));
    }
    let steps = sim.total_time / sim.dt;
    if steps > MAX_STEPS {
        return Err(ValidationError::TooManySteps(steps));
    }
    if sim.substeps > MAX_SUBSTEPS {
        return Err(ValidationError::Substeps(sim.substeps));
    }
    if !(sim.g.is_finite() && sim.g > 0.0) {
        return Err(ValidationError::Gravity(sim.g));
    }

    if let Some(half) = scenario.walls {
        if !(half >= 0.5 && half.is_finite()) {
            return Err(ValidationError::Walls(half));
        }
        if let Some(i) = scenario
            .balls
            .iter()
            .position(|b| b.position.x.abs() > half || b.position.y.abs() > half)
        {
            return Err(ValidationError::OutsideWalls(i));
        }
    }

    if surface.angle_deg > STEEP_ANGLE_WARNING {
        warnings.push(Warning::SteepAngle {
            angle_deg: surface.angle_deg,
        });
    }
    if surface.friction > 1.0 {
        warnings.push(Warning::HighFriction {
            friction: surface.friction,
        });
    }

    Ok(warnings)
}
