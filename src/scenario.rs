//! Declarative scenario definitions
//!
//! A scenario fixes everything a run needs: balls, surface, optional walls
//! and integration settings. Scenarios come from the built-in presets or
//! from TOML files:
//!
//! ```toml
//! name = "bounce"
//! kind = "walls"
//! walls = 2.0
//! restitution = 0.9
//!
//! [[balls]]
//! mass = 0.5
//! radius = 0.05
//! velocity = [2.0, 1.5]
//!
//! [surface]
//! angle_deg = 0.0
//! friction = 0.1
//!
//! [simulation]
//! total_time = 10.0
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::physics::{Ball, Bounds, Surface, Wall};
use crate::simulation::{
    MultiTrajectory, MultiballSimulation, Simulation, SimulationConfig, Trajectory,
};
use crate::vector::Vec2;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("scenario '{0}' has no balls")]
    NoBalls(String),

    #[error("unknown scenario '{0}' (try incline, slipping, horizontal, walls, multiball, custom)")]
    UnknownKind(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Rolling down an incline without slipping
    Incline,
    /// Steep, low-friction incline where the ball slides
    Slipping,
    /// Rolling to rest on a flat surface
    Horizontal,
    /// Bouncing inside a square box
    Walls,
    /// Several balls colliding inside a box
    Multiball,
    #[default]
    Custom,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 6] = [
        ScenarioKind::Incline,
        ScenarioKind::Slipping,
        ScenarioKind::Horizontal,
        ScenarioKind::Walls,
        ScenarioKind::Multiball,
        ScenarioKind::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::Incline => "incline",
            ScenarioKind::Slipping => "slipping",
            ScenarioKind::Horizontal => "horizontal",
            ScenarioKind::Walls => "walls",
            ScenarioKind::Multiball => "multiball",
            ScenarioKind::Custom => "custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScenarioKind::Incline => "Rolling down an incline (no slipping)",
            ScenarioKind::Slipping => "Transition into slipping on a steep incline",
            ScenarioKind::Horizontal => "Rolling on a horizontal plane",
            ScenarioKind::Walls => "Collisions with walls",
            ScenarioKind::Multiball => "Collisions between several balls",
            ScenarioKind::Custom => "Custom scenario",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScenarioError::UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    pub mass: f64,
    pub radius: f64,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    /// Start with the spin of rolling without slipping
    #[serde(default = "default_true")]
    pub rolling: bool,
}

impl BallSpec {
    pub fn new(mass: f64, radius: f64) -> Self {
        Self {
            mass,
            radius,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rolling: true,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn moving(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn to_ball(&self) -> Ball {
        if self.rolling {
            Ball::rolling(self.mass, self.radius, self.position, self.velocity)
        } else {
            Ball::new(
                self.mass,
                self.radius,
                self.position,
                self.velocity,
                Default::default(),
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSpec {
    pub angle_deg: f64,
    pub friction: f64,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            friction: 0.5,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_restitution() -> f64 {
    1.0
}

fn default_name() -> String {
    "scenario".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub kind: ScenarioKind,
    pub balls: Vec<BallSpec>,
    #[serde(default)]
    pub surface: SurfaceSpec,
    /// Half-size of a square box of walls centred on the origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walls: Option<f64>,
    #[serde(default = "default_restitution")]
    pub restitution: f64,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Result of running a scenario.
#[derive(Debug, Clone)]
pub enum Outcome {
    Single {
        initial: Ball,
        surface: Surface,
        trajectory: Trajectory,
    },
    Multi {
        initial: Vec<Ball>,
        surface: Surface,
        trajectory: MultiTrajectory,
    },
}

/// Parameter changes layered over a preset or a scenario file.
///
/// Mass and radius apply to every ball. Position and velocity apply to the
/// first ball only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub mass: Option<f64>,
    pub radius: Option<f64>,
    pub angle_deg: Option<f64>,
    pub friction: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub walls: Option<f64>,
    pub restitution: Option<f64>,
    pub total_time: Option<f64>,
    pub dt: Option<f64>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, scenario: &mut Scenario) {
        for ball in &mut scenario.balls {
            if let Some(mass) = self.mass {
                ball.mass = mass;
            }
            if let Some(radius) = self.radius {
                ball.radius = radius;
            }
        }
        if let Some(first) = scenario.balls.first_mut() {
            let p = &mut first.position;
            p.x = self.x.unwrap_or(p.x);
            p.y = self.y.unwrap_or(p.y);
            let v = &mut first.velocity;
            v.x = self.vx.unwrap_or(v.x);
            v.y = self.vy.unwrap_or(v.y);
        }

        let surface = &mut scenario.surface;
        surface.angle_deg = self.angle_deg.unwrap_or(surface.angle_deg);
        surface.friction = self.friction.unwrap_or(surface.friction);

        if self.walls.is_some() {
            scenario.walls = self.walls;
        }
        scenario.restitution = self.restitution.unwrap_or(scenario.restitution);

        let sim = &mut scenario.simulation;
        sim.total_time = self.total_time.unwrap_or(sim.total_time);
        sim.dt = self.dt.unwrap_or(sim.dt);
    }
}

impl Scenario {
    fn single(kind: ScenarioKind, ball: BallSpec, surface: SurfaceSpec, total_time: f64) -> Self {
        Self {
            name: kind.as_str().to_string(),
            kind,
            balls: vec![ball],
            surface,
            walls: None,
            restitution: 1.0,
            simulation: SimulationConfig {
                total_time,
                ..SimulationConfig::default()
            },
        }
    }

    /// Built-in scenario with its default parameters.
    pub fn preset(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::Incline => Self::single(
                kind,
                BallSpec::new(1.0, 0.1),
                SurfaceSpec {
                    angle_deg: 30.0,
                    friction: 0.5,
                },
                3.0,
            ),
            ScenarioKind::Slipping => Self::single(
                kind,
                BallSpec::new(1.0, 0.1),
                SurfaceSpec {
                    angle_deg: 45.0,
                    friction: 0.1,
                },
                2.0,
            ),
            ScenarioKind::Horizontal => Self::single(
                kind,
                BallSpec::new(0.5, 0.05).moving(Vec2::new(3.0, 2.0)),
                SurfaceSpec {
                    angle_deg: 0.0,
                    friction: 0.3,
                },
                5.0,
            ),
            ScenarioKind::Walls => Self {
                walls: Some(2.0),
                restitution: 0.9,
                ..Self::single(
                    kind,
                    BallSpec::new(0.5, 0.05).moving(Vec2::new(2.0, 1.5)),
                    SurfaceSpec {
                        angle_deg: 0.0,
                        friction: 0.1,
                    },
                    10.0,
                )
            },
            ScenarioKind::Multiball => Self::multiball(2),
            ScenarioKind::Custom => Self::single(
                kind,
                BallSpec::new(1.0, 0.1),
                SurfaceSpec {
                    angle_deg: 30.0,
                    friction: 0.5,
                },
                5.0,
            ),
        }
    }

    /// `count` unit balls spaced one metre apart along x, alternately moving
    /// right and left, inside a ±3 m box.
    pub fn multiball(count: usize) -> Self {
        let half = (count / 2) as f64;
        let balls = (0..count)
            .map(|i| {
                let vx = if i % 2 == 0 { 1.0 } else { -1.0 };
                BallSpec {
                    rolling: false,
                    ..BallSpec::new(1.0, 0.1)
                        .at(Vec2::new(i as f64 - half, 0.0))
                        .moving(Vec2::new(vx, 0.0))
                }
            })
            .collect();

        Self {
            name: ScenarioKind::Multiball.as_str().to_string(),
            kind: ScenarioKind::Multiball,
            balls,
            surface: SurfaceSpec {
                angle_deg: 0.0,
                friction: 0.05,
            },
            walls: Some(3.0),
            restitution: 1.0,
            simulation: SimulationConfig {
                total_time: 8.0,
                ..SimulationConfig::default()
            },
        }
    }

    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(content).map_err(|source| ScenarioError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        if scenario.balls.is_empty() {
            return Err(ScenarioError::NoBalls(scenario.name));
        }
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn surface(&self) -> Surface {
        let surface = Surface::new(self.surface.friction, self.surface.angle_deg);
        match self.walls {
            Some(half) => surface.with_bounds(Bounds::square(half)),
            None => surface,
        }
    }

    pub fn wall_list(&self) -> Vec<Wall> {
        self.walls.map(Wall::box_walls).unwrap_or_default()
    }

    pub fn is_multi(&self) -> bool {
        self.balls.len() > 1
    }

    pub fn run(&self) -> Outcome {
        let surface = self.surface();
        let walls = self.wall_list();

        if self.is_multi() {
            let initial: Vec<Ball> = self.balls.iter().map(BallSpec::to_ball).collect();
            let mut sim =
                MultiballSimulation::new(initial.clone(), surface.clone(), self.simulation);
            let trajectory = sim.run(&walls, self.restitution);
            Outcome::Multi {
                initial,
                surface,
                trajectory,
            }
        } else {
            let initial = self
                .balls
                .first()
                .map(BallSpec::to_ball)
                .unwrap_or_else(|| Ball::at_rest(1.0, 0.1, Vec2::ZERO));
            let mut sim = Simulation::new(initial.clone(), surface.clone(), self.simulation);
            let trajectory = sim.run(&walls, self.restitution);
            Outcome::Single {
                initial,
                surface,
                trajectory,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_has_balls() {
        for kind in ScenarioKind::ALL {
            let scenario = Scenario::preset(kind);
            assert!(!scenario.balls.is_empty(), "{kind} has no balls");
            assert_eq!(scenario.kind, kind);
        }
    }

    #[test]
    fn test_walls_preset_defaults() {
        let scenario = Scenario::preset(ScenarioKind::Walls);
        assert_eq!(scenario.walls, Some(2.0));
        assert_eq!(scenario.restitution, 0.9);
        assert_eq!(scenario.wall_list().len(), 4);
        assert_eq!(scenario.simulation.total_time, 10.0);
    }

    #[test]
    fn test_multiball_layout() {
        let scenario = Scenario::multiball(3);
        let xs: Vec<f64> = scenario.balls.iter().map(|b| b.position.x).collect();
        assert_eq!(xs, vec![-1.0, 0.0, 1.0]);
        let vxs: Vec<f64> = scenario.balls.iter().map(|b| b.velocity.x).collect();
        assert_eq!(vxs, vec![1.0, -1.0, 1.0]);
        assert!(scenario.is_multi());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Walls".parse::<ScenarioKind>().unwrap(), ScenarioKind::Walls);
        assert!(matches!(
            "spiral".parse::<ScenarioKind>(),
            Err(ScenarioError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            [[balls]]
            mass = 2.0
            radius = 0.2
            velocity = [1.0, 0.0]
        "#;
        let scenario = Scenario::from_toml_str(toml, Path::new("inline.toml")).unwrap();
        assert_eq!(scenario.name, "scenario");
        assert_eq!(scenario.kind, ScenarioKind::Custom);
        assert_eq!(scenario.restitution, 1.0);
        assert_eq!(scenario.surface, SurfaceSpec::default());
        assert!(scenario.balls[0].rolling);
        assert_eq!(scenario.simulation.dt, 0.01);
    }

    #[test]
    fn test_parse_rejects_empty_ball_list() {
        let err = Scenario::from_toml_str("balls = []", Path::new("empty.toml")).unwrap_err();
        assert!(matches!(err, ScenarioError::NoBalls(_)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = Scenario::from_toml_str("balls = 3", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_toml_round_trip_of_preset() {
        let scenario = Scenario::preset(ScenarioKind::Walls);
        let text = scenario.to_toml_string().unwrap();
        let back = Scenario::from_toml_str(&text, Path::new("walls.toml")).unwrap();
        assert_eq!(back, scenario);
    }

    #[test]
    fn test_overrides_layer_over_preset() {
        let mut scenario = Scenario::multiball(2);
        Overrides {
            mass: Some(2.0),
            vx: Some(0.5),
            friction: Some(0.2),
            total_time: Some(1.0),
            ..Overrides::default()
        }
        .apply(&mut scenario);

        assert!(scenario.balls.iter().all(|b| b.mass == 2.0));
        assert_eq!(scenario.balls[0].velocity.x, 0.5);
        assert_eq!(scenario.balls[1].velocity.x, -1.0);
        assert_eq!(scenario.surface.friction, 0.2);
        assert_eq!(scenario.walls, Some(3.0));
        assert_eq!(scenario.simulation.total_time, 1.0);
        assert!(Overrides::default().is_empty());
    }

    #[test]
    fn test_run_dispatches_on_ball_count() {
        let single = Scenario::preset(ScenarioKind::Incline).run();
        assert!(matches!(single, Outcome::Single { .. }));

        let mut multi = Scenario::multiball(2);
        multi.simulation.total_time = 0.1;
        assert!(matches!(multi.run(), Outcome::Multi { .. }));
    }
}
