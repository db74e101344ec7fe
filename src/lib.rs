//! Rolling and sliding ball simulation on planes.
//!
//! A solid sphere moves on a flat or inclined surface with Coulomb friction,
//! switching between rolling without slipping and sliding. Scenarios can add
//! axis-aligned walls and several balls that collide with each other.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod environment;
pub mod export;
pub mod git;
pub mod launch;
pub mod logging;
pub mod paths;
pub mod physics;
pub mod process;
pub mod prompt;
pub mod publish;
pub mod scenario;
pub mod simulation;
pub mod validation;
pub mod vector;

// Re-export commonly used types
pub use config::Config;
pub use physics::{Ball, Surface, Wall};
pub use process::{CommandRunner, RecordingRunner, SystemRunner};
pub use scenario::{Outcome, Scenario, ScenarioKind};
pub use simulation::{MultiballSimulation, Simulation, SimulationConfig, Trajectory};
pub use vector::{Vec2, Vec3};
