//! Time stepping for one or many balls.

mod integrator;
mod multi;
mod single;

pub use integrator::Rk4;
pub use multi::{MultiTrajectory, MultiballSimulation};
pub use single::{Sample, Simulation, Trajectory};

use serde::{Deserialize, Serialize};

use crate::physics::STANDARD_GRAVITY;

/// Relative tolerance used for conservation checks in reports.
pub const CONSERVATION_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Recording interval in seconds
    pub dt: f64,
    pub total_time: f64,
    pub g: f64,
    /// RK4 substeps per `dt`
    pub substeps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            total_time: 10.0,
            g: STANDARD_GRAVITY,
            substeps: 10,
        }
    }
}
