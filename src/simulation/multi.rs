use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Rk4, SimulationConfig};
use crate::physics::{collide_balls, collide_wall, Ball, Surface, Wall};
use crate::vector::Vec2;

/// Recorded history of a multi-ball run. `positions[i][k]` is ball `i` at
/// `time[k]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTrajectory {
    pub masses: Vec<f64>,
    pub radii: Vec<f64>,
    pub time: Vec<f64>,
    pub positions: Vec<Vec<Vec2>>,
    pub velocities: Vec<Vec<Vec2>>,
}

impl MultiTrajectory {
    pub fn ball_count(&self) -> usize {
        self.masses.len()
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sum of m·v over all balls at sample `index`.
    pub fn total_momentum_at(&self, index: usize) -> Option<Vec2> {
        self.velocities
            .iter()
            .zip(&self.masses)
            .map(|(v, &m)| v.get(index).map(|&v| v * m))
            .try_fold(Vec2::ZERO, |acc, p| p.map(|p| acc + p))
    }
}

/// Several balls sharing one surface. Balls interact only through
/// pairwise collisions.
#[derive(Debug, Clone)]
pub struct MultiballSimulation {
    balls: Vec<Ball>,
    surface: Surface,
    config: SimulationConfig,
}

impl MultiballSimulation {
    pub fn new(balls: Vec<Ball>, surface: Surface, config: SimulationConfig) -> Self {
        Self {
            balls,
            surface,
            config,
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    fn record(&self, time: f64, trajectory: &mut MultiTrajectory) {
        trajectory.time.push(time);
        for (i, ball) in self.balls.iter().enumerate() {
            trajectory.positions[i].push(ball.position);
            trajectory.velocities[i].push(ball.velocity);
        }
    }

    /// Run for the full `total_time`: advance every ball, then walls, then
    /// every pair once.
    pub fn run(&mut self, walls: &[Wall], restitution: f64) -> MultiTrajectory {
        let SimulationConfig {
            dt,
            total_time,
            g,
            substeps,
        } = self.config;
        let integrator = Rk4::new(substeps);
        let n = self.balls.len();

        info!(balls = n, walls = walls.len(), "starting multi-ball simulation");

        let mut trajectory = MultiTrajectory {
            masses: self.balls.iter().map(|b| b.mass).collect(),
            radii: self.balls.iter().map(|b| b.radius).collect(),
            time: Vec::new(),
            positions: vec![Vec::new(); n],
            velocities: vec![Vec::new(); n],
        };

        let mut collisions = 0usize;
        let mut step: u64 = 0;
        let mut time = 0.0;

        while time < total_time {
            self.record(time, &mut trajectory);

            for ball in &mut self.balls {
                integrator.step(ball, &self.surface, g, dt);
                for wall in walls {
                    collide_wall(ball, wall, restitution);
                }
            }

            for i in 0..n {
                let (head, tail) = self.balls.split_at_mut(i + 1);
                let a = &mut head[i];
                for b in tail.iter_mut() {
                    if collide_balls(a, b, restitution) {
                        collisions += 1;
                    }
                }
            }

            step += 1;
            time = step as f64 * dt;
        }

        self.record(time, &mut trajectory);
        info!(samples = trajectory.len(), collisions, "multi-ball simulation finished");
        trajectory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_head_on_collision_conserves_momentum() {
        let a = Ball::new(1.0, 0.1, Vec2::new(-0.5, 0.0), Vec2::new(1.0, 0.0), Vec3::ZERO);
        let b = Ball::new(1.0, 0.1, Vec2::new(0.5, 0.0), Vec2::new(-1.0, 0.0), Vec3::ZERO);
        let config = SimulationConfig {
            dt: 0.001,
            total_time: 1.0,
            ..SimulationConfig::default()
        };
        let mut sim = MultiballSimulation::new(vec![a, b], Surface::flat(0.0), config);
        let trajectory = sim.run(&[], 1.0);

        let before = trajectory.total_momentum_at(0).unwrap();
        let after = trajectory.total_momentum_at(trajectory.len() - 1).unwrap();
        assert_abs_diff_eq!((after - before).norm(), 0.0, epsilon = 1e-9);

        // equal masses swap velocities
        assert_abs_diff_eq!(sim.balls()[0].velocity.x, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sim.balls()[1].velocity.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_records_every_ball_every_step() {
        let balls = vec![
            Ball::at_rest(1.0, 0.1, Vec2::new(-1.0, 0.0)),
            Ball::at_rest(1.0, 0.1, Vec2::new(0.0, 0.0)),
            Ball::at_rest(1.0, 0.1, Vec2::new(1.0, 0.0)),
        ];
        let config = SimulationConfig {
            dt: 0.1,
            total_time: 1.0,
            ..SimulationConfig::default()
        };
        let mut sim = MultiballSimulation::new(balls, Surface::flat(0.1), config);
        let trajectory = sim.run(&Wall::box_walls(3.0), 1.0);

        assert_eq!(trajectory.ball_count(), 3);
        assert_eq!(trajectory.len(), 11);
        assert!(trajectory.positions.iter().all(|p| p.len() == 11));
        assert!(trajectory.total_momentum_at(99).is_none());
    }

    #[test]
    fn test_balls_stay_inside_box() {
        let balls = vec![
            Ball::rolling(1.0, 0.1, Vec2::new(-1.0, 0.0), Vec2::new(3.0, 1.0)),
            Ball::rolling(1.0, 0.1, Vec2::new(1.0, 0.0), Vec2::new(-2.0, 2.5)),
        ];
        let config = SimulationConfig {
            dt: 0.01,
            total_time: 5.0,
            ..SimulationConfig::default()
        };
        let mut sim = MultiballSimulation::new(balls, Surface::flat(0.0), config);
        let trajectory = sim.run(&Wall::box_walls(2.0), 1.0);

        for positions in &trajectory.positions {
            for p in positions {
                assert!(p.x.abs() <= 2.0 && p.y.abs() <= 2.0, "escaped: {:?}", p);
            }
        }
    }
}
