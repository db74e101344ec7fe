//! Fixed-step fourth-order Runge-Kutta over the ball state.

use crate::physics::{
    derivative, rolling_deceleration, Ball, MotionRegime, StateDerivative, Surface,
};
use crate::vector::{Vec2, Vec3};

/// RK4 integrator that splits every outer step into `substeps` stages.
#[derive(Debug, Clone, Copy)]
pub struct Rk4 {
    substeps: usize,
}

impl Default for Rk4 {
    fn default() -> Self {
        Self { substeps: 10 }
    }
}

impl Rk4 {
    pub fn new(substeps: usize) -> Self {
        Self {
            substeps: substeps.max(1),
        }
    }

    pub fn substeps(&self) -> usize {
        self.substeps
    }

    /// Advance `ball` by `dt`. Returns the regime of the last evaluation.
    pub fn step(&self, ball: &mut Ball, surface: &Surface, g: f64, dt: f64) -> MotionRegime {
        let h = dt / self.substeps as f64;
        let mut regime = MotionRegime::Rolling;
        for _ in 0..self.substeps {
            if !surface.is_inclined() && comes_to_rest_within(ball, surface, g, h) {
                bring_to_rest(ball, surface, g);
                regime = MotionRegime::Rolling;
                continue;
            }
            regime = rk4_substep(ball, surface, g, h);
        }
        regime
    }
}

fn advanced(ball: &Ball, d: &StateDerivative, h: f64) -> Ball {
    Ball {
        position: ball.position + d.velocity * h,
        velocity: ball.velocity + d.acceleration * h,
        angular_velocity: ball.angular_velocity + d.angular_acceleration * h,
        ..ball.clone()
    }
}

fn rk4_substep(ball: &mut Ball, surface: &Surface, g: f64, h: f64) -> MotionRegime {
    let (k1, _) = derivative(ball, surface, g);
    let (k2, _) = derivative(&advanced(ball, &k1, h / 2.0), surface, g);
    let (k3, _) = derivative(&advanced(ball, &k2, h / 2.0), surface, g);
    let (k4, regime) = derivative(&advanced(ball, &k3, h), surface, g);

    let w = h / 6.0;
    ball.position += (k1.velocity + k2.velocity * 2.0 + k3.velocity * 2.0 + k4.velocity) * w;
    ball.velocity +=
        (k1.acceleration + k2.acceleration * 2.0 + k3.acceleration * 2.0 + k4.acceleration) * w;
    ball.angular_velocity += (k1.angular_acceleration
        + k2.angular_acceleration * 2.0
        + k3.angular_acceleration * 2.0
        + k4.angular_acceleration)
        * w;
    regime
}

/// Rolling friction on a flat plane decelerates at a constant rate against
/// the velocity, so it can only bring the ball to rest, never push it
/// backwards.
fn comes_to_rest_within(ball: &Ball, surface: &Surface, g: f64, h: f64) -> bool {
    let speed = ball.velocity.norm();
    speed > 0.0 && speed <= rolling_deceleration(surface, g) * h
}

/// Place the ball at its analytic stopping point, p + v|v|/(2a), and take
/// the same velocity change out of the rolling spin.
fn bring_to_rest(ball: &mut Ball, surface: &Surface, g: f64) {
    let speed = ball.velocity.norm();
    let deceleration = rolling_deceleration(surface, g);
    if deceleration > 0.0 {
        ball.position += ball.velocity * (speed / (2.0 * deceleration));
    }

    let dv = -ball.velocity;
    if ball.radius > 1e-10 {
        ball.angular_velocity += Vec3::new(dv.y / ball.radius, -dv.x / ball.radius, 0.0);
    }
    ball.velocity = Vec2::ZERO;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::STANDARD_GRAVITY as G;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_acceleration_is_exact() {
        let mut ball = Ball::at_rest(1.0, 0.1, Vec2::ZERO);
        let surface = Surface::new(0.7, 30.0);
        let a = 5.0 / 7.0 * G * 0.5;
        Rk4::default().step(&mut ball, &surface, G, 0.5);
        assert_relative_eq!(ball.velocity.x, a * 0.5, epsilon = 1e-9);
        assert_relative_eq!(ball.position.x, 0.5 * a * 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_friction_stops_without_reversing() {
        let mut ball = Ball::rolling(1.0, 0.1, Vec2::ZERO, Vec2::new(0.01, 0.0));
        let surface = Surface::flat(0.5);
        let a = 2.0 / 7.0 * 0.5 * G;
        Rk4::new(1).step(&mut ball, &surface, G, 0.1);

        assert_eq!(ball.velocity, Vec2::ZERO);
        assert_relative_eq!(ball.position.x, 0.01 * 0.01 / (2.0 * a), epsilon = 1e-12);
        assert_relative_eq!(ball.angular_velocity.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_substeps_floor_at_one() {
        assert_eq!(Rk4::new(0).substeps(), 1);
    }

    #[test]
    fn test_reports_slipping_regime() {
        let mut ball = Ball::at_rest(1.0, 0.1, Vec2::ZERO);
        let regime = Rk4::default().step(&mut ball, &Surface::new(0.1, 60.0), G, 0.01);
        assert!(regime.is_slipping());
    }
}
