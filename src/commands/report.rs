//! Human-readable run reports shared by simulate, batch and interactive.

use colored::Colorize;

use ballroll::analysis::{MultiSummary, Summary};
use ballroll::scenario::{Outcome, Scenario};
use ballroll::validation::Warning;
use ballroll::Vec2;

pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!(%warning, "implausible parameter");
        println!("{} {}", "⚠️ ".yellow(), warning);
    }
}

fn point(p: Vec2) -> String {
    format!("({:.3}, {:.3})", p.x, p.y)
}

fn check(ok: bool, label: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), label)
    } else {
        format!("{} {}", "✗".red(), label)
    }
}

pub fn print_outcome(scenario: &Scenario, outcome: &Outcome) {
    println!(
        "\n🎱 {} ({})",
        scenario.name.bold(),
        scenario.kind.description()
    );
    println!(
        "  surface: {}°, μ = {}{}",
        scenario.surface.angle_deg,
        scenario.surface.friction,
        scenario
            .walls
            .map(|h| format!(", walls ±{} m, e = {}", h, scenario.restitution))
            .unwrap_or_default()
    );

    match outcome {
        Outcome::Single {
            initial,
            surface,
            trajectory,
        } => {
            let summary = Summary::of(trajectory, initial, surface);
            println!("  ball: {} kg, R = {} m", initial.mass, initial.radius);
            print_single(&summary, trajectory.len());
        }
        Outcome::Multi { trajectory, .. } => {
            print_multi(&MultiSummary::of(trajectory), trajectory.len());
        }
    }
}

fn print_single(s: &Summary, samples: usize) {
    if let Some(p) = &s.prediction {
        let regime = if p.will_slip { "slips" } else { "rolls" };
        println!(
            "  prediction: {} (μc = {:.3}), a = {:.3} m/s²",
            regime, p.critical_friction, p.acceleration
        );
    }
    println!("  duration: {:.2} s over {} samples", s.duration, samples);
    println!(
        "  position: {} → {} m, {:.3} m travelled",
        point(s.initial_position),
        point(s.final_position),
        s.distance
    );
    println!("  speed: {:.3} → {:.3} m/s", s.initial_speed, s.final_speed);
    match s.energy_loss_percent {
        Some(loss) => println!(
            "  kinetic energy: {:.4} → {:.4} J ({:.1}% lost)",
            s.initial_energy, s.final_energy, loss
        ),
        None => println!(
            "  kinetic energy: {:.4} → {:.4} J",
            s.initial_energy, s.final_energy
        ),
    }
    println!("  slipping: {:.0}% of samples", s.slip_fraction * 100.0);
    println!(
        "  {}  {}",
        check(s.energy_conserved, "energy conserved"),
        check(s.angular_momentum_conserved, "angular momentum conserved")
    );
}

fn print_multi(s: &MultiSummary, samples: usize) {
    println!(
        "  {} balls, {:.2} s over {} samples",
        s.balls, s.duration, samples
    );
    println!(
        "  total momentum: {} → {} kg·m/s",
        point(s.initial_momentum),
        point(s.final_momentum)
    );
    for (i, p) in s.final_positions.iter().enumerate() {
        println!("  ball {} ends at {} m", i + 1, point(*p));
    }
}
