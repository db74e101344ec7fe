//! Interactive command - menu-driven scenarios
//!
//! Pick a preset, adjust its parameters at the prompts (Enter keeps the
//! shown default), read the report, optionally export, repeat.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use ballroll::prompt::Prompter;
use ballroll::scenario::{Overrides, Scenario, ScenarioKind};
use ballroll::validation::{
    MAX_BALLS, MAX_FRICTION_COEFF, MAX_REASONABLE_MASS, MAX_REASONABLE_RADIUS,
    MAX_REASONABLE_SPEED, MAX_REASONABLE_TIME, MIN_BALLS, MIN_REASONABLE_MASS,
    MIN_REASONABLE_RADIUS,
};
use ballroll::Config;

use crate::commands::{report, simulate};

/// Execute the interactive command
pub fn execute() -> Result<()> {
    let config = Config::load()?;
    let stdin = io::stdin();
    let pause = atty::is(atty::Stream::Stdin);
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let runs = session(&mut prompter, &config, pause)?;
    info!(runs, "interactive session finished");
    Ok(())
}

fn print_menu<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<()> {
    p.say(&format!("\n{}", "🎱 Ball physics simulation".bold()))?;
    for (i, kind) in ScenarioKind::ALL.iter().enumerate() {
        p.say(&format!("  {}. {}", i + 1, kind.description()))?;
    }
    p.say("  q. Quit")
}

/// Prompt for presets until the user quits. Returns the number of runs.
fn session<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    config: &Config,
    pause: bool,
) -> Result<usize> {
    let mut runs = 0;
    loop {
        print_menu(p)?;
        let Some(choice) = p.choice("Choose a scenario: ", ScenarioKind::ALL.len())? else {
            p.say("Bye")?;
            return Ok(runs);
        };
        let kind = ScenarioKind::ALL[choice - 1];

        let mut scenario = configure(p, kind)?;
        config.simulation.apply(&mut scenario.simulation);

        let outcome = match simulate::run_scenario(&scenario, false) {
            Ok(outcome) => outcome,
            Err(e) => {
                p.say(&format!("{} {:#}", "❌".red(), e))?;
                continue;
            }
        };
        report::print_outcome(&scenario, &outcome);
        runs += 1;

        if p.yes_no("Export results to ~/.ballroll/exports?", false)? {
            let path = simulate::export_to(None, &scenario, &outcome)?;
            p.say(&format!("💾 Exported to {}", path.display()))?;
        }
        if pause {
            p.line("Press Enter to continue...")?;
        }
    }
}

/// Ask for the parameters that matter for `kind`.
fn configure<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    kind: ScenarioKind,
) -> Result<Scenario> {
    let mut scenario = match kind {
        ScenarioKind::Multiball => {
            let count = p.float(
                "Number of balls",
                MIN_BALLS as f64,
                MIN_BALLS as f64,
                MAX_BALLS as f64,
            )?;
            Scenario::multiball(count.round() as usize)
        }
        _ => Scenario::preset(kind),
    };

    let ball = scenario.balls[0].clone();
    let surface = scenario.surface;
    let speed = MAX_REASONABLE_SPEED;
    let mut o = Overrides::default();

    let ask_friction = |p: &mut Prompter<R, W>| -> Result<f64> {
        p.float("Friction coefficient", surface.friction, 0.0, MAX_FRICTION_COEFF)
    };
    let ask_ball = |p: &mut Prompter<R, W>, o: &mut Overrides| -> Result<()> {
        o.mass = Some(p.float(
            "Mass, kg",
            ball.mass,
            MIN_REASONABLE_MASS,
            MAX_REASONABLE_MASS,
        )?);
        o.radius = Some(p.float(
            "Radius, m",
            ball.radius,
            MIN_REASONABLE_RADIUS,
            MAX_REASONABLE_RADIUS,
        )?);
        Ok(())
    };

    match kind {
        ScenarioKind::Incline => {
            ask_ball(p, &mut o)?;
            o.angle_deg = Some(p.float("Incline angle, °", surface.angle_deg, 0.0, 90.0)?);
            o.friction = Some(ask_friction(p)?);
        }
        ScenarioKind::Slipping => {
            o.angle_deg = Some(p.float("Incline angle, °", surface.angle_deg, 0.0, 90.0)?);
            o.friction = Some(ask_friction(p)?);
        }
        ScenarioKind::Horizontal => {
            o.vx = Some(p.float("Velocity x, m/s", ball.velocity.x, -speed, speed)?);
            o.vy = Some(p.float("Velocity y, m/s", ball.velocity.y, -speed, speed)?);
            o.friction = Some(ask_friction(p)?);
        }
        ScenarioKind::Walls => {
            o.vx = Some(p.float("Velocity x, m/s", ball.velocity.x, -speed, speed)?);
            o.vy = Some(p.float("Velocity y, m/s", ball.velocity.y, -speed, speed)?);
            o.restitution = Some(p.float("Restitution", scenario.restitution, 0.0, 1.0)?);
        }
        ScenarioKind::Multiball => {
            o.restitution = Some(p.float("Restitution", scenario.restitution, 0.0, 1.0)?);
        }
        ScenarioKind::Custom => {
            ask_ball(p, &mut o)?;
            o.angle_deg = Some(p.float("Incline angle, °", surface.angle_deg, 0.0, 90.0)?);
            o.friction = Some(ask_friction(p)?);
            o.vx = Some(p.float("Velocity x, m/s", ball.velocity.x, -speed, speed)?);
            o.vy = Some(p.float("Velocity y, m/s", ball.velocity.y, -speed, speed)?);
            if p.yes_no("Add a wall box?", false)? {
                o.walls = Some(p.float("Box half-size, m", 2.0, 0.5, 50.0)?);
                o.restitution = Some(p.float("Restitution", 0.9, 0.0, 1.0)?);
            }
        }
    }

    o.total_time = Some(p.float(
        "Simulation time, s",
        scenario.simulation.total_time,
        0.1,
        MAX_REASONABLE_TIME,
    )?);
    o.apply(&mut scenario);
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_configure_keeps_defaults_on_blank_answers() {
        // vx, vy, friction, time
        let mut p = prompter("\n\n0.2\n1\n");
        let scenario = configure(&mut p, ScenarioKind::Horizontal).unwrap();
        assert_eq!(scenario.balls[0].velocity.x, 3.0);
        assert_eq!(scenario.surface.friction, 0.2);
        assert_eq!(scenario.simulation.total_time, 1.0);
    }

    #[test]
    fn test_configure_multiball_count() {
        // count, restitution, time
        let mut p = prompter("4\n\n0.5\n");
        let scenario = configure(&mut p, ScenarioKind::Multiball).unwrap();
        assert_eq!(scenario.balls.len(), 4);
        assert_eq!(scenario.simulation.total_time, 0.5);
    }

    #[test]
    fn test_session_runs_then_quits() {
        // horizontal with default velocity and friction, 0.5 s, no export
        let mut p = prompter("3\n\n\n\n0.5\nn\nq\n");
        let runs = session(&mut p, &Config::default(), false).unwrap();
        assert_eq!(runs, 1);
        let (_, out) = p.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Rolling on a horizontal plane"));
        assert!(out.contains("Bye"));
    }

    #[test]
    fn test_session_ends_at_eof() {
        let mut p = prompter("");
        assert_eq!(session(&mut p, &Config::default(), false).unwrap(), 0);
    }
}
