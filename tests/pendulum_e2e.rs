//! Pendulum E2E Tests
//!
//! Whole-run properties of the simulation: the reference release, damping
//! over long runs, continuity across ring wraps, determinism and loading a
//! configuration from disk.
//!
//! Each test is designed to falsify a hypothesis about the system.

use std::io::Write;

use pendulum::config::{PendulumConfig, DEFAULT_CONFIG_YAML};
use pendulum::engine::integrator::acceleration;
use pendulum::prelude::*;

fn run(config: &PendulumConfig, steps: usize) -> Vec<StepReport> {
    let mut sim = Simulation::new(config).expect("valid config");
    (0..steps)
        .map(|_| sim.step().expect("finite run"))
        .collect()
}

/// Reference release: g=9.81, dt=0.01, D=0.0018, L=0.5, m=10000, 45°.
///
/// Hypothesis to falsify: the first step differs from the hand-computed values
#[test]
fn reference_release_first_step() {
    let config = PendulumConfig::from_yaml(DEFAULT_CONFIG_YAML).expect("embedded config");
    let report = run(&config, 1).remove(0);

    let s0 = std::f64::consts::FRAC_PI_4;
    let a = -9.81 * (s0 / 0.5).sin();
    let v1 = a * 0.01;

    assert!((report.advance.acceleration - a).abs() < 1e-6);
    assert!((report.advance.current.v - v1).abs() < 1e-6);
    assert!((report.advance.current.s - (s0 + v1 * 0.01)).abs() < 1e-6);
    assert!((report.advance.current.t - 0.01).abs() < 1e-12);
}

/// Hypothesis to falsify: quadratic drag fails to shrink the swing
#[test]
fn drag_decays_amplitude() {
    let config = PendulumConfig::builder().drag(0.5).mass(1.0).build();
    let reports = run(&config, 6000);

    let peak = |window: &[StepReport]| {
        window
            .iter()
            .map(|r| r.advance.current.s.abs())
            .fold(0.0_f64, f64::max)
    };
    let early = peak(&reports[..500]);
    let late = peak(&reports[5000..]);

    assert!(late < 0.5 * early, "early peak {early:.4}, late peak {late:.4}");
}

/// Hypothesis to falsify: the undamped semi-implicit run drifts in amplitude
#[test]
fn undamped_swing_stays_bounded() {
    let config = PendulumConfig::builder().drag(0.0).build();
    let reports = run(&config, 9000);
    let s0 = std::f64::consts::FRAC_PI_4;

    for r in &reports {
        assert!(r.advance.current.s.abs() < s0 * 1.05);
    }
}

/// Hypothesis to falsify: a wrap loses or alters the state at the seam
#[test]
fn continuity_across_wraps() {
    let config = PendulumConfig::builder().timestep(0.01).total_time(0.1).build();
    let mut sim = Simulation::new(&config).expect("valid config");
    assert_eq!(sim.ring().capacity(), 10);

    let dt = sim.constants().dt();
    let mut wraps = 0;
    for _ in 0..55 {
        let adv = sim.step().expect("finite run").advance;
        if adv.wrapped {
            wraps += 1;
            assert_eq!(adv.cursor, 0);
            assert_eq!(adv.current.phase(), adv.previous.phase());
            let expected = acceleration(adv.current.s, adv.current.v, sim.constants());
            assert_eq!(adv.acceleration, expected);
        } else {
            assert!((adv.current.t - adv.previous.t - dt).abs() < 1e-12);
        }
    }
    assert_eq!(wraps, 5);
}

/// Hypothesis to falsify: identical configurations diverge
#[test]
fn identical_runs_match_bitwise() {
    let config = PendulumConfig::builder().initial_velocity(0.3).build();
    let a = run(&config, 2000);
    let b = run(&config, 2000);

    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.advance.current.s.to_bits(), y.advance.current.s.to_bits());
        assert_eq!(x.advance.current.v.to_bits(), y.advance.current.v.to_bits());
    }
}

/// Hypothesis to falsify: a configuration file on disk is not honored
#[test]
fn config_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
schema_version: "1.0"
pendulum:
  gravity: 9.81
  drag: 0.0
  length: 1.0
  mass: 2.0
  initial_angle_deg: 10.0
timestep:
  dt: 0.02
  total_time: 1.0
  integrator: explicit-euler
display:
  exit: graceful
"#
    )
    .expect("write config");

    let config = PendulumConfig::load(file.path()).expect("load config");
    assert_eq!(config.capacity().expect("capacity"), 50);
    assert_eq!(config.display.exit, pendulum::config::ExitPolicy::Graceful);

    let sim = Simulation::new(&config).expect("valid config");
    assert_eq!(sim.integrator().name(), "explicit Euler");
    assert!((sim.ring().current().s - 10.0_f64.to_radians()).abs() < 1e-15);
}

/// Hypothesis to falsify: invalid files reach the simulation
#[test]
fn invalid_config_file_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "pendulum:\n  length: 0.0\n").expect("write config");

    let err = PendulumConfig::load(file.path()).expect_err("zero length");
    assert!(err.is_config_error());
}

/// Hypothesis to falsify: the bob drawn each frame is not the newest sample
#[test]
fn frame_draws_newest_sample() {
    let config = PendulumConfig::default();
    let mut sim = Simulation::new(&config).expect("valid config");
    for _ in 0..25 {
        sim.step().expect("finite run");
    }
    let adv = sim.step().expect("finite run").advance;
    let commands = render_frame(&adv, &config.display);

    let bob = to_screen(adv.current.x, adv.current.y, 10.0, 800.0, 800.0);
    assert!(commands.iter().any(
        |c| matches!(c, RenderCommand::DrawCircle { center, .. } if *center == bob)
    ));
}
