use std::io;
use std::path::Path;

use sim::{
    EnvConfig, Environment, Frame, FrameRenderer, GateStatus, Level, Observation, ObservationMode,
    Scene, SimError,
};

fn env_from(path: &str) -> Environment {
    let level = Level::from_file(path).unwrap();
    Environment::new(level, EnvConfig::default()).unwrap()
}

fn state(obs: &Observation) -> &[f32] {
    match obs {
        Observation::State(s) => s,
        Observation::Frames(_) => panic!("expected state observation"),
    }
}

#[test]
fn zero_turn_moves_in_a_straight_line() {
    let mut env = env_from("tests/data/empty.txt");
    for k in 1..=10 {
        let (_obs, reward, _done) = env.step(&[0.0]);
        assert!((env.needle.x - (96.0 + 30.0 * f64::from(k))).abs() < 1e-9);
        assert!((env.needle.y - 372.0).abs() < 1e-9);
        // No gates, no tissue: nothing to reward or damage.
        assert_eq!(reward, 0.0);
    }
    assert_eq!(env.damage, 0.0);
    assert!((env.needle.path_length() - 300.0).abs() < 1e-9);
}

#[test]
fn boundary_exit_terminates() {
    let mut env = env_from("tests/data/empty.txt");
    let mut steps = 0;
    loop {
        let (_obs, _reward, done) = env.step(&[0.0]);
        steps += 1;
        if done && env.needle.x > env.width {
            break;
        }
        assert!(steps < 50, "needle never left the level");
    }
    // 96 + 30 * 19 = 666 > 640.
    assert_eq!(steps, 19);
}

#[test]
fn gates_pass_in_sequence_order() {
    let mut env = env_from("tests/data/level_1.txt");
    let mut rewards = Vec::new();
    let mut done = false;
    while !done {
        let (_obs, reward, d) = env.step(&[0.0]);
        rewards.push(reward);
        done = d;

        // Invariant: at most one gate is Next, and it is the first
        // unresolved gate.
        let next_indices: Vec<usize> = env
            .gates
            .iter()
            .enumerate()
            .filter(|(_, g)| g.status() == GateStatus::Next)
            .map(|(i, _)| i)
            .collect();
        assert!(next_indices.len() <= 1);
        if let Some(&idx) = next_indices.first() {
            assert_eq!(env.next_gate, Some(idx));
            assert!(env.gates[..idx].iter().all(|g| g.status().is_terminal()));
        }
        assert!(env.t < 100, "episode did not terminate");
    }

    // Gate 1 passes at x = 306 (t = 7), gate 2 at x = 486 (t = 13); the
    // step after the last resolution reports termination.
    assert_eq!(rewards.len(), 14);
    assert!(rewards[6] > 9.0);
    assert!((rewards[12] - 10.0).abs() < 1e-9);
    assert_eq!(rewards[13], 0.0);
    assert!(env.gates.iter().all(|g| g.status() == GateStatus::Passed));
    assert_eq!(env.next_gate, None);
    assert_eq!(env.damage, 0.0);
}

#[test]
fn distance_shaping_rewards_approach() {
    let mut env = env_from("tests/data/level_1.txt");
    // First step has no previous distance, so no shaping yet.
    let (_obs, first, _done) = env.step(&[0.0]);
    assert_eq!(first, 0.0);
    // Approaching the gate head-on at speed 30 shapes +30/1000 per step.
    let (_obs, second, _done) = env.step(&[0.0]);
    assert!((second - 0.03).abs() < 1e-9);
}

#[test]
fn deep_tissue_contact_is_fatal() {
    let mut env = env_from("tests/data/deep.txt");
    let (_obs, reward, done) = env.step(&[0.5]);
    assert!(done);
    // Deep-tissue penalty plus the damage term for a 0.5 turn in tissue.
    assert!(reward <= -100.0);
    assert!((env.damage - 24.0).abs() < 1e-9);
}

#[test]
fn time_cap_terminates_without_penalty() {
    // Constant full turn keeps the needle circling near the start, away
    // from every gate and surface.
    let mut env = env_from("tests/data/level_1.txt");
    let mut steps = 0;
    loop {
        let (_obs, reward, done) = env.step(&[1.0]);
        steps += 1;
        // Only distance shaping may appear, and it is tiny.
        assert!(reward.abs() <= 0.05, "unexpected reward {reward} at {steps}");
        if done {
            break;
        }
        assert!(steps <= 200, "episode never hit the time cap");
    }
    assert_eq!(steps, 151);
    assert_eq!(env.damage, 0.0);
}

#[test]
fn reset_is_idempotent() {
    let mut env = env_from("tests/data/level_1.txt");
    let first = env.reset();
    let second = env.reset();
    assert_eq!(state(&first), state(&second));
    assert_eq!(env.t, 0);
    assert_eq!(env.damage, 0.0);
    assert_eq!(env.total_reward, 0.0);
    assert_eq!(env.next_gate, Some(0));
    assert!(!env.done);
}

#[test]
fn state_vector_layout() {
    let mut env = env_from("tests/data/level_1.txt");
    let obs = env.reset();
    let s = state(&obs).to_vec();
    assert_eq!(s.len(), 11);
    assert!((s[0] - 96.0 / 640.0).abs() < 1e-6);
    assert!((s[1] - 372.0 / 480.0).abs() < 1e-6);
    assert!((s[2] - 1.0).abs() < 1e-6); // heading PI, normalized by PI
    assert_eq!(s[3..6], [0.0, 0.0, 0.0]); // no motion yet
    assert_eq!(s[6..8], [0.0, 0.0]); // no gate passed
    assert!((s[8] - 0.46875).abs() < 1e-6); // next gate normalized x
    assert!((s[9] - 0.775).abs() < 1e-6);
    assert!(s[10].abs() < 1e-6); // normalized gate heading 0

    // After every gate resolves, the target becomes the synthetic
    // destination past the last gate.
    let mut done = false;
    while !done {
        let (_obs, _reward, d) = env.step(&[0.0]);
        done = d;
    }
    let s = env.state_vector();
    assert_eq!(s[6..8], [1.0, 1.0]);
    assert!((s[8] - (500.0 + 100.0) / 640.0).abs() < 1e-6);
    assert!((s[9] - (372.0 + 100.0) / 480.0).abs() < 1e-6);
    assert!((s[10] - 1.0).abs() < 1e-6);
}

struct CountingRenderer {
    rendered: u8,
}

impl FrameRenderer for CountingRenderer {
    fn render(&mut self, _scene: &Scene) -> Frame {
        self.rendered += 1;
        Frame {
            width: 4,
            height: 4,
            data: vec![self.rendered; 4 * 4 * 3],
        }
    }

    fn save(&mut self, _frame: &Frame, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn frame_stack_evicts_oldest() {
    let level = Level::from_file("tests/data/empty.txt").unwrap();
    let config = EnvConfig {
        mode: ObservationMode::RgbArray,
        stack_size: 3,
        ..EnvConfig::default()
    };
    let renderer = Box::new(CountingRenderer { rendered: 0 });
    let mut env = Environment::with_renderer(level, config, Some(renderer)).unwrap();

    let obs = env.reset();
    let Observation::Frames(frames) = obs else {
        panic!("expected frames");
    };
    assert_eq!(frames.len(), 3);
    let ids: Vec<u8> = frames.iter().map(|f| f.data[0]).collect();
    // reset fills the stack with copies of one freshly rendered frame
    let fill = ids[0];
    assert!(ids.iter().all(|&id| id == fill));

    let (obs, _reward, _done) = env.step(&[0.0]);
    let Observation::Frames(frames) = obs else {
        panic!("expected frames");
    };
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].data[0], fill);
    assert_eq!(frames[1].data[0], fill);
    assert_eq!(frames[2].data[0], fill + 1);

    let (obs, _reward, _done) = env.step(&[0.0]);
    let Observation::Frames(frames) = obs else {
        panic!("expected frames");
    };
    assert_eq!(frames[0].data[0], fill);
    assert_eq!(frames[1].data[0], fill + 1);
    assert_eq!(frames[2].data[0], fill + 2);
}

#[test]
fn rgb_mode_without_renderer_fails_fast() {
    let level = Level::from_file("tests/data/empty.txt").unwrap();
    let config = EnvConfig {
        mode: ObservationMode::RgbArray,
        stack_size: 4,
        ..EnvConfig::default()
    };
    let err = Environment::new(level, config).unwrap_err();
    assert!(matches!(err, SimError::MissingRenderer(ObservationMode::RgbArray)));
}
