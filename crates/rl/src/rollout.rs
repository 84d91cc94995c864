//! Trajectory collection and advantage estimation.
//!
//! Agents accumulate transitions while stepping an [`Env`] and turn reward
//! sequences into advantages/returns with generalized advantage estimation.

use crate::env::Env;
use crate::policy::Policy;

/// One environment transition.
#[derive(Clone, Debug)]
pub struct Transition {
    pub obs: Vec<f32>,
    pub action: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    /// Value estimate for `obs` under the current critic.
    pub value: f32,
}

/// An in-order buffer of transitions from one or more episodes.
#[derive(Default)]
pub struct Rollout {
    pub transitions: Vec<Transition>,
}

impl Rollout {
    pub fn push(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    #[must_use]
    pub fn rewards(&self) -> Vec<f32> {
        self.transitions.iter().map(|t| t.reward).collect()
    }

    #[must_use]
    pub fn values(&self) -> Vec<f32> {
        self.transitions.iter().map(|t| t.value).collect()
    }

    #[must_use]
    pub fn dones(&self) -> Vec<bool> {
        self.transitions.iter().map(|t| t.done).collect()
    }
}

/// Generalized advantage estimation over one rollout segment.
///
/// Walks the segment backwards accumulating TD residuals; `last_value`
/// bootstraps past the segment end. A terminal flag masks the bootstrap so
/// advantages never leak across episode boundaries. Returns
/// `(advantages, returns)` with `returns[t] = advantages[t] + values[t]`.
#[must_use]
pub fn gae(
    rewards: &[f32],
    values: &[f32],
    dones: &[bool],
    last_value: f32,
    gamma: f32,
    lambda: f32,
) -> (Vec<f32>, Vec<f32>) {
    let t_max = rewards.len();
    assert_eq!(values.len(), t_max);
    assert_eq!(dones.len(), t_max);

    let mut advantages = vec![0.0; t_max];
    let mut returns = vec![0.0; t_max];
    let mut last_advantage = 0.0;

    for t in (0..t_max).rev() {
        let (next_value, next_done) = if t == t_max - 1 {
            (last_value, false)
        } else {
            (values[t + 1], dones[t + 1])
        };
        let mask = if next_done { 0.0 } else { 1.0 };
        let delta = rewards[t] + gamma * next_value * mask - values[t];
        advantages[t] = delta + gamma * lambda * last_advantage * mask;
        last_advantage = advantages[t];
        returns[t] = advantages[t] + values[t];
    }
    (advantages, returns)
}

/// Normalizes to zero mean and unit variance (plus a small epsilon).
#[must_use]
pub fn normalize(xs: &[f32]) -> Vec<f32> {
    if xs.is_empty() {
        return Vec::new();
    }
    let mean = xs.iter().sum::<f32>() / xs.len() as f32;
    let std = (xs.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / xs.len() as f32).sqrt();
    xs.iter().map(|x| (x - mean) / (std + 1e-8)).collect()
}

/// Summary of one completed episode.
#[derive(Clone, Copy, Debug)]
pub struct EpisodeStats {
    pub steps: usize,
    pub total_reward: f32,
}

/// Runs one episode to termination or the step cap.
pub fn run_episode(
    env: &mut impl Env,
    policy: &mut impl Policy,
    max_steps: usize,
) -> EpisodeStats {
    let mut obs = env.reset();
    let mut total_reward = 0.0;
    let mut steps = 0;
    for _ in 0..max_steps {
        let action = policy.act(&obs);
        let (next_obs, reward, done) = env.step(&action);
        total_reward += reward;
        steps += 1;
        obs = next_obs;
        if done {
            break;
        }
    }
    EpisodeStats {
        steps,
        total_reward,
    }
}
