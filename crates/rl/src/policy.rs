//! Action-space bounds and baseline policies.

/// Clamps a command to the bounds the environment consumes.
///
/// Two-dimensional commands are `[linear, angular]` with linear clamped to
/// `[0, 1]` and angular to `[-1, 1]`; one-dimensional heading deltas clamp to
/// `[-1, 1]`.
#[must_use]
pub fn clamp_action(action: &[f32]) -> Vec<f32> {
    match action {
        [linear, angular] => vec![linear.clamp(0.0, 1.0), angular.clamp(-1.0, 1.0)],
        _ => action.iter().map(|a| a.clamp(-1.0, 1.0)).collect(),
    }
}

/// Maps observations to actions.
pub trait Policy {
    fn act(&mut self, obs: &[f32]) -> Vec<f32>;
}

/// Uniform-random baseline over the action space.
pub struct RandomPolicy {
    action_dim: usize,
}

impl RandomPolicy {
    /// Creates a seeded random policy.
    #[must_use]
    pub fn new(action_dim: usize, seed: u64) -> Self {
        fastrand::seed(seed);
        Self { action_dim }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _obs: &[f32]) -> Vec<f32> {
        match self.action_dim {
            2 => vec![fastrand::f32(), fastrand::f32() * 2.0 - 1.0],
            _ => vec![fastrand::f32() * 2.0 - 1.0],
        }
    }
}
