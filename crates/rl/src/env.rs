//! Reinforcement learning environment trait and the needle-master adapter.

use sim::{EnvConfig, Environment, Observation, ObservationMode, SimError};

use crate::policy::clamp_action;

/// Reinforcement learning environment contract.
///
/// Inspired by classic frameworks like OpenAI Gym, this trait defines the
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one action and returns the new observation vector, a reward
/// signal, and whether the episode has terminated.
///
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    ///
    /// Returns `(obs, reward, done)` where `obs` is the new observation
    /// vector, `reward` is the scalar reward, and `done` indicates episode
    /// termination.
    fn step(&mut self, action: &[f32]) -> (Vec<f32>, f32, bool);

    /// Reset the environment to its starting state and return the initial
    /// observation vector.
    fn reset(&mut self) -> Vec<f32>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Dimensionality of the action space.
    fn action_size(&self) -> usize;
}

/// Adapter exposing a state-mode [`sim::Environment`] through [`Env`].
///
/// Incoming commands are clamped to the action-space bounds before reaching
/// the simulation (linear to `[0, 1]`, angular to `[-1, 1]`).
pub struct NeedleEnv {
    env: Environment,
    action_dim: usize,
}

impl NeedleEnv {
    /// Builds a state-mode environment over a parsed level.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if the environment configuration is rejected.
    pub fn new(level: sim::Level, action_dim: usize) -> Result<Self, SimError> {
        let config = EnvConfig {
            mode: ObservationMode::State,
            action_dim,
            ..EnvConfig::default()
        };
        Ok(Self {
            env: Environment::new(level, config)?,
            action_dim,
        })
    }

    /// Loads a level file and builds the adapter over it.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if the level fails to load.
    pub fn from_file(path: impl AsRef<std::path::Path>, action_dim: usize) -> Result<Self, SimError> {
        Self::new(sim::Level::from_file(path)?, action_dim)
    }

    /// The wrapped simulation environment.
    #[must_use]
    pub fn inner(&self) -> &Environment {
        &self.env
    }

    /// Random action from the wrapped environment's sampler.
    #[must_use]
    pub fn sample_action(&self) -> Vec<f32> {
        self.env.sample_action()
    }

    fn expect_state(obs: Observation) -> Vec<f32> {
        match obs {
            Observation::State(state) => state,
            // The adapter always configures state mode.
            Observation::Frames(_) => unreachable!("state-mode environment produced frames"),
        }
    }
}

impl Env for NeedleEnv {
    fn step(&mut self, action: &[f32]) -> (Vec<f32>, f32, bool) {
        let clamped = clamp_action(action);
        let (obs, reward, done) = self.env.step(&clamped);
        (Self::expect_state(obs), reward as f32, done)
    }

    fn reset(&mut self) -> Vec<f32> {
        Self::expect_state(self.env.reset())
    }

    fn obs_size(&self) -> usize {
        self.env.state_size()
    }

    fn action_size(&self) -> usize {
        self.action_dim
    }
}
