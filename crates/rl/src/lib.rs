#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
//! # RL consumer contract for the needle-master environment
//!
//! Agents (PPO, TD3, and friends) consume the simulation exclusively through
//! the [`Env`] trait defined here. This crate carries the contract surface
//! those agents share, without any network or optimizer internals:
//!
//! -   [`NeedleEnv`] adapts a state-mode [`sim::Environment`] to [`Env`],
//!     clamping incoming commands to the action-space bounds.
//! -   [`rollout`] collects trajectories and computes GAE advantages.
//! -   [`snapshot`] persists actor/critic parameter sets under the
//!     `{dir}/{name}_{role}.json` naming convention.

pub mod env;
pub mod policy;
pub mod rollout;
pub mod snapshot;

pub use env::{Env, NeedleEnv};
pub use policy::{clamp_action, Policy, RandomPolicy};
pub use rollout::{gae, normalize, run_episode, EpisodeStats, Rollout, Transition};
pub use snapshot::{snapshot_path, Role, Snapshot};
