#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
//! # Needle-master simulation core
//!
//! A 2D simulation of a needle-insertion task for reinforcement learning.
//! One needle moves through a level made of ordered target [`Gate`]s and
//! static tissue [`Surface`]s. The environment drives the episode protocol:
//!
//! -   **Levels:** the [`level`] module parses the line-oriented level format
//!     into a structured [`Level`] record (dimensions, gate geometry, tissue
//!     polygons).
//! -   **Entities:** [`Needle`] integrates heading-delta actions into motion,
//!     [`Gate`] runs the pass/fail state machine, and [`Surface`] accrues
//!     tissue damage.
//! -   **Episodes:** [`Environment`] owns one episode's entities and exposes
//!     the `reset`/`step` interface consumed by RL agents, producing either a
//!     flattened state vector or a stacked frame observation.
//!
//! Rendering is an external collaborator: the environment assembles a
//! [`Scene`] and hands it to a [`FrameRenderer`] implementation when frames
//! are requested.

pub mod env;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod level;
pub mod needle;
pub mod scene;
pub mod surface;

pub use env::{EnvConfig, Environment, Observation, ObservationMode};
pub use error::{LevelError, SimError};
pub use gate::{Gate, GateStatus};
pub use geometry::{Point, Polygon};
pub use level::{GateSpec, Level, SurfaceSpec};
pub use needle::Needle;
pub use scene::{Color, Frame, FrameRenderer, Scene};
pub use surface::Surface;

/// Angular component of an action vector.
///
/// Two-dimensional linear+angular commands carry it in the second slot;
/// one-dimensional heading-delta commands reuse the sole component. Both the
/// needle kinematics and the tissue damage model read actions through this
/// helper, so the 1-D conflation stays consistent across the two.
#[must_use]
pub fn angular_component(action: &[f32]) -> f32 {
    if action.len() >= 2 {
        action[1]
    } else {
        action.first().copied().unwrap_or(0.0)
    }
}
