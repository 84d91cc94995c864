//! Actor/critic parameter snapshots.
//!
//! Agents persist their network parameters between runs under a fixed
//! `{dir}/{name}_{role}.json` naming convention. The contents are opaque to
//! the environment core: just ordered layers of raw parameter values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which half of an actor/critic pair a snapshot holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Actor,
    Critic,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Critic => "critic",
        }
    }
}

/// One network's parameters, layer by layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub layers: Vec<Vec<f32>>,
}

/// Path a snapshot is stored at: `{dir}/{name}_{role}.json`.
#[must_use]
pub fn snapshot_path(dir: &Path, name: &str, role: Role) -> PathBuf {
    dir.join(format!("{name}_{}.json", role.as_str()))
}

impl Snapshot {
    /// Writes the snapshot under the naming convention, creating `dir` if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, dir: &Path, name: &str, role: Role) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating snapshot dir {}", dir.display()))?;
        let path = snapshot_path(dir, name, role);
        let json = serde_json::to_string(self)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Reads a snapshot previously written by [`save`](Snapshot::save).
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a valid snapshot.
    pub fn load(dir: &Path, name: &str, role: Role) -> Result<Self> {
        let path = snapshot_path(dir, name, role);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
