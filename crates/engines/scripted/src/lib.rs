//! Scripted Policy Backend
//!
//! A minimal stand-in for trained multi-agent policies. Each competitor is a
//! directory holding a `policy.toml` with a handful of behaviour knobs:
//!
//! ```text
//! trained_models/
//!   pressing/
//!     policy.toml
//!   counter/
//!     policy.toml
//! ```
//!
//! Useful for:
//! - Exercising the tournament runner before real checkpoints exist
//! - Baseline comparisons (a trained policy should beat these)
//! - Reproducing failure modes (malformed artifacts, missing files)

mod pitch;
mod rollout;

pub use pitch::*;
pub use rollout::*;

use arena_core::{AgentSlot, Policy, PolicyArtifactLoader};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;


/// File every scripted artifact directory must contain.
pub const POLICY_FILE: &str = "policy.toml";

/// Discrete actions understood by [`PitchEnv`].
pub const ACTION_HOLD: usize = 0;
pub const ACTION_PUSH: usize = 1;
pub const ACTION_SHOOT: usize = 2;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: malformed policy file: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Behaviour knobs stored in `policy.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySpec {
    /// Display label (defaults to the directory name)
    #[serde(default)]
    pub label: Option<String>,
    /// Probability of pushing forward instead of holding
    pub aggression: f64,
    /// Oriented ball position from which the policy takes a shot
    pub shot_threshold: f64,
    /// Seed for the policy's own randomness
    #[serde(default)]
    pub seed: u64,
}

impl PolicySpec {
    pub fn from_toml(contents: &str, path: &str) -> Result<Self, ArtifactError> {
        let spec: PolicySpec = toml::from_str(contents).map_err(|source| ArtifactError::Parse {
            path: path.to_string(),
            source,
        })?;
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        for (field, value) in [
            ("aggression", self.aggression),
            ("shot_threshold", self.shot_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ArtifactError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// A policy driven entirely by its [`PolicySpec`].
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    name: String,
    spec: PolicySpec,
    rng: StdRng,
}

impl ScriptedPolicy {
    pub fn new(name: impl Into<String>, spec: PolicySpec) -> Self {
        let rng = StdRng::seed_from_u64(spec.seed);
        Self {
            name: name.into(),
            spec,
            rng,
        }
    }

    pub fn spec(&self) -> &PolicySpec {
        &self.spec
    }
}

impl Policy for ScriptedPolicy {
    /// Observation layout is `[ball_x, goals_for, goals_against, progress]`
    /// with `ball_x` oriented towards the opponent's goal.
    fn compute_action(&mut self, observation: &[f32]) -> usize {
        let ball_x = observation.first().copied().unwrap_or(0.0) as f64;
        if ball_x >= self.spec.shot_threshold {
            ACTION_SHOOT
        } else if self.rng.gen_bool(self.spec.aggression) {
            ACTION_PUSH
        } else {
            ACTION_HOLD
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.spec.seed);
    }
}

/// Loads [`ScriptedPolicy`] artifacts from competitor directories.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLoader;

impl ScriptedLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_spec(&self, dir: &Path) -> Result<PolicySpec, ArtifactError> {
        let path = dir.join(POLICY_FILE);
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            path: display.clone(),
            source,
        })?;
        PolicySpec::from_toml(&contents, &display)
    }
}

impl PolicyArtifactLoader for ScriptedLoader {
    fn load(&self, path: &Path, slot: &AgentSlot) -> anyhow::Result<Box<dyn Policy>> {
        let spec = self.load_spec(path)?;
        let label = spec.label.clone().unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scripted".to_string())
        });
        tracing::debug!(policy = %label, %slot, "loaded scripted policy");
        Ok(Box::new(ScriptedPolicy::new(label, spec)))
    }
}
