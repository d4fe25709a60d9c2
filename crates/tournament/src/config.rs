//! Tournament configuration

use scripted_engine::PitchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::executor::MatchConfig;
use crate::registry::CompetitorOrder;

/// Default rollout horizon in simulation steps.
pub const DEFAULT_EPISODE_LENGTH: u32 = 3000;

/// Tournament configuration, usually read from a TOML file.
///
/// ```toml
/// name = "5v5 round robin"
/// models_dir = "trained_models/5_vs_5"
/// output_dir = "tournament_logs"
/// episode_length = 3000
/// ordering = "sorted"
///
/// [environment]
/// conversion = 0.4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub name: String,
    /// Root holding one subdirectory per competitor
    pub models_dir: PathBuf,
    /// Receives episode dumps and `results.json`
    pub output_dir: PathBuf,
    /// Maximum steps per match
    pub episode_length: u32,
    /// Write episode dumps for every match
    pub render: bool,
    pub ordering: CompetitorOrder,
    /// Base seed; match `i` resets the environment with `seed + i`
    pub seed: Option<u64>,
    /// Print per-match progress to stdout
    pub verbose: bool,
    pub environment: PitchConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Round Robin".to_string(),
            models_dir: PathBuf::from("trained_models"),
            output_dir: PathBuf::from("tournament_logs"),
            episode_length: DEFAULT_EPISODE_LENGTH,
            render: true,
            ordering: CompetitorOrder::Sorted,
            seed: None,
            verbose: true,
            environment: PitchConfig::default(),
        }
    }
}

impl TournamentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Per-match settings derived from this config.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            episode_length: self.episode_length,
            render: self.render,
            seed: self.seed,
            verbose: self.verbose,
        }
    }

    /// Environment settings with episode dumps routed to the output directory
    /// unless a log directory was set explicitly.
    pub fn pitch_config(&self) -> PitchConfig {
        let mut pitch = self.environment.clone();
        if pitch.logdir.is_none() {
            pitch.logdir = Some(self.output_dir.clone());
        }
        pitch.max_steps = pitch.max_steps.max(self.episode_length);
        pitch
    }
}
