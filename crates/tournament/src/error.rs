//! Error types for the tournament pipeline
//!
//! Only [`RegistryError`] and [`TournamentError`] ever reach the caller of a
//! run. Everything raised while playing a match is folded into that match's
//! outcome.

use std::path::PathBuf;
use thiserror::Error;

/// The competitor root could not be listed. Fatal: nothing can be scheduled.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("model directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read model directory {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One policy artifact could not be loaded into its slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {competitor} into {slot}: {reason}")]
pub struct LoadFailure {
    pub competitor: String,
    pub slot: String,
    pub reason: String,
}

/// Anything that stops a single match from producing a score.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Load(#[from] LoadFailure),

    #[error(transparent)]
    Rollout(#[from] anyhow::Error),

    #[error("rollout returned no stats for slot {0}")]
    MissingStats(String),

    #[error("rollout returned non-finite stats for slot {slot}: score {score}, lost {lost}")]
    NonFiniteStats { slot: String, score: f64, lost: f64 },

    #[error("match panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a whole tournament before any match runs.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
