//! Competitor discovery

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::RegistryError;

/// One trained policy entered into the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Competitor {
    /// Display identifier (the artifact directory name, verbatim)
    pub name: String,
    /// Artifact directory
    pub path: PathBuf,
}

impl Competitor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How discovered competitors are ordered before pairing.
///
/// Directory listing order is platform dependent, so `Sorted` is the
/// default to keep match order reproducible between machines.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CompetitorOrder {
    /// Byte-wise by competitor name
    #[default]
    Sorted,
    /// Whatever order the filesystem lists entries in
    Discovery,
}

/// Discovers competitors as the subdirectories of a models root.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    root: PathBuf,
}

impl ModelRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every subdirectory of the root as a competitor.
    ///
    /// Contents are not validated here; broken artifacts surface when
    /// a match tries to load them. Plain files are ignored.
    pub fn scan(&self, order: CompetitorOrder) -> Result<Vec<Competitor>, RegistryError> {
        if !self.root.exists() {
            return Err(RegistryError::NotFound(self.root.clone()));
        }
        let unreadable = |source| RegistryError::Unreadable {
            path: self.root.clone(),
            source,
        };

        let mut competitors = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let path = entry.path();
            if path.is_dir() {
                let name = entry.file_name().to_string_lossy().into_owned();
                competitors.push(Competitor::new(name, path));
            }
        }

        if order == CompetitorOrder::Sorted {
            competitors.sort_by(|a, b| a.name.cmp(&b.name));
        }

        tracing::info!(
            root = %self.root.display(),
            count = competitors.len(),
            "discovered competitors"
        );
        Ok(competitors)
    }
}
