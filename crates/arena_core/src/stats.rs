//! Episode statistics returned by a rollout

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-agent statistics of one episode.
///
/// `score` and `lost` are the "for" and "against" counts of the slot.
/// Fields missing from a serialized record default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentStats {
    /// Points scored by this slot
    pub score: f64,
    /// Points conceded by this slot
    pub lost: f64,
    /// Any further numeric statistics the backend reports
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl AgentStats {
    pub fn new(score: f64, lost: f64) -> Self {
        Self {
            score,
            lost,
            extra: BTreeMap::new(),
        }
    }
}

/// Statistics of one finished episode, keyed by slot id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub stats: BTreeMap<String, AgentStats>,
}

/// Everything a rollout call hands back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RolloutResult {
    pub results: Vec<EpisodeResult>,
}

impl RolloutResult {
    pub fn single(stats: BTreeMap<String, AgentStats>) -> Self {
        Self {
            results: vec![EpisodeResult { stats }],
        }
    }

    /// Stats of `slot` in the first episode, if both exist.
    pub fn first_episode_stats(&self, slot: &str) -> Option<&AgentStats> {
        self.results.first().and_then(|ep| ep.stats.get(slot))
    }
}
