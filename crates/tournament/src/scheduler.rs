//! Round-robin pairing

use serde::{Deserialize, Serialize};

use crate::registry::Competitor;

/// One scheduled match. `home` plays in `agent_0`, `away` in `agent_1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPairing {
    /// Zero-based position in the schedule
    pub index: usize,
    pub home: Competitor,
    pub away: Competitor,
}

/// Number of matches a round robin over `n` competitors plays.
pub fn match_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Every unordered pair exactly once, in lexicographic index order:
/// (0,1), (0,2), .., (0,n-1), (1,2), .., (n-2,n-1).
pub fn round_robin(competitors: &[Competitor]) -> Vec<MatchPairing> {
    let mut pairings = Vec::with_capacity(match_count(competitors.len()));
    for (i, home) in competitors.iter().enumerate() {
        for away in &competitors[i + 1..] {
            pairings.push(MatchPairing {
                index: pairings.len(),
                home: home.clone(),
                away: away.clone(),
            });
        }
    }
    pairings
}
