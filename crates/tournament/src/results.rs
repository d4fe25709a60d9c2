//! Match outcomes, win aggregation, and tournament reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::TournamentConfig;
use crate::error::ReportError;
use crate::registry::Competitor;
use crate::scheduler::MatchPairing;

/// Score shown for matches that never started.
pub const NOT_AVAILABLE: &str = "N/A";

/// Who took a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Home,
    Away,
    Draw,
    Error,
}

impl Winner {
    /// Strict majority on the home slot's for/against counts.
    /// Equal counts (0-0 included) are always a draw.
    pub fn decide(score_for: f64, score_against: f64) -> Self {
        if score_for > score_against {
            Winner::Home
        } else if score_against > score_for {
            Winner::Away
        } else {
            Winner::Draw
        }
    }
}

/// Final score of a match, or why there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchScore {
    Goals { home: f64, away: f64 },
    Unavailable { detail: String },
}

/// The recorded result of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub pairing: MatchPairing,
    pub winner: Winner,
    pub score: MatchScore,
}

impl MatchOutcome {
    pub fn decided(pairing: &MatchPairing, home: f64, away: f64) -> Self {
        Self {
            pairing: pairing.clone(),
            winner: Winner::decide(home, away),
            score: MatchScore::Goals { home, away },
        }
    }

    pub fn failed(pairing: &MatchPairing, detail: impl Into<String>) -> Self {
        Self {
            pairing: pairing.clone(),
            winner: Winner::Error,
            score: MatchScore::Unavailable {
                detail: detail.into(),
            },
        }
    }

    /// The competitor that won, if the match was decisive.
    pub fn winning_competitor(&self) -> Option<&Competitor> {
        match self.winner {
            Winner::Home => Some(&self.pairing.home),
            Winner::Away => Some(&self.pairing.away),
            Winner::Draw | Winner::Error => None,
        }
    }

    pub fn winner_label(&self) -> &str {
        match self.winner {
            Winner::Draw => "Draw",
            Winner::Error => "ERROR",
            Winner::Home => &self.pairing.home.name,
            Winner::Away => &self.pairing.away.name,
        }
    }

    /// `"2-1"` for played matches, otherwise the failure detail.
    pub fn score_label(&self) -> String {
        match &self.score {
            MatchScore::Goals { home, away } => format!("{}-{}", home, away),
            MatchScore::Unavailable { detail } => detail.clone(),
        }
    }

    /// `"{A} {score_a} - {score_b} {B} | Winner: {winner}"`, or
    /// `"{A} vs {B} | {detail} | Winner: ERROR"` when there is no score.
    pub fn summary_line(&self) -> String {
        match &self.score {
            MatchScore::Goals { home, away } => format!(
                "{} {} - {} {} | Winner: {}",
                self.pairing.home.name,
                home,
                away,
                self.pairing.away.name,
                self.winner_label()
            ),
            MatchScore::Unavailable { detail } => format!(
                "{} vs {} | {} | Winner: {}",
                self.pairing.home.name,
                self.pairing.away.name,
                detail,
                self.winner_label()
            ),
        }
    }
}

/// Decisive wins per competitor, in order of first win.
///
/// Competitors without a decisive win have no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTable {
    entries: Vec<(String, u32)>,
}

impl WinTable {
    /// Tally every decisive outcome. Draws and errors count for nobody.
    pub fn aggregate(outcomes: &[MatchOutcome]) -> Self {
        let mut table = Self::default();
        for competitor in outcomes.iter().filter_map(MatchOutcome::winning_competitor) {
            table.record_win(&competitor.name);
        }
        table
    }

    fn record_win(&mut self, name: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, wins)) => *wins += 1,
            None => self.entries.push((name.to_string(), 1)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, wins)| *wins)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all win counts.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, wins)| wins).sum()
    }

    /// Entries in order of first win.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(n, w)| (n.as_str(), *w))
    }

    /// Most wins first; equal counts keep order of first win.
    pub fn ranking(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Complete record of one tournament run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Name/description of the tournament
    pub name: String,
    pub started_at: DateTime<Utc>,
    /// Competitors in scheduling order
    pub competitors: Vec<Competitor>,
    /// One outcome per pairing, in schedule order
    pub outcomes: Vec<MatchOutcome>,
    /// Configuration used
    pub config: TournamentConfig,
}

impl TournamentReport {
    pub fn new(name: &str, competitors: Vec<Competitor>, config: TournamentConfig) -> Self {
        Self {
            name: name.to_string(),
            started_at: Utc::now(),
            competitors,
            outcomes: Vec::new(),
            config,
        }
    }

    pub fn add_outcome(&mut self, outcome: MatchOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn win_table(&self) -> WinTable {
        WinTable::aggregate(&self.outcomes)
    }

    pub fn error_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.winner == Winner::Error)
            .count()
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&"=".repeat(60));
        report.push_str("\nTOURNAMENT RESULTS\n");
        report.push_str(&"=".repeat(60));
        report.push_str("\n\n");
        report.push_str(&format!("Tournament: {}\n", self.name));
        report.push_str(&format!(
            "Started: {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        report.push_str(&format!(
            "Competitors: {}\n",
            self.competitors
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        report.push_str(&format!(
            "Config: {} steps/episode, render {}\n\n",
            self.config.episode_length,
            if self.config.render { "on" } else { "off" }
        ));

        report.push_str("Matches:\n");
        report.push_str(&format!(
            "{:<20} vs {:<20} {:>9}  {:<20}\n",
            "Home", "Away", "Score", "Winner"
        ));
        report.push_str(&"-".repeat(75));
        report.push('\n');

        for outcome in &self.outcomes {
            report.push_str(&format!(
                "{:<20} vs {:<20} {:>9}  {:<20}\n",
                outcome.pairing.home.name,
                outcome.pairing.away.name,
                outcome.score_label(),
                outcome.winner_label()
            ));
        }

        report.push_str("\nWin Counts:\n");
        for (name, wins) in self.win_table().ranking() {
            report.push_str(&format!("  {}: {} wins\n", name, wins));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}
