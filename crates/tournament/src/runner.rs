//! Sequential round-robin driver

use arena_core::{Environment, PolicyArtifactLoader, RolloutEvaluator};

use crate::config::TournamentConfig;
use crate::error::TournamentError;
use crate::executor::MatchExecutor;
use crate::loader::PolicyLoader;
use crate::registry::ModelRegistry;
use crate::results::TournamentReport;
use crate::scheduler::round_robin;

/// Name of the report file written into the output directory.
pub const RESULTS_FILE: &str = "results.json";

/// Wires registry, scheduler, executor and aggregation together.
///
/// Matches run one at a time in schedule order on the single environment
/// handle supplied here. A rollout that never returns stalls the run.
pub struct Tournament<'a> {
    config: TournamentConfig,
    artifacts: &'a dyn PolicyArtifactLoader,
    rollout: &'a dyn RolloutEvaluator,
    env: &'a mut dyn Environment,
}

impl<'a> Tournament<'a> {
    pub fn new(
        config: TournamentConfig,
        artifacts: &'a dyn PolicyArtifactLoader,
        rollout: &'a dyn RolloutEvaluator,
        env: &'a mut dyn Environment,
    ) -> Self {
        Self {
            config,
            artifacts,
            rollout,
            env,
        }
    }

    /// Play every pairing once.
    ///
    /// Only an unreadable models root or output directory fails the run;
    /// per-match failures end up as `Error` outcomes in the report.
    pub fn run(self) -> Result<TournamentReport, TournamentError> {
        let Tournament {
            config,
            artifacts,
            rollout,
            env,
        } = self;

        std::fs::create_dir_all(&config.output_dir).map_err(|source| {
            TournamentError::OutputDir {
                path: config.output_dir.clone(),
                source,
            }
        })?;

        let competitors = ModelRegistry::new(&config.models_dir).scan(config.ordering)?;
        let pairings = round_robin(&competitors);
        if config.verbose {
            let names: Vec<&str> = competitors.iter().map(|c| c.name.as_str()).collect();
            println!("Found {} models: {:?}", competitors.len(), names);
            println!("Running {} matches...", pairings.len());
        }

        let mut report = TournamentReport::new(&config.name, competitors, config.clone());
        let mut executor = MatchExecutor::new(
            PolicyLoader::new(artifacts),
            rollout,
            env,
            config.match_config(),
        );

        for pairing in &pairings {
            if config.verbose {
                println!(
                    "\n=== Match {}/{}: {} vs {} ===",
                    pairing.index + 1,
                    pairings.len(),
                    pairing.home,
                    pairing.away
                );
            }
            report.add_outcome(executor.run(pairing));
        }

        tracing::info!(
            matches = report.outcomes.len(),
            errors = report.error_count(),
            "tournament finished"
        );
        Ok(report)
    }
}
