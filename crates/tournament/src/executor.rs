//! Match executor for playing one pairing between two policies

use arena_core::{AgentSlot, BehaviorPolicies, Environment, RolloutEvaluator, RolloutRequest};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::config::DEFAULT_EPISODE_LENGTH;
use crate::error::MatchError;
use crate::loader::PolicyLoader;
use crate::results::{MatchOutcome, NOT_AVAILABLE};
use crate::scheduler::MatchPairing;

/// Configuration for a match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Maximum simulation steps per episode
    pub episode_length: u32,
    /// Write an episode dump for every match
    pub render: bool,
    /// Base seed for environment resets (None = environment default)
    pub seed: Option<u64>,
    /// Print progress during the match
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            episode_length: DEFAULT_EPISODE_LENGTH,
            render: true,
            seed: None,
            verbose: true,
        }
    }
}

/// Plays pairings one at a time on a shared environment handle.
///
/// Every call to [`MatchExecutor::run`] yields exactly one outcome. Load
/// failures, rollout errors and collaborator panics all become
/// [`Winner::Error`](crate::Winner::Error) outcomes instead of escaping.
pub struct MatchExecutor<'a> {
    loader: PolicyLoader<'a>,
    rollout: &'a dyn RolloutEvaluator,
    env: &'a mut dyn Environment,
    config: MatchConfig,
}

impl<'a> MatchExecutor<'a> {
    pub fn new(
        loader: PolicyLoader<'a>,
        rollout: &'a dyn RolloutEvaluator,
        env: &'a mut dyn Environment,
        config: MatchConfig,
    ) -> Self {
        Self {
            loader,
            rollout,
            env,
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run one match and record its outcome
    pub fn run(&mut self, pairing: &MatchPairing) -> MatchOutcome {
        let played = panic::catch_unwind(AssertUnwindSafe(|| self.play(pairing)));

        let outcome = match played {
            Ok(Ok((score_for, score_against))) => {
                MatchOutcome::decided(pairing, score_for, score_against)
            }
            Ok(Err(MatchError::Load(_))) => {
                // Already logged by the loader, with the reason
                if self.config.verbose {
                    println!("Skipping match due to load failure");
                }
                return MatchOutcome::failed(pairing, NOT_AVAILABLE);
            }
            Ok(Err(err)) => self.fail(pairing, err),
            Err(payload) => self.fail(pairing, MatchError::Panicked(panic_message(&*payload))),
        };

        if self.config.verbose {
            println!("Result: {}", outcome.summary_line());
        }
        outcome
    }

    fn fail(&self, pairing: &MatchPairing, err: MatchError) -> MatchOutcome {
        tracing::error!(
            home = %pairing.home.name,
            away = %pairing.away.name,
            error = %err,
            "match failed"
        );
        MatchOutcome::failed(pairing, err.to_string())
    }

    /// Load both sides, play the episode, and read the home slot's
    /// (for, against) counts.
    fn play(&mut self, pairing: &MatchPairing) -> Result<(f64, f64), MatchError> {
        let home_slot = AgentSlot::home();
        // Both loads are attempted so every broken artifact gets reported
        let home = self.loader.load(&pairing.home, &home_slot);
        let away = self.loader.load(&pairing.away, &AgentSlot::away());
        let (home, away) = (home?, away?);

        let mut policies = BehaviorPolicies::new();
        policies.insert(home.slot, ("policy_a".to_string(), home.policy));
        policies.insert(away.slot, ("policy_b".to_string(), away.policy));

        let seed = self
            .config
            .seed
            .map(|s| s.wrapping_add(pairing.index as u64));
        self.env.reset(seed);

        let request = RolloutRequest::evaluation(self.config.episode_length, self.config.render);
        tracing::debug!(
            home = %pairing.home.name,
            away = %pairing.away.name,
            ?seed,
            steps = request.episode_length,
            "starting rollout"
        );
        let result = self
            .rollout
            .evaluate(&mut *self.env, &mut policies, &request, None)?;

        let stats = result
            .first_episode_stats(home_slot.as_str())
            .ok_or_else(|| MatchError::MissingStats(home_slot.to_string()))?;
        if !(stats.score.is_finite() && stats.lost.is_finite()) {
            return Err(MatchError::NonFiniteStats {
                slot: home_slot.to_string(),
                score: stats.score,
                lost: stats.lost,
            });
        }
        Ok((stats.score, stats.lost))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
