//! Rollout primitive for the pitch simulation

use arena_core::{
    BehaviorPolicies, Environment, Record, RolloutEvaluator, RolloutRequest, RolloutResult,
    SampleStore, ACTIVE_MASK,
};
use serde_json::json;

/// Plays one episode step by step, querying each slot's policy in turn.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRollout;

impl ScriptedRollout {
    pub fn new() -> Self {
        Self
    }
}

impl RolloutEvaluator for ScriptedRollout {
    fn evaluate(
        &self,
        env: &mut dyn Environment,
        policies: &mut BehaviorPolicies,
        request: &RolloutRequest,
        store: Option<&mut dyn SampleStore>,
    ) -> anyhow::Result<RolloutResult> {
        if policies.len() != env.num_agents() {
            anyhow::bail!(
                "environment drives {} agents but {} policies were supplied",
                env.num_agents(),
                policies.len()
            );
        }

        // Only training rollouts with a target table record transitions
        let table = match (&request.table_name, request.eval) {
            (Some(name), false) if store.is_some() => Some(name.as_str()),
            _ => None,
        };

        env.set_render(request.render);
        for (_, policy) in policies.values_mut() {
            policy.reset();
        }

        let mut observations = env.observe();
        let mut transitions: Vec<Record> = Vec::new();

        for _ in 0..request.episode_length {
            let actions: Vec<usize> = policies
                .values_mut()
                .zip(&observations)
                .map(|((_, policy), obs)| policy.compute_action(obs))
                .collect();

            let outcome = env.step(&actions)?;

            if table.is_some() {
                let mut record = Record::new();
                record.insert("observation".into(), json!(observations[0]));
                record.insert("action".into(), json!(actions[0]));
                record.insert("reward".into(), json!(outcome.rewards[0]));
                record.insert("done".into(), json!(outcome.done));
                record.insert(ACTIVE_MASK.into(), json!([outcome.active_mask[0]]));
                transitions.push(record);
            }

            observations = outcome.observations;
            if outcome.done {
                break;
            }
        }

        if let (Some(name), Some(store)) = (table, store) {
            store.push(name, transitions)?;
        }

        let dump = env.close_episode()?;
        let stats = env.episode_stats();
        tracing::debug!(
            steps = request.episode_length,
            dump = ?dump,
            "rollout finished"
        );
        Ok(RolloutResult::single(stats))
    }
}
