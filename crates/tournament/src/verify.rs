//! Active-mask verification
//!
//! Runs one short training rollout into a sample store and checks that the
//! sampled transitions carry a per-step liveness mask. Shares nothing with
//! the tournament pipeline beyond the collaborator traits.

use arena_core::{
    default_table_name, BehaviorPolicies, Environment, RolloutEvaluator, RolloutRequest,
    SampleStore, ACTIVE_MASK,
};
use serde_json::Value;

/// Agent whose transitions are recorded.
pub const VERIFY_AGENT: &str = "agent_0";
/// Policy id the recorded agent is registered under.
pub const VERIFY_POLICY: &str = "policy_0";

#[derive(Debug, Clone, PartialEq)]
pub struct VerifyConfig {
    pub rollout_length: u32,
    pub batch_size: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            rollout_length: 10,
            batch_size: 5,
        }
    }
}

/// What the first sampled record said about the mask.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskCheck {
    /// Mask present; `shape` of its (possibly nested) array value
    Present { shape: Vec<usize> },
    /// Records came back without the mask; lists the keys they did have
    Missing { keys: Vec<String> },
    /// The store returned no records
    Empty,
}

impl MaskCheck {
    pub fn passed(&self) -> bool {
        matches!(self, MaskCheck::Present { .. })
    }
}

pub fn verify_active_mask(
    env: &mut dyn Environment,
    rollout: &dyn RolloutEvaluator,
    policies: &mut BehaviorPolicies,
    store: &mut dyn SampleStore,
    config: &VerifyConfig,
) -> anyhow::Result<MaskCheck> {
    let table = default_table_name(VERIFY_AGENT, VERIFY_POLICY, false);
    store.create_table(&table)?;

    env.reset(None);
    let request = RolloutRequest {
        eval: false,
        episode_length: config.rollout_length,
        render: false,
        table_name: Some(table.clone()),
    };
    rollout.evaluate(env, policies, &request, Some(&mut *store))?;

    let (sample, info) = store.sample(&table, config.batch_size)?;
    tracing::debug!(table = %table, size = info.table_size, sampled = sample.len(), "sampled");

    let Some(first) = sample.first() else {
        return Ok(MaskCheck::Empty);
    };
    Ok(match first.get(ACTIVE_MASK) {
        Some(mask) => MaskCheck::Present { shape: shape_of(mask) },
        None => MaskCheck::Missing {
            keys: first.keys().cloned().collect(),
        },
    })
}

/// Dimensions of a rectangular nested JSON array; scalars have shape `[]`.
fn shape_of(value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        shape.push(items.len());
        match items.first() {
            Some(next) => current = next,
            None => break,
        }
    }
    shape
}
