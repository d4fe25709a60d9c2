//! Policy loading with failure isolation

use arena_core::{AgentSlot, Policy, PolicyArtifactLoader};

use crate::error::LoadFailure;
use crate::registry::Competitor;

/// A competitor's policy bound to one slot for the duration of one match.
pub struct LoadedPolicy {
    pub competitor: Competitor,
    pub slot: AgentSlot,
    pub policy: Box<dyn Policy>,
}

impl std::fmt::Debug for LoadedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPolicy")
            .field("competitor", &self.competitor.name)
            .field("slot", &self.slot)
            .field("policy", &self.policy.name())
            .finish()
    }
}

/// Wraps an artifact loader so that a failure never escapes as anything
/// but a [`LoadFailure`] value. One attempt per request, no retries.
#[derive(Clone, Copy)]
pub struct PolicyLoader<'a> {
    artifacts: &'a dyn PolicyArtifactLoader,
}

impl<'a> PolicyLoader<'a> {
    pub fn new(artifacts: &'a dyn PolicyArtifactLoader) -> Self {
        Self { artifacts }
    }

    pub fn load(&self, competitor: &Competitor, slot: &AgentSlot) -> Result<LoadedPolicy, LoadFailure> {
        match self.artifacts.load(&competitor.path, slot) {
            Ok(policy) => Ok(LoadedPolicy {
                competitor: competitor.clone(),
                slot: slot.clone(),
                policy,
            }),
            Err(e) => {
                let failure = LoadFailure {
                    competitor: competitor.name.clone(),
                    slot: slot.to_string(),
                    reason: format!("{:#}", e),
                };
                tracing::warn!(
                    competitor = %competitor.name,
                    %slot,
                    reason = %failure.reason,
                    "failed to load policy"
                );
                Err(failure)
            }
        }
    }
}
