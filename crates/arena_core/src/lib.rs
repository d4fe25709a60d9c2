pub mod stats;
pub mod store;

pub use stats::*;
pub use store::*;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};


/// Flattened per-agent observation vector handed to a policy each step.
pub type Observation = Vec<f32>;

// =============================================================================
// Agent slots
// =============================================================================

/// Identifier of the seat a policy occupies inside one episode.
///
/// Slots are per-match only: the same competitor may sit in `agent_0`
/// in one match and `agent_1` in the next.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentSlot(String);

impl AgentSlot {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The home seat (`agent_0`). Match scores are read from this slot.
    pub fn home() -> Self {
        Self::new("agent_0")
    }

    /// The away seat (`agent_1`).
    pub fn away() -> Self {
        Self::new("agent_1")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Policy trait: implemented by every loadable policy backend
// =============================================================================

/// A trained (or scripted) behaviour policy bound to one agent slot.
pub trait Policy: Send {
    /// Pick a discrete action for the given observation.
    fn compute_action(&mut self, observation: &[f32]) -> usize;

    /// Human-readable policy name, used in logs and episode dumps.
    fn name(&self) -> &str;

    /// Clear any per-episode state (recurrent hidden state, counters, ...).
    fn reset(&mut self) {}
}

/// Loads a policy artifact from disk.
///
/// Implementations may fail for any reason: missing files, incompatible
/// shapes, unreadable weights. Callers decide how to contain the failure.
pub trait PolicyArtifactLoader {
    /// # Arguments
    /// * `path` - Artifact directory of one competitor
    /// * `slot` - Agent slot the policy will control
    fn load(&self, path: &Path, slot: &AgentSlot) -> anyhow::Result<Box<dyn Policy>>;
}

/// Policies keyed by the slot they control, plus the policy id each one
/// is registered under for the episode.
pub type BehaviorPolicies = BTreeMap<AgentSlot, (String, Box<dyn Policy>)>;

// =============================================================================
// Environment and rollout
// =============================================================================

/// Output of a single environment step.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    /// Next observation per agent, in slot order
    pub observations: Vec<Observation>,
    /// Reward per agent, in slot order
    pub rewards: Vec<f32>,
    /// Whether each agent is still active (1.0) or has dropped out (0.0)
    pub active_mask: Vec<f32>,
    /// True once the episode has terminated
    pub done: bool,
}

/// A multi-agent simulation handle.
///
/// A single handle is reused across a whole tournament, so `reset` must
/// fully restore episode state. Callers reset explicitly before every
/// episode rather than relying on the rollout to do it.
pub trait Environment: Send {
    /// Start a fresh episode and return the initial observation per agent.
    fn reset(&mut self, seed: Option<u64>) -> Vec<Observation>;

    /// Current observation per agent, in slot order.
    fn observe(&self) -> Vec<Observation>;

    /// Advance one step with one action per agent, in slot order.
    fn step(&mut self, actions: &[usize]) -> anyhow::Result<StepOutcome>;

    /// Number of agent slots this environment drives.
    fn num_agents(&self) -> usize;

    /// Statistics of the current (or just finished) episode keyed by slot.
    fn episode_stats(&self) -> BTreeMap<String, AgentStats>;

    /// Enable or disable writing episode dumps.
    fn set_render(&mut self, render: bool);

    /// Flush the finished episode. Returns the dump written, if any.
    fn close_episode(&mut self) -> anyhow::Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Parameters of one rollout call.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutRequest {
    /// Evaluation mode: no transitions are written to a store
    pub eval: bool,
    /// Maximum number of environment steps
    pub episode_length: u32,
    /// Write an episode dump as a side effect
    pub render: bool,
    /// Table receiving transitions when a store is supplied
    pub table_name: Option<String>,
}

impl RolloutRequest {
    /// Evaluation rollout as used by tournament matches.
    pub fn evaluation(episode_length: u32, render: bool) -> Self {
        Self {
            eval: true,
            episode_length,
            render,
            table_name: None,
        }
    }
}

/// Drives one full episode with the given behaviour policies.
///
/// The environment must already be reset. On a training rollout
/// (`eval == false`) with a store and table name, the home slot's
/// transitions are pushed into that table.
pub trait RolloutEvaluator {
    fn evaluate(
        &self,
        env: &mut dyn Environment,
        policies: &mut BehaviorPolicies,
        request: &RolloutRequest,
        store: Option<&mut dyn SampleStore>,
    ) -> anyhow::Result<RolloutResult>;
}
