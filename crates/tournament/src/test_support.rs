//! Stub collaborators that record how they were used

use arena_core::{
    AgentSlot, AgentStats, BehaviorPolicies, Environment, Observation, Policy,
    PolicyArtifactLoader, RolloutEvaluator, RolloutRequest, RolloutResult, SampleStore,
    StepOutcome,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::registry::Competitor;

pub struct StubPolicy {
    name: String,
}

impl Policy for StubPolicy {
    fn compute_action(&mut self, _observation: &[f32]) -> usize {
        0
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loads a [`StubPolicy`] named after the artifact directory, unless that
/// name is in the broken set.
#[derive(Default)]
pub struct StubLoader {
    broken: HashSet<String>,
    pub calls: RefCell<Vec<(String, String)>>,
}

impl StubLoader {
    pub fn with_broken(names: &[&str]) -> Self {
        Self {
            broken: names.iter().map(|n| n.to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl PolicyArtifactLoader for StubLoader {
    fn load(&self, path: &Path, slot: &AgentSlot) -> anyhow::Result<Box<dyn Policy>> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.borrow_mut().push((name.clone(), slot.to_string()));
        if self.broken.contains(&name) {
            anyhow::bail!("incompatible checkpoint for {}", name);
        }
        Ok(Box::new(StubPolicy { name }))
    }
}

/// Scripted reply for one (home, away) pairing.
#[derive(Debug, Clone)]
pub enum Reply {
    Score(f64, f64),
    Fail(String),
    Panic,
    NoHomeStats,
}

/// Answers each rollout from a script keyed by the policies' names.
#[derive(Default)]
pub struct StubRollout {
    script: HashMap<(String, String), Reply>,
    pub calls: Cell<usize>,
}

impl StubRollout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, home: &str, away: &str, reply: Reply) -> Self {
        self.script.insert((home.to_string(), away.to_string()), reply);
        self
    }
}

impl RolloutEvaluator for StubRollout {
    fn evaluate(
        &self,
        _env: &mut dyn Environment,
        policies: &mut BehaviorPolicies,
        _request: &RolloutRequest,
        _store: Option<&mut dyn SampleStore>,
    ) -> anyhow::Result<RolloutResult> {
        self.calls.set(self.calls.get() + 1);
        let name = |slot: AgentSlot| {
            policies
                .get(&slot)
                .map(|(_, p)| p.name().to_string())
                .unwrap_or_default()
        };
        let key = (name(AgentSlot::home()), name(AgentSlot::away()));

        match self.script.get(&key).cloned().unwrap_or(Reply::Score(0.0, 0.0)) {
            Reply::Score(home, away) => {
                let mut stats = BTreeMap::new();
                stats.insert("agent_0".to_string(), AgentStats::new(home, away));
                stats.insert("agent_1".to_string(), AgentStats::new(away, home));
                Ok(RolloutResult::single(stats))
            }
            Reply::Fail(msg) => anyhow::bail!(msg),
            Reply::Panic => panic!("simulator crashed"),
            Reply::NoHomeStats => Ok(RolloutResult::default()),
        }
    }
}

/// Environment that only counts resets.
#[derive(Default)]
pub struct CountingEnv {
    pub seeds: Vec<Option<u64>>,
}

impl CountingEnv {
    pub fn resets(&self) -> usize {
        self.seeds.len()
    }
}

impl Environment for CountingEnv {
    fn reset(&mut self, seed: Option<u64>) -> Vec<Observation> {
        self.seeds.push(seed);
        self.observe()
    }

    fn observe(&self) -> Vec<Observation> {
        vec![vec![0.0]; 2]
    }

    fn step(&mut self, _actions: &[usize]) -> anyhow::Result<StepOutcome> {
        Ok(StepOutcome::default())
    }

    fn num_agents(&self) -> usize {
        2
    }

    fn episode_stats(&self) -> BTreeMap<String, AgentStats> {
        BTreeMap::new()
    }

    fn set_render(&mut self, _render: bool) {}
}

pub fn competitor(name: &str) -> Competitor {
    Competitor::new(name, PathBuf::from("models").join(name))
}

pub fn competitors(names: &[&str]) -> Vec<Competitor> {
    names.iter().map(|n| competitor(n)).collect()
}
