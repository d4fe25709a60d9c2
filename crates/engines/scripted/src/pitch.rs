//! Two-team pitch simulation
//!
//! The ball lives on a line from -1.0 (agent_0's goal) to +1.0 (agent_1's
//! goal). Each step both agents either hold, push the ball towards the
//! opponent, or shoot. Shots only convert inside the shooting range.

use arena_core::{AgentStats, Environment, Observation, StepOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{ACTION_PUSH, ACTION_SHOOT};

const SLOTS: [&str; 2] = ["agent_0", "agent_1"];

/// Pitch simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Base seed; episode `n` is seeded with `seed + n` unless reset gives one
    pub seed: u64,
    /// Hard cap on steps per episode
    pub max_steps: u32,
    /// Ball displacement per uncontested push
    pub push_step: f64,
    /// Uniform noise added to the ball each step
    pub noise: f64,
    /// Oriented position beyond which shots can score
    pub shot_range: f64,
    /// Conversion probability for a shot from the very edge of the goal
    pub conversion: f64,
    /// Directory receiving episode dumps when rendering
    pub logdir: Option<PathBuf>,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_steps: 3000,
            push_step: 0.08,
            noise: 0.02,
            shot_range: 0.5,
            conversion: 0.35,
            logdir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Frame {
    step: u32,
    ball_x: f64,
    actions: [usize; 2],
}

#[derive(Debug, Serialize)]
struct EpisodeDump<'a> {
    episode: u64,
    steps: u32,
    stats: BTreeMap<String, AgentStats>,
    frames: &'a [Frame],
}

/// Seeded, resettable pitch shared across a whole tournament.
pub struct PitchEnv {
    config: PitchConfig,
    rng: StdRng,
    ball_x: f64,
    step: u32,
    goals: [u32; 2],
    shots: [u32; 2],
    episodes: u64,
    render: bool,
    frames: Vec<Frame>,
}

impl PitchEnv {
    pub fn new(config: PitchConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            ball_x: 0.0,
            step: 0,
            goals: [0; 2],
            shots: [0; 2],
            episodes: 0,
            render: false,
            frames: Vec::new(),
        }
    }

    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    /// Episodes started on this handle so far.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn ball_x(&self) -> f64 {
        self.ball_x
    }

    fn oriented(&self, agent: usize) -> f64 {
        if agent == 0 {
            self.ball_x
        } else {
            -self.ball_x
        }
    }

    fn observation(&self, agent: usize) -> Observation {
        let progress = self.step as f32 / self.config.max_steps.max(1) as f32;
        vec![
            self.oriented(agent) as f32,
            self.goals[agent] as f32,
            self.goals[1 - agent] as f32,
            progress,
        ]
    }

    /// Resolve a shot by `agent`. Returns true on a goal.
    fn shoot(&mut self, agent: usize) -> bool {
        self.shots[agent] += 1;
        let x = self.oriented(agent);
        let range = self.config.shot_range;
        if x < range {
            return false;
        }
        let closeness = ((x - range) / (1.0 - range).max(f64::EPSILON)).clamp(0.0, 1.0);
        let p = (self.config.conversion * (0.5 + closeness)).clamp(0.0, 1.0);
        self.rng.gen_bool(p)
    }

    fn is_done(&self) -> bool {
        self.step >= self.config.max_steps
    }
}

impl Environment for PitchEnv {
    fn reset(&mut self, seed: Option<u64>) -> Vec<Observation> {
        let seed = seed.unwrap_or(self.config.seed.wrapping_add(self.episodes));
        self.rng = StdRng::seed_from_u64(seed);
        self.ball_x = 0.0;
        self.step = 0;
        self.goals = [0; 2];
        self.shots = [0; 2];
        self.frames.clear();
        self.episodes += 1;
        self.observe()
    }

    fn observe(&self) -> Vec<Observation> {
        (0..SLOTS.len()).map(|a| self.observation(a)).collect()
    }

    fn step(&mut self, actions: &[usize]) -> anyhow::Result<StepOutcome> {
        if actions.len() != SLOTS.len() {
            anyhow::bail!(
                "pitch expects {} actions, got {}",
                SLOTS.len(),
                actions.len()
            );
        }
        if self.is_done() {
            anyhow::bail!("step called on a finished episode; reset first");
        }

        let push = |a: usize| if actions[a] == ACTION_PUSH { 1.0 } else { 0.0 };
        let noise = if self.config.noise > 0.0 {
            self.rng.gen_range(-self.config.noise..=self.config.noise)
        } else {
            0.0
        };
        self.ball_x = (self.ball_x + self.config.push_step * (push(0) - push(1)) + noise)
            .clamp(-1.0, 1.0);

        let mut rewards = vec![0.0f32; SLOTS.len()];
        for agent in 0..SLOTS.len() {
            if actions[agent] != ACTION_SHOOT {
                continue;
            }
            if self.shoot(agent) {
                self.goals[agent] += 1;
                rewards[agent] += 1.0;
                rewards[1 - agent] -= 1.0;
                self.ball_x = 0.0;
                break;
            }
            // Missed shot turns the ball over
            self.ball_x *= 0.5;
        }

        self.step += 1;
        if self.render {
            self.frames.push(Frame {
                step: self.step,
                ball_x: self.ball_x,
                actions: [actions[0], actions[1]],
            });
        }

        Ok(StepOutcome {
            observations: self.observe(),
            rewards,
            active_mask: vec![1.0; SLOTS.len()],
            done: self.is_done(),
        })
    }

    fn num_agents(&self) -> usize {
        SLOTS.len()
    }

    fn episode_stats(&self) -> BTreeMap<String, AgentStats> {
        SLOTS
            .iter()
            .enumerate()
            .map(|(agent, slot)| {
                let mut stats = AgentStats::new(
                    self.goals[agent] as f64,
                    self.goals[1 - agent] as f64,
                );
                stats.extra.insert("shots".into(), self.shots[agent] as f64);
                stats.extra.insert("steps".into(), self.step as f64);
                (slot.to_string(), stats)
            })
            .collect()
    }

    fn set_render(&mut self, render: bool) {
        self.render = render;
    }

    fn close_episode(&mut self) -> anyhow::Result<Option<PathBuf>> {
        let Some(dir) = self.config.logdir.as_ref().filter(|_| self.render) else {
            return Ok(None);
        };
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("episode_{:04}.json", self.episodes));
        let dump = EpisodeDump {
            episode: self.episodes,
            steps: self.step,
            stats: self.episode_stats(),
            frames: &self.frames,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&dump)?)?;
        tracing::debug!(path = %path.display(), "wrote episode dump");
        Ok(Some(path))
    }
}
