//! Tournament CLI
//!
//! Run a round robin between trained policies and report win counts.

use anyhow::{Context, Result};
use arena_core::{AgentSlot, BehaviorPolicies, MemorySampleStore, PolicyArtifactLoader};
use clap::{Args, Parser, Subcommand};
use scripted_engine::{PitchConfig, PitchEnv, ScriptedLoader, ScriptedRollout};
use std::path::{Path, PathBuf};
use tournament::telemetry::init_tracing;
use tournament::verify::{verify_active_mask, MaskCheck, VerifyConfig};
use tournament::{CompetitorOrder, Tournament, TournamentConfig, TournamentReport, RESULTS_FILE};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tournament")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Round-robin tournament runner for trained policies", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play every competitor against every other once
    Run(RunArgs),

    /// Print a saved results file
    Report {
        /// Path to results.json
        path: PathBuf,
    },

    /// Check that training rollouts record the active mask
    Verify {
        /// Artifact directory loaded into both slots
        #[arg(long)]
        artifact: PathBuf,

        /// Rollout length in steps
        #[arg(long, default_value_t = 10)]
        steps: u32,
    },
}

#[derive(Args)]
struct RunArgs {
    /// TOML config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with one subdirectory per competitor
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Directory receiving episode dumps and results.json
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Maximum simulation steps per match
    #[arg(long)]
    episode_length: Option<u32>,

    /// Do not write episode dumps
    #[arg(long)]
    no_render: bool,

    /// Competitor ordering before pairing
    #[arg(long, value_enum)]
    ordering: Option<CompetitorOrder>,

    /// Base seed for environment resets
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn into_config(self) -> Result<TournamentConfig> {
        let mut config = match &self.config {
            Some(path) => TournamentConfig::load(path)?,
            None => TournamentConfig::default(),
        };
        if let Some(dir) = self.models_dir {
            config.models_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(steps) = self.episode_length {
            config.episode_length = steps;
        }
        if self.no_render {
            config.render = false;
        }
        if let Some(ordering) = self.ordering {
            config.ordering = ordering;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn run_tournament(args: RunArgs) -> Result<()> {
    let config = args.into_config()?;
    let output_dir = config.output_dir.clone();

    let loader = ScriptedLoader::new();
    let rollout = ScriptedRollout::new();
    let mut env = PitchEnv::new(config.pitch_config());

    let report = Tournament::new(config, &loader, &rollout, &mut env)
        .run()
        .context("Tournament aborted")?;

    println!();
    report.print_report();

    let results_path = output_dir.join(RESULTS_FILE);
    report
        .save(&results_path)
        .with_context(|| format!("Failed to save {}", results_path.display()))?;

    println!("All match results saved. Videos in: {}", output_dir.display());
    Ok(())
}

fn show_report(path: &Path) -> Result<()> {
    let report = TournamentReport::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    report.print_report();
    Ok(())
}

fn run_verify(artifact: &Path, steps: u32) -> Result<()> {
    let loader = ScriptedLoader::new();

    println!("Initializing Environment...");
    let mut env = PitchEnv::new(PitchConfig::default());

    println!("Loading policy from {}...", artifact.display());
    let mut policies = BehaviorPolicies::new();
    for (slot, id) in [(AgentSlot::home(), "policy_0"), (AgentSlot::away(), "policy_1")] {
        let policy = loader
            .load(artifact, &slot)
            .with_context(|| format!("Failed to load {} into {}", artifact.display(), slot))?;
        policies.insert(slot, (id.to_string(), policy));
    }

    println!("Running Rollout...");
    let mut store = MemorySampleStore::new();
    let config = VerifyConfig {
        rollout_length: steps,
        ..Default::default()
    };
    let check = verify_active_mask(
        &mut env,
        &ScriptedRollout::new(),
        &mut policies,
        &mut store,
        &config,
    )?;

    println!("Checking Sample Store for Active Mask...");
    match &check {
        MaskCheck::Present { shape } => {
            println!("SUCCESS: Active Mask found in sample!");
            println!("Shape: {:?}", shape);
        }
        MaskCheck::Missing { keys } => {
            println!("FAILURE: Active Mask NOT found in sample.");
            println!("Keys: {:?}", keys);
        }
        MaskCheck::Empty => {
            println!("FAILURE: No sample returned.");
        }
    }
    println!("Verification Complete.");

    if !check.passed() {
        anyhow::bail!("active mask verification failed");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Run(args) => run_tournament(args),
        Commands::Report { path } => show_report(&path),
        Commands::Verify { artifact, steps } => run_verify(&artifact, steps),
    }
}
