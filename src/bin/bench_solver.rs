//! Offline batch harness: replays benchmark cases through `Game` and reports
//! aggregate results. A regular `std` binary, unlike the `no_std` library it
//! links against.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use hashbrown::HashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use minesweeper_solver::{BoardStatus, Game, GuessLabel, LabelTally, LevelConfig, MineGenerator, RandomMineGenerator, SolverConfig};

/// Flags for loading a solver config, reading or generating benchmark
/// cases, and controlling log verbosity.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Path to a TOML `SolverConfig` (falls back to defaults when absent).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a benchmark case file (comma-separated mine indices per
    /// line). Required unless `--generate` is passed.
    #[arg(short = 'f', long)]
    cases: Option<PathBuf>,

    /// Generate cases instead of reading them from a file.
    #[arg(long, short = 'g')]
    generate: bool,

    /// Number of cases to generate.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Seed for the case generator.
    #[arg(short = 's', long, default_value_t = 0)]
    seed: u64,

    /// Which configured level to generate against, 1-indexed.
    #[arg(long = "lv", default_value_t = 1)]
    level: usize,
}

/// On-disk shape of `--config`: the configured levels and solver strategy
/// knobs, plus this harness's own `verbose` toggle.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct HarnessConfig {
    levels: Vec<LevelConfig>,
    #[serde(flatten)]
    solver: SolverConfig,
    #[serde(default)]
    verbose: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            levels: vec![LevelConfig { rows: 9, cols: 9, mines: 10 }],
            solver: SolverConfig::default(),
            verbose: false,
        }
    }
}

/// One line of a benchmark case file: the mine indices for a single game.
/// Its level is resolved by matching `mine_indices.len()` to a configured
/// `LevelConfig.mines`.
#[derive(Clone, Debug)]
struct BenchCase {
    mine_indices: Vec<usize>,
}

fn load_config(path: Option<&PathBuf>) -> Result<HarnessConfig> {
    let Some(path) = path else {
        return Ok(HarnessConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {path:?}"))?;
    toml::from_str(&text).with_context(|| format!("parsing config {path:?}"))
}

fn parse_cases(path: &PathBuf) -> Result<Vec<BenchCase>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading case file {path:?}"))?;
    let mut cases = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mine_indices = line
            .split(',')
            .map(|field| field.trim().parse::<usize>().with_context(|| format!("bad mine index {field:?}")))
            .collect::<Result<Vec<_>>>()?;
        cases.push(BenchCase { mine_indices });
    }
    Ok(cases)
}

fn generate_cases(level: &LevelConfig, count: u32, seed: u64) -> Vec<BenchCase> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut generator = RandomMineGenerator::new(rng.random());
    (0..count)
        .map(|_| BenchCase {
            mine_indices: generator.generate(*level, (0, 0)),
        })
        .collect()
}

fn level_for_case(levels: &[LevelConfig], case: &BenchCase) -> Option<LevelConfig> {
    levels.iter().copied().find(|level| level.mines as usize == case.mine_indices.len())
}

/// Aggregate outcome of a batch run across every case in the file.
#[derive(Clone, Debug, Default, Serialize)]
struct ResultSummary {
    wins: u32,
    losses: u32,
    sure_clicks: u32,
    guess_clicks: u32,
    guess_success: u32,
    guess_failure: u32,
    per_label: HashMap<String, LabelTally>,
}

fn label_key(label: GuessLabel) -> &'static str {
    match label {
        GuessLabel::None => "none",
        GuessLabel::First => "first",
        GuessLabel::Random => "random",
        GuessLabel::Corner => "corner",
        GuessLabel::Min => "min",
        GuessLabel::Isle => "isle",
    }
}

fn run_case(level: LevelConfig, case: &BenchCase, config: &SolverConfig, seed: u64, summary: &mut ResultSummary) -> Result<()> {
    let mut game = Game::new(level, &case.mine_indices, config.clone(), seed)?;
    let status = game.play()?;
    let counters = game.counters();

    match status {
        BoardStatus::Won => summary.wins += 1,
        BoardStatus::Boom => summary.losses += 1,
        BoardStatus::Playing => bail!("game did not reach a terminal status"),
    }

    summary.sure_clicks += counters.sure_clicks;
    summary.guess_clicks += counters.guess_clicks;
    summary.guess_success += counters.guess_success;
    summary.guess_failure += counters.guess_failure;

    for (&label, tally) in &counters.label_tally {
        let entry = summary.per_label.entry(label_key(label).to_string()).or_default();
        entry.success += tally.success;
        entry.failure += tally.failure;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.verbose.log_level_filter();
    env_logger::Builder::new().filter_level(log_level).init();

    let harness_config = load_config(args.config.as_ref())?;

    let cases = if args.generate {
        let level = harness_config
            .levels
            .get(args.level.saturating_sub(1))
            .copied()
            .with_context(|| format!("no level configured at index {}", args.level))?;
        generate_cases(&level, args.count, args.seed)
    } else {
        let Some(path) = args.cases.as_ref() else {
            bail!("either --cases <file> or --generate is required");
        };
        parse_cases(path)?
    };

    let mut summary = ResultSummary::default();
    for case in &cases {
        let Some(level) = level_for_case(&harness_config.levels, case) else {
            log::warn!("case with {} mines matches no configured level, skipping", case.mine_indices.len());
            continue;
        };
        run_case(level, case, &harness_config.solver, args.seed, &mut summary)?;
    }

    log::info!(
        "wins={} losses={} sure_clicks={} guess_clicks={} guess_success={} guess_failure={}",
        summary.wins,
        summary.losses,
        summary.sure_clicks,
        summary.guess_clicks,
        summary.guess_success,
        summary.guess_failure,
    );
    for (label, tally) in &summary.per_label {
        log::info!("  {label}: success={} failure={}", tally.success, tally.failure);
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
