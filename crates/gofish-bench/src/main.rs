use std::path::PathBuf;

use clap::Parser;

use gofish_bench::config::{BenchConfig, ResolvedOutputs};
use gofish_bench::logging::init_logging;
use gofish_bench::tournament::TournamentRunner;

/// Tournament benchmarking harness for Go Fish request policies.
#[derive(Debug, Parser)]
#[command(
    name = "gofish-bench",
    author,
    version,
    about = "Deterministic Go Fish tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let seat_count = config.seats.len();
    let run_id = config.run_id.clone();
    let games = config.games.count;

    println!("Loaded configuration '{run_id}' with {seat_count} seats ({games} games)");

    init_logging(&config.logging)?;
    let runner = TournamentRunner::new(config, outputs);

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} games → {} rows at {}",
        summary.games_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Wins by seat: {:?}", summary.wins_by_seat);
    if let Some(residual) = summary.mean_abs_residual {
        println!("Estimator mean absolute residual: {residual:.3}");
    }

    Ok(())
}
