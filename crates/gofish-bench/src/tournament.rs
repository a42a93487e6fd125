use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gofish_bot::policy::{
    BookBuilderPolicy, ExpectationPolicy, Policy, PolicyContext, PublicClaimPolicy,
};
use gofish_core::game::engine::{Game, PayoffMode};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BenchConfig, PolicyKind, ResolvedOutputs};

/// Safety valve for deterministic policies that fail to make progress once
/// the deck runs dry.
const STEP_LIMIT: usize = 10_000;

/// Primary entry point for orchestrating seeded tournaments.
pub struct TournamentRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub wins_by_seat: Vec<usize>,
    pub mean_abs_residual: Option<f64>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("io failure")]
    Io(#[from] std::io::Error),
    #[error("row serialization failure")]
    Serialize(#[from] serde_json::Error),
    #[error("engine failure in game {game_index} (seed {seed}): {message}")]
    Engine {
        game_index: usize,
        seed: u64,
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct GameRow {
    game_index: usize,
    seed: u64,
    seats: Vec<String>,
    steps: usize,
    completed: bool,
    books: Vec<usize>,
    training_payoffs: Vec<f64>,
    evaluation_payoffs: Vec<f64>,
    request_samples: usize,
    mean_abs_residual: Option<f64>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute the tournament, streaming one JSONL row per game to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        let mut writer = BufWriter::new(fs::File::create(&self.outputs.jsonl)?);

        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let seat_count = self.config.seats.len();
        let mut rows_written = 0usize;
        let mut wins_by_seat = vec![0usize; seat_count];
        let mut residual_sum = 0f64;
        let mut residual_samples = 0usize;

        for game_index in 0..self.config.games.count {
            let seed = rng.next_u64();
            let row = self.play_game(game_index, seed)?;

            for (seat, payoff) in row.evaluation_payoffs.iter().enumerate() {
                if *payoff == 100.0 {
                    wins_by_seat[seat] += 1;
                }
            }
            if let Some(mean) = row.mean_abs_residual {
                residual_sum += mean * row.request_samples as f64;
                residual_samples += row.request_samples;
            }

            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }

        writer.flush()?;

        let mean_abs_residual = (residual_samples > 0)
            .then(|| residual_sum / residual_samples as f64);
        info!(
            run_id = %self.config.run_id,
            games = self.config.games.count,
            rows = rows_written,
            "tournament complete"
        );

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            wins_by_seat,
            mean_abs_residual,
        })
    }

    fn play_game(&self, game_index: usize, seed: u64) -> Result<GameRow, RunnerError> {
        let seat_count = self.config.seats.len();
        let mut game = Game::with_seed(seat_count, seed)
            .map_err(|error| RunnerError::Engine {
                game_index,
                seed,
                message: format!("{error:?}"),
            })?
            .with_request_stats();

        let mut policies: Vec<Box<dyn Policy>> = self
            .config
            .seats
            .iter()
            .enumerate()
            .map(|(seat, config)| build_policy(config.policy, policy_seed(seed, seat)))
            .collect();

        let mut steps = 0usize;
        while !game.is_over() && steps < STEP_LIMIT {
            let snapshot = game.snapshot();
            if snapshot.legal_actions.is_empty() {
                break;
            }
            let seat = game.current_player();
            let action = policies[seat].choose_request(&PolicyContext::new(&snapshot));
            game.step(action).map_err(|error| RunnerError::Engine {
                game_index,
                seed,
                message: format!("{error:?}"),
            })?;
            steps += 1;
        }

        let completed = game.is_over();
        if !completed {
            warn!(game_index, seed, steps, "game stopped before the terminal state");
        }

        let stats = game.request_stats();
        Ok(GameRow {
            game_index,
            seed,
            seats: self.config.seats.iter().map(|seat| seat.name.clone()).collect(),
            steps,
            completed,
            books: (0..seat_count)
                .map(|seat| game.player(seat).books().len())
                .collect(),
            training_payoffs: game.payoffs(PayoffMode::Training),
            evaluation_payoffs: game.payoffs(PayoffMode::Evaluation),
            request_samples: stats.map_or(0, |stats| stats.samples()),
            mean_abs_residual: stats.and_then(|stats| stats.mean_abs_error()),
        })
    }
}

fn build_policy(kind: PolicyKind, seed: u64) -> Box<dyn Policy> {
    match kind {
        PolicyKind::PublicClaim => Box::new(PublicClaimPolicy::seeded(seed)),
        PolicyKind::BookBuilder => Box::new(BookBuilderPolicy::seeded(seed)),
        PolicyKind::Expectation => Box::new(ExpectationPolicy::seeded(seed)),
    }
}

fn policy_seed(game_seed: u64, seat: usize) -> u64 {
    game_seed.wrapping_add((seat as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

fn ensure_parent(parent: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(parent) = parent {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::policy_seed;

    #[test]
    fn policy_seeds_differ_per_seat() {
        let seeds: Vec<u64> = (0..4).map(|seat| policy_seed(42, seat)).collect();
        for (index, seed) in seeds.iter().enumerate() {
            for other in &seeds[index + 1..] {
                assert_ne!(seed, other);
            }
        }
    }
}
