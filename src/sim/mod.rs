// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Simulation of the card game War, used to produce game length data.

mod game;
mod setup;
mod small;

pub use self::game::*;
pub use self::setup::*;
pub use self::small::*;

use histgraph::Summary;
use rand_xoshiro::Xoshiro256PlusPlus;
use thiserror::Error;
use thousands::Separable;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub type SimRng = Xoshiro256PlusPlus;

/// Splits off an independent generator for a single game.
pub fn fork(rng: &mut SimRng) -> SimRng {
    let child = rng.clone();
    rng.jump();
    child
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode game lengths for {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// How many games to play for a setup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Budget {
    /// keep adding batches of games until at least this much time has passed
    Duration(Duration),
    Games(usize),
}

pub struct Outcome {
    name: &'static str,
    elapsed: Duration,
    results: Vec<GameResult>,
    turns: Vec<u64>,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn games(&self) -> usize {
        self.turns.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn results(&self) -> &[GameResult] {
        &self.results
    }

    /// game lengths in the order the games were played
    pub fn turns(&self) -> &[u64] {
        &self.turns
    }

    /// player 1's average score
    pub fn mean_score(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.results.iter().map(|r| r.score()).sum::<f64>() / self.results.len() as f64
    }

    pub fn summary(&self) -> Option<Summary> {
        let turns: Vec<f64> = self.turns.iter().map(|t| *t as f64).collect();
        Summary::of(&turns)
    }

    /// Writes the game lengths as a JSON array.
    pub fn write_turns(&self, path: &Path) -> Result<(), SimError> {
        let file = File::create(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.turns).map_err(|source| SimError::Json {
            path: path.display().to_string(),
            source,
        })?;

        writer.flush().map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// game count with thousands separators and the time taken
    pub fn played(&self) -> String {
        format!(
            "{} games in {:?}",
            self.games().separate_with_commas(),
            self.elapsed
        )
    }

    pub fn print(&self) {
        info!("-----");
        info!("{}:", self.name);
        info!("  {}", self.played());
        info!("  mean score: Player 1 wins {:.1}%", 100.0 * self.mean_score());
        if let Some(summary) = self.summary() {
            info!(
                "  mean turns: {:.2} +/- {:.2} (min: {} max: {})",
                summary.mean, summary.stddev, summary.min, summary.max
            );
        }
    }
}

/// Plays games of `setup` until the budget is spent.
pub fn simulate(setup: &Setup, budget: Budget, rng: &mut SimRng) -> Outcome {
    let start = Instant::now();

    let mut results = Vec::new();
    let mut turns = Vec::new();

    let mut play_until = |n_games: usize, rng: &mut SimRng| {
        while turns.len() < n_games {
            let (player1, player2) = setup.deal(rng);
            let mut game = Game::new(setup.params(), fork(rng), player1, player2);
            let (result, turn) = game.play();

            results.push(result);
            turns.push(turn);
        }
    };

    match budget {
        Budget::Games(n_games) => play_until(n_games, rng),
        Budget::Duration(min) => {
            // grow by the current order of magnitude: 1000, 2000, ... 10000, 20000, ...
            let mut n_games = 900usize;
            loop {
                n_games += 10usize.pow(n_games.ilog10());
                play_until(n_games, rng);

                if start.elapsed() > min {
                    break;
                }
            }
        }
    }

    trace!("{}: simulation finished", setup.name());

    Outcome {
        name: setup.name(),
        elapsed: start.elapsed(),
        results,
        turns,
    }
}
