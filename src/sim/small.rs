// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tabled::builder::Builder;
use tabled::settings::Style;

use std::ops::{Range, RangeInclusive};

use super::{fork, Game, Params, PlayerDeck, SimRng};

pub const SMALL_DECK_SIZES: RangeInclusive<u8> = 1..=13;
pub const SMALL_WAR_CARDS: Range<usize> = 0..10;

/// Average turns over `n_games` games where both players hold the same `n`
/// unique cards and `k` cards are laid face-down in a war.
pub fn small_game_turns(n_games: usize, n: u8, k: usize, rng: &mut SimRng) -> f64 {
    if n_games == 0 {
        return 0.0;
    }

    let deck = PlayerDeck::new((0..n).collect());

    let total: u64 = (0..n_games)
        .map(|_| {
            let mut game = Game::new(Params::new(k, 0), fork(rng), deck.clone(), deck.clone());
            let (_, turns) = game.play();
            turns
        })
        .sum();

    total as f64 / n_games as f64
}

/// Table of average game length per deck size (rows) and war cards
/// (columns).
pub fn small_games_table(n_games: usize, rng: &mut SimRng) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["n/k".to_string()];
    header.extend(SMALL_WAR_CARDS.map(|k| k.to_string()));
    builder.push_record(header);

    for n in SMALL_DECK_SIZES {
        let mut row = vec![n.to_string()];
        for k in SMALL_WAR_CARDS {
            row.push(format!("{:.1}", small_game_turns(n_games, n, k, rng)));
        }
        debug!("small games: n = {} done", n);
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn single_card_games_are_draws_in_one_turn() {
        // both flip the same card, lay nothing down, and run out together
        let mut rng = SimRng::seed_from_u64(3);
        assert_eq!(small_game_turns(10, 1, 0, &mut rng), 1.0);
        assert_eq!(small_game_turns(10, 1, 5, &mut rng), 1.0);
    }

    #[test]
    fn zero_games() {
        let mut rng = SimRng::seed_from_u64(3);
        assert_eq!(small_game_turns(0, 5, 1, &mut rng), 0.0);
    }

    #[test]
    fn table_shape() {
        let mut rng = SimRng::seed_from_u64(3);
        let table = small_games_table(2, &mut rng);

        assert!(table.contains("n/k"));
        // header, rows and borders: one line per row at the very least
        assert!(table.lines().count() > SMALL_DECK_SIZES.count());
    }
}
