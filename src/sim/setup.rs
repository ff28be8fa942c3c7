// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rand::seq::SliceRandom;

use super::{Params, PlayerDeck, SimRng};

pub const STANDARD_WAR_FILE: &str = "standard_war.json";
pub const HONORABLE_WAR_FILE: &str = "honorable_war.json";

/// A deck with `n` ranks (1 is lowest), `k` copies of each.
pub fn standard_deck(n: u8, k: usize) -> Vec<u8> {
    (1..=n).flat_map(|rank| vec![rank; k]).collect()
}

/// Deals a shuffled 52 card deck, half to each player.
pub fn shuffled_split(rng: &mut SimRng) -> (PlayerDeck, PlayerDeck) {
    let mut deck = standard_deck(13, 4);
    deck.shuffle(rng);

    let half = deck.len() / 2;
    (
        PlayerDeck::new(deck[..half].to_vec()),
        PlayerDeck::new(deck[half..].to_vec()),
    )
}

/// Both players get `decks / 2` full decks, so the hands hold the same cards.
fn even_split(decks: usize) -> (PlayerDeck, PlayerDeck) {
    let player = PlayerDeck::new(standard_deck(13, 2 * decks));
    (player.clone(), player)
}

/// A named starting position and rule variant to simulate.
pub struct Setup {
    name: &'static str,
    params: Params,
    output: Option<&'static str>,
    deal: fn(&mut SimRng) -> (PlayerDeck, PlayerDeck),
}

impl Setup {
    pub fn new(
        name: &'static str,
        params: Params,
        deal: fn(&mut SimRng) -> (PlayerDeck, PlayerDeck),
    ) -> Self {
        Self {
            name,
            params,
            output: None,
            deal,
        }
    }

    /// Record the game lengths of this setup to `file`.
    pub fn output(mut self, file: &'static str) -> Self {
        self.output = Some(file);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> Params {
        self.params
    }

    pub fn output_file(&self) -> Option<&'static str> {
        self.output
    }

    pub fn deal(&self, rng: &mut SimRng) -> (PlayerDeck, PlayerDeck) {
        (self.deal)(rng)
    }
}

/// Every setup `war-sim` runs, in order. The shuffled standard and honorable
/// games write out their game lengths.
pub fn catalogue() -> Vec<Setup> {
    let standard = Params::default();
    let honorable = Params::new(3, 1);
    let doubly_honorable = Params::new(3, 2);

    vec![
        Setup::new("Standard war (shuffled)", standard, shuffled_split).output(STANDARD_WAR_FILE),
        Setup::new("Standard war (evenly split)", standard, |_| even_split(1)),
        Setup::new("2-deck war (evenly split)", standard, |_| even_split(2)),
        Setup::new("12-deck war (evenly split)", standard, |_| even_split(12)),
        Setup::new("Aces vs. the world", standard, |_| {
            (
                PlayerDeck::new(vec![13; 4]),
                PlayerDeck::new(standard_deck(12, 4)),
            )
        }),
        Setup::new("Honorable war (shuffled)", honorable, shuffled_split)
            .output(HONORABLE_WAR_FILE),
        Setup::new("2-deck Honorable war (evenly split)", honorable, |_| {
            even_split(2)
        }),
        Setup::new("12-deck Honorable war (evenly split)", honorable, |_| {
            even_split(12)
        }),
        Setup::new(
            "12-deck Doubly-honorable war (evenly split)",
            doubly_honorable,
            |_| even_split(12),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn deck_composition() {
        let deck = standard_deck(13, 4);
        assert_eq!(deck.len(), 52);
        assert_eq!(deck.iter().filter(|card| **card == 13).count(), 4);
        assert_eq!(standard_deck(3, 2), vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn shuffled_split_deals_whole_deck() {
        let mut rng = SimRng::seed_from_u64(1);
        let (player1, player2) = shuffled_split(&mut rng);
        assert_eq!(player1.cards(), 26);
        assert_eq!(player2.cards(), 26);
    }

    #[test]
    fn even_split_sizes() {
        let (player1, player2) = even_split(1);
        assert_eq!(player1.cards(), 26);
        assert_eq!(player2.cards(), 26);

        let (player1, _) = even_split(12);
        assert_eq!(player1.cards(), 13 * 24);
    }

    #[test]
    fn catalogue_outputs() {
        let setups = catalogue();
        let outputs: Vec<_> = setups.iter().filter_map(|s| s.output_file()).collect();
        assert_eq!(outputs, vec![STANDARD_WAR_FILE, HONORABLE_WAR_FILE]);

        let honorable = setups
            .iter()
            .find(|s| s.output_file() == Some(HONORABLE_WAR_FILE))
            .unwrap();
        assert_eq!(honorable.params(), Params::new(3, 1));
    }
}
