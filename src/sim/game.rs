// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rand::seq::SliceRandom;

use std::cmp::Ordering;

use super::SimRng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Player {
    Player1,
    Player2,
}

/// The winner of a game. A game is drawn when both players run out of cards
/// in the same war.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GameResult {
    Player1,
    Player2,
    Draw,
}

impl GameResult {
    /// player 1's score: a win is worth 1, a draw half
    pub fn score(self) -> f64 {
        match self {
            GameResult::Player1 => 1.0,
            GameResult::Player2 => 0.0,
            GameResult::Draw => 0.5,
        }
    }
}

enum RoundResult {
    GameOver(GameResult),
    Won(Player),
}

/// Rule variant of a game.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Params {
    /// cards laid face-down by each player in a war
    pub war_cards: usize,
    /// cards a player holds back from the face-down pile so they can still flip
    pub honor: usize,
}

impl Params {
    pub fn new(war_cards: usize, honor: usize) -> Self {
        Self { war_cards, honor }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(3, 0)
    }
}

/// One player's cards. Cards are drawn until the draw pile is empty, then the
/// shuffled discard pile takes its place.
#[derive(Clone, Debug)]
pub struct PlayerDeck {
    draw: Vec<u8>,
    discard: Vec<u8>,
}

impl PlayerDeck {
    pub fn new(cards: Vec<u8>) -> Self {
        Self {
            draw: Vec::new(),
            discard: cards,
        }
    }

    pub fn cards(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    pub fn draw(&mut self, rng: &mut SimRng) -> Option<u8> {
        if self.draw.is_empty() {
            self.discard.shuffle(rng);
            std::mem::swap(&mut self.draw, &mut self.discard);
        }

        self.draw.pop()
    }

    fn win(&mut self, cards: &[u8]) {
        self.discard.extend_from_slice(cards);
    }

    /// Moves up to `params.war_cards` cards into the pot, keeping
    /// `params.honor` cards back.
    fn lay_face_down(&mut self, params: Params, rng: &mut SimRng, pot: &mut Vec<u8>) {
        let n = self.cards().saturating_sub(params.honor).min(params.war_cards);
        for _ in 0..n {
            if let Some(card) = self.draw(rng) {
                pot.push(card);
            }
        }
    }
}

pub struct Game {
    params: Params,
    rng: SimRng,
    player1: PlayerDeck,
    player2: PlayerDeck,

    /// cards at stake in the current round
    pot: Vec<u8>,
}

impl Game {
    pub fn new(params: Params, rng: SimRng, player1: PlayerDeck, player2: PlayerDeck) -> Self {
        Self {
            params,
            rng,
            player1,
            player2,
            pot: Vec::new(),
        }
    }

    fn play_round(&mut self) -> RoundResult {
        self.pot.clear();

        loop {
            let (card1, card2) = match (
                self.player1.draw(&mut self.rng),
                self.player2.draw(&mut self.rng),
            ) {
                (None, None) => return RoundResult::GameOver(GameResult::Draw),
                (None, Some(_)) => return RoundResult::GameOver(GameResult::Player2),
                (Some(_), None) => return RoundResult::GameOver(GameResult::Player1),
                (Some(card1), Some(card2)) => (card1, card2),
            };

            self.pot.push(card1);
            self.pot.push(card2);

            match card1.cmp(&card2) {
                Ordering::Greater => return RoundResult::Won(Player::Player1),
                Ordering::Less => return RoundResult::Won(Player::Player2),
                Ordering::Equal => {
                    self.player1
                        .lay_face_down(self.params, &mut self.rng, &mut self.pot);
                    self.player2
                        .lay_face_down(self.params, &mut self.rng, &mut self.pot);
                }
            }
        }
    }

    /// Plays to completion, returning the winner and the number of turns.
    /// The turn in which a player fails to flip a card is counted.
    pub fn play(&mut self) -> (GameResult, u64) {
        let mut turn = 0;
        loop {
            turn += 1;

            match self.play_round() {
                RoundResult::Won(Player::Player1) => self.player1.win(&self.pot),
                RoundResult::Won(Player::Player2) => self.player2.win(&self.pot),
                RoundResult::GameOver(result) => return (result, turn),
            }
        }
    }
}
