//! The draw pile.
//!
//! A `Deck` is an ordered sequence of cards. The front is the top: `draw`
//! removes the first card.
//!
//! ## Deal order
//!
//! `deal` is batched, not interleaved: seat 0 takes the first `hand_size`
//! cards, seat 1 the next `hand_size`, then the table takes `table_size`.
//! The remainder stays in the deck in its original order. Replays depend
//! on this convention.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::catalogue;
use crate::core::{GameError, GameRng};

/// Hands and table produced by `Deck::deal`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deal {
    /// One hand per seat, in seat order.
    pub hands: Vec<Vec<Card>>,
    /// Face-up table cards.
    pub table: Vec<Card>,
}

/// Ordered pile of undealt cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// The 48 cards in catalogue order, unshuffled.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            cards: catalogue::all().iter().copied().collect(),
        }
    }

    /// A fresh 48-card deck in uniformly random order.
    #[must_use]
    pub fn generate(rng: &mut GameRng) -> Self {
        let mut cards: Vec<Card> = catalogue::all().to_vec();
        rng.shuffle(&mut cards);
        Self {
            cards: cards.into(),
        }
    }

    /// A deck holding exactly these cards, first card on top.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop_front().ok_or(GameError::DeckExhausted)
    }

    /// Deal hands and the table off the top.
    ///
    /// Fails without removing anything if the deck is too small.
    pub fn deal(
        &mut self,
        player_count: usize,
        hand_size: usize,
        table_size: usize,
    ) -> Result<Deal, GameError> {
        player_count
            .checked_mul(hand_size)
            .and_then(|hands| hands.checked_add(table_size))
            .filter(|&dealt| dealt <= self.cards.len())
            .ok_or(GameError::DeckExhausted)?;

        let hands = (0..player_count)
            .map(|_| self.cards.drain(..hand_size).collect())
            .collect();
        let table = self.cards.drain(..table_size).collect();

        Ok(Deal { hands, table })
    }

    /// The top card without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True if no cards remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
