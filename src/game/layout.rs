//! Scripted round layouts.
//!
//! A `RoundLayout` places every card explicitly instead of shuffling.
//! Scenario tests and bug reports use it to start a round from a known
//! position.
//!
//! ```
//! use gostop::cards::{catalogue, Month};
//! use gostop::core::PlayerId;
//! use gostop::game::RoundLayout;
//!
//! let jan = catalogue::month(Month::January);
//! let zones = RoundLayout::new()
//!     .hand(PlayerId::new(0), [jan[0]])
//!     .table([jan[1]])
//!     .rest_in_deck()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(zones.counts().deck, 46);
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{catalogue, Card, CardId, Deck};
use crate::core::{ConfigError, PlayerId, PlayerMap, PLAYER_COUNT};
use crate::zones::ZoneManager;

/// Explicit placement of the 48 cards for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLayout {
    pub leader: PlayerId,
    pub hands: PlayerMap<Vec<CardId>>,
    pub captured: PlayerMap<Vec<CardId>>,
    pub table: Vec<CardId>,
    /// Top of the deck first.
    pub deck: Vec<CardId>,
    /// Put unlisted cards at the bottom of the deck in catalogue order.
    pub rest_in_deck: bool,
    /// Seed for the rounds dealt after this one.
    pub seed: u64,
}

impl Default for RoundLayout {
    fn default() -> Self {
        Self {
            leader: PlayerId::new(0),
            hands: PlayerMap::with_default(PLAYER_COUNT),
            captured: PlayerMap::with_default(PLAYER_COUNT),
            table: Vec::new(),
            deck: Vec::new(),
            rest_in_deck: false,
            seed: 0,
        }
    }
}

fn ids<I>(cards: I) -> Vec<CardId>
where
    I: IntoIterator,
    I::Item: Into<CardId>,
{
    cards.into_iter().map(Into::into).collect()
}

impl RoundLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn leader(mut self, player: PlayerId) -> Self {
        self.leader = player;
        self
    }

    #[must_use]
    pub fn hand<I>(mut self, player: PlayerId, cards: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CardId>,
    {
        self.hands[player] = ids(cards);
        self
    }

    #[must_use]
    pub fn captured<I>(mut self, player: PlayerId, cards: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CardId>,
    {
        self.captured[player] = ids(cards);
        self
    }

    #[must_use]
    pub fn table<I>(mut self, cards: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CardId>,
    {
        self.table = ids(cards);
        self
    }

    #[must_use]
    pub fn deck<I>(mut self, cards: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CardId>,
    {
        self.deck = ids(cards);
        self
    }

    #[must_use]
    pub fn rest_in_deck(mut self) -> Self {
        self.rest_in_deck = true;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the layout is a partition of the deck and build the zones.
    pub fn build(&self) -> Result<ZoneManager, ConfigError> {
        let mut seen: FxHashSet<CardId> = FxHashSet::default();

        let mut hand_cards: PlayerMap<Vec<Card>> = PlayerMap::with_default(PLAYER_COUNT);
        let mut captured_cards: PlayerMap<Vec<Card>> = PlayerMap::with_default(PLAYER_COUNT);
        for player in PlayerId::all(PLAYER_COUNT) {
            hand_cards[player] = resolve(&self.hands[player], &mut seen)?;
            captured_cards[player] = resolve(&self.captured[player], &mut seen)?;
        }
        let table = resolve(&self.table, &mut seen)?;
        let mut deck = resolve(&self.deck, &mut seen)?;

        let missing: Vec<Card> = catalogue::all()
            .iter()
            .copied()
            .filter(|c| !seen.contains(&c.id))
            .collect();
        if !missing.is_empty() {
            if !self.rest_in_deck {
                return Err(ConfigError::Invalid(format!(
                    "layout leaves {} cards unplaced",
                    missing.len()
                )));
            }
            deck.extend(missing);
        }

        let zones =
            ZoneManager::from_parts(Deck::from_cards(deck), table, hand_cards, captured_cards);
        zones.audit();
        Ok(zones)
    }
}

fn resolve(ids: &[CardId], seen: &mut FxHashSet<CardId>) -> Result<Vec<Card>, ConfigError> {
    ids.iter()
        .map(|&id| {
            let card = catalogue::lookup(id)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown card {}", id)))?;
            if !seen.insert(id) {
                return Err(ConfigError::Invalid(format!("{} is placed twice", id)));
            }
            Ok(card)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Month, DECK_SIZE};

    #[test]
    fn test_full_partition_required() {
        let err = RoundLayout::new().table([CardId::new(0)]).build().unwrap_err();
        assert!(err.to_string().contains("47 cards unplaced"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = RoundLayout::new()
            .hand(PlayerId::new(0), [CardId::new(5)])
            .table([CardId::new(5)])
            .rest_in_deck()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Card(5) is placed twice"));
    }

    #[test]
    fn test_unknown_card_rejected() {
        let err = RoundLayout::new()
            .table([CardId::new(48)])
            .rest_in_deck()
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rest_goes_under_listed_deck() {
        let dec = catalogue::month(Month::December);
        let zones = RoundLayout::new()
            .deck([dec[3], dec[0]])
            .rest_in_deck()
            .build()
            .unwrap();

        let order: Vec<Card> = zones.deck().iter().copied().take(3).collect();
        assert_eq!(order, vec![dec[3], dec[0], catalogue::all()[0]]);
        assert_eq!(zones.counts().total(), DECK_SIZE);
    }
}
