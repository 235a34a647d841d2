//! Zone manager for card locations and movement.
//!
//! Every card of a round is in exactly one of four zones:
//! - the deck (undealt, ordered),
//! - the table (face-up, shared),
//! - a player's hand,
//! - a player's captured pile.
//!
//! Operations only move cards between zones. `audit` checks the
//! conservation invariant and panics if it is broken: a card in two zones
//! or a total other than 48 is a defect, never a recoverable condition.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardKind, Deck, Month, DECK_SIZE};
use crate::core::{GameError, PlayerId, PlayerMap, PLAYER_COUNT};

/// Location of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Table,
    Hand(PlayerId),
    Captured(PlayerId),
}

/// Card counts per zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCounts {
    pub deck: usize,
    pub table: usize,
    pub hands: PlayerMap<usize>,
    pub captured: PlayerMap<usize>,
}

impl ZoneCounts {
    /// Sum over all zones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deck
            + self.table
            + self.hands.values().sum::<usize>()
            + self.captured.values().sum::<usize>()
    }
}

/// Owns the cards of one round.
///
/// ## Usage
///
/// ```
/// use gostop::cards::Deck;
/// use gostop::core::PlayerId;
/// use gostop::zones::{Zone, ZoneManager};
///
/// let mut zones = ZoneManager::new(Deck::canonical());
/// zones.deal(10, 8).unwrap();
///
/// let first = zones.hand(PlayerId::new(0))[0];
/// assert_eq!(zones.locate(first.id), Some(Zone::Hand(PlayerId::new(0))));
/// assert_eq!(zones.counts().deck, 20);
/// zones.audit();
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneManager {
    deck: Deck,
    table: Vec<Card>,
    hands: PlayerMap<Vec<Card>>,
    captured: PlayerMap<Vec<Card>>,
}

impl ZoneManager {
    /// All cards in the deck, nothing dealt.
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            table: Vec::new(),
            hands: PlayerMap::with_default(PLAYER_COUNT),
            captured: PlayerMap::with_default(PLAYER_COUNT),
        }
    }

    /// Build from an explicit partition. Callers must `audit` afterwards.
    #[must_use]
    pub fn from_parts(
        deck: Deck,
        table: Vec<Card>,
        hands: PlayerMap<Vec<Card>>,
        captured: PlayerMap<Vec<Card>>,
    ) -> Self {
        Self {
            deck,
            table,
            hands,
            captured,
        }
    }

    /// Deal hands and table from the deck (batched order, see `Deck::deal`).
    pub fn deal(&mut self, hand_size: usize, table_size: usize) -> Result<(), GameError> {
        let deal = self.deck.deal(PLAYER_COUNT, hand_size, table_size)?;
        for (player, hand) in PlayerId::all(PLAYER_COUNT).zip(deal.hands) {
            self.hands[player].extend(hand);
        }
        self.table.extend(deal.table);
        Ok(())
    }

    // === Views ===

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn table(&self) -> &[Card] {
        &self.table
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player]
    }

    #[must_use]
    pub fn captured(&self, player: PlayerId) -> &[Card] {
        &self.captured[player]
    }

    /// Table cards of a month, in table order.
    pub fn table_matches(&self, month: Month) -> impl Iterator<Item = &Card> + '_ {
        self.table.iter().filter(move |c| c.month == month)
    }

    // === Movement ===

    /// Remove a card from a hand. `None` if the player does not hold it.
    pub fn take_from_hand(&mut self, player: PlayerId, card: CardId) -> Option<Card> {
        let hand = &mut self.hands[player];
        let pos = hand.iter().position(|c| c.id == card)?;
        Some(hand.remove(pos))
    }

    /// Remove every card of a month from a hand, in hand order.
    pub fn take_month_from_hand(&mut self, player: PlayerId, month: Month) -> Vec<Card> {
        let hand = &mut self.hands[player];
        let (taken, kept) = hand.drain(..).partition(|c| c.month == month);
        *hand = kept;
        taken
    }

    /// Put a card face-up on the table without matching.
    pub fn place_on_table(&mut self, card: Card) {
        self.table.push(card);
    }

    /// Draw the top card of the deck.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.deck.draw()
    }

    /// Mutable access to the table and one captured pile at once, for the
    /// match engine.
    pub fn table_and_pile(&mut self, player: PlayerId) -> (&mut Vec<Card>, &mut Vec<Card>) {
        (&mut self.table, &mut self.captured[player])
    }

    /// Move one junk card from `from`'s pile to `to`'s pile.
    ///
    /// Single junk is taken before double junk. `None` if `from` has no junk.
    pub fn steal_junk(&mut self, from: PlayerId, to: PlayerId) -> Option<Card> {
        let pile = &self.captured[from];
        let pos = pile
            .iter()
            .position(|c| c.kind == CardKind::Junk)
            .or_else(|| pile.iter().position(|c| c.kind == CardKind::DoubleJunk))?;
        let card = self.captured[from].remove(pos);
        self.captured[to].push(card);
        Some(card)
    }

    // === Invariants ===

    /// Find which zone holds a card.
    #[must_use]
    pub fn locate(&self, card: CardId) -> Option<Zone> {
        if self.deck.iter().any(|c| c.id == card) {
            return Some(Zone::Deck);
        }
        if self.table.iter().any(|c| c.id == card) {
            return Some(Zone::Table);
        }
        for (player, hand) in self.hands.iter() {
            if hand.iter().any(|c| c.id == card) {
                return Some(Zone::Hand(player));
            }
        }
        for (player, pile) in self.captured.iter() {
            if pile.iter().any(|c| c.id == card) {
                return Some(Zone::Captured(player));
            }
        }
        None
    }

    /// Count cards per zone.
    #[must_use]
    pub fn counts(&self) -> ZoneCounts {
        ZoneCounts {
            deck: self.deck.len(),
            table: self.table.len(),
            hands: PlayerMap::new(PLAYER_COUNT, |p| self.hands[p].len()),
            captured: PlayerMap::new(PLAYER_COUNT, |p| self.captured[p].len()),
        }
    }

    /// Iterate every card in every zone.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck
            .iter()
            .chain(self.table.iter())
            .chain(self.hands.values().flatten())
            .chain(self.captured.values().flatten())
    }

    /// Assert the conservation invariant.
    ///
    /// Panics if any card appears twice or the total is not 48.
    pub fn audit(&self) {
        let mut seen: FxHashSet<CardId> = FxHashSet::default();
        for card in self.all_cards() {
            if !seen.insert(card.id) {
                panic!("Card {} appears in more than one zone", card.id);
            }
        }
        assert_eq!(
            seen.len(),
            DECK_SIZE,
            "Conservation violated: {} cards across zones",
            seen.len()
        );
    }
}
