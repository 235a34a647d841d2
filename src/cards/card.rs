//! Card values.
//!
//! A `Card` is immutable. Several cards share the same month and kind
//! (every month has at least two junk cards), so cards compare by
//! `CardId` alone: two cards are equal only if they are the same physical card.

use serde::{Deserialize, Serialize};

use super::month::Month;

/// Opaque identity of one physical card in the 48-card deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u8);

impl CardId {
    /// Create a card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Scoring category of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Bright,
    Animal,
    Ribbon,
    Junk,
    DoubleJunk,
}

impl CardKind {
    /// Junk units this kind contributes to the junk count.
    #[must_use]
    pub const fn junk_units(self) -> u32 {
        match self {
            CardKind::Junk => 1,
            CardKind::DoubleJunk => 2,
            _ => 0,
        }
    }

    /// True for junk and double junk.
    #[must_use]
    pub const fn is_junk(self) -> bool {
        matches!(self, CardKind::Junk | CardKind::DoubleJunk)
    }
}

/// The three named ribbon sets, each worth a bonus when complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RibbonSet {
    /// Red ribbons with poetry: January, February, March.
    RedPoem,
    /// Blue ribbons: June, September, October.
    Blue,
    /// Plain red ribbons: April, May, July.
    Plant,
}

impl RibbonSet {
    pub const ALL: [RibbonSet; 3] = [RibbonSet::RedPoem, RibbonSet::Blue, RibbonSet::Plant];

    /// Months whose ribbon belongs to this set.
    #[must_use]
    pub const fn months(self) -> [Month; 3] {
        match self {
            RibbonSet::RedPoem => [Month::January, Month::February, Month::March],
            RibbonSet::Blue => [Month::June, Month::September, Month::October],
            RibbonSet::Plant => [Month::April, Month::May, Month::July],
        }
    }
}

/// One physical card.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    /// Identity, unique within a deck.
    pub id: CardId,
    /// Matching key.
    pub month: Month,
    /// Scoring category.
    pub kind: CardKind,
    /// Artwork index within the month (0..4). Presentation only.
    pub image: u8,
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Card {
    /// Bird animals of February, April, and August (the Godori set).
    #[must_use]
    pub fn is_bird(&self) -> bool {
        self.kind == CardKind::Animal
            && matches!(self.month, Month::February | Month::April | Month::August)
    }

    /// The December rain bright, which weakens a three-bright set.
    #[must_use]
    pub fn is_rain_bright(&self) -> bool {
        self.kind == CardKind::Bright && self.month == Month::December
    }

    /// The September sake cup animal.
    #[must_use]
    pub fn is_cup(&self) -> bool {
        self.kind == CardKind::Animal && self.month == Month::September
    }

    /// Ribbon set membership, if this is a ribbon in one of the sets.
    #[must_use]
    pub fn ribbon_set(&self) -> Option<RibbonSet> {
        if self.kind != CardKind::Ribbon {
            return None;
        }
        RibbonSet::ALL
            .into_iter()
            .find(|set| set.months().contains(&self.month))
    }
}

impl From<Card> for CardId {
    fn from(card: Card) -> Self {
        card.id
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?} #{}", self.month, self.kind, self.id.0)
    }
}
