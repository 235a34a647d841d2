//! The canonical 48-card Hwatu catalogue.
//!
//! Four cards per month. Card ids follow catalogue order, so
//! `CardId(m * 4 + i)` is the i-th card of month `m + 1`.
//!
//! | Month | Cards                                  |
//! |-------|----------------------------------------|
//! | Jan   | bright, ribbon (red poem), junk, junk  |
//! | Feb   | animal (bird), ribbon (red poem), junk, junk |
//! | Mar   | bright, ribbon (red poem), junk, junk  |
//! | Apr   | animal (bird), ribbon (plant), junk, junk |
//! | May   | animal, ribbon (plant), junk, junk     |
//! | Jun   | animal, ribbon (blue), junk, junk      |
//! | Jul   | animal, ribbon (plant), junk, junk     |
//! | Aug   | bright, animal (bird), junk, junk      |
//! | Sep   | animal (cup), ribbon (blue), junk, junk |
//! | Oct   | animal, ribbon (blue), junk, junk      |
//! | Nov   | bright, double junk, junk, junk        |
//! | Dec   | bright (rain), animal, ribbon, double junk |

use super::card::{Card, CardId, CardKind};
use super::month::Month;

/// Cards in a full deck.
pub const DECK_SIZE: usize = 48;

/// Cards per month.
pub const CARDS_PER_MONTH: usize = 4;

use super::card::CardKind::{Animal as A, Bright as B, DoubleJunk as D, Junk as J, Ribbon as R};

const LAYOUT: [[CardKind; CARDS_PER_MONTH]; 12] = [
    [B, R, J, J],
    [A, R, J, J],
    [B, R, J, J],
    [A, R, J, J],
    [A, R, J, J],
    [A, R, J, J],
    [A, R, J, J],
    [B, A, J, J],
    [A, R, J, J],
    [A, R, J, J],
    [B, D, J, J],
    [B, A, R, D],
];

const fn build() -> [Card; DECK_SIZE] {
    let mut cards = [Card {
        id: CardId::new(0),
        month: Month::January,
        kind: CardKind::Junk,
        image: 0,
    }; DECK_SIZE];

    let mut m = 0;
    while m < 12 {
        let mut i = 0;
        while i < CARDS_PER_MONTH {
            let idx = m * CARDS_PER_MONTH + i;
            cards[idx] = Card {
                id: CardId::new(idx as u8),
                month: Month::ALL[m],
                kind: LAYOUT[m][i],
                image: i as u8,
            };
            i += 1;
        }
        m += 1;
    }
    cards
}

static CATALOGUE: [Card; DECK_SIZE] = build();

/// All 48 cards in catalogue order.
#[must_use]
pub fn all() -> &'static [Card; DECK_SIZE] {
    &CATALOGUE
}

/// Look up a card by id. `None` for ids outside the deck.
///
/// ```
/// use gostop::cards::{catalogue, CardId, CardKind, Month};
///
/// let card = catalogue::lookup(CardId::new(0)).unwrap();
/// assert_eq!(card.month, Month::January);
/// assert_eq!(card.kind, CardKind::Bright);
/// assert!(catalogue::lookup(CardId::new(48)).is_none());
/// ```
#[must_use]
pub fn lookup(id: CardId) -> Option<Card> {
    CATALOGUE.get(id.raw() as usize).copied()
}

/// The four cards of a month.
#[must_use]
pub fn month(month: Month) -> &'static [Card] {
    let start = (month.ordinal() as usize - 1) * CARDS_PER_MONTH;
    &CATALOGUE[start..start + CARDS_PER_MONTH]
}

/// Cards of a given month and kind, in catalogue order.
pub fn find(month_of: Month, kind: CardKind) -> impl Iterator<Item = Card> {
    month(month_of).iter().copied().filter(move |c| c.kind == kind)
}
