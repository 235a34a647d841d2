//! Card system: months, card values, the catalogue, and the deck.
//!
//! ## Key Types
//!
//! - `Month`: Matching key, January through December
//! - `CardKind`: Scoring category (bright, animal, ribbon, junk, double junk)
//! - `Card` / `CardId`: Immutable card value, compared by identity
//! - `catalogue`: The fixed 48-card composition
//! - `Deck`: Shuffled draw pile with `draw` and `deal`

pub mod card;
pub mod catalogue;
pub mod deck;
pub mod month;

pub use card::{Card, CardId, CardKind, RibbonSet};
pub use catalogue::{CARDS_PER_MONTH, DECK_SIZE};
pub use deck::{Deal, Deck};
pub use month::Month;
