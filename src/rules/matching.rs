//! Match engine: resolves one card entering the table.
//!
//! Called twice per turn, once for the played card and once for the card
//! drawn from the deck. Given the incoming card and the table:
//!
//! | Table cards of the month | Result                                       |
//! |--------------------------|----------------------------------------------|
//! | 0                        | card placed face-up on the table             |
//! | 1                        | pair captured (2 cards)                      |
//! | 2                        | `CaptureAll`: triple captured, bonus event   |
//! |                          | `PlayerChooses`: player picks one match      |
//! | 3                        | all four captured, highest bonus event       |
//!
//! Bombs and ttadak bring more than one card at once; `capture_together`
//! takes them with every table card of their month.
//!
//! Table cards are removed by identity, never by month/kind equality.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, CardId};
use crate::core::{DecisionViolation, MultiMatch};

/// Size of a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureKind {
    /// Incoming card plus one table card.
    Pair,
    /// Incoming card plus two table cards.
    Triple,
    /// Incoming card plus the other three cards of its month.
    Quad,
    /// Three cards played from hand onto the fourth on the table.
    Bomb,
}

impl CaptureKind {
    /// Everything but a pair is a bonus event.
    #[must_use]
    pub const fn is_bonus(self) -> bool {
        !matches!(self, CaptureKind::Pair)
    }
}

/// Outcome of resolving one incoming card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// No match: the card now lies on the table.
    Placed(Card),
    /// Cards moved to the acting player's pile, incoming card first.
    Captured {
        kind: CaptureKind,
        cards: SmallVec<[Card; 4]>,
    },
    /// Two candidates of different kinds; the player must pick one.
    ///
    /// The incoming card waits on the table until `complete_choice`.
    ChoiceRequired {
        incoming: Card,
        options: SmallVec<[Card; 2]>,
    },
}

impl Resolution {
    /// Cards captured by this resolution (empty if none).
    #[must_use]
    pub fn captured(&self) -> &[Card] {
        match self {
            Resolution::Captured { cards, .. } => cards,
            _ => &[],
        }
    }
}

/// Stateless resolver configured with a multi-match policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchEngine {
    policy: MultiMatch,
}

impl MatchEngine {
    #[must_use]
    pub const fn new(policy: MultiMatch) -> Self {
        Self { policy }
    }

    /// Resolve `incoming` against `table`, moving captures into `pile`.
    ///
    /// ```
    /// use gostop::cards::{catalogue, Month};
    /// use gostop::rules::{CaptureKind, MatchEngine, Resolution};
    ///
    /// let january = catalogue::month(Month::January);
    /// let (bright, ribbon) = (january[0], january[1]);
    /// let mut table = vec![ribbon];
    /// let mut pile = Vec::new();
    ///
    /// let result = MatchEngine::default().resolve(bright, &mut table, &mut pile);
    ///
    /// assert!(matches!(result, Resolution::Captured { kind: CaptureKind::Pair, .. }));
    /// assert!(table.is_empty());
    /// assert_eq!(pile, vec![bright, ribbon]);
    /// ```
    pub fn resolve(
        &self,
        incoming: Card,
        table: &mut Vec<Card>,
        pile: &mut Vec<Card>,
    ) -> Resolution {
        let matches: SmallVec<[Card; 3]> = table
            .iter()
            .filter(|c| c.month == incoming.month)
            .copied()
            .collect();

        let kind = match matches.len() {
            0 => {
                table.push(incoming);
                log::debug!("{} placed on table", incoming);
                return Resolution::Placed(incoming);
            }
            1 => CaptureKind::Pair,
            2 => match self.policy {
                MultiMatch::CaptureAll => CaptureKind::Triple,
                MultiMatch::PlayerChooses if matches[0].kind == matches[1].kind => {
                    return Self::take(&[incoming], &matches[..1], CaptureKind::Pair, table, pile);
                }
                MultiMatch::PlayerChooses => {
                    table.push(incoming);
                    log::debug!("{} waits for a capture choice", incoming);
                    return Resolution::ChoiceRequired {
                        incoming,
                        options: SmallVec::from_slice(&matches),
                    };
                }
            },
            _ => CaptureKind::Quad,
        };

        Self::take(&[incoming], &matches, kind, table, pile)
    }

    /// Capture several incoming cards with every table card of their months.
    ///
    /// Used when a move lands more than one card at once (a bomb, or a
    /// played card and a draw of the same month).
    pub fn capture_together(
        incoming: &[Card],
        kind: CaptureKind,
        table: &mut Vec<Card>,
        pile: &mut Vec<Card>,
    ) -> Resolution {
        let matched: SmallVec<[Card; 3]> = table
            .iter()
            .filter(|c| incoming.iter().any(|i| i.month == c.month))
            .copied()
            .collect();
        Self::take(incoming, &matched, kind, table, pile)
    }

    /// Finish a `ChoiceRequired` resolution with the player's pick.
    ///
    /// Leaves everything untouched if `chosen` is not one of `options`.
    pub fn complete_choice(
        &self,
        incoming: Card,
        options: &[Card],
        chosen: CardId,
        table: &mut Vec<Card>,
        pile: &mut Vec<Card>,
    ) -> Result<Resolution, DecisionViolation> {
        let picked = options
            .iter()
            .copied()
            .find(|c| c.id == chosen)
            .ok_or(DecisionViolation::NotAnOption { card: chosen })?;

        table.retain(|c| c.id != incoming.id);
        Ok(Self::take(&[incoming], &[picked], CaptureKind::Pair, table, pile))
    }

    fn take(
        incoming: &[Card],
        matched: &[Card],
        kind: CaptureKind,
        table: &mut Vec<Card>,
        pile: &mut Vec<Card>,
    ) -> Resolution {
        table.retain(|c| !matched.contains(c));

        let mut cards: SmallVec<[Card; 4]> = SmallVec::from_slice(incoming);
        cards.extend_from_slice(matched);
        pile.extend_from_slice(&cards);

        log::debug!("{} card(s) captured {} as {:?}", incoming.len(), matched.len(), kind);
        Resolution::Captured { kind, cards }
    }
}
