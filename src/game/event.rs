//! Discrete events emitted by completed commands.
//!
//! A presentation layer replays these in order; the engine never waits
//! on it. Every event is also kept in the game's history as an
//! `EventRecord`.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Month};
use crate::core::{PlayerId, PlayerMap};
use crate::rules::{CaptureKind, Settlement};

/// Why a round ended without a Stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NagariReason {
    /// A draw found the deck empty.
    DeckExhausted,
    /// The next player had no card to play.
    HandsExhausted,
    /// All four cards of a month were dealt to the table.
    FourOfAMonthOnTable,
}

/// How a round finished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// A player stopped and banked a settlement.
    Stopped(Settlement),
    /// Nobody scored. `stakes` is the multiplier carried to the next round.
    Nagari { reason: NagariReason, stakes: u32 },
    /// A dealt hand held all four cards of a month.
    Chongtong {
        player: PlayerId,
        month: Month,
        points: u32,
    },
}

impl RoundOutcome {
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            RoundOutcome::Stopped(settlement) => Some(settlement.winner),
            RoundOutcome::Chongtong { player, .. } => Some(*player),
            RoundOutcome::Nagari { .. } => None,
        }
    }
}

/// Something that happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundDealt {
        round: u32,
        leader: PlayerId,
        table: Vec<Card>,
    },
    CardPlayed {
        player: PlayerId,
        card: Card,
    },
    CardDrawn {
        player: PlayerId,
        card: Card,
    },
    /// Three cards of a month revealed from hand.
    Shaken {
        player: PlayerId,
        month: Month,
        cards: Vec<Card>,
    },
    /// A bomb's dummy card spent on a draw-only turn.
    DummyPlayed {
        player: PlayerId,
    },
    PlacedOnTable {
        player: PlayerId,
        card: Card,
    },
    /// Incoming card first. Triple and quad captures are bonus events.
    Captured {
        player: PlayerId,
        kind: CaptureKind,
        cards: Vec<Card>,
    },
    CaptureChoiceRequired {
        player: PlayerId,
        incoming: Card,
        options: Vec<Card>,
    },
    TableCleared {
        player: PlayerId,
    },
    /// The draw captured the card just played onto the table.
    Jjok {
        player: PlayerId,
    },
    /// The played card and a same-month draw took a table pair.
    Ttadak {
        player: PlayerId,
    },
    /// The played card, its table match, and the draw stay stacked.
    Seolsa {
        player: PlayerId,
        month: Month,
    },
    /// A stack was captured. `own` is set when its creator took it back.
    SeolsaEaten {
        player: PlayerId,
        month: Month,
        own: bool,
    },
    Chongtong {
        player: PlayerId,
        month: Month,
    },
    /// One junk moved between piles, as a steal or a paid penalty.
    JunkStolen {
        from: PlayerId,
        to: PlayerId,
        card: Card,
    },
    DeckExhausted,
    ScoreChanged {
        player: PlayerId,
        score: u32,
    },
    GoStopRequired {
        player: PlayerId,
        score: u32,
    },
    WentGo {
        player: PlayerId,
        go_count: u32,
        score: u32,
    },
    Stopped {
        player: PlayerId,
        score: u32,
    },
    RoundEnded {
        round: u32,
        outcome: RoundOutcome,
    },
    GameEnded {
        totals: PlayerMap<u32>,
    },
}

impl GameEvent {
    /// True for every capture larger than a pair.
    #[must_use]
    pub fn is_bonus_capture(&self) -> bool {
        matches!(self, GameEvent::Captured { kind, .. } if kind.is_bonus())
    }
}

/// An event with its position in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub round: u32,
    /// Play count within the round (0 before the first play).
    pub turn: u32,
    /// Position in the whole game's history.
    pub seq: u32,
    pub event: GameEvent,
}
