//! # gostop
//!
//! A deterministic rule engine for Go-Stop, the two-player Hwatu
//! capture game.
//!
//! ## Design Principles
//!
//! 1. **Explicit state**: A `Game` is a plain value. There is no global
//!    instance, so any number of games can run in one process.
//!
//! 2. **Atomic commands**: Every state change is one `Command`. It either
//!    applies fully and returns a `Transition` (events plus a snapshot) or
//!    fails with a `GameError` and changes nothing.
//!
//! 3. **Conservation**: The 48 cards are always split across deck, table,
//!    hands, and captured piles. `ZoneManager::audit` runs after every
//!    command and panics if that ever breaks.
//!
//! 4. **Configuration over convention**: House-rule variants (deal sizes,
//!    threshold, multi-match handling, special moves, penalties) live in
//!    `RuleConfig`.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, rule configuration, errors
//! - `cards`: Months, card values, the catalogue, the deck
//! - `zones`: Card locations and the conservation audit
//! - `rules`: Match engine, scoring, Go/Stop settlement
//! - `game`: Turn controller, commands, events, snapshots, replays
//!
//! ## Example
//!
//! ```
//! use gostop::{Game, RuleConfig};
//!
//! let mut game = Game::new(RuleConfig::default(), 42).unwrap();
//! game.deal().unwrap();
//!
//! while game.phase().in_round() {
//!     let command = game.next_commands()[0];
//!     game.apply(command).unwrap();
//! }
//! assert!(game.last_outcome().is_some());
//! ```

pub mod cards;
pub mod core;
pub mod game;
pub mod rules;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, DecisionViolation, GameError, GameRng, MoveViolation, MultiMatch, PlayerId,
    PlayerMap, RuleConfig, ScoringRules, SettlementRules, SpecialRules, PLAYER_COUNT,
};

pub use crate::cards::{Card, CardId, CardKind, Deck, Month, RibbonSet, DECK_SIZE};

pub use crate::zones::{Zone, ZoneCounts, ZoneManager};

pub use crate::rules::{
    breakdown, score, CaptureKind, MatchEngine, Penalty, Resolution, ScoreBreakdown,
    ScoreCategory, Settlement,
};

pub use crate::game::{
    Command, EventRecord, Game, GameEvent, GameSnapshot, GoStopDecision, HandView, MatchPolicy,
    NagariReason, PendingDecision, Phase, PlayerState, PlayerView, Replay, ReplayError,
    RoundLayout, RoundLimit, RoundOutcome, ScoreTarget, Transition,
};
