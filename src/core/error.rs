//! Error taxonomy.
//!
//! - `GameError`: recoverable command failures. State is unchanged when a
//!   command returns one of these.
//! - `ConfigError`: rejected rule configuration or scripted layout.
//!
//! Invariant violations (a card in two zones, a conservation mismatch) are
//! not errors: they panic in `ZoneManager::audit`.

use thiserror::Error;

use super::player::PlayerId;
use crate::cards::{CardId, Month};
use crate::game::Phase;

/// Why a play was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveViolation {
    #[error("{player} acted but it is {current}'s turn")]
    NotYourTurn { player: PlayerId, current: PlayerId },

    #[error("{card} is not in {player}'s hand")]
    CardNotInHand { player: PlayerId, card: CardId },

    #[error("{player} cannot shake {month}")]
    CannotShake { player: PlayerId, month: Month },

    #[error("{player} has no dummy card to play")]
    NoDummies { player: PlayerId },
}

/// Why a decision (Go/Stop or capture choice) was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DecisionViolation {
    #[error("{player} answered a decision pending for {expected}")]
    NotDecider { player: PlayerId, expected: PlayerId },

    #[error("{card} is not one of the offered capture candidates")]
    NotAnOption { card: CardId },
}

/// A command that could not be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveViolation),

    #[error("{action} is not allowed while {phase}")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error("invalid decision: {0}")]
    InvalidDecision(#[from] DecisionViolation),

    #[error("the deck is exhausted")]
    DeckExhausted,
}

/// Rejected configuration or layout.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse rule configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rule configuration: {0}")]
    Invalid(String),
}
