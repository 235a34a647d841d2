//! Core engine types: players, RNG, rule configuration, errors.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{MultiMatch, RuleConfig, ScoringRules, SettlementRules, SpecialRules};
pub use error::{ConfigError, DecisionViolation, GameError, MoveViolation};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
