//! Match length policies.
//!
//! How long a match runs is the caller's decision. A `MatchPolicy` is
//! asked after every round through `Game::conclude_round`.

use super::controller::Game;
use crate::core::{PlayerId, PLAYER_COUNT};

/// Decides whether a match is over once a round has ended.
pub trait MatchPolicy {
    fn is_over(&self, game: &Game) -> bool;
}

impl<F> MatchPolicy for F
where
    F: Fn(&Game) -> bool,
{
    fn is_over(&self, game: &Game) -> bool {
        self(game)
    }
}

/// Play a fixed number of rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundLimit(pub u32);

impl MatchPolicy for RoundLimit {
    fn is_over(&self, game: &Game) -> bool {
        game.round() >= self.0
    }
}

/// Play until someone banks this many points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreTarget(pub u32);

impl MatchPolicy for ScoreTarget {
    fn is_over(&self, game: &Game) -> bool {
        PlayerId::all(PLAYER_COUNT).any(|p| game.player(p).total_score >= self.0)
    }
}
