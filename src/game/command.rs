//! Commands: the only way to change a `Game`.
//!
//! Each command is one external call. A command either applies fully or
//! fails with a `GameError` and changes nothing.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Month};
use crate::core::PlayerId;

/// Answer at the Go/Stop gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoStopDecision {
    /// Keep playing for a bigger settlement.
    Go,
    /// End the round and bank the score.
    Stop,
}

impl std::fmt::Display for GoStopDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoStopDecision::Go => f.write_str("go"),
            GoStopDecision::Stop => f.write_str("stop"),
        }
    }
}

/// A request to the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Shuffle and deal a round.
    Deal,
    /// Play a hand card.
    Play { player: PlayerId, card: CardId },
    /// Reveal three cards of a month before playing.
    Shake { player: PlayerId, month: Month },
    /// Spend a dummy card from a bomb: draw without playing.
    PlayDummy { player: PlayerId },
    /// Answer the Go/Stop gate.
    DeclareGoStop {
        player: PlayerId,
        decision: GoStopDecision,
    },
    /// Pick one of two capture candidates.
    ChooseCapture { player: PlayerId, card: CardId },
    /// Finish the game after a round.
    EndGame,
}

impl Command {
    /// Player issuing the command, for player-bound commands.
    #[must_use]
    pub const fn player(&self) -> Option<PlayerId> {
        match *self {
            Command::Play { player, .. }
            | Command::Shake { player, .. }
            | Command::PlayDummy { player }
            | Command::DeclareGoStop { player, .. }
            | Command::ChooseCapture { player, .. } => Some(player),
            Command::Deal | Command::EndGame => None,
        }
    }

    /// Short verb used in phase errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Command::Deal => "deal",
            Command::Play { .. } => "play",
            Command::Shake { .. } => "shake",
            Command::PlayDummy { .. } => "play dummy",
            Command::DeclareGoStop { .. } => "declare go/stop",
            Command::ChooseCapture { .. } => "choose capture",
            Command::EndGame => "end game",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Play { player, card } => write!(f, "{} plays {}", player, card),
            Command::Shake { player, month } => write!(f, "{} shakes {}", player, month),
            Command::PlayDummy { player } => write!(f, "{} plays a dummy", player),
            Command::DeclareGoStop { player, decision } => {
                write!(f, "{} declares {}", player, decision)
            }
            Command::ChooseCapture { player, card } => write!(f, "{} chooses {}", player, card),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_bound_commands() {
        let p1 = PlayerId::new(1);
        let play = Command::Play { player: p1, card: CardId::new(4) };

        assert_eq!(play.player(), Some(p1));
        assert_eq!(Command::Deal.player(), None);
        assert_eq!(play.to_string(), "Player 1 plays Card(4)");
        assert_eq!(Command::EndGame.to_string(), "end game");

        let shake = Command::Shake { player: p1, month: Month::March };
        assert_eq!(shake.player(), Some(p1));
        assert_eq!(shake.name(), "shake");
        assert_eq!(Command::PlayDummy { player: p1 }.to_string(), "Player 1 plays a dummy");
    }
}
