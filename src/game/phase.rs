//! Turn controller phases.
//!
//! Only the phases a caller can observe are in `Phase`. The steps inside
//! one play (resolving the played card, drawing, resolving the draw, the
//! score check) run to completion inside a single command and are only
//! visible in trace logs as `Step`.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Observable state of the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Constructed, nothing dealt.
    Ready,
    /// Waiting for this player to play a hand card.
    AwaitingPlay(PlayerId),
    /// Waiting for this player to pick one of two capture candidates.
    AwaitingCaptureChoice(PlayerId),
    /// Waiting for this player to declare Go or Stop.
    AwaitingGoStop(PlayerId),
    /// Round finished; deal again or end the game.
    RoundOver,
    /// Terminal.
    GameOver,
}

impl Phase {
    /// Player who must act next, if any.
    #[must_use]
    pub const fn actor(self) -> Option<PlayerId> {
        match self {
            Phase::AwaitingPlay(p) | Phase::AwaitingCaptureChoice(p) | Phase::AwaitingGoStop(p) => {
                Some(p)
            }
            _ => None,
        }
    }

    /// A decision gate (capture choice or Go/Stop) is open.
    #[must_use]
    pub const fn is_decision(self) -> bool {
        matches!(self, Phase::AwaitingCaptureChoice(_) | Phase::AwaitingGoStop(_))
    }

    /// A round is being played.
    #[must_use]
    pub const fn in_round(self) -> bool {
        self.actor().is_some()
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Ready => f.write_str("ready"),
            Phase::AwaitingPlay(p) => write!(f, "awaiting a play from {}", p),
            Phase::AwaitingCaptureChoice(p) => write!(f, "awaiting a capture choice from {}", p),
            Phase::AwaitingGoStop(p) => write!(f, "awaiting go/stop from {}", p),
            Phase::RoundOver => f.write_str("round over"),
            Phase::GameOver => f.write_str("game over"),
        }
    }
}

/// Internal step of a play, for tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    ResolvingCapture,
    AwaitingDraw,
    ResolvingDraw,
    ScoreCheck,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::ResolvingCapture => "resolving capture",
            Step::AwaitingDraw => "awaiting draw",
            Step::ResolvingDraw => "resolving draw",
            Step::ScoreCheck => "score check",
        };
        f.write_str(name)
    }
}
