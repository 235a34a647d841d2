//! Snapshots: the state a viewer is allowed to see.
//!
//! The viewer's own hand is shown in full. The opponent's hand is reduced
//! to a card count. Everything else (table, captured piles, scores) is
//! public.

use serde::{Deserialize, Serialize};

use super::event::RoundOutcome;
use super::phase::Phase;
use crate::cards::Card;
use crate::core::PlayerId;

/// A hand as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandView {
    Visible(Vec<Card>),
    Hidden { count: usize },
}

impl HandView {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            HandView::Visible(cards) => cards.len(),
            HandView::Hidden { count } => *count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An open decision gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingDecision {
    GoStop {
        player: PlayerId,
        score: u32,
    },
    CaptureChoice {
        player: PlayerId,
        incoming: Card,
        options: Vec<Card>,
    },
}

impl PendingDecision {
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            PendingDecision::GoStop { player, .. }
            | PendingDecision::CaptureChoice { player, .. } => *player,
        }
    }
}

/// One player's public state plus their hand as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub hand: HandView,
    pub captured: Vec<Card>,
    pub round_score: u32,
    pub total_score: u32,
    pub go_count: u32,
    /// Shakes and bombs this round.
    pub shakes: u32,
    /// Dummy plays left from bombs.
    pub dummies: u32,
    /// A decision is waiting on this player.
    pub decision_pending: bool,
}

/// Complete state visible to one viewer after a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub viewer: PlayerId,
    pub phase: Phase,
    pub current_player: PlayerId,
    pub round: u32,
    pub turn: u32,
    pub table: Vec<Card>,
    pub deck_count: usize,
    pub players: Vec<PlayerView>,
    pub pending: Option<PendingDecision>,
    /// Settlement multiplier carried from rounds without a Stop.
    pub stakes: u32,
    pub last_outcome: Option<RoundOutcome>,
}

impl GameSnapshot {
    /// View of one player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Cards visible or counted across all zones.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck_count
            + self.table.len()
            + self
                .players
                .iter()
                .map(|p| p.hand.len() + p.captured.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_view_len() {
        assert_eq!(HandView::Hidden { count: 4 }.len(), 4);
        assert!(HandView::Visible(Vec::new()).is_empty());
    }

    #[test]
    fn test_pending_player() {
        let p1 = PlayerId::new(1);
        assert_eq!(PendingDecision::GoStop { player: p1, score: 7 }.player(), p1);
    }
}
