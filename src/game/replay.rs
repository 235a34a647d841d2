//! Replay logs.
//!
//! A game is fully determined by its rule configuration, its seed (or
//! scripted layout), and the commands applied to it. `Replay` stores
//! exactly that and encodes it with bincode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::command::Command;
use super::controller::Game;
use super::layout::RoundLayout;
use crate::core::{ConfigError, GameError, RuleConfig};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to encode replay: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode replay: {0}")]
    Decode(#[source] bincode::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("command {index} ({command}) was rejected: {source}")]
    Command {
        index: usize,
        command: Command,
        #[source]
        source: GameError,
    },
}

/// Everything needed to rebuild a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    pub config: RuleConfig,
    pub seed: u64,
    /// Scripted first round, if the game did not start from `Ready`.
    pub layout: Option<RoundLayout>,
    pub commands: Vec<Command>,
}

impl Replay {
    /// An empty log for a shuffled game.
    #[must_use]
    pub fn new(config: RuleConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            layout: None,
            commands: Vec::new(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        bincode::serialize(self).map_err(ReplayError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        bincode::deserialize(bytes).map_err(ReplayError::Decode)
    }

    /// Rebuild the game by applying every command in order.
    pub fn run(&self) -> Result<Game, ReplayError> {
        let mut game = match &self.layout {
            Some(layout) => Game::from_layout(self.config.clone(), layout.clone())?,
            None => Game::new(self.config.clone(), self.seed)?,
        };
        for (index, &command) in self.commands.iter().enumerate() {
            game.apply(command)
                .map_err(|source| ReplayError::Command { index, command, source })?;
        }
        log::debug!("replayed {} commands", self.commands.len());
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::cards::CardId;

    #[test]
    fn test_bytes_roundtrip() {
        let mut replay = Replay::new(RuleConfig::default().with_win_threshold(3), 99);
        replay.commands.push(Command::Deal);

        let bytes = replay.to_bytes().unwrap();
        assert_eq!(Replay::from_bytes(&bytes).unwrap(), replay);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let err = Replay::from_bytes(&[0xff; 3]).unwrap_err();
        assert!(matches!(err, ReplayError::Decode(_)));
    }

    #[test]
    fn test_rejected_command_is_reported() {
        let mut replay = Replay::new(RuleConfig::default(), 1);
        replay.commands.push(Command::Play {
            player: PlayerId::new(0),
            card: CardId::new(0),
        });

        let err = replay.run().unwrap_err();
        assert!(matches!(err, ReplayError::Command { index: 0, .. }));
        assert!(err.to_string().starts_with("command 0 (Player 0 plays Card(0)) was rejected"));
    }
}
