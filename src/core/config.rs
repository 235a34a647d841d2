//! Rule configuration.
//!
//! Go-Stop has many house variants. The engine hardcodes none of the
//! tunable ones. Deal sizes, the Go/Stop threshold, multi-match handling,
//! the special moves, and the settlement penalties all live in `RuleConfig`.
//!
//! Every field has a serde default, so a TOML document only needs to name
//! what it changes:
//!
//! ```
//! use gostop::core::{MultiMatch, RuleConfig};
//!
//! let config = RuleConfig::from_toml_str(r#"
//!     win_threshold = 3
//!     multi_match = "PlayerChooses"
//! "#).unwrap();
//!
//! assert_eq!(config.win_threshold, 3);
//! assert_eq!(config.multi_match, MultiMatch::PlayerChooses);
//! assert_eq!(config.hand_size, 10);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::PLAYER_COUNT;
use crate::cards::DECK_SIZE;

/// How a card that matches two table cards is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiMatch {
    /// Capture the incoming card and both matches as one bonus event.
    #[default]
    CaptureAll,
    /// Capture the incoming card and one match picked by the player.
    /// The player is only asked when the two candidates differ in kind.
    PlayerChooses,
}

/// Variant switches for the scoring system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// The September cup may count as double junk instead of an animal,
    /// whichever scores higher.
    pub cup_as_double_junk: bool,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            cup_as_double_junk: true,
        }
    }
}

/// Variant switches for settling a stopped round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementRules {
    /// From this Go onwards each Go also doubles the settlement.
    pub go_doubling_from: u32,
    /// Apply the bak (gwangbak, pibak, mungbak, gobak) multipliers.
    pub penalties: bool,
    /// A loser holding 1..=this many junk units is pibak.
    pub pibak_max_junk: u32,
    /// A winner holding at least this many animals makes the loser mungbak.
    pub mungbak_min_animals: u32,
    /// A round without a Stop doubles the next settlement.
    pub nagari_doubles_stakes: bool,
    /// A loser holding at least this many points is exempt from gwangbak,
    /// pibak, and mungbak (jabak). Zero disables the exemption.
    pub jabak_min_score: u32,
}

impl Default for SettlementRules {
    fn default() -> Self {
        Self {
            go_doubling_from: 3,
            penalties: true,
            pibak_max_junk: 5,
            mungbak_min_animals: 7,
            nagari_doubles_stakes: true,
            jabak_min_score: 7,
        }
    }
}

/// Switches for the special moves and deal-time events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialRules {
    /// A played card that pairs with the table, followed by a draw of the
    /// same month, leaves all three on the table as a stack (seolsa). The
    /// stacker pays one junk; whoever later eats the stack collects.
    pub seolsa: bool,
    /// A played card left on the table and captured by the same turn's
    /// draw steals one junk (jjok).
    pub jjok: bool,
    /// A played card and a same-month draw that both meet a table pair
    /// take all four and steal one junk (ttadak).
    pub ttadak: bool,
    /// Three of a month in hand with the fourth on the table are played
    /// at once, capture all four, and steal one junk.
    pub bomb: bool,
    /// Dummy plays granted by a bomb. Each one is a draw-only turn.
    pub bomb_dummies: u32,
    /// Three of a month in hand with none on the table may be revealed.
    /// Every shake or bomb adds one to the winner's settlement multiplier.
    pub shake: bool,
    /// All four of a month in one dealt hand ends the round at once.
    pub chongtong: bool,
    /// Points banked by a chongtong, before stakes.
    pub chongtong_points: u32,
    /// All four of a month dealt to the table voids the round.
    pub four_on_table_nagari: bool,
}

impl Default for SpecialRules {
    fn default() -> Self {
        Self {
            seolsa: true,
            jjok: true,
            ttadak: true,
            bomb: true,
            bomb_dummies: 2,
            shake: true,
            chongtong: false,
            chongtong_points: 10,
            four_on_table_nagari: false,
        }
    }
}

impl SpecialRules {
    /// Every special move and deal-time event switched off.
    #[must_use]
    pub fn none() -> Self {
        Self {
            seolsa: false,
            jjok: false,
            ttadak: false,
            bomb: false,
            bomb_dummies: 0,
            shake: false,
            chongtong: false,
            chongtong_points: 0,
            four_on_table_nagari: false,
        }
    }
}

/// Complete rule configuration for a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Cards dealt to each player.
    pub hand_size: usize,
    /// Cards dealt face-up to the table.
    pub table_size: usize,
    /// Score at which the Go/Stop decision opens.
    pub win_threshold: u32,
    /// Resolution of a card that matches two table cards.
    pub multi_match: MultiMatch,
    /// Steal one junk from the opponent when the table is cleared.
    pub steal_junk_on_clear: bool,
    /// Scoring variant switches.
    pub scoring: ScoringRules,
    /// Settlement variant switches.
    pub settlement: SettlementRules,
    /// Special moves.
    pub special: SpecialRules,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            hand_size: 10,
            table_size: 8,
            win_threshold: 7,
            multi_match: MultiMatch::CaptureAll,
            steal_junk_on_clear: false,
            scoring: ScoringRules::default(),
            settlement: SettlementRules::default(),
            special: SpecialRules::default(),
        }
    }
}

impl RuleConfig {
    /// Parse and validate a TOML rule document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RuleConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the deal fits in one deck and the threshold is reachable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_size == 0 {
            return Err(ConfigError::Invalid("hand_size must be at least 1".into()));
        }
        match self.dealt() {
            Some(dealt) if dealt <= DECK_SIZE => {}
            Some(dealt) => {
                return Err(ConfigError::Invalid(format!(
                    "dealing {} cards needs more than the {} in a deck",
                    dealt, DECK_SIZE
                )));
            }
            None => {
                return Err(ConfigError::Invalid(format!(
                    "hand_size {} and table_size {} overflow the deal",
                    self.hand_size, self.table_size
                )));
            }
        }
        if self.win_threshold == 0 {
            return Err(ConfigError::Invalid("win_threshold must be at least 1".into()));
        }
        Ok(())
    }

    /// Cards left in the deck after the deal.
    #[must_use]
    pub fn stock_size(&self) -> usize {
        self.dealt().map_or(0, |dealt| DECK_SIZE.saturating_sub(dealt))
    }

    /// Cards dealt in total, or `None` if the sum does not fit a `usize`.
    fn dealt(&self) -> Option<usize> {
        self.hand_size
            .checked_mul(PLAYER_COUNT)
            .and_then(|hands| hands.checked_add(self.table_size))
    }

    /// Set deal sizes.
    #[must_use]
    pub fn with_deal(mut self, hand_size: usize, table_size: usize) -> Self {
        self.hand_size = hand_size;
        self.table_size = table_size;
        self
    }

    /// Set the Go/Stop threshold.
    #[must_use]
    pub fn with_win_threshold(mut self, threshold: u32) -> Self {
        self.win_threshold = threshold;
        self
    }

    /// Set multi-match handling.
    #[must_use]
    pub fn with_multi_match(mut self, policy: MultiMatch) -> Self {
        self.multi_match = policy;
        self
    }

    /// Enable or disable the table-clear steal.
    #[must_use]
    pub fn with_steal_on_clear(mut self, enabled: bool) -> Self {
        self.steal_junk_on_clear = enabled;
        self
    }

    /// Replace the settlement rules.
    #[must_use]
    pub fn with_settlement(mut self, settlement: SettlementRules) -> Self {
        self.settlement = settlement;
        self
    }

    /// Replace the special-move switches.
    #[must_use]
    pub fn with_special(mut self, special: SpecialRules) -> Self {
        self.special = special;
        self
    }
}
