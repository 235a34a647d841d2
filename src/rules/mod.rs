//! Go-Stop rules.
//!
//! - `matching`: resolves a card entering the table (played or drawn)
//! - `scoring`: pure captured-pile → points function with a breakdown
//! - `settlement`: Go bonus, bak penalties, and stakes on a Stop
//!
//! None of these own state. The turn controller in `game` calls them.

pub mod matching;
pub mod scoring;
pub mod settlement;

pub use matching::{CaptureKind, MatchEngine, Resolution};
pub use scoring::{
    bright_points, breakdown, score, ScoreBreakdown, ScoreCategory, ScoreItem, Tally,
};
pub use settlement::{
    go_multiplier, is_jabak, penalties, settle, Penalty, Settlement, StopContext,
};
