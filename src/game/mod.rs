//! Turn controller and its command/event/snapshot protocol.
//!
//! ## Key Types
//!
//! - `Game`: owns one match and applies commands
//! - `Phase`: observable controller state
//! - `Command` / `Transition`: input and output of every state change
//! - `GameEvent` / `EventRecord`: what happened, in order
//! - `GameSnapshot`: per-viewer state with the opponent's hand redacted
//! - `RoundLayout`: scripted starting positions
//! - `Replay`: seed + commands, encoded with bincode
//! - `MatchPolicy`: caller-owned match length

pub mod command;
pub mod controller;
pub mod event;
pub mod layout;
pub mod phase;
pub mod policy;
pub mod replay;
pub mod snapshot;

pub use command::{Command, GoStopDecision};
pub use controller::{Game, PlayerState, Transition};
pub use event::{EventRecord, GameEvent, NagariReason, RoundOutcome};
pub use layout::RoundLayout;
pub use phase::Phase;
pub use policy::{MatchPolicy, RoundLimit, ScoreTarget};
pub use replay::{Replay, ReplayError};
pub use snapshot::{GameSnapshot, HandView, PendingDecision, PlayerView};
