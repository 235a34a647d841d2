//! Go/Stop settlement: what a Stop banks.
//!
//! ```text
//! points = (base + go_count) x go_doubling x penalties x shakes x stakes
//! ```
//!
//! Each applicable bak penalty doubles the result. A loser who scored
//! `jabak_min_score` points is exempt from every bak but gobak (jabak).
//! Shakes and bombs add to one multiplier: one gives x2, two give x3.
//! Stakes carry over from rounds that ended without a Stop.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::scoring::{ScoreBreakdown, ScoreCategory, Tally};
use crate::core::{PlayerId, SettlementRules};

/// Loser-side penalty, each doubling the settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Penalty {
    /// Winner scored brights, loser holds none.
    Gwangbak,
    /// Winner scored junk, loser holds too little junk.
    Pibak,
    /// Winner holds many animals.
    Mungbak,
    /// Loser declared Go and was overtaken.
    Gobak,
}

impl std::fmt::Display for Penalty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Penalty::Gwangbak => "Gwangbak",
            Penalty::Pibak => "Pibak",
            Penalty::Mungbak => "Mungbak",
            Penalty::Gobak => "Gobak",
        };
        f.write_str(name)
    }
}

/// Everything the settlement needs to know about a stopped round.
#[derive(Clone, Copy, Debug)]
pub struct StopContext<'a> {
    pub winner: PlayerId,
    pub winner_score: &'a ScoreBreakdown,
    pub go_count: u32,
    /// Loser's pile with the cup read as an animal.
    pub loser_tally: Tally,
    /// Loser's best score, for the jabak exemption.
    pub loser_score: u32,
    pub loser_went_go: bool,
    /// Winner's shakes and bombs this round.
    pub shakes: u32,
    /// Multiplier carried from earlier rounds (1 if none).
    pub stakes: u32,
}

/// Result of a Stop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub winner: PlayerId,
    /// Score of the winner's captured pile.
    pub base: u32,
    /// +1 per Go.
    pub go_bonus: u32,
    /// Doubling from late Gos (1 if none).
    pub go_multiplier: u32,
    pub penalties: SmallVec<[Penalty; 4]>,
    /// The loser scored enough to cancel the bak penalties.
    pub is_jabak: bool,
    /// 1 plus one per shake or bomb.
    pub shake_multiplier: u32,
    pub stakes: u32,
    /// Final banked points.
    pub points: u32,
}

impl Settlement {
    /// Product of every multiplier.
    #[must_use]
    pub fn multiplier(&self) -> u32 {
        let penalty = 2u32.saturating_pow(self.penalties.len() as u32);
        self.go_multiplier
            .saturating_mul(penalty)
            .saturating_mul(self.shake_multiplier)
            .saturating_mul(self.stakes)
    }

    /// Human-readable formula, e.g. `(7 + 1) x Pibak(x2)`.
    #[must_use]
    pub fn formula(&self) -> String {
        let mut out = if self.go_bonus > 0 {
            format!("({} + {})", self.base, self.go_bonus)
        } else {
            self.base.to_string()
        };
        if self.go_multiplier > 1 {
            out.push_str(&format!(" x Go(x{})", self.go_multiplier));
        }
        for penalty in &self.penalties {
            out.push_str(&format!(" x {}(x2)", penalty));
        }
        if self.shake_multiplier > 1 {
            out.push_str(&format!(" x Shake/Bomb(x{})", self.shake_multiplier));
        }
        if self.stakes > 1 {
            out.push_str(&format!(" x Stakes(x{})", self.stakes));
        }
        out
    }
}

impl std::fmt::Display for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.formula(), self.points)
    }
}

/// Doubling applied for `go_count` Gos.
#[must_use]
pub fn go_multiplier(go_count: u32, rules: &SettlementRules) -> u32 {
    if rules.go_doubling_from == 0 || go_count < rules.go_doubling_from {
        return 1;
    }
    2u32.saturating_pow(go_count - rules.go_doubling_from + 1)
}

/// True if the loser's own score exempts them from the bak penalties.
#[must_use]
pub fn is_jabak(ctx: &StopContext<'_>, rules: &SettlementRules) -> bool {
    rules.jabak_min_score > 0 && ctx.loser_score >= rules.jabak_min_score
}

/// Penalties the loser owes, before the jabak exemption.
#[must_use]
pub fn penalties(ctx: &StopContext<'_>, rules: &SettlementRules) -> SmallVec<[Penalty; 4]> {
    let mut out = SmallVec::new();
    if !rules.penalties {
        return out;
    }

    let winner = ctx.winner_score;
    let loser = &ctx.loser_tally;

    if winner.points(ScoreCategory::Brights) > 0 && loser.brights == 0 {
        out.push(Penalty::Gwangbak);
    }
    if winner.points(ScoreCategory::Junk) > 0
        && (1..=rules.pibak_max_junk).contains(&loser.junk_units)
    {
        out.push(Penalty::Pibak);
    }
    if winner.tally.animals >= rules.mungbak_min_animals {
        out.push(Penalty::Mungbak);
    }
    if ctx.loser_went_go {
        out.push(Penalty::Gobak);
    }
    out
}

/// Settle a Stop.
#[must_use]
pub fn settle(ctx: &StopContext<'_>, rules: &SettlementRules) -> Settlement {
    let mut owed = penalties(ctx, rules);
    let jabak = is_jabak(ctx, rules) && owed.iter().any(|p| *p != Penalty::Gobak);
    if jabak {
        owed.retain(|p| *p == Penalty::Gobak);
    }

    let mut settlement = Settlement {
        winner: ctx.winner,
        base: ctx.winner_score.total,
        go_bonus: ctx.go_count,
        go_multiplier: go_multiplier(ctx.go_count, rules),
        penalties: owed,
        is_jabak: jabak,
        shake_multiplier: ctx.shakes.saturating_add(1),
        stakes: ctx.stakes.max(1),
        points: 0,
    };
    settlement.points = settlement
        .base
        .saturating_add(settlement.go_bonus)
        .saturating_mul(settlement.multiplier());

    log::info!("{} settles {}", ctx.winner, settlement);
    settlement
}
