//! Scoring system: captured cards to points.
//!
//! `score` is a pure function over any snapshot of a captured pile. The
//! total is the sum of independent components:
//!
//! | Component      | Rule                                                   |
//! |----------------|--------------------------------------------------------|
//! | Brights        | 3 → 3 (2 if the Dec rain bright is one), 4 → 4, 5 → 15 |
//! | Animals        | n ≥ 5 → n − 4                                          |
//! | Godori         | all three birds (Feb, Apr, Aug) → 5, on top of Animals |
//! | Ribbons        | n ≥ 5 → n − 4                                          |
//! | Ribbon sets    | each complete red-poem / blue / plant set → 3          |
//! | Junk           | units ≥ 10 → units − 9 (double junk = 2 units)         |
//!
//! With `ScoringRules::cup_as_double_junk`, the September cup is scored
//! both as an animal and as a double junk and the higher total is kept.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardKind, RibbonSet};
use crate::core::ScoringRules;

pub const GODORI_POINTS: u32 = 5;
pub const RIBBON_SET_POINTS: u32 = 3;

/// Scoring component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreCategory {
    Brights,
    Animals,
    Godori,
    Ribbons,
    RibbonSet(RibbonSet),
    Junk,
}

impl std::fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScoreCategory::Brights => "Brights",
            ScoreCategory::Animals => "Animals",
            ScoreCategory::Godori => "Godori",
            ScoreCategory::Ribbons => "Ribbons",
            ScoreCategory::RibbonSet(RibbonSet::RedPoem) => "Red Ribbons",
            ScoreCategory::RibbonSet(RibbonSet::Blue) => "Blue Ribbons",
            ScoreCategory::RibbonSet(RibbonSet::Plant) => "Plant Ribbons",
            ScoreCategory::Junk => "Junk",
        };
        f.write_str(name)
    }
}

/// One scoring line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreItem {
    pub category: ScoreCategory,
    /// Cards counted (junk units for `Junk`).
    pub count: u32,
    pub points: u32,
}

/// Category counts of a captured pile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub brights: u32,
    pub rain_bright: bool,
    pub animals: u32,
    pub birds: u32,
    pub ribbons: u32,
    pub junk_units: u32,
    /// Cards held per ribbon set, indexed like `RibbonSet::ALL`.
    pub ribbon_sets: [u32; 3],
}

impl Tally {
    /// Count a pile with the cup read as an animal.
    #[must_use]
    pub fn of(cards: &[Card]) -> Self {
        let mut tally = Tally::default();
        for card in cards {
            match card.kind {
                CardKind::Bright => {
                    tally.brights += 1;
                    tally.rain_bright |= card.is_rain_bright();
                }
                CardKind::Animal => {
                    tally.animals += 1;
                    if card.is_bird() {
                        tally.birds += 1;
                    }
                }
                CardKind::Ribbon => {
                    tally.ribbons += 1;
                    if let Some(set) = card.ribbon_set() {
                        tally.ribbon_sets[set as usize] += 1;
                    }
                }
                CardKind::Junk | CardKind::DoubleJunk => {
                    tally.junk_units += card.kind.junk_units();
                }
            }
        }
        tally
    }

    /// The same tally with the cup moved from animals to double junk.
    #[must_use]
    pub fn with_cup_as_junk(mut self) -> Self {
        self.animals -= 1;
        self.junk_units += CardKind::DoubleJunk.junk_units();
        self
    }

    /// Scoring lines with non-zero points.
    #[must_use]
    pub fn items(&self) -> Vec<ScoreItem> {
        let mut items = Vec::new();
        let mut push = |category, count, points| {
            if points > 0 {
                items.push(ScoreItem { category, count, points });
            }
        };

        push(ScoreCategory::Brights, self.brights, bright_points(self.brights, self.rain_bright));
        push(ScoreCategory::Animals, self.animals, over(self.animals, 5));
        if self.birds == 3 {
            push(ScoreCategory::Godori, self.birds, GODORI_POINTS);
        }
        push(ScoreCategory::Ribbons, self.ribbons, over(self.ribbons, 5));
        for set in RibbonSet::ALL {
            if self.ribbon_sets[set as usize] == 3 {
                push(ScoreCategory::RibbonSet(set), 3, RIBBON_SET_POINTS);
            }
        }
        push(ScoreCategory::Junk, self.junk_units, over(self.junk_units, 10));

        items
    }
}

/// Full scoring result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub items: Vec<ScoreItem>,
    pub total: u32,
    /// Counts under the reading that produced `total`.
    pub tally: Tally,
    /// The September cup was counted as double junk.
    pub cup_as_junk: bool,
}

impl ScoreBreakdown {
    /// Points from one category (0 if it did not score).
    #[must_use]
    pub fn points(&self, category: ScoreCategory) -> u32 {
        self.items
            .iter()
            .filter(|i| i.category == category)
            .map(|i| i.points)
            .sum()
    }
}

/// Points for a bright count.
#[must_use]
pub const fn bright_points(brights: u32, rain_bright: bool) -> u32 {
    match brights {
        0..=2 => 0,
        3 if rain_bright => 2,
        3 => 3,
        4 => 4,
        _ => 15,
    }
}

/// 1 point at `threshold`, +1 per card beyond.
const fn over(n: u32, threshold: u32) -> u32 {
    if n >= threshold {
        n - threshold + 1
    } else {
        0
    }
}

/// Score a pile under the default rules.
///
/// ```
/// use gostop::cards::{catalogue, CardKind, Month};
/// use gostop::rules::score;
///
/// let birds: Vec<_> = [Month::February, Month::April, Month::August]
///     .into_iter()
///     .flat_map(|m| catalogue::find(m, CardKind::Animal))
///     .collect();
///
/// assert_eq!(score(&birds), 5);
/// ```
#[must_use]
pub fn score(cards: &[Card]) -> u32 {
    breakdown(cards, &ScoringRules::default()).total
}

/// Score a pile and list every scoring line.
#[must_use]
pub fn breakdown(cards: &[Card], rules: &ScoringRules) -> ScoreBreakdown {
    let tally = Tally::of(cards);
    let plain = evaluate(tally, false);

    if rules.cup_as_double_junk && cards.iter().any(Card::is_cup) {
        let alt = evaluate(tally.with_cup_as_junk(), true);
        if alt.total > plain.total {
            return alt;
        }
    }
    plain
}

fn evaluate(tally: Tally, cup_as_junk: bool) -> ScoreBreakdown {
    let items = tally.items();
    let total = items.iter().map(|i| i.points).sum();
    ScoreBreakdown {
        items,
        total,
        tally,
        cup_as_junk,
    }
}
