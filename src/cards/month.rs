//! Calendar months, the matching key of every Hwatu card.
//!
//! Months are ordinals 1..=12 only. Code that needs "no month" uses
//! `Option<Month>`; there is no sentinel variant.

use serde::{Deserialize, Serialize};

/// One of the twelve Hwatu suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Calendar ordinal, 1 for January.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Month for a calendar ordinal, `None` outside 1..=12.
    ///
    /// ```
    /// use gostop::cards::Month;
    ///
    /// assert_eq!(Month::from_ordinal(8), Some(Month::August));
    /// assert_eq!(Month::from_ordinal(0), None);
    /// assert_eq!(Month::from_ordinal(13), None);
    /// ```
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Option<Month> {
        if ordinal >= 1 && ordinal <= 12 {
            Some(Month::ALL[(ordinal - 1) as usize])
        } else {
            None
        }
    }

    /// Short English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_round_trip() {
        for (i, month) in Month::ALL.iter().enumerate() {
            assert_eq!(month.ordinal() as usize, i + 1);
            assert_eq!(Month::from_ordinal(month.ordinal()), Some(*month));
        }
    }

    #[test]
    fn test_ordering_follows_calendar() {
        assert!(Month::January < Month::February);
        assert!(Month::November < Month::December);
        assert_eq!(Month::ALL.iter().max(), Some(&Month::December));
    }

    #[test]
    fn test_display() {
        assert_eq!(Month::September.to_string(), "Sep");
    }
}
