//! Date-range handling for aggregation queries

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::models::OwnerFilter;
use uuid::Uuid;

/// Named date-range presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Month to date
    MonthToDate,
    /// Last 7 days
    Last7Days,
    /// Last 30 days
    Last30Days,
    /// Last 3 months
    Last3Months,
    /// Year to date
    YearToDate,
    /// Last 1 year
    LastYear,
    /// All time
    AllTime,
}

impl std::str::FromStr for Preset {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mtd" => Ok(Preset::MonthToDate),
            "7d" => Ok(Preset::Last7Days),
            "1m" => Ok(Preset::Last30Days),
            "3m" => Ok(Preset::Last3Months),
            "ytd" => Ok(Preset::YearToDate),
            "1y" => Ok(Preset::LastYear),
            "all" => Ok(Preset::AllTime),
            _ => Err(format!("Invalid period preset: {}", s)),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::MonthToDate => write!(f, "mtd"),
            Preset::Last7Days => write!(f, "7d"),
            Preset::Last30Days => write!(f, "1m"),
            Preset::Last3Months => write!(f, "3m"),
            Preset::YearToDate => write!(f, "ytd"),
            Preset::LastYear => write!(f, "1y"),
            Preset::AllTime => write!(f, "all"),
        }
    }
}

/// A concrete or preset date range.
/// Presets resolve relative to an explicit reference date so aggregation
/// stays deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Preset(Preset),
    Range { start: NaiveDate, end: NaiveDate },
}

impl Default for Period {
    fn default() -> Self {
        Period::Preset(Preset::MonthToDate)
    }
}

impl Period {
    /// Inclusive start of the range, `None` for all-time
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Preset(Preset::MonthToDate) => Some(today.with_day(1).unwrap_or(today)),
            Period::Preset(Preset::Last7Days) => Some(today - Duration::days(6)),
            Period::Preset(Preset::Last30Days) => Some(today - Duration::days(29)),
            Period::Preset(Preset::Last3Months) => {
                Some(today.checked_sub_months(Months::new(3)).unwrap_or(today))
            }
            Period::Preset(Preset::YearToDate) => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Period::Preset(Preset::LastYear) => {
                Some(today.checked_sub_months(Months::new(12)).unwrap_or(today))
            }
            Period::Preset(Preset::AllTime) => None,
            Period::Range { start, .. } => Some(*start),
        }
    }

    /// Inclusive end of the range, `None` for all-time
    pub fn end_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Preset(Preset::AllTime) => None,
            Period::Preset(_) => Some(today),
            Period::Range { end, .. } => Some(*end),
        }
    }

    /// Check if a date falls inside the range
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let start = self.start_date(today);
        let end = self.end_date(today);
        match (start, end) {
            (None, None) => true,
            (Some(s), None) => date >= s,
            (None, Some(e)) => date <= e,
            (Some(s), Some(e)) => date >= s && date <= e,
        }
    }

    /// Validate an explicit range
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err(format!("Range end {} precedes start {}", end, start));
        }
        Ok(Period::Range { start, end })
    }

    /// Number of days covered, when bounded on both sides
    pub fn span_days(&self, today: NaiveDate) -> Option<i64> {
        match (self.start_date(today), self.end_date(today)) {
            (Some(s), Some(e)) => Some((e - s).num_days() + 1),
            _ => None,
        }
    }
}

/// Query scope for the ledger aggregator
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    /// Owner scope
    pub owner: OwnerFilter,
    /// Restrict to a single wallet
    pub wallet_id: Option<Uuid>,
    /// Date range
    pub period: Period,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn preset_parsing_round_trips() {
        for raw in ["mtd", "7d", "1m", "3m", "ytd", "1y", "all"] {
            let preset: Preset = raw.parse().unwrap();
            assert_eq!(preset.to_string(), raw);
        }
        assert!("last-century".parse::<Preset>().is_err());
    }

    #[test]
    fn month_to_date_starts_on_the_first() {
        let today = d(2024, 3, 17);
        let period = Period::Preset(Preset::MonthToDate);
        assert_eq!(period.start_date(today), Some(d(2024, 3, 1)));
        assert_eq!(period.end_date(today), Some(today));
        assert!(period.contains(d(2024, 3, 1), today));
        assert!(!period.contains(d(2024, 2, 29), today));
    }

    #[test]
    fn last_seven_days_is_inclusive_of_today() {
        let today = d(2024, 3, 17);
        let period = Period::Preset(Preset::Last7Days);
        assert_eq!(period.start_date(today), Some(d(2024, 3, 11)));
        assert_eq!(period.span_days(today), Some(7));
    }

    #[test]
    fn all_time_contains_everything() {
        let today = d(2024, 3, 17);
        let period = Period::Preset(Preset::AllTime);
        assert!(period.contains(d(1999, 1, 1), today));
        assert!(period.contains(d(2099, 1, 1), today));
        assert_eq!(period.span_days(today), None);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(Period::range(d(2024, 2, 1), d(2024, 1, 1)).is_err());
        assert!(Period::range(d(2024, 1, 1), d(2024, 1, 1)).is_ok());
    }
}
