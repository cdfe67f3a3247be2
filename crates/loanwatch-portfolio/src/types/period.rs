//! Reporting period (snapshot date).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not a recognisable reporting period.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid report period '{0}' (expected YYYY-MM-DD or YYYY-MM)")]
pub struct PeriodParseError(pub String);

/// The calendar date a portfolio snapshot was taken, normally a month end.
///
/// Periods are totally ordered, so they support the range comparisons the
/// filter engine needs (`>=` for the lower bound, `<` for the upper bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportPeriod(NaiveDate);

impl ReportPeriod {
    /// Wraps a calendar date.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Creates a period from year, month and day.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Creates the period at the last day of the given month.
    #[must_use]
    pub fn month_end(year: i32, month: u32) -> Option<Self> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .filter(|_| (1..=12).contains(&month))
            .and_then(|d| d.pred_opt())
            .map(Self)
    }

    /// Returns the underlying date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the calendar month (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the last day of this period's month.
    #[must_use]
    pub fn to_month_end(&self) -> Self {
        Self::month_end(self.year(), self.month()).unwrap_or(*self)
    }

    /// Parses a period from the formats found in snapshot exports.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (spreadsheet exports carry
    /// a midnight time part), `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM`, the last
    /// one resolving to the month end.
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let trimmed = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date));
        }

        for format in [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
        ] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(dt.date()));
            }
        }

        if let Ok(first) = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
            if let Some(end) = Self::month_end(first.year(), first.month()) {
                return Ok(end);
            }
        }

        Err(PeriodParseError(s.to_string()))
    }
}

impl From<NaiveDate> for ReportPeriod {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for ReportPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for ReportPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReportPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let expected = ReportPeriod::from_ymd(2019, 1, 31).unwrap();

        assert_eq!(ReportPeriod::parse("2019-01-31").unwrap(), expected);
        assert_eq!(ReportPeriod::parse("2019-01-31 00:00:00").unwrap(), expected);
        assert_eq!(ReportPeriod::parse("2019-01-31T00:00:00").unwrap(), expected);
        assert_eq!(ReportPeriod::parse(" 2019-01-31 ").unwrap(), expected);
        assert_eq!(ReportPeriod::parse("2019-01").unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ReportPeriod::parse("").is_err());
        assert!(ReportPeriod::parse("31.01.2019").is_err());
        assert!(ReportPeriod::parse("2019-13").is_err());
        assert!(ReportPeriod::parse("2019-02-30").is_err());
    }

    #[test]
    fn test_month_end() {
        assert_eq!(
            ReportPeriod::month_end(2020, 2).unwrap(),
            ReportPeriod::from_ymd(2020, 2, 29).unwrap()
        );
        assert_eq!(
            ReportPeriod::month_end(2019, 12).unwrap(),
            ReportPeriod::from_ymd(2019, 12, 31).unwrap()
        );
        assert!(ReportPeriod::month_end(2019, 0).is_none());
        assert!(ReportPeriod::month_end(2019, 13).is_none());

        let mid = ReportPeriod::from_ymd(2019, 4, 15).unwrap();
        assert_eq!(mid.to_month_end(), ReportPeriod::from_ymd(2019, 4, 30).unwrap());
    }

    #[test]
    fn test_ordering() {
        let jan = ReportPeriod::month_end(2019, 1).unwrap();
        let feb = ReportPeriod::month_end(2019, 2).unwrap();
        assert!(jan < feb);
        assert_eq!(jan.max(feb), feb);
    }

    #[test]
    fn test_serde() {
        let period = ReportPeriod::from_ymd(2018, 6, 30).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2018-06-30\"");

        let parsed: ReportPeriod = serde_json::from_str("\"2018-06-30 00:00:00\"").unwrap();
        assert_eq!(parsed, period);

        assert!(serde_json::from_str::<ReportPeriod>("\"june\"").is_err());
    }
}
