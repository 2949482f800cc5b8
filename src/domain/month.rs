use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        // Reject anything chrono can't turn into a real first-of-month
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::str::FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let err = || ParseYearMonthError(s.to_string());

        let (year, month) = input.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseYearMonthError(pub String);

impl std::fmt::Display for ParseYearMonthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month '{}', expected YYYY-MM", self.0)
    }
}

impl std::error::Error for ParseYearMonthError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_year_month() {
        let ym: YearMonth = "2025-09".parse().unwrap();
        assert_eq!(ym.year(), 2025);
        assert_eq!(ym.month(), 9);
        assert_eq!(ym.to_string(), "2025-09");
    }

    #[test]
    fn test_parse_year_month_invalid() {
        for input in ["2025-13", "2025-00", "2025-9", "25-09", "2025/09", "2025-09-01", ""] {
            assert!(
                input.parse::<YearMonth>().is_err(),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_contains() {
        let september: YearMonth = "2025-09".parse().unwrap();
        assert!(september.contains(date("2025-09-01")));
        assert!(september.contains(date("2025-09-30")));
        assert!(!september.contains(date("2025-08-31")));
        assert!(!september.contains(date("2024-09-15")));
    }

    #[test]
    fn test_of_date() {
        assert_eq!(YearMonth::of(date("2025-12-31")), YearMonth::new(2025, 12).unwrap());
    }
}
