use chrono::NaiveDate;
use serde::Serialize;

use super::{Cents, ParseCentsError, format_cents, parse_cents};

/// Date format used for input, output and persistence.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Categories suggested to the user. Any other label is accepted too.
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "food",
    "transport",
    "rent",
    "utilities",
    "entertainment",
    "health",
    "education",
    "clothes",
    "misc",
];

/// A single expense entry in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    /// Calendar day the money was spent
    pub date: NaiveDate,
    pub description: String,
    /// Free-form grouping label used for summaries
    pub category: String,
    /// Signed amount in cents; negative values record refunds
    pub amount_cents: Cents,
}

impl Expense {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category: category.into(),
            amount_cents,
        }
    }

    /// Build an expense from raw text fields, validating date and amount.
    /// Description and category are taken as given.
    pub fn parse(
        date: &str,
        description: &str,
        category: &str,
        amount: &str,
    ) -> Result<Self, ExpenseError> {
        let date = parse_date(date)?;
        let amount_cents = parse_cents(amount)
            .map_err(|source| ExpenseError::InvalidAmount(amount.to_string(), source))?;
        Ok(Self::new(date, description, category, amount_cents))
    }

    /// Lower-case and trim the category, the way new entries are stored.
    pub fn normalize_category(category: &str) -> String {
        category.trim().to_lowercase()
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn amount_string(&self) -> String {
        format_cents(self.amount_cents)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ExpenseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| ExpenseError::InvalidDate(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    InvalidDate(String),
    InvalidAmount(String, ParseCentsError),
}

impl std::fmt::Display for ExpenseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseError::InvalidDate(input) => {
                write!(f, "invalid date '{}', expected YYYY-MM-DD", input)
            }
            ExpenseError::InvalidAmount(input, source) => {
                write!(f, "invalid amount '{}': {}", input, source)
            }
        }
    }
}

impl std::error::Error for ExpenseError {}
