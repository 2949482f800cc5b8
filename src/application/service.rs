use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::{Cents, DEFAULT_CATEGORIES, Expense, Ledger, YearMonth, sum_amounts};
use crate::storage::Repository;

use super::{AppError, CategoryReport, MonthlyReport};

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, tests, etc.).
///
/// Every call is a full load-mutate-save cycle against the backing file;
/// nothing is cached between calls.
pub struct LedgerService {
    repo: Repository,
}

/// Raw, unvalidated input for a new expense.
pub struct NewExpense {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the ledger stored at `path`. The file is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Repository::new(path))
    }

    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Load every expense, in file order.
    pub fn load(&self) -> Result<Ledger, AppError> {
        Ok(self.repo.load()?)
    }

    /// Replace the stored ledger with `ledger`.
    pub fn save(&self, ledger: &Ledger) -> Result<(), AppError> {
        Ok(self.repo.save(ledger)?)
    }

    /// Validate and append a new expense. Returns the stored expense.
    pub fn add(&self, input: NewExpense) -> Result<Expense, AppError> {
        let mut expense = Expense::parse(
            &input.date,
            input.description.trim(),
            &input.category,
            &input.amount,
        )?;
        expense.category = Expense::normalize_category(&expense.category);

        self.append(expense)
    }

    /// Append an already-validated expense.
    pub fn append(&self, expense: Expense) -> Result<Expense, AppError> {
        let mut ledger = self.repo.load()?;
        ledger.push(expense.clone());
        self.repo.save(&ledger)?;

        tracing::info!(
            "added expense #{}: {} {} {}",
            ledger.len(),
            expense.date_string(),
            expense.category,
            expense.amount_string()
        );
        Ok(expense)
    }

    /// The most recent `limit` expenses in original order; every expense
    /// when `limit` is `None` or zero.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<Expense>, AppError> {
        let ledger = self.repo.load()?;
        Ok(ledger.recent(limit).cloned().collect())
    }

    /// Total per category. Categories without expenses are absent.
    pub fn summary(&self) -> Result<HashMap<String, Cents>, AppError> {
        Ok(self.repo.load()?.totals_by_category()?)
    }

    /// Per-category totals, sorted for display.
    pub fn category_report(&self) -> Result<CategoryReport, AppError> {
        let ledger = self.repo.load()?;
        Ok(CategoryReport::from_ledger(&ledger)?)
    }

    /// Expenses within a `YYYY-MM` month and their total.
    pub fn monthly(&self, year_month: &str) -> Result<MonthlyReport, AppError> {
        let month: YearMonth = year_month.parse()?;
        self.monthly_for(month)
    }

    pub fn monthly_for(&self, month: YearMonth) -> Result<MonthlyReport, AppError> {
        let ledger = self.repo.load()?;
        let expenses: Vec<Expense> = ledger.in_month(month).cloned().collect();
        let total = sum_amounts(&expenses)?;

        Ok(MonthlyReport {
            month,
            expenses,
            total,
        })
    }

    /// Remove the expense at a 1-based position and persist the rest.
    /// Returns the removed expense.
    pub fn delete_at(&self, index: usize) -> Result<Expense, AppError> {
        let mut ledger = self.repo.load()?;
        let removed = ledger.remove(index)?;
        self.repo.save(&ledger)?;

        tracing::info!(
            "deleted expense #{}: {} {}",
            index,
            removed.date_string(),
            removed.description
        );
        Ok(removed)
    }

    /// Suggested category labels.
    pub fn categories(&self) -> &'static [&'static str] {
        &DEFAULT_CATEGORIES
    }
}
