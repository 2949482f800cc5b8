use std::collections::HashMap;

use super::{Cents, Expense, YearMonth};

/// The ordered list of expenses. Order is append order and matches the
/// line order of the persisted file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn into_expenses(self) -> Vec<Expense> {
        self.expenses
    }

    pub fn push(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// Get the expense at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&Expense> {
        position
            .checked_sub(1)
            .and_then(|index| self.expenses.get(index))
    }

    /// Remove the expense at a 1-based position. The ledger is left
    /// unchanged when the position is out of bounds.
    pub fn remove(&mut self, position: usize) -> Result<Expense, IndexError> {
        if position < 1 || position > self.expenses.len() {
            return Err(IndexError {
                index: position,
                len: self.expenses.len(),
            });
        }
        Ok(self.expenses.remove(position - 1))
    }

    /// The most recent `limit` expenses in original order. `None` or zero
    /// yields every expense. The iterator can be cloned to walk it again.
    pub fn recent(
        &self,
        limit: Option<usize>,
    ) -> impl ExactSizeIterator<Item = &Expense> + Clone + '_ {
        let skip = match limit {
            Some(limit) if limit > 0 => self.expenses.len().saturating_sub(limit),
            _ => 0,
        };
        self.expenses[skip..].iter()
    }

    /// Total spent per category. Categories with no expenses are absent.
    pub fn totals_by_category(&self) -> Result<HashMap<String, Cents>, AmountOverflow> {
        let mut totals: HashMap<String, Cents> = HashMap::new();

        for expense in &self.expenses {
            let total = totals.entry(expense.category.clone()).or_insert(0);
            *total = total
                .checked_add(expense.amount_cents)
                .ok_or(AmountOverflow)?;
        }

        Ok(totals)
    }

    /// Number of expenses per category.
    pub fn counts_by_category(&self) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for expense in &self.expenses {
            *counts.entry(expense.category.clone()).or_insert(0) += 1;
        }

        counts
    }

    /// Expenses dated within `month`, in ledger order.
    pub fn in_month(&self, month: YearMonth) -> impl Iterator<Item = &Expense> + Clone + '_ {
        self.expenses
            .iter()
            .filter(move |expense| month.contains(expense.date))
    }

    pub fn total(&self) -> Result<Cents, AmountOverflow> {
        sum_amounts(&self.expenses)
    }
}

impl From<Vec<Expense>> for Ledger {
    fn from(expenses: Vec<Expense>) -> Self {
        Self::new(expenses)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.expenses.iter()
    }
}

/// Sum the amounts of a set of expenses.
pub fn sum_amounts<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Result<Cents, AmountOverflow> {
    checked_sum(expenses.into_iter().map(|e| e.amount_cents))
}

/// Sum cent values, failing instead of wrapping.
pub fn checked_sum(amounts: impl IntoIterator<Item = Cents>) -> Result<Cents, AmountOverflow> {
    amounts
        .into_iter()
        .try_fold(0 as Cents, |acc, amount| acc.checked_add(amount))
        .ok_or(AmountOverflow)
}

/// A total that does not fit in the cents range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountOverflow;

impl std::fmt::Display for AmountOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "total is too large to represent")
    }
}

impl std::error::Error for AmountOverflow {}

/// A 1-based position that does not address any expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.len == 0 {
            write!(f, "Invalid index {}: the ledger is empty", self.index)
        } else {
            write!(f, "Invalid index {}. Use 1..{}", self.index, self.len)
        }
    }
}

impl std::error::Error for IndexError {}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn make_expense(date: &str, description: &str, category: &str, amount: Cents) -> Expense {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Expense::new(date, description, category, amount)
    }

    fn five_expenses() -> Ledger {
        Ledger::new(vec![
            make_expense("2025-09-01", "Rent", "rent", 80000),
            make_expense("2025-09-02", "Coffee", "food", 350),
            make_expense("2025-09-03", "Bus", "transport", 200),
            make_expense("2025-09-04", "Lunch", "food", 1250),
            make_expense("2025-09-05", "Cinema", "entertainment", 900),
        ])
    }

    #[test]
    fn test_recent_with_limit() {
        let ledger = five_expenses();
        let recent: Vec<_> = ledger.recent(Some(2)).map(|e| e.description.as_str()).collect();
        assert_eq!(recent, vec!["Lunch", "Cinema"]);
    }

    #[test]
    fn test_recent_without_limit() {
        let ledger = five_expenses();
        assert_eq!(ledger.recent(None).len(), 5);
        assert_eq!(ledger.recent(Some(0)).len(), 5);
        assert_eq!(ledger.recent(Some(50)).len(), 5);
    }

    #[test]
    fn test_recent_is_restartable() {
        let ledger = five_expenses();
        let window = ledger.recent(Some(3));
        let first: Cents = window.clone().map(|e| e.amount_cents).sum();
        let second: Cents = window.map(|e| e.amount_cents).sum();
        assert_eq!(first, second);
        assert_eq!(first, 200 + 1250 + 900);
    }

    #[test]
    fn test_totals_by_category() {
        let ledger = five_expenses();
        let totals = ledger.totals_by_category().unwrap();

        assert_eq!(totals.len(), 4);
        assert_eq!(totals.get("food"), Some(&1600));
        assert_eq!(totals.get("rent"), Some(&80000));
        assert_eq!(totals.get("transport"), Some(&200));
        assert_eq!(totals.get("entertainment"), Some(&900));
        assert_eq!(totals.get("health"), None);
    }

    #[test]
    fn test_totals_sum_to_ledger_total() {
        let mut ledger = five_expenses();
        ledger.push(make_expense("2025-09-06", "Refund", "food", -350));

        let totals = ledger.totals_by_category().unwrap();
        let total: Cents = totals.values().sum();

        assert_eq!(Ok(total), ledger.total());
        assert_eq!(totals.get("food"), Some(&1250));
    }

    #[test]
    fn test_repeated_small_amounts_do_not_drift() {
        let ledger = Ledger::new(
            (0..1000)
                .map(|_| make_expense("2025-01-01", "Gum", "food", 10))
                .collect(),
        );
        assert_eq!(ledger.totals_by_category().unwrap().get("food"), Some(&10000));
    }

    #[test]
    fn test_in_month() {
        let ledger = Ledger::new(vec![
            make_expense("2025-09-20", "Coffee", "food", 350),
            make_expense("2025-09-01", "Bus", "transport", 200),
            make_expense("2025-08-31", "Groceries", "food", 4000),
        ]);
        let september: YearMonth = "2025-09".parse().unwrap();

        let matched: Vec<_> = ledger.in_month(september).collect();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].description, "Coffee");
        assert_eq!(matched[1].description, "Bus");
        assert_eq!(sum_amounts(matched), Ok(550));

        let july: YearMonth = "2025-07".parse().unwrap();
        assert_eq!(ledger.in_month(july).count(), 0);
    }

    #[test]
    fn test_overflowing_totals_are_errors() {
        let huge = Cents::MAX / 2 + 1;
        let ledger = Ledger::new(vec![
            make_expense("2025-09-01", "Yacht", "misc", huge),
            make_expense("2025-09-02", "Another yacht", "misc", huge),
        ]);

        assert_eq!(ledger.totals_by_category(), Err(AmountOverflow));
        assert_eq!(ledger.total(), Err(AmountOverflow));
        assert_eq!(checked_sum([Cents::MIN, -1]), Err(AmountOverflow));
        assert_eq!(checked_sum([huge, -huge]), Ok(0));
    }

    #[test]
    fn test_remove_by_position() {
        let mut ledger = five_expenses();
        let removed = ledger.remove(2).unwrap();

        assert_eq!(removed.description, "Coffee");
        let remaining: Vec<_> = ledger.expenses().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(remaining, vec!["Rent", "Bus", "Lunch", "Cinema"]);
    }

    #[test]
    fn test_remove_out_of_bounds() {
        let mut ledger = five_expenses();
        let before = ledger.clone();

        assert_eq!(ledger.remove(0), Err(IndexError { index: 0, len: 5 }));
        assert_eq!(ledger.remove(6), Err(IndexError { index: 6, len: 5 }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_get_by_position() {
        let ledger = five_expenses();
        assert!(ledger.get(0).is_none());
        assert_eq!(ledger.get(1).map(|e| e.description.as_str()), Some("Rent"));
        assert_eq!(ledger.get(5).map(|e| e.description.as_str()), Some("Cinema"));
        assert!(ledger.get(6).is_none());
    }

    #[test]
    fn test_index_error_message() {
        assert_eq!(
            IndexError { index: 7, len: 3 }.to_string(),
            "Invalid index 7. Use 1..3"
        );
        assert_eq!(
            IndexError { index: 1, len: 0 }.to_string(),
            "Invalid index 1: the ledger is empty"
        );
    }
}
