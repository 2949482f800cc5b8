// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use budget::application::{LedgerService, NewExpense};
use budget::domain::Expense;
use tempfile::TempDir;

/// Helper to create a test service backed by a file in a temporary directory
pub fn test_service() -> (LedgerService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("expenses.csv");
    (LedgerService::open(path), temp_dir)
}

/// Helper to build raw expense input
pub fn new_expense(date: &str, description: &str, category: &str, amount: &str) -> NewExpense {
    NewExpense {
        date: date.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        amount: amount.to_string(),
    }
}

/// Helper to add an expense and return what was stored
pub fn add(
    service: &LedgerService,
    date: &str,
    description: &str,
    category: &str,
    amount: &str,
) -> Result<Expense> {
    Ok(service.add(new_expense(date, description, category, amount))?)
}

/// Descriptions of the stored expenses, in ledger order
pub fn descriptions(expenses: &[Expense]) -> Vec<String> {
    expenses.iter().map(|e| e.description.clone()).collect()
}

/// Test fixture: five expenses spread over two months
pub fn add_five(service: &LedgerService) -> Result<()> {
    add(service, "2025-08-28", "Rent", "rent", "800.00")?;
    add(service, "2025-08-31", "Groceries", "food", "42.10")?;
    add(service, "2025-09-01", "Bus", "transport", "2.00")?;
    add(service, "2025-09-15", "Lunch", "food", "12.50")?;
    add(service, "2025-09-20", "Cinema", "entertainment", "9.00")?;
    Ok(())
}
