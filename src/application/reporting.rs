use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{AmountOverflow, Cents, Expense, Ledger, YearMonth, checked_sum};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
}

impl CategoryReport {
    /// Build the report from a ledger, largest total first (ties by name).
    pub fn from_ledger(ledger: &Ledger) -> Result<Self, AmountOverflow> {
        let totals = ledger.totals_by_category()?;
        let counts = ledger.counts_by_category();
        Self::from_totals(totals, &counts)
    }

    fn from_totals(
        totals: HashMap<String, Cents>,
        counts: &HashMap<String, usize>,
    ) -> Result<Self, AmountOverflow> {
        let mut categories: Vec<CategorySummary> = totals
            .into_iter()
            .map(|(category, total)| {
                let count = counts.get(&category).copied().unwrap_or(0);
                CategorySummary {
                    category,
                    total,
                    count,
                }
            })
            .collect();

        categories.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        let total = checked_sum(categories.iter().map(|c| c.total))?;
        Ok(Self { categories, total })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub month: YearMonth,
    pub expenses: Vec<Expense>,
    pub total: Cents,
}
