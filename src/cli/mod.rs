use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{CategoryReport, LedgerService, MonthlyReport, NewExpense};
use crate::domain::{DATE_FORMAT, Expense, format_cents, sum_amounts};
use crate::storage::HEADER;

/// Budget - Personal Expense Ledger
#[derive(Parser)]
#[command(name = "budget")]
#[command(about = "Track expenses in a local CSV file")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(
        short,
        long,
        global = true,
        env = "BUDGET_FILE",
        default_value = "expenses.csv"
    )]
    pub file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an expense
    Add {
        /// What the money was spent on
        description: String,

        /// Category (e.g., "food", "transport"); stored in lower case
        category: String,

        /// Amount (e.g., "12.50" or "12"; negative for refunds)
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List expenses (all, or the last N)
    List {
        /// Number of most recent expenses to show
        limit: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Show totals by category
    Summary {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Show expenses for a month
    Monthly {
        /// Month in YYYY-MM format (e.g., 2025-09)
        month: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Show suggested categories
    Categories,

    /// Delete the N-th expense (as numbered by `list`)
    Delete {
        /// 1-based position of the expense
        index: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = LedgerService::open(&self.file);
        tracing::debug!("using ledger file {}", service.path().display());

        match self.command {
            Commands::Add {
                description,
                category,
                amount,
                date,
            } => {
                let date = date.unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string());
                let expense = service
                    .add(NewExpense {
                        date,
                        description,
                        category,
                        amount,
                    })
                    .context("Failed to add expense")?;

                println!(
                    "Added: {} | {} | {} | {}",
                    expense.date_string(),
                    expense.description,
                    expense.category,
                    expense.amount_string()
                );
            }

            Commands::List { limit, format } => {
                let ledger = service.load()?;
                let offset = ledger.len() - ledger.recent(limit).len();
                let expenses: Vec<Expense> = ledger.recent(limit).cloned().collect();
                run_list_command(&expenses, offset, format)?;
            }

            Commands::Summary { format } => {
                let report = service.category_report()?;
                run_summary_command(&report, format)?;
            }

            Commands::Monthly { month, format } => {
                let report = service.monthly(&month)?;
                run_monthly_command(&report, format)?;
            }

            Commands::Categories => {
                println!("Available categories:");
                for category in service.categories() {
                    println!("  - {}", category);
                }
            }

            Commands::Delete { index } => {
                let removed = service.delete_at(index)?;
                println!(
                    "Deleted #{}: {} | {} | {} | {}",
                    index,
                    removed.date_string(),
                    removed.description,
                    removed.category,
                    removed.amount_string()
                );
            }
        }

        Ok(())
    }
}

fn run_list_command(expenses: &[Expense], offset: usize, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(expenses)?);
        }
        Format::Csv => {
            write_csv(expenses)?;
        }
        Format::Table => {
            if expenses.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            println!(
                "{:>4}  {:<10}  {:<28}  {:<14}  {:>10}",
                "#", "DATE", "DESCRIPTION", "CATEGORY", "AMOUNT"
            );
            println!("{}", "-".repeat(74));

            for (i, expense) in expenses.iter().enumerate() {
                println!(
                    "{:>4}  {:<10}  {:<28}  {:<14}  {:>10}",
                    offset + i + 1,
                    expense.date_string(),
                    truncate(&expense.description, 28),
                    truncate(&expense.category, 14),
                    expense.amount_string()
                );
            }

            let total = sum_amounts(expenses)?;
            println!("{}", "-".repeat(74));
            println!("{:<62}{:>12}", "TOTAL", format_cents(total));
        }
    }
    Ok(())
}

fn run_summary_command(report: &CategoryReport, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        Format::Csv => {
            let mut csv_writer = csv::Writer::from_writer(stdout().lock());
            csv_writer.write_record(["category", "total", "count"])?;
            for cat in &report.categories {
                csv_writer.write_record([
                    cat.category.as_str(),
                    format_cents(cat.total).as_str(),
                    cat.count.to_string().as_str(),
                ])?;
            }
            csv_writer.flush()?;
        }
        Format::Table => {
            if report.categories.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            println!("{:<20} {:>12} {:>8}", "CATEGORY", "TOTAL", "COUNT");
            println!("{}", "-".repeat(42));
            for cat in &report.categories {
                println!(
                    "{:<20} {:>12} {:>8}",
                    truncate(&cat.category, 20),
                    format_cents(cat.total),
                    cat.count
                );
            }
            println!("{}", "-".repeat(42));
            println!("{:<20} {:>12}", "TOTAL", format_cents(report.total));
        }
    }
    Ok(())
}

fn run_monthly_command(report: &MonthlyReport, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        Format::Csv => {
            write_csv(&report.expenses)?;
        }
        Format::Table => {
            println!("Monthly Summary for {}", report.month);
            println!("{}", "-".repeat(60));
            for expense in &report.expenses {
                println!(
                    "{:<10}  {:<28}  {:<10}  {:>8}",
                    expense.date_string(),
                    truncate(&expense.description, 28),
                    truncate(&expense.category, 10),
                    expense.amount_string()
                );
            }
            println!("{}", "-".repeat(60));
            println!("TOTAL: {}", format_cents(report.total));
        }
    }
    Ok(())
}

fn write_csv(expenses: &[Expense]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(stdout().lock());

    csv_writer.write_record(HEADER)?;
    for expense in expenses {
        csv_writer.write_record([
            expense.date_string().as_str(),
            expense.description.as_str(),
            expense.category.as_str(),
            expense.amount_string().as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
