use thiserror::Error;

use crate::domain::{AmountOverflow, ExpenseError, IndexError, ParseYearMonthError};
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid index {index}: the ledger has {len} expenses")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot compute total: {0}")]
    Overflow(#[from] AmountOverflow),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ParseYearMonthError> for AppError {
    fn from(err: ParseYearMonthError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        AppError::IndexOutOfBounds {
            index: err.index,
            len: err.len,
        }
    }
}
