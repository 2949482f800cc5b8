mod repository;

pub use repository::*;

use std::path::PathBuf;

use thiserror::Error;

/// Column layout of the ledger file
pub const HEADER: [&str; 4] = ["date", "description", "category", "amount"];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row {row}: {reason}")]
    Parse { row: usize, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
