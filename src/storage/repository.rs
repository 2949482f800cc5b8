use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::domain::{Expense, Ledger};

use super::{HEADER, StorageError};

/// Repository persisting the ledger as a CSV file, one expense per line.
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository backed by the file at `path`. The file does not
    /// need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every expense from the file. A missing file is an empty ledger.
    /// Any malformed row aborts the load.
    pub fn load(&self) -> Result<Ledger, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no ledger at {}, starting empty", self.path.display());
                return Ok(Ledger::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let ledger = read_expenses(BufReader::new(file), &self.path)?;
        tracing::debug!(
            "loaded {} expenses from {}",
            ledger.len(),
            self.path.display()
        );
        Ok(ledger)
    }

    /// Persist the whole ledger, replacing the previous file contents.
    ///
    /// Writes a sibling temp file, syncs it, then renames it over the
    /// destination, so the old file survives any failure.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = self.write_temp(&temp_path, ledger) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.io_error(e)
        })?;

        tracing::debug!("saved {} expenses to {}", ledger.len(), self.path.display());
        Ok(())
    }

    fn write_temp(&self, temp_path: &Path, ledger: &Ledger) -> Result<(), StorageError> {
        let file = File::create(temp_path).map_err(|e| StorageError::Io {
            path: temp_path.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        write_expenses(&mut writer, ledger)?;

        writer.flush().map_err(|e| StorageError::Io {
            path: temp_path.to_path_buf(),
            source: e,
        })?;
        writer.get_ref().sync_all().map_err(|e| StorageError::Io {
            path: temp_path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Temp file next to the destination, so the rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Decode a ledger from CSV text read from `path`. Row numbers in errors
/// are 1-based and count data rows only, matching delete positions.
/// Failures of the underlying reader are reported as I/O errors on `path`.
pub fn read_expenses<R: Read>(reader: R, path: &Path) -> Result<Ledger, StorageError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();

    match records.next() {
        None => return Ok(Ledger::default()),
        Some(Err(e)) => return Err(read_error(e, 0, path, "unreadable header")),
        Some(Ok(header)) => {
            if header.iter().ne(HEADER.iter().copied()) {
                return Err(StorageError::Parse {
                    row: 0,
                    reason: format!(
                        "expected header '{}', found '{}'",
                        HEADER.join(","),
                        header.iter().collect::<Vec<_>>().join(",")
                    ),
                });
            }
        }
    }

    let mut expenses = Vec::new();
    for (index, result) in records.enumerate() {
        let row = index + 1;

        let record = result.map_err(|e| read_error(e, row, path, "CSV parse error"))?;

        if record.len() != HEADER.len() {
            return Err(StorageError::Parse {
                row,
                reason: format!(
                    "expected {} fields, found {}",
                    HEADER.len(),
                    record.len()
                ),
            });
        }

        let expense = Expense::parse(&record[0], &record[1], &record[2], &record[3])
            .map_err(|e| StorageError::Parse {
                row,
                reason: e.to_string(),
            })?;
        expenses.push(expense);
    }

    Ok(Ledger::new(expenses))
}

/// Split reader failures from malformed content.
fn read_error(err: csv::Error, row: usize, path: &Path, context: &str) -> StorageError {
    if !err.is_io_error() {
        return StorageError::Parse {
            row,
            reason: format!("{}: {}", context, err),
        };
    }

    match err.into_kind() {
        csv::ErrorKind::Io(source) => StorageError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => StorageError::Parse {
            row,
            reason: format!("{}: {:?}", context, other),
        },
    }
}

/// Encode a ledger as CSV text, header first.
pub fn write_expenses<W: Write>(writer: W, ledger: &Ledger) -> Result<(), StorageError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for expense in ledger {
        csv_writer.write_record([
            expense.date_string().as_str(),
            expense.description.as_str(),
            expense.category.as_str(),
            expense.amount_string().as_str(),
        ])?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
