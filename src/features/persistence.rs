use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use super::expense::ExpenseRow;
use super::store::ExpenseStore;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Error accessing data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A malformed line. The record is dropped, loading carries on.
    #[error("Skipping line {line}: {reason}")]
    Format { line: u64, reason: String },
}

type PersistenceResult<T> = anyhow::Result<T, PersistenceError>;

impl PersistenceError {
    fn io(path: &Path, source: impl Into<io::Error>) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// What a call to [`ExpenseStore::load`] read from the data file
#[derive(Debug, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

impl ExpenseStore {
    /// Overwrites `path` with one `username,date,category,amount` line per expense.
    pub fn save(&self, path: &Path) -> PersistenceResult<usize> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_path(path)
            .map_err(|e| PersistenceError::io(path, e))?;

        let mut written = 0;
        for (username, expense) in self.records() {
            writer
                .serialize(ExpenseRow::new(username, expense))
                .map_err(|e| PersistenceError::io(path, e))?;
            written += 1;
        }
        writer.flush().map_err(|e| PersistenceError::io(path, e))?;

        info!("Saved {written} expenses to {}", path.display());
        Ok(written)
    }

    /// Appends every well formed line of `path` to the store.
    ///
    /// A missing file leaves the store untouched. Malformed lines are skipped with a
    /// warning. On a read error the records loaded so far are kept.
    pub fn load(&mut self, path: &Path) -> PersistenceResult<LoadReport> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No data file at {}, starting empty", path.display());
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(PersistenceError::io(path, e)),
        };

        let mut reader = line_reader(file);

        let mut report = LoadReport::default();
        for result in reader.records() {
            let row = match result {
                Ok(record) => parse_row(&record),
                Err(e) if e.is_io_error() => return Err(PersistenceError::io(path, e)),
                Err(e) => Err(PersistenceError::Format {
                    line: e.position().map_or(0, csv::Position::line),
                    reason: e.to_string(),
                }),
            };

            match row {
                Ok(row) => {
                    let (username, expense) = row.into_parts();
                    self.restore(username, expense);
                    report.loaded += 1;
                }
                Err(e) => {
                    warn!("{e}");
                    report.skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} expenses from {} ({} lines skipped)",
            report.loaded,
            path.display(),
            report.skipped
        );
        Ok(report)
    }
}

/// Splits on bare commas only. Quotes carry no meaning and lines may differ in length.
fn line_reader<R: io::Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(source)
}

fn parse_row(record: &csv::StringRecord) -> PersistenceResult<ExpenseRow> {
    let line = record.position().map_or(0, csv::Position::line);

    if record.len() != ExpenseRow::FIELD_COUNT {
        return Err(PersistenceError::Format {
            line,
            reason: format!(
                "expected {} comma separated fields, found {}",
                ExpenseRow::FIELD_COUNT,
                record.len()
            ),
        });
    }

    // Text fields are kept verbatim, only the amount is trimmed.
    let amount = record[3].trim();
    let mut fields: csv::StringRecord = record.iter().take(3).collect();
    fields.push_field(amount);

    let row: ExpenseRow = fields
        .deserialize(None)
        .map_err(|e| PersistenceError::Format {
            line,
            reason: format!("invalid amount '{amount}': {e}"),
        })?;

    if !row.amount.is_finite() {
        return Err(PersistenceError::Format {
            line,
            reason: format!("non-finite amount '{amount}'"),
        });
    }
    Ok(row)
}
