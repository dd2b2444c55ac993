use std::path::{Path, PathBuf};

use thiserror::Error;

use super::table::Table;
use crate::estimators::error::EstimatorError;

/// Errors raised while producing a [`Table`]
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    /// `line` is the 1-based line of the file, the header being line 1.
    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    Parse {
        line: u64,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Invalid(#[from] EstimatorError),
}

/// Produces the analysis-ready table the comparison runs on.
pub trait DatasetProvider {
    fn load(&self) -> Result<Table, DatasetError>;
}

/// Serves a table that already lives in memory.
#[derive(Debug, Clone)]
pub struct InMemoryProvider {
    table: Table,
}

impl InMemoryProvider {
    pub fn new(table: Table) -> Self {
        InMemoryProvider { table }
    }
}

impl DatasetProvider for InMemoryProvider {
    fn load(&self) -> Result<Table, DatasetError> {
        Ok(self.table.clone())
    }
}

/// Reads a headered CSV file whose every column is numeric.
///
/// Cleaning and encoding are the job of whoever wrote the file: an empty or
/// non-numeric cell is an error.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
    target: String,
    delimiter: u8,
}

impl CsvProvider {
    pub fn new<P: AsRef<Path>>(path: P, target: &str) -> Self {
        CsvProvider {
            path: path.as_ref().to_path_buf(),
            target: target.to_string(),
            delimiter: b',',
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parses CSV content from any reader.
    pub fn read_from<R: std::io::Read>(&self, reader: R) -> Result<Table, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map_or(row as u64 + 2, |position| position.line());
            for (j, field) in record.iter().enumerate() {
                let value = field.parse::<f64>().map_err(|_| DatasetError::Parse {
                    line,
                    column: headers[j].clone(),
                    value: field.to_string(),
                })?;
                columns[j].push(value);
            }
        }

        log::debug!(
            "read {} columns and {} rows from csv",
            headers.len(),
            columns.first().map_or(0, Vec::len)
        );

        let table = Table::new(headers.into_iter().zip(columns).collect(), &self.target)?;
        Ok(table)
    }
}

impl DatasetProvider for CsvProvider {
    fn load(&self) -> Result<Table, DatasetError> {
        let file = std::fs::File::open(&self.path).map_err(csv::Error::from)?;
        self.read_from(file)
    }
}
