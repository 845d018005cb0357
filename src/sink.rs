use crate::{error::ScrapeError, table::Table};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};
use tracing::debug;

/// Append-only CSV file. The header row is written once, when the file is
/// created or still empty; every later append is rows only.
pub struct CsvSink {
    path: PathBuf,
    headers: Vec<String>,
}

impl CsvSink {
    pub fn new<P: Into<PathBuf>>(path: P, headers: Vec<String>) -> Self {
        CsvSink {
            path: path.into(),
            headers,
        }
    }

    pub fn append(&self, rows: &[Vec<String>]) -> Result<(), ScrapeError> {
        let fresh = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        if fresh {
            writer.write_record(&self.headers)?;
        }
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        debug!("Appended {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}

pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table, ScrapeError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.iter().map(ToString::to_string).collect();

    let mut rows = vec![];
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(ToString::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// One named column of a CSV file, in row order.
pub fn column<P: AsRef<Path>>(path: P, name: &str) -> Result<Vec<String>, ScrapeError> {
    let table = read_table(path)?;
    let index = table
        .headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ScrapeError::UnexpectedColumns {
            expected: vec![name.to_string()],
            observed: table.headers.clone(),
        })?;

    Ok(table
        .rows
        .into_iter()
        .filter_map(|mut row| {
            if index < row.len() {
                Some(row.swap_remove(index))
            } else {
                None
            }
        })
        .collect())
}
