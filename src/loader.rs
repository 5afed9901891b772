//! Tab-separated survey file loader.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::schema;

pub const DELIMITER: u8 = b'\t';

const BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column missing: {0}")]
    MissingColumn(String),
}

/// Header names and rows exactly as read, before any cleaning.
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
    missing_optional: Vec<&'static str>,
}

impl RawTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Optional columns the source header did not carry.
    pub fn missing_optional(&self) -> &[&'static str] {
        &self.missing_optional
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Removes the named columns from the header and every row.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingColumn`] if any name is not in the header.
    pub fn drop_columns(self, names: &[&str]) -> Result<Self, LoadError> {
        let mut dropped = Vec::with_capacity(names.len());
        for name in names {
            let idx = self
                .column_index(name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
            dropped.push(idx);
        }

        let keep = |idx: &usize| !dropped.contains(idx);

        let headers = self
            .headers
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| keep(idx))
            .map(|(_, h)| h)
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(idx, _)| keep(idx))
                    .map(|(_, field)| field)
                    .collect::<StringRecord>()
            })
            .collect();

        debug!(columns = ?names, "Dropped columns");

        Ok(Self {
            headers,
            rows,
            missing_optional: self.missing_optional,
        })
    }
}

/// Reads a survey file from disk.
///
/// # Errors
///
/// Fails if the file is absent or unreadable, if any row is malformed, or if
/// the header lacks a required column.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<RawTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = load_from_reader(file)?;
    info!(
        rows = table.len(),
        columns = table.headers().len(),
        "Survey table loaded"
    );

    Ok(table)
}

/// Parses tab-separated content from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if idx == 0 {
                h.trim_start_matches(BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let missing_optional = schema::validate_header(&headers)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }

    Ok(RawTable {
        headers,
        rows,
        missing_optional,
    })
}
