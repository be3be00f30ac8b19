//! Bulk import from `;`-separated files.
//!
//! Each non-blank record holds exactly two fields: `source;destination`.
//! Fields containing `;` are double-quoted, as in CSV.

use std::fs;
use std::path::Path;

use crate::registry::{Registry, RegistryError, RedirectEntry};

/// Field separator used by import files.
pub const DELIMITER: u8 = b';';

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed import record: {0}")]
    Csv(#[from] csv::Error),

    #[error("can't import bad line {line}: {content:?}")]
    BadLine { line: u64, content: String },

    #[error("failed to import redirects: {0}")]
    Registry(#[from] RegistryError),
}

/// Parse import records. Fields may be double-quoted to carry the
/// delimiter; blank lines are skipped. Any record without exactly two
/// fields fails the whole parse. Fields are taken verbatim.
pub fn parse_records(input: &str) -> Result<Vec<RedirectEntry>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields: Vec<&str> = record.iter().collect();
        let [source, destination] = fields.as_slice() else {
            return Err(ImportError::BadLine {
                line: record.position().map_or(0, |p| p.line()),
                content: fields.join(";"),
            });
        };
        entries.push(RedirectEntry::new(*source, *destination));
    }
    Ok(entries)
}

/// Read `path` and store every record in one transaction.
pub fn import_file(registry: &Registry, path: &Path) -> Result<usize, ImportError> {
    let input = fs::read_to_string(path)?;
    let entries = parse_records(&input)?;
    tracing::info!(path = %path.display(), records = entries.len(), "Importing redirects");
    Ok(registry.import(entries)?)
}
