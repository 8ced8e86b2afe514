//! Log lines for scan tables and scoring artifacts

use std::fmt;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};

/// Parquet tables the crate reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTable {
    /// Input scan records
    Records,
    /// Scored scans with features and predictions
    Scored,
}

impl ScanTable {
    const fn rows(self) -> &'static str {
        match self {
            Self::Records => "scan records",
            Self::Scored => "scored scans",
        }
    }
}

impl fmt::Display for ScanTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rows())
    }
}

/// Log the start of a table read or write
pub fn log_table_start(table: ScanTable, path: &Path) {
    match table {
        ScanTable::Records => info!("Reading {table} from {}", path.display()),
        ScanTable::Scored => info!("Writing {table} to {}", path.display()),
    }
}

/// Log a finished table read or write with its row count
pub fn log_table_complete(table: ScanTable, path: &Path, rows: usize, elapsed: Duration) {
    let verb = match table {
        ScanTable::Records => "Read",
        ScanTable::Scored => "Wrote",
    };
    info!("{verb} {rows} {table} at {} in {elapsed:?}", path.display());
}

/// Log a loaded dictionary or model artifact
///
/// `details` is a short summary such as group or coefficient counts.
pub fn log_artifact_loaded(artifact: &str, path: &Path, details: &str) {
    info!("Loaded {artifact} from {} ({details})", path.display());
}

/// Log a table column that is not carried into the output
pub fn log_dropped_column(column: &str, reason: &str) {
    warn!("Dropping column '{column}': {reason}");
}
