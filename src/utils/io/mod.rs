//! IO utilities for file operations
//!
//! Parquet input of scan records and output of scored scans.

pub mod parquet;

// Re-export commonly used functions for convenience
pub use parquet::{
    DEFAULT_BATCH_SIZE, read_scan_records, records_from_batch, scored_scans_to_batch,
    write_scored_scans,
};
