//! Utility modules for Arrow extraction, Parquet IO and logging.

pub mod arrow;
pub mod io;
pub mod logging;
