//! Arrow utilities for turning record batches into scan records.

pub mod extractors;

pub use extractors::{
    extract_dates, extract_f64, extract_optional_strings, extract_strings, required_column,
};
