//! Column extraction utilities for Arrow record batches
//!
//! Each extractor pulls one whole column out of a batch as plain Rust values,
//! casting compatible types and rejecting nulls in required columns.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::debug;

use crate::config::DateFormatConfig;
use crate::error::{IndicationError, Result};

/// Get a required column from a record batch
pub fn required_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a ArrayRef> {
    batch.column_by_name(column_name).ok_or_else(|| {
        IndicationError::schema(format!("Missing required column '{column_name}'"))
    })
}

fn null_error(column_name: &str, row: usize) -> IndicationError {
    IndicationError::schema(format!(
        "Null value in required column '{column_name}' at row {row}"
    ))
}

/// Extract a non-null string column
///
/// `row_offset` is added to row numbers in error messages.
pub fn extract_strings(
    batch: &RecordBatch,
    column_name: &str,
    row_offset: usize,
) -> Result<Vec<String>> {
    let column = required_column(batch, column_name)?;
    let strings = cast(column, &DataType::Utf8)?;
    let strings = strings.as_string::<i32>();

    (0..strings.len())
        .map(|row| {
            if strings.is_null(row) {
                Err(null_error(column_name, row_offset + row))
            } else {
                Ok(strings.value(row).to_string())
            }
        })
        .collect()
}

/// Extract a non-null numeric column as `f64`
///
/// NaN and infinite values are rejected along with nulls.
pub fn extract_f64(batch: &RecordBatch, column_name: &str, row_offset: usize) -> Result<Vec<f64>> {
    let column = required_column(batch, column_name)?;
    if !column.data_type().is_numeric() {
        return Err(IndicationError::schema(format!(
            "Column '{column_name}' must be numeric, found {}",
            column.data_type()
        )));
    }

    let values = cast(column, &DataType::Float64)?;
    let values = values.as_primitive::<Float64Type>();

    (0..values.len())
        .map(|row| {
            if values.is_null(row) {
                return Err(null_error(column_name, row_offset + row));
            }
            let value = values.value(row);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(IndicationError::schema(format!(
                    "Non-finite value {value} in column '{column_name}' at row {}",
                    row_offset + row
                )))
            }
        })
        .collect()
}

/// Extract a non-null date column
///
/// Date and timestamp columns are converted directly; string columns are
/// parsed with the configured formats.
pub fn extract_dates(
    batch: &RecordBatch,
    column_name: &str,
    formats: &DateFormatConfig,
    row_offset: usize,
) -> Result<Vec<NaiveDate>> {
    let column = required_column(batch, column_name)?;

    match column.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            debug!("Parsing string dates in column '{column_name}'");
            let strings = cast(column, &DataType::Utf8)?;
            let strings = strings.as_string::<i32>();
            (0..strings.len())
                .map(|row| {
                    if strings.is_null(row) {
                        return Err(null_error(column_name, row_offset + row));
                    }
                    let raw = strings.value(row);
                    formats.parse(raw).ok_or_else(|| {
                        IndicationError::schema(format!(
                            "Unparseable date '{raw}' in column '{column_name}' at row {}",
                            row_offset + row
                        ))
                    })
                })
                .collect()
        }
        data_type if can_cast_types(data_type, &DataType::Date32) => {
            let dates = cast(column, &DataType::Date32)?;
            let dates = dates.as_primitive::<Date32Type>();
            (0..dates.len())
                .map(|row| {
                    if dates.is_null(row) {
                        return Err(null_error(column_name, row_offset + row));
                    }
                    dates
                        .value_as_date(row)
                        .ok_or_else(|| null_error(column_name, row_offset + row))
                })
                .collect()
        }
        data_type => Err(IndicationError::schema(format!(
            "Column '{column_name}' must hold dates, found {data_type}"
        ))),
    }
}

/// Extract a column as optional strings, or `None` when it cannot be shown as text
pub fn extract_optional_strings(column: &ArrayRef) -> Result<Option<Vec<Option<String>>>> {
    if !can_cast_types(column.data_type(), &DataType::Utf8) {
        return Ok(None);
    }

    let strings = cast(column, &DataType::Utf8)?;
    let strings = strings.as_string::<i32>();
    Ok(Some(
        (0..strings.len())
            .map(|row| (!strings.is_null(row)).then(|| strings.value(row).to_string()))
            .collect(),
    ))
}
