//! Parquet file operations
//!
//! Reading scan record tables and writing scored scans. Neither function is
//! called by the pipeline itself; callers load inputs before a run and persist
//! outputs after it.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::DateFormatConfig;
use crate::error::util::safe_open_file;
use crate::error::{IndicationError, Result};
use crate::models::{REQUIRED_COLUMNS, ScanRecord, ScoredScan};
use crate::utils::arrow::{extract_dates, extract_f64, extract_optional_strings, extract_strings};
use crate::utils::logging::{ScanTable, log_dropped_column, log_table_complete, log_table_start};

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Output columns written before the feature columns
const IDENTITY_COLUMNS: [&str; 3] = ["patient_id", "ct_date", "diff_months"];
/// Output columns written after the feature columns
const PREDICTION_COLUMNS: [&str; 2] = ["probability", "label"];

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> usize {
    std::env::var("PARQUET_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_BATCH_SIZE)
}

/// Convert one record batch into scan records
///
/// Columns outside the required set are carried through as strings.
pub fn records_from_batch(
    batch: &RecordBatch,
    formats: &DateFormatConfig,
    row_offset: usize,
) -> Result<Vec<ScanRecord>> {
    let patient_ids = extract_strings(batch, "patient_id", row_offset)?;
    let diagnosis_dates = extract_dates(batch, "diagnosis_date", formats, row_offset)?;
    let ct_dates = extract_dates(batch, "ct_date", formats, row_offset)?;
    let provider_types = extract_strings(batch, "provider_type", row_offset)?;
    let reports = extract_strings(batch, "report_text", row_offset)?;
    let symptoms = extract_f64(batch, "symptom_diagnosis", row_offset)?;
    let lung_diseases = extract_f64(batch, "lungdisease_diagnosis", row_offset)?;
    let xrays = extract_f64(batch, "xray_count", row_offset)?;

    let schema = batch.schema();
    let mut extras: Vec<(String, Vec<Option<String>>)> = Vec::new();
    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        if REQUIRED_COLUMNS.contains(&field.name().as_str()) {
            continue;
        }
        match extract_optional_strings(column)? {
            Some(values) => extras.push((field.name().clone(), values)),
            None => log_dropped_column(
                field.name(),
                &format!("type {} cannot be carried through", field.data_type()),
            ),
        }
    }

    let records = (0..batch.num_rows())
        .map(|row| {
            let mut record = ScanRecord::new(
                patient_ids[row].clone(),
                diagnosis_dates[row],
                ct_dates[row],
                provider_types[row].clone(),
                reports[row].clone(),
            )
            .with_counts(symptoms[row], lung_diseases[row], xrays[row]);
            for (name, values) in &extras {
                if let Some(value) = &values[row] {
                    record.extra.insert(name.clone(), value.clone());
                }
            }
            record
        })
        .collect();

    Ok(records)
}

/// Read all scan records from a Parquet file
pub fn read_scan_records(path: &Path, formats: &DateFormatConfig) -> Result<Vec<ScanRecord>> {
    log_table_start(ScanTable::Records, path);
    let start = Instant::now();

    let file = safe_open_file(path, "scan record table")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(get_batch_size())
        .build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let batch_records = records_from_batch(&batch, formats, records.len())?;
        records.extend(batch_records);
    }

    log_table_complete(ScanTable::Records, path, records.len(), start.elapsed());
    Ok(records)
}

/// Build the output record batch for scored scans
///
/// `feature_schema` fixes the order of the feature columns; a scan missing
/// one of them is a schema error.
pub fn scored_scans_to_batch(
    scans: &[ScoredScan],
    feature_schema: &[String],
) -> Result<RecordBatch> {
    let reserved: BTreeSet<&str> = IDENTITY_COLUMNS
        .iter()
        .chain(PREDICTION_COLUMNS.iter())
        .copied()
        .chain(feature_schema.iter().map(String::as_str))
        .collect();
    let (clashing, extra_columns): (BTreeSet<&str>, BTreeSet<&str>) = scans
        .iter()
        .flat_map(|scan| scan.extra.keys().map(String::as_str))
        .partition(|name| reserved.contains(name));
    for name in clashing {
        log_dropped_column(name, "name clashes with an output column");
    }

    let mut fields = vec![
        Field::new("patient_id", DataType::Utf8, false),
        Field::new("ct_date", DataType::Date32, false),
        Field::new("diff_months", DataType::Float64, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            scans.iter().map(|s| s.patient_id.as_str()),
        )),
        Arc::new(Date32Array::from_iter_values(
            scans.iter().map(|s| Date32Type::from_naive_date(s.ct_date)),
        )),
        Arc::new(Float64Array::from_iter_values(
            scans.iter().map(|s| s.diff_months),
        )),
    ];

    for name in feature_schema {
        let values = scans
            .iter()
            .map(|scan| {
                scan.features.get(name).ok_or_else(|| {
                    IndicationError::schema(format!(
                        "Scan of patient {} has no feature '{name}'",
                        scan.patient_id
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        fields.push(Field::new(name, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(values)));
    }

    fields.push(Field::new("probability", DataType::Float64, false));
    columns.push(Arc::new(Float64Array::from_iter_values(
        scans.iter().map(|s| s.prediction.probability),
    )));
    fields.push(Field::new("label", DataType::Utf8, false));
    columns.push(Arc::new(StringArray::from_iter_values(
        scans.iter().map(|s| s.prediction.label.as_str()),
    )));

    for name in extra_columns {
        fields.push(Field::new(name, DataType::Utf8, true));
        columns.push(Arc::new(StringArray::from(
            scans
                .iter()
                .map(|s| s.extra.get(name).map(String::as_str))
                .collect::<Vec<Option<&str>>>(),
        )));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Write scored scans to a Parquet file
pub fn write_scored_scans(
    path: &Path,
    scans: &[ScoredScan],
    feature_schema: &[String],
) -> Result<()> {
    log_table_start(ScanTable::Scored, path);
    let start = Instant::now();

    let batch = scored_scans_to_batch(scans, feature_schema)?;
    let file = File::create(path).map_err(|e| IndicationError::io_at(e, path))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    log_table_complete(ScanTable::Scored, path, scans.len(), start.elapsed());
    Ok(())
}
