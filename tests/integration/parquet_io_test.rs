//! Parquet reading and writing round trips through real files

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Date32Array, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Date32Type, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use ct_indication::{
    DateFormatConfig, KeyphraseDictionary, Pipeline, PipelineConfig, read_scan_records,
    write_scored_scans,
};

use crate::utils::{SAMPLE_REPORT, date, model};

fn write_batch(path: &Path, batch: &RecordBatch) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

fn read_batch(path: &Path) -> RecordBatch {
    let file = File::open(path).unwrap();
    let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    reader.next().unwrap().unwrap()
}

/// Input table with string diagnosis dates, native scan dates and integer counts
fn input_batch() -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("patient_id", DataType::Utf8, false),
        Field::new("diagnosis_date", DataType::Utf8, false),
        Field::new("ct_date", DataType::Date32, false),
        Field::new("provider_type", DataType::Utf8, false),
        Field::new("report_text", DataType::Utf8, false),
        Field::new("symptom_diagnosis", DataType::Int64, false),
        Field::new("lungdisease_diagnosis", DataType::Int64, false),
        Field::new("xray_count", DataType::Float64, false),
        Field::new("encounter_id", DataType::Int64, true),
    ]);

    let ct_dates = [date(2020, 1, 1), date(2020, 3, 1), date(2020, 7, 19)];
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["P1", "P2", "P1"])),
        Arc::new(StringArray::from(vec!["2019-11-20", "02/14/2020", "2019-11-20"])),
        Arc::new(Date32Array::from_iter_values(
            ct_dates.iter().map(|d| Date32Type::from_naive_date(*d)),
        )),
        Arc::new(StringArray::from(vec![
            "Oncology",
            "Internal Medicine",
            "Radiation Oncology",
        ])),
        Arc::new(StringArray::from(vec![SAMPLE_REPORT, "FINDINGS: cough", ""])),
        Arc::new(Int64Array::from(vec![0, 2, -1])),
        Arc::new(Int64Array::from(vec![0, 0, 1])),
        Arc::new(Float64Array::from(vec![1.0, 0.0, 4.0])),
        Arc::new(Int64Array::from(vec![Some(101), None, Some(103)])),
    ];

    RecordBatch::try_new(Arc::new(schema), columns).unwrap()
}

#[test]
fn test_read_scan_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scans.parquet");
    write_batch(&path, &input_batch());

    let records = read_scan_records(&path, &DateFormatConfig::default()).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].patient_id, "P1");
    assert_eq!(records[1].diagnosis_date, date(2020, 2, 14));
    assert_eq!(records[2].ct_date, date(2020, 7, 19));
    assert_eq!(records[1].provider_type, "Internal Medicine");
    assert_eq!(records[0].report_text, SAMPLE_REPORT);
    assert_eq!(records[1].symptom_diagnosis, 2.0);
    assert_eq!(records[2].symptom_diagnosis, -1.0);
    assert_eq!(records[2].xray_count, 4.0);

    assert_eq!(records[0].extra.get("encounter_id").map(String::as_str), Some("101"));
    assert!(records[1].extra.is_empty());
}

#[test]
fn test_missing_column_is_schema_error() {
    let batch = input_batch();
    let index = batch.schema().index_of("provider_type").unwrap();
    let mut trimmed = batch.clone();
    trimmed.remove_column(index);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scans.parquet");
    write_batch(&path, &trimmed);

    let err = read_scan_records(&path, &DateFormatConfig::default()).unwrap_err();
    assert!(err.to_string().contains("provider_type"));
}

#[test]
fn test_unparseable_date_is_schema_error() {
    let batch = input_batch();
    let schema = batch.schema();
    let index = schema.index_of("diagnosis_date").unwrap();
    let mut columns = batch.columns().to_vec();
    columns[index] = Arc::new(StringArray::from(vec!["2019-11-20", "someday", "2019-11-20"]));
    let batch = RecordBatch::try_new(schema, columns).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scans.parquet");
    write_batch(&path, &batch);

    let err = read_scan_records(&path, &DateFormatConfig::default()).unwrap_err();
    assert!(err.to_string().contains("someday"));
}

#[test]
fn test_non_finite_count_is_schema_error() {
    let batch = input_batch();
    let schema = batch.schema();
    let index = schema.index_of("xray_count").unwrap();
    let mut columns = batch.columns().to_vec();
    columns[index] = Arc::new(Float64Array::from(vec![1.0, f64::NAN, 4.0]));
    let batch = RecordBatch::try_new(schema, columns).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scans.parquet");
    write_batch(&path, &batch);

    let err = read_scan_records(&path, &DateFormatConfig::default()).unwrap_err();
    let message = err.to_string();
    assert!(!err.is_config());
    assert!(message.contains("xray_count"), "{message}");
    assert!(message.contains("row 1"), "{message}");
}

#[test]
fn test_missing_input_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_scan_records(&dir.path().join("absent.parquet"), &DateFormatConfig::default())
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_write_scored_scans() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scans.parquet");
    let output = dir.path().join("scored.parquet");
    write_batch(&input, &input_batch());

    let records = read_scan_records(&input, &DateFormatConfig::default()).unwrap();
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        KeyphraseDictionary::lung_cancer_default().unwrap(),
        model(-0.5, &[("provider_onc", 1.0), ("Surveillance", 0.5)], 0.5),
    )
    .unwrap();
    let result = pipeline.run(&records).unwrap();
    assert_eq!(result.notices.len(), 1);

    let schema = pipeline.feature_schema();
    write_scored_scans(&output, &result.scans, &schema).unwrap();

    let batch = read_batch(&output);
    assert_eq!(batch.num_rows(), 3);

    let names: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(&names[..3], ["patient_id", "ct_date", "diff_months"]);
    assert_eq!(&names[3..3 + schema.len()], &schema[..]);
    assert_eq!(
        &names[3 + schema.len()..],
        ["probability", "label", "encounter_id"]
    );

    let diff = batch
        .column_by_name("diff_months")
        .unwrap()
        .as_primitive::<Float64Type>();
    assert_eq!(diff.value(0), 0.0);
    assert_eq!(diff.value(2), 200.0 / 30.0);

    let labels = batch.column_by_name("label").unwrap().as_string::<i32>();
    let expected: Vec<&str> = result
        .scans
        .iter()
        .map(|s| s.prediction.label.as_str())
        .collect();
    assert_eq!(labels.iter().flatten().collect::<Vec<_>>(), expected);
    assert_eq!(labels.value(0), "Surveillance");

    let encounters = batch.column_by_name("encounter_id").unwrap().as_string::<i32>();
    assert_eq!(encounters.value(0), "101");
    assert!(encounters.is_null(1));

    let ct_dates = batch
        .column_by_name("ct_date")
        .unwrap()
        .as_primitive::<Date32Type>();
    assert_eq!(ct_dates.value_as_date(2), Some(date(2020, 7, 19)));
}

#[test]
fn test_write_rejects_vectors_missing_schema_columns() {
    let dir = tempfile::tempdir().unwrap();
    let mut scans = {
        let input = dir.path().join("scans.parquet");
        write_batch(&input, &input_batch());
        let records = read_scan_records(&input, &DateFormatConfig::default()).unwrap();
        Pipeline::new(
            PipelineConfig::default(),
            KeyphraseDictionary::lung_cancer_default().unwrap(),
            model(0.0, &[("Surveillance", 1.0)], 0.5),
        )
        .unwrap()
        .run(&records)
        .unwrap()
        .scans
    };
    scans.truncate(1);

    let schema = vec!["Surveillance".to_string(), "NotAFeature".to_string()];
    let err = write_scored_scans(&dir.path().join("scored.parquet"), &scans, &schema).unwrap_err();
    assert!(err.to_string().contains("NotAFeature"));
}
