//! Tests for the conversion module

use super::*;

use std::fs::File;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Decimal128Array, DurationSecondArray, Float64Array,
    Int64Array, ListArray, StringArray, StructArray, TimestampMillisecondArray,
    TimestampSecondArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Fields, Int64Type, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use serde_json::{json, Value};

// ============================================================================
// Helpers
// ============================================================================

fn batch_of(columns: Vec<(&str, ArrayRef)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn sample_batch(rows: i64) -> RecordBatch {
    let ids: Vec<i64> = (0..rows).collect();
    let names: Vec<String> = (0..rows).map(|i| format!("row-{i}")).collect();
    batch_of(vec![
        ("id", Arc::new(Int64Array::from(ids)) as ArrayRef),
        (
            "name",
            Arc::new(StringArray::from(
                names.iter().map(String::as_str).collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
    ])
}

fn write_parquet(path: &std::path::Path, batch: &RecordBatch, max_row_group_size: usize) {
    let file = File::create(path).unwrap();
    let props = WriterProperties::builder()
        .set_max_row_group_size(max_row_group_size)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props)).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

// ============================================================================
// Value Coercion Tests
// ============================================================================

#[test]
fn test_batch_to_records_primitives() {
    let batch = batch_of(vec![
        ("id", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
        (
            "name",
            Arc::new(StringArray::from(vec!["Alice", "Bob"])) as ArrayRef,
        ),
        (
            "active",
            Arc::new(BooleanArray::from(vec![true, false])) as ArrayRef,
        ),
        (
            "score",
            Arc::new(Float64Array::from(vec![98.5, 12.0])) as ArrayRef,
        ),
    ]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["name"], "Alice");
    assert_eq!(records[0]["active"], true);
    assert!((records[0]["score"].as_f64().unwrap() - 98.5).abs() < 0.001);
    assert_eq!(records[1]["name"], "Bob");
}

#[test]
fn test_nulls_stay_null_by_default() {
    let batch = batch_of(vec![(
        "name",
        Arc::new(StringArray::from(vec![Some("a"), None])) as ArrayRef,
    )]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["name"], "a");
    assert!(records[1]["name"].is_null());
}

#[test]
fn test_fill_nulls_replaces_with_empty_string() {
    let batch = batch_of(vec![(
        "name",
        Arc::new(StringArray::from(vec![Some("a"), None])) as ArrayRef,
    )]);

    let options = ConvertOptions::new().with_fill_nulls(true);
    let records = batch_to_records(&batch, &options).unwrap();
    assert_eq!(records[1]["name"], "");
}

#[test]
fn test_timestamp_seconds_to_rfc3339() {
    let batch = batch_of(vec![(
        "ts",
        Arc::new(TimestampSecondArray::from(vec![1_700_000_000i64])) as ArrayRef,
    )]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["ts"], "2023-11-14T22:13:20Z");
}

#[test]
fn test_timestamp_millis_keeps_fraction() {
    let batch = batch_of(vec![(
        "ts",
        Arc::new(TimestampMillisecondArray::from(vec![1_700_000_000_123i64])) as ArrayRef,
    )]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["ts"], "2023-11-14T22:13:20.123Z");
}

#[test]
fn test_date32_to_iso_date() {
    let batch = batch_of(vec![(
        "day",
        Arc::new(Date32Array::from(vec![0, 365])) as ArrayRef,
    )]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["day"], "1970-01-01");
    assert_eq!(records[1]["day"], "1971-01-01");
}

#[test]
fn test_binary_to_base64() {
    let batch = batch_of(vec![(
        "blob",
        Arc::new(arrow::array::BinaryArray::from(vec![&b"abc"[..]])) as ArrayRef,
    )]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["blob"], "YWJj");
}

#[test]
fn test_u64_beyond_i64_becomes_string() {
    let batch = batch_of(vec![(
        "big",
        Arc::new(UInt64Array::from(vec![42u64, u64::MAX])) as ArrayRef,
    )]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["big"], 42);
    assert_eq!(records[1]["big"], u64::MAX.to_string());
}

#[test]
fn test_decimal128_to_string() {
    let decimals = Decimal128Array::from(vec![12345i128])
        .with_precision_and_scale(10, 2)
        .unwrap();
    let batch = batch_of(vec![("amount", Arc::new(decimals) as ArrayRef)]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["amount"], "123.45");
}

#[test]
fn test_list_and_struct_nest() {
    let tags = ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
        Some(vec![Some(1), Some(2)]),
        Some(vec![Some(3)]),
    ]);

    let user = StructArray::new(
        Fields::from(vec![Field::new("id", DataType::Int64, true)]),
        vec![Arc::new(Int64Array::from(vec![7, 8])) as ArrayRef],
        None,
    );

    let batch = batch_of(vec![
        ("tags", Arc::new(tags) as ArrayRef),
        ("user", Arc::new(user) as ArrayRef),
    ]);

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["tags"], json!([1, 2]));
    assert_eq!(records[1]["tags"], json!([3]));
    assert_eq!(records[0]["user"]["id"], 7);
}

#[test]
fn test_unsupported_type_names_the_column() {
    let batch = batch_of(vec![(
        "elapsed",
        Arc::new(DurationSecondArray::from(vec![5i64])) as ArrayRef,
    )]);

    let err = batch_to_records(&batch, &ConvertOptions::new()).unwrap_err();
    assert!(matches!(
        err,
        crate::error::Error::Serialization { ref column, .. } if column == "elapsed"
    ));
}

#[test]
fn test_timestamp_field_name() {
    let schema = Schema::new(vec![Field::new(
        "ts",
        DataType::Timestamp(TimeUnit::Second, None),
        true,
    )]);
    // Field-declared type and array type line up for the batch constructor
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(TimestampSecondArray::from(vec![0i64])) as ArrayRef],
    )
    .unwrap();

    let records = batch_to_records(&batch, &ConvertOptions::new()).unwrap();
    assert_eq!(records[0]["ts"], "1970-01-01T00:00:00Z");
}

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_partition_file_name() {
    assert_eq!(partition_file_name("2025-06-14", 0), "2025-06-14-00000.json");
    assert_eq!(partition_file_name("data", 12), "data-00012.json");
}

#[test]
fn test_write_partition_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![json!({"id": 1}), json!({"id": 2})];

    let path = write_partition(dir.path(), "part", 0, &records, &ConvertOptions::new()).unwrap();

    assert_eq!(path.file_name().unwrap(), "part-00000.json");
    let parsed: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(parsed, records);
}

#[test]
fn test_write_partition_pretty() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![json!({"id": 1})];

    let options = ConvertOptions::new().with_pretty(true);
    let path = write_partition(dir.path(), "part", 0, &records, &options).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'));
    let parsed: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, records);
}

// ============================================================================
// Reader Tests
// ============================================================================

#[test]
fn test_row_group_count_and_per_group_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.parquet");
    write_parquet(&path, &sample_batch(4), 2);

    assert_eq!(row_group_count(&path).unwrap(), 2);

    let batches = read_row_group(&path, 0).unwrap();
    let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    assert_eq!(rows, 2);
}

#[test]
fn test_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.parquet");
    write_parquet(&path, &sample_batch(4), 1024);

    let table = read_file(&path).unwrap();
    assert_eq!(table.num_rows(), 4);
    assert_eq!(table.column_names(), vec!["id", "name"]);
    assert_eq!(row_group_count(&path).unwrap(), 1);
}

#[test]
fn test_read_invalid_parquet_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.parquet");
    std::fs::write(&path, b"not parquet at all").unwrap();

    let err = read_file(&path).unwrap_err();
    assert!(matches!(err, crate::error::Error::Format { .. }));
}

#[test]
fn test_read_dir_merges_files() {
    let dir = tempfile::tempdir().unwrap();
    write_parquet(&dir.path().join("a.parquet"), &sample_batch(3), 1024);
    write_parquet(&dir.path().join("b.parquet"), &sample_batch(2), 1024);

    let table = read_dir(dir.path()).unwrap();
    assert_eq!(table.num_rows(), 5);
}

#[test]
fn test_read_dir_schema_mismatch_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    write_parquet(&dir.path().join("a.parquet"), &sample_batch(1), 1024);

    let other = batch_of(vec![(
        "different",
        Arc::new(Int64Array::from(vec![1])) as ArrayRef,
    )]);
    write_parquet(&dir.path().join("b.parquet"), &other, 1024);

    let err = read_dir(dir.path()).unwrap_err();
    assert!(matches!(err, crate::error::Error::Format { .. }));
}

#[test]
fn test_read_dir_empty_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_dir(dir.path()).unwrap_err();
    assert!(matches!(err, crate::error::Error::Format { .. }));
}

// ============================================================================
// Directory Conversion Tests
// ============================================================================

#[test]
fn test_convert_file_one_document_per_row_group() {
    let parquet_dir = tempfile::tempdir().unwrap();
    let json_dir = tempfile::tempdir().unwrap();
    let path = parquet_dir.path().join("events.parquet");
    write_parquet(&path, &sample_batch(6), 2);

    let summary = convert_file(&path, json_dir.path(), &ConvertOptions::new()).unwrap();

    assert_eq!(summary.documents, 3);
    assert_eq!(summary.rows, 6);
    for index in 0..3 {
        let doc = json_dir.path().join(partition_file_name("events", index));
        let parsed: Vec<Value> = serde_json::from_slice(&std::fs::read(&doc).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
    }
}

#[test]
fn test_convert_directory_ignores_non_parquet() {
    let parquet_dir = tempfile::tempdir().unwrap();
    let json_dir = tempfile::tempdir().unwrap();

    write_parquet(
        &parquet_dir.path().join("a.parquet"),
        &sample_batch(2),
        1024,
    );
    write_parquet(
        &parquet_dir.path().join("b.parquet"),
        &sample_batch(3),
        1024,
    );
    std::fs::write(parquet_dir.path().join("_SUCCESS"), b"").unwrap();

    let summary =
        convert_directory(parquet_dir.path(), json_dir.path(), &ConvertOptions::new()).unwrap();

    assert_eq!(summary.parquet_files, 2);
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.rows, 5);
}
