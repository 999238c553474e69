//! Arrow to JSON value coercion
//!
//! Converts record batches into JSON records, one object per row. Coercion
//! rules for types without a native JSON shape:
//!
//! - Timestamps (any unit) -> RFC 3339 string, rendered in UTC
//! - Date32/Date64 -> `YYYY-MM-DD` string
//! - Binary columns -> standard base64 string
//! - Decimal128 -> decimal string
//! - u64 beyond `i64::MAX` -> decimal string; non-finite floats -> null
//!
//! Anything else fails with a serialization error naming the column.

use arrow::array::{
    Array, BinaryArray, BooleanArray, Date32Array, Date64Array, Decimal128Array,
    FixedSizeBinaryArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    Int8Array, LargeBinaryArray, LargeStringArray, ListArray, StringArray, StructArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::convert::ConvertOptions;
use crate::error::{Error, Result};

/// Convert a record batch into JSON records
///
/// Returns one JSON object per row, mapping column name to coerced value.
pub fn batch_to_records(batch: &RecordBatch, options: &ConvertOptions) -> Result<Vec<Value>> {
    let schema = batch.schema();
    let mut records = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let mut record = serde_json::Map::new();

        for (col, field) in schema.fields().iter().enumerate() {
            let mut value = value_at(field.name(), batch.column(col).as_ref(), row)?;
            if options.fill_nulls() && value.is_null() {
                value = Value::String(String::new());
            }
            record.insert(field.name().clone(), value);
        }

        records.push(Value::Object(record));
    }

    Ok(records)
}

fn downcast<'a, T: 'static>(column: &str, array: &'a dyn Array) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::serialization(
            column,
            format!("array does not match its declared type {:?}", array.data_type()),
        )
    })
}

/// Coerce one array element to a JSON value
fn value_at(column: &str, array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(Value::Null),

        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(column, array)?;
            Ok(Value::Bool(arr.value(row)))
        }

        DataType::Int8 => {
            let arr = downcast::<Int8Array>(column, array)?;
            Ok(Value::Number(arr.value(row).into()))
        }
        DataType::Int16 => {
            let arr = downcast::<Int16Array>(column, array)?;
            Ok(Value::Number(arr.value(row).into()))
        }
        DataType::Int32 => {
            let arr = downcast::<Int32Array>(column, array)?;
            Ok(Value::Number(arr.value(row).into()))
        }
        DataType::Int64 => {
            let arr = downcast::<Int64Array>(column, array)?;
            Ok(Value::Number(arr.value(row).into()))
        }

        DataType::UInt8 => {
            let arr = downcast::<UInt8Array>(column, array)?;
            Ok(Value::Number(arr.value(row).into()))
        }
        DataType::UInt16 => {
            let arr = downcast::<UInt16Array>(column, array)?;
            Ok(Value::Number(arr.value(row).into()))
        }
        DataType::UInt32 => {
            let arr = downcast::<UInt32Array>(column, array)?;
            Ok(Value::Number(arr.value(row).into()))
        }
        DataType::UInt64 => {
            let arr = downcast::<UInt64Array>(column, array)?;
            // u64 can exceed i64; degrade to a string rather than lose digits
            let val = arr.value(row);
            match i64::try_from(val) {
                Ok(signed) => Ok(Value::Number(signed.into())),
                Err(_) => Ok(Value::String(val.to_string())),
            }
        }

        DataType::Float32 => {
            let arr = downcast::<Float32Array>(column, array)?;
            let val = f64::from(arr.value(row));
            Ok(serde_json::Number::from_f64(val).map_or(Value::Null, Value::Number))
        }
        DataType::Float64 => {
            let arr = downcast::<Float64Array>(column, array)?;
            let val = arr.value(row);
            Ok(serde_json::Number::from_f64(val).map_or(Value::Null, Value::Number))
        }

        DataType::Utf8 => {
            let arr = downcast::<StringArray>(column, array)?;
            Ok(Value::String(arr.value(row).to_string()))
        }
        DataType::LargeUtf8 => {
            let arr = downcast::<LargeStringArray>(column, array)?;
            Ok(Value::String(arr.value(row).to_string()))
        }

        DataType::Timestamp(unit, _) => {
            let ts = timestamp_at(column, array, row, unit)?;
            Ok(Value::String(
                ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ))
        }

        DataType::Date32 => {
            let arr = downcast::<Date32Array>(column, array)?;
            let days = i64::from(arr.value(row));
            let date = DateTime::from_timestamp(days * 86_400, 0)
                .ok_or_else(|| Error::serialization(column, "date out of range"))?;
            Ok(Value::String(date.format("%Y-%m-%d").to_string()))
        }
        DataType::Date64 => {
            let arr = downcast::<Date64Array>(column, array)?;
            let date = DateTime::from_timestamp_millis(arr.value(row))
                .ok_or_else(|| Error::serialization(column, "date out of range"))?;
            Ok(Value::String(date.format("%Y-%m-%d").to_string()))
        }

        DataType::Binary => {
            let arr = downcast::<BinaryArray>(column, array)?;
            Ok(Value::String(BASE64.encode(arr.value(row))))
        }
        DataType::LargeBinary => {
            let arr = downcast::<LargeBinaryArray>(column, array)?;
            Ok(Value::String(BASE64.encode(arr.value(row))))
        }
        DataType::FixedSizeBinary(_) => {
            let arr = downcast::<FixedSizeBinaryArray>(column, array)?;
            Ok(Value::String(BASE64.encode(arr.value(row))))
        }

        DataType::Decimal128(_, _) => {
            let arr = downcast::<Decimal128Array>(column, array)?;
            Ok(Value::String(arr.value_as_string(row)))
        }

        DataType::List(_) => {
            let arr = downcast::<ListArray>(column, array)?;
            let values = arr.value(row);
            let mut items = Vec::with_capacity(values.len());
            for i in 0..values.len() {
                items.push(value_at(column, values.as_ref(), i)?);
            }
            Ok(Value::Array(items))
        }

        DataType::Struct(_) => {
            let arr = downcast::<StructArray>(column, array)?;
            let mut obj = serde_json::Map::new();
            for (i, field) in arr.fields().iter().enumerate() {
                let val = value_at(field.name(), arr.column(i).as_ref(), row)?;
                obj.insert(field.name().clone(), val);
            }
            Ok(Value::Object(obj))
        }

        other => Err(Error::serialization(
            column,
            format!("unsupported column type {other:?}"),
        )),
    }
}

fn timestamp_at(
    column: &str,
    array: &dyn Array,
    row: usize,
    unit: &TimeUnit,
) -> Result<DateTime<Utc>> {
    let ts = match unit {
        TimeUnit::Second => {
            let arr = downcast::<TimestampSecondArray>(column, array)?;
            DateTime::from_timestamp(arr.value(row), 0)
        }
        TimeUnit::Millisecond => {
            let arr = downcast::<TimestampMillisecondArray>(column, array)?;
            DateTime::from_timestamp_millis(arr.value(row))
        }
        TimeUnit::Microsecond => {
            let arr = downcast::<TimestampMicrosecondArray>(column, array)?;
            DateTime::from_timestamp_micros(arr.value(row))
        }
        TimeUnit::Nanosecond => {
            let arr = downcast::<TimestampNanosecondArray>(column, array)?;
            Some(DateTime::from_timestamp_nanos(arr.value(row)))
        }
    };

    ts.ok_or_else(|| Error::serialization(column, "timestamp out of range"))
}
