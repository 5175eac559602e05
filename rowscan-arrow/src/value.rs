//! Reading single cells of Arrow arrays as [`Value`]s.

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type,
    Int64Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use rowscan_result::{Error, Result};
use rowscan_types::Value;

const MILLIS_PER_DAY: i64 = 86_400_000;

fn downcast_failed(data_type: &DataType) -> Error {
    Error::Internal(format!("array does not match its data type {data_type:?}"))
}

macro_rules! primitive_value {
    ($array:expr, $index:expr, $arrow_ty:ty, $variant:ident) => {{
        let typed = $array
            .as_primitive_opt::<$arrow_ty>()
            .ok_or_else(|| downcast_failed($array.data_type()))?;
        Value::$variant(typed.value($index).into())
    }};
}

/// Reads row `index` of `array`.
pub fn value_at(array: &dyn Array, index: usize) -> Result<Value> {
    if array.is_null(index) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Boolean => {
            let typed = array
                .as_boolean_opt()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Boolean(typed.value(index))
        }
        DataType::Int8 => primitive_value!(array, index, Int8Type, Int),
        DataType::Int16 => primitive_value!(array, index, Int16Type, Int),
        DataType::Int32 => primitive_value!(array, index, Int32Type, Int),
        DataType::Int64 => primitive_value!(array, index, Int64Type, Int),
        DataType::UInt8 => primitive_value!(array, index, UInt8Type, UInt),
        DataType::UInt16 => primitive_value!(array, index, UInt16Type, UInt),
        DataType::UInt32 => primitive_value!(array, index, UInt32Type, UInt),
        DataType::UInt64 => primitive_value!(array, index, UInt64Type, UInt),
        DataType::Float32 => primitive_value!(array, index, Float32Type, Float),
        DataType::Float64 => primitive_value!(array, index, Float64Type, Float),
        DataType::Utf8 => {
            let typed = array
                .as_string_opt::<i32>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Text(typed.value(index).to_string())
        }
        DataType::LargeUtf8 => {
            let typed = array
                .as_string_opt::<i64>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Text(typed.value(index).to_string())
        }
        DataType::Utf8View => {
            let typed = array
                .as_string_view_opt()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Text(typed.value(index).to_string())
        }
        DataType::Binary => {
            let typed = array
                .as_binary_opt::<i32>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Bytes(typed.value(index).to_vec())
        }
        DataType::LargeBinary => {
            let typed = array
                .as_binary_opt::<i64>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Bytes(typed.value(index).to_vec())
        }
        DataType::FixedSizeBinary(_) => {
            let typed = array
                .as_fixed_size_binary_opt()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Bytes(typed.value(index).to_vec())
        }
        DataType::Date32 => primitive_value!(array, index, Date32Type, Date32),
        DataType::Date64 => {
            let typed = array
                .as_primitive_opt::<Date64Type>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            let days = typed.value(index).div_euclid(MILLIS_PER_DAY);
            Value::Date32(
                i32::try_from(days).map_err(|_| Error::out_of_range("date", days))?,
            )
        }
        DataType::Timestamp(unit, _) => Value::Timestamp(timestamp_micros(array, index, unit)?),
        DataType::Decimal128(_, _) => {
            let typed = array
                .as_primitive_opt::<arrow::datatypes::Decimal128Type>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            Value::Text(typed.value_as_string(index))
        }
        DataType::List(_) => {
            let typed = array
                .as_list_opt::<i32>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            list_values(typed.value(index).as_ref())?
        }
        DataType::LargeList(_) => {
            let typed = array
                .as_list_opt::<i64>()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            list_values(typed.value(index).as_ref())?
        }
        DataType::FixedSizeList(_, _) => {
            let typed = array
                .as_fixed_size_list_opt()
                .ok_or_else(|| downcast_failed(array.data_type()))?;
            list_values(typed.value(index).as_ref())?
        }
        other => {
            return Err(Error::Cursor(format!(
                "unsupported column type {other:?}"
            )));
        }
    };
    Ok(value)
}

fn list_values(values: &dyn Array) -> Result<Value> {
    let items = (0..values.len())
        .map(|idx| value_at(values, idx))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::List(items))
}

fn timestamp_micros(array: &dyn Array, index: usize, unit: &TimeUnit) -> Result<i64> {
    let micros = match unit {
        TimeUnit::Second => {
            let raw = array
                .as_primitive_opt::<TimestampSecondType>()
                .ok_or_else(|| downcast_failed(array.data_type()))?
                .value(index);
            raw.checked_mul(1_000_000)
                .ok_or_else(|| Error::out_of_range("timestamp", raw))?
        }
        TimeUnit::Millisecond => {
            let raw = array
                .as_primitive_opt::<TimestampMillisecondType>()
                .ok_or_else(|| downcast_failed(array.data_type()))?
                .value(index);
            raw.checked_mul(1_000)
                .ok_or_else(|| Error::out_of_range("timestamp", raw))?
        }
        TimeUnit::Microsecond => array
            .as_primitive_opt::<TimestampMicrosecondType>()
            .ok_or_else(|| downcast_failed(array.data_type()))?
            .value(index),
        TimeUnit::Nanosecond => array
            .as_primitive_opt::<TimestampNanosecondType>()
            .ok_or_else(|| downcast_failed(array.data_type()))?
            .value(index)
            .div_euclid(1_000),
    };
    Ok(micros)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{
        ArrayRef, BooleanArray, Date64Array, Int32Array, ListArray, StringArray,
        TimestampMillisecondArray, TimestampNanosecondArray,
    };

    use super::*;

    #[test]
    fn nulls_read_as_null() {
        let array = Int32Array::from(vec![Some(1), None]);
        assert_eq!(value_at(&array, 1).unwrap(), Value::Null);
        assert_eq!(value_at(&array, 0).unwrap(), Value::Int(1));
    }

    #[test]
    fn strings_and_booleans() {
        let names = StringArray::from(vec!["ann"]);
        assert_eq!(value_at(&names, 0).unwrap(), Value::from("ann"));
        let flags = BooleanArray::from(vec![true]);
        assert_eq!(value_at(&flags, 0).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn timestamps_normalize_to_micros() {
        let millis = TimestampMillisecondArray::from(vec![1_500]);
        assert_eq!(value_at(&millis, 0).unwrap(), Value::Timestamp(1_500_000));
        let nanos = TimestampNanosecondArray::from(vec![-1]);
        assert_eq!(value_at(&nanos, 0).unwrap(), Value::Timestamp(-1));
    }

    #[test]
    fn date64_truncates_to_days() {
        let dates = Date64Array::from(vec![MILLIS_PER_DAY * 3 + 5]);
        assert_eq!(value_at(&dates, 0).unwrap(), Value::Date32(3));
    }

    #[test]
    fn lists_read_recursively() {
        let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(1), None]),
            None,
        ]);
        let array: ArrayRef = Arc::new(list);
        assert_eq!(
            value_at(array.as_ref(), 0).unwrap(),
            Value::List(vec![Value::Int(1), Value::Null])
        );
        assert_eq!(value_at(array.as_ref(), 1).unwrap(), Value::Null);
    }
}
