//! Assign-or-convert rules from scanned [`Value`]s into native Rust types.
//!
//! A value whose variant already matches the target is assigned directly.
//! Otherwise a small set of conversions is attempted: numeric widening and
//! in-range narrowing, integral floats into integers, text parsing into
//! numbers and dates, and rendering of numbers into strings. Anything else is
//! a [`Error::TypeMismatch`] naming both types.

use rowscan_result::{Error, Result};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::date;
use crate::value::Value;

/// Native types that can be produced from a scanned [`Value`].
pub trait FromValue: Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    fn from_value(value: Value) -> Result<Self>;
}

/// 2^127: every integral float in `[-I128_BOUND, I128_BOUND)` fits in `i128`.
const I128_BOUND: f64 = (1u128 << 127) as f64;
/// 2^128: every non-negative integral float below it fits in `u128`.
const U128_BOUND: f64 = u128::MAX as f64;

fn mismatch<T: FromValue>(value: &Value) -> Error {
    Error::type_mismatch(T::TYPE_NAME, value.type_name())
}

macro_rules! impl_from_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i)
                            .map_err(|_| Error::out_of_range(Self::TYPE_NAME, i)),
                        Value::UInt(u) => <$ty>::try_from(u)
                            .map_err(|_| Error::out_of_range(Self::TYPE_NAME, u)),
                        Value::Float(f) => {
                            if f.fract() != 0.0 || !f.is_finite() {
                                return Err(Error::out_of_range(Self::TYPE_NAME, f));
                            }
                            let exact = if (-I128_BOUND..I128_BOUND).contains(&f) {
                                <$ty>::try_from(f as i128).ok()
                            } else if (0.0..U128_BOUND).contains(&f) {
                                <$ty>::try_from(f as u128).ok()
                            } else {
                                None
                            };
                            exact.ok_or_else(|| Error::out_of_range(Self::TYPE_NAME, f))
                        }
                        Value::Text(ref s) => s
                            .trim()
                            .parse::<$ty>()
                            .map_err(|_| mismatch::<Self>(&value)),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::UInt(u) => Ok(u as f64),
            Value::Text(ref s) => s.trim().parse().map_err(|_| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_value(value: Value) -> Result<Self> {
        let wide = match value {
            Value::Text(ref s) => s.trim().parse::<f64>().map_err(|_| mismatch::<Self>(&value))?,
            other => f64::from_value(other).map_err(|err| match err {
                Error::TypeMismatch { found, .. } => Error::type_mismatch(Self::TYPE_NAME, found),
                err => err,
            })?,
        };
        let narrowed = wide as f32;
        if narrowed.is_finite() || !wide.is_finite() {
            Ok(narrowed)
        } else {
            Err(Error::out_of_range(Self::TYPE_NAME, wide))
        }
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            Value::Int(0) | Value::UInt(0) => Ok(false),
            Value::Int(1) | Value::UInt(1) => Ok(true),
            Value::Int(i) => Err(Error::out_of_range(Self::TYPE_NAME, i)),
            Value::UInt(u) => Err(Error::out_of_range(Self::TYPE_NAME, u)),
            Value::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(true),
                "false" | "f" | "0" => Ok(false),
                _ => Err(mismatch::<Self>(&value)),
            },
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Bytes(bytes) => {
                String::from_utf8(bytes).map_err(|_| Error::type_mismatch(Self::TYPE_NAME, "bytes"))
            }
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::UInt(u) => Ok(u.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Date32(days) => date::date_from_days(days)
                .map(date::format_date)
                .ok_or_else(|| Error::out_of_range(Self::TYPE_NAME, days)),
            Value::Timestamp(micros) => date::datetime_from_micros(micros)
                .map(|dt| date::format_datetime(PrimitiveDateTime::new(dt.date(), dt.time())))
                .ok_or_else(|| Error::out_of_range(Self::TYPE_NAME, micros)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "Value";

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for Date {
    const TYPE_NAME: &'static str = "time::Date";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date32(days) => date::date_from_days(days)
                .ok_or_else(|| Error::out_of_range(Self::TYPE_NAME, days)),
            Value::Timestamp(micros) => date::datetime_from_micros(micros)
                .map(|dt| dt.date())
                .ok_or_else(|| Error::out_of_range(Self::TYPE_NAME, micros)),
            Value::Text(ref s) => date::parse_date(s).ok_or_else(|| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for OffsetDateTime {
    const TYPE_NAME: &'static str = "time::OffsetDateTime";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(micros) => date::datetime_from_micros(micros)
                .ok_or_else(|| Error::out_of_range(Self::TYPE_NAME, micros)),
            Value::Date32(days) => date::date_from_days(days)
                .map(|d| d.midnight().assume_utc())
                .ok_or_else(|| Error::out_of_range(Self::TYPE_NAME, days)),
            Value::Text(ref s) => date::parse_datetime(s)
                .map(PrimitiveDateTime::assume_utc)
                .ok_or_else(|| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for PrimitiveDateTime {
    const TYPE_NAME: &'static str = "time::PrimitiveDateTime";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(ref s) => date::parse_datetime(s).ok_or_else(|| mismatch::<Self>(&value)),
            other => OffsetDateTime::from_value(other)
                .map(|dt| PrimitiveDateTime::new(dt.date(), dt.time()))
                .map_err(|err| match err {
                    Error::TypeMismatch { found, .. } => {
                        Error::type_mismatch(Self::TYPE_NAME, found)
                    }
                    err => err,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_narrow_within_range() {
        assert_eq!(i32::from_value(Value::Int(42)).unwrap(), 42);
        assert_eq!(u8::from_value(Value::UInt(255)).unwrap(), 255);
        assert!(matches!(
            i8::from_value(Value::Int(300)),
            Err(Error::ValueOutOfRange { target: "i8", .. })
        ));
        assert!(matches!(
            u32::from_value(Value::Int(-1)),
            Err(Error::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn integral_floats_convert_to_integers() {
        assert_eq!(i64::from_value(Value::Float(2.0)).unwrap(), 2);
        assert!(i64::from_value(Value::Float(2.5)).is_err());
    }

    #[test]
    fn floats_beyond_the_target_range_are_rejected() {
        let two_pow_63 = 9_223_372_036_854_775_808.0;
        assert!(matches!(
            i64::from_value(Value::Float(two_pow_63)),
            Err(Error::ValueOutOfRange { target: "i64", .. })
        ));
        assert_eq!(i64::from_value(Value::Float(-two_pow_63)).unwrap(), i64::MIN);
        assert_eq!(u128::from_value(Value::Float(2e38)).unwrap(), 2e38 as u128);
        assert!(matches!(
            u128::from_value(Value::Float(4e38)),
            Err(Error::ValueOutOfRange { target: "u128", .. })
        ));
        assert!(matches!(
            i128::from_value(Value::Float(2e38)),
            Err(Error::ValueOutOfRange { target: "i128", .. })
        ));
        assert_eq!(u8::from_value(Value::Float(255.0)).unwrap(), 255);
    }

    #[test]
    fn text_parses_into_numbers() {
        assert_eq!(i64::from_value(Value::from(" 17 ")).unwrap(), 17);
        assert_eq!(f64::from_value(Value::from("1.5")).unwrap(), 1.5);
        assert!(matches!(
            i64::from_value(Value::from("abc")),
            Err(Error::TypeMismatch {
                expected: "i64",
                found: "text"
            })
        ));
    }

    #[test]
    fn null_is_not_assignable_to_plain_scalars() {
        let err = String::from_value(Value::Null).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "String",
                found: "null"
            }
        ));
    }

    #[test]
    fn numbers_render_into_strings() {
        assert_eq!(String::from_value(Value::Int(5)).unwrap(), "5");
        assert_eq!(String::from_value(Value::Boolean(true)).unwrap(), "true");
        assert_eq!(String::from_value(Value::Date32(0)).unwrap(), "1970-01-01");
    }

    #[test]
    fn booleans_accept_flags() {
        assert!(bool::from_value(Value::Int(1)).unwrap());
        assert!(!bool::from_value(Value::from("f")).unwrap());
        assert!(bool::from_value(Value::Float(1.0)).is_err());
    }

    #[test]
    fn dates_from_days_and_timestamps() {
        let d = Date::from_value(Value::Date32(1)).unwrap();
        assert_eq!(date::format_date(d), "1970-01-02");
        let ts = OffsetDateTime::from_value(Value::Timestamp(1_500_000)).unwrap();
        assert_eq!(ts.unix_timestamp(), 1);
        assert_eq!(ts.microsecond(), 500_000);
    }
}
