use crate::{
    Result, Value,
    value::{conversion_error, decimal_from_f64},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::str::FromStr;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::BorrowedFormatItem, macros::format_description,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used for statement parameters and row decoding.
///
/// # Conversion contract
/// - `try_from_value` accepts the canonical variant for the type, plus
///   textual values (`Varchar` and `Unknown`) which are parsed. Numeric
///   conversions are range checked.
/// - NULL values only convert into `Option<T>`.
///
/// # Examples
/// ```rust
/// use dbclass_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int32(Some(42)));
/// let n: i64 = AsValue::try_from_value(Value::Varchar(Some("42".into()))).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The NULL value of the variant this type maps to.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse a string into `Self`.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Self::try_from_value(Value::Varchar(Some(input.as_ref().to_owned())))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn text(value: &Value) -> Option<&str> {
    match value {
        Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Some(v.trim()),
        _ => None,
    }
}

macro_rules! impl_as_value_integer {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Boolean(Some(v)) => Some(*v as _),
                    Value::Int8(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::Int16(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::Int32(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::Int64(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::UInt64(Some(v)) => <$source>::try_from(*v).ok(),
                    Value::Decimal(Some(v)) if v.fract().is_zero() => {
                        v.to_i128().and_then(|v| <$source>::try_from(v).ok())
                    }
                    _ => text(&value).and_then(|v| v.parse::<$source>().ok()),
                };
                converted.ok_or_else(|| conversion_error::<Self>(&value))
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u64, Value::UInt64);

macro_rules! impl_as_value_float {
    ($source:ty, $variant:path, $to:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Int8(Some(v)) => Some(*v as _),
                    Value::Int16(Some(v)) => Some(*v as _),
                    Value::Int32(Some(v)) => Some(*v as _),
                    Value::Int64(Some(v)) => Some(*v as _),
                    Value::UInt64(Some(v)) => Some(*v as _),
                    Value::Float32(Some(v)) => Some(*v as _),
                    Value::Float64(Some(v)) => Some(*v as _),
                    Value::Decimal(Some(v)) => v.$to(),
                    _ => text(&value).and_then(|v| v.parse::<$source>().ok()),
                };
                converted.ok_or_else(|| conversion_error::<Self>(&value))
            }
        }
    };
}

impl_as_value_float!(f32, Value::Float32, to_f32);
impl_as_value_float!(f64, Value::Float64, to_f64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Boolean(Some(v)) => Some(*v),
            Value::Int8(Some(v)) => Some(*v != 0),
            Value::Int16(Some(v)) => Some(*v != 0),
            Value::Int32(Some(v)) => Some(*v != 0),
            Value::Int64(Some(v)) => Some(*v != 0),
            Value::UInt64(Some(v)) => Some(*v != 0),
            _ => match text(&value).map(str::to_ascii_lowercase).as_deref() {
                Some("true" | "t" | "1" | "yes" | "on") => Some(true),
                Some("false" | "f" | "0" | "no" | "off") => Some(false),
                _ => None,
            },
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Decimal(Some(v)) => Some(*v),
            Value::Int8(Some(v)) => Some((*v).into()),
            Value::Int16(Some(v)) => Some((*v).into()),
            Value::Int32(Some(v)) => Some((*v).into()),
            Value::Int64(Some(v)) => Some((*v).into()),
            Value::UInt64(Some(v)) => Some((*v).into()),
            Value::Float32(Some(v)) => decimal_from_f64(*v as _),
            Value::Float64(Some(v)) => decimal_from_f64(*v),
            _ => text(&value).and_then(|v| Decimal::from_str(v).ok()),
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into())
                .map_err(|e| conversion_error::<Self>(&e.into_bytes().as_value())),
            _ if value.is_null() => Err(conversion_error::<Self>(&value)),
            _ => Ok(value.to_string()),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into()),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Ok(v.into_bytes()),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Uuid(Some(v)) => Some(*v),
            Value::Blob(Some(v)) => Uuid::from_slice(v).ok(),
            _ => text(&value).and_then(|v| Uuid::parse_str(v).ok()),
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]");
const TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day][first [T][ ]][hour]:[minute]:[second][optional [.[subsecond]]]"
);
const TIMESTAMP_TZ: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day][first [T][ ]][hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory][optional [:[offset_minute]]]"
);

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Date(Some(v)) => Some(*v),
            Value::Timestamp(Some(v)) if v.time() == Time::MIDNIGHT => Some(v.date()),
            _ => text(&value).and_then(|v| Date::parse(v, DATE).ok()),
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Time(Some(v)) => Some(*v),
            _ => text(&value).and_then(|v| Time::parse(v, TIME).ok()),
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Timestamp(Some(v)) => Some(*v),
            Value::Date(Some(v)) => Some(v.midnight()),
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_offset(UtcOffset::UTC);
                Some(PrimitiveDateTime::new(v.date(), v.time()))
            }
            _ => text(&value).and_then(|v| PrimitiveDateTime::parse(v, TIMESTAMP).ok()),
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for OffsetDateTime {
    fn as_empty_value() -> Value {
        Value::TimestampWithTimezone(None)
    }
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::TimestampWithTimezone(Some(v)) => Some(*v),
            Value::Timestamp(Some(v)) => Some(v.assume_utc()),
            _ => text(&value).and_then(|v| {
                OffsetDateTime::parse(v, TIMESTAMP_TZ).ok().or_else(|| {
                    PrimitiveDateTime::parse(v, TIMESTAMP)
                        .ok()
                        .map(|v| v.assume_utc())
                })
            }),
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}
