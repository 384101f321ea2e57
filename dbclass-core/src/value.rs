use crate::{AsValue, Error, Result, truncate_long};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use std::fmt::{self, Display};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed SQL value.
///
/// Every variant but `Null` carries an `Option` so that a typed NULL can be
/// represented, the type information is used to coerce parameters into the
/// types reported by the server for a prepared statement.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
    /// Textual representation of a value whose type is not mapped.
    Unknown(Option<String>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l), Self::Decimal(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            (Self::Unknown(l), Self::Unknown(r)) => l == r,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
            Value::Unknown(v) => v.is_none(),
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Convert this value to the type of `ty`.
    ///
    /// `Value::Null` as target keeps the value as is: the backend did not
    /// report a type it knows. Strings are parsed, numbers are converted
    /// with range checks.
    pub fn try_as(self, ty: &Value) -> Result<Value> {
        if self.same_type(ty) || matches!(ty, Value::Null) {
            return Ok(self);
        }
        if self.is_null() {
            return Ok(ty.as_null());
        }
        macro_rules! convert {
            ($target:ty, $variant:path) => {
                $variant(Some(<$target as AsValue>::try_from_value(self)?))
            };
        }
        Ok(match ty {
            Value::Boolean(..) => convert!(bool, Value::Boolean),
            Value::Int8(..) => convert!(i8, Value::Int8),
            Value::Int16(..) => convert!(i16, Value::Int16),
            Value::Int32(..) => convert!(i32, Value::Int32),
            Value::Int64(..) => convert!(i64, Value::Int64),
            Value::UInt64(..) => convert!(u64, Value::UInt64),
            Value::Float32(..) => convert!(f32, Value::Float32),
            Value::Float64(..) => convert!(f64, Value::Float64),
            Value::Decimal(..) => convert!(Decimal, Value::Decimal),
            Value::Varchar(..) => Value::Varchar(Some(self.to_string())),
            Value::Blob(..) => Value::Blob(Some(<Vec<u8>>::try_from_value(self)?.into())),
            Value::Date(..) => convert!(Date, Value::Date),
            Value::Time(..) => convert!(Time, Value::Time),
            Value::Timestamp(..) => convert!(PrimitiveDateTime, Value::Timestamp),
            Value::TimestampWithTimezone(..) => {
                convert!(OffsetDateTime, Value::TimestampWithTimezone)
            }
            Value::Uuid(..) => convert!(Uuid, Value::Uuid),
            Value::Unknown(..) => Value::Unknown(Some(self.to_string())),
            Value::Null => self,
        })
    }

    /// The NULL value of the same type.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::UInt64(..) => Value::UInt64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(..) => Value::Decimal(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
            Value::Unknown(..) => Value::Unknown(None),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        match self {
            Value::Boolean(Some(v)) => v.fmt(f),
            Value::Int8(Some(v)) => v.fmt(f),
            Value::Int16(Some(v)) => v.fmt(f),
            Value::Int32(Some(v)) => v.fmt(f),
            Value::Int64(Some(v)) => v.fmt(f),
            Value::UInt64(Some(v)) => v.fmt(f),
            Value::Float32(Some(v)) => v.fmt(f),
            Value::Float64(Some(v)) => v.fmt(f),
            Value::Decimal(Some(v)) => v.fmt(f),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => f.write_str(v),
            Value::Blob(Some(v)) => {
                f.write_str("\\x")?;
                for b in v.iter() {
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
            Value::Date(Some(v)) => v.fmt(f),
            Value::Time(Some(v)) => v.fmt(f),
            Value::Timestamp(Some(v)) => v.fmt(f),
            Value::TimestampWithTimezone(Some(v)) => v.fmt(f),
            Value::Uuid(Some(v)) => v.fmt(f),
            _ => f.write_str("NULL"),
        }
    }
}

pub(crate) fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert value `{}` ({}) into {}",
        truncate_long!(value.to_string()),
        value_type_name(value),
        std::any::type_name::<T>(),
    ))
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Boolean(..) => "boolean",
        Value::Int8(..) => "int8",
        Value::Int16(..) => "int16",
        Value::Int32(..) => "int32",
        Value::Int64(..) => "int64",
        Value::UInt64(..) => "uint64",
        Value::Float32(..) => "float32",
        Value::Float64(..) => "float64",
        Value::Decimal(..) => "decimal",
        Value::Varchar(..) => "varchar",
        Value::Blob(..) => "blob",
        Value::Date(..) => "date",
        Value::Time(..) => "time",
        Value::Timestamp(..) => "timestamp",
        Value::TimestampWithTimezone(..) => "timestamp with time zone",
        Value::Uuid(..) => "uuid",
        Value::Unknown(..) => "unknown",
    }
}

pub(crate) fn decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}
