use dbclass_core::{AsValue, Error, Result, Value};
use mysql_async::{
    Column,
    consts::{ColumnFlags, ColumnType},
};
use rust_decimal::Decimal;
use time::{Date, Month, PrimitiveDateTime, Time, UtcOffset};

/// Character set number MySQL reports for binary columns.
const BINARY_CHARSET: u16 = 63;

pub(crate) struct ValueWrap(pub(crate) Value);

/// Decode a value read from `column`.
///
/// The text protocol delivers every value as bytes, the column type decides
/// what they mean.
pub(crate) fn decode_value(value: mysql_async::Value, column: &Column) -> Result<Value> {
    type MySQLValue = mysql_async::Value;
    Ok(match value {
        MySQLValue::NULL => Value::Null,
        MySQLValue::Int(v) => Value::Int64(Some(v)),
        MySQLValue::UInt(v) => Value::UInt64(Some(v)),
        MySQLValue::Float(v) => Value::Float32(Some(v)),
        MySQLValue::Double(v) => Value::Float64(Some(v)),
        MySQLValue::Date(year, month, day, hour, minute, second, micro) => {
            let date = Month::try_from(month)
                .ok()
                .and_then(|month| Date::from_calendar_date(year as _, month, day).ok());
            let time = Time::from_hms_micro(hour, minute, second, micro).ok();
            match (date, time, column.column_type()) {
                (Some(date), _, ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE) => {
                    Value::Date(Some(date))
                }
                (Some(date), Some(time), _) => {
                    Value::Timestamp(Some(PrimitiveDateTime::new(date, time)))
                }
                // Zero dates like 0000-00-00
                _ => Value::Unknown(Some(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                ))),
            }
        }
        MySQLValue::Time(negative, days, hours, minutes, seconds, micro) => {
            match Time::from_hms_micro(hours, minutes, seconds, micro) {
                Ok(time) if !negative && days == 0 => Value::Time(Some(time)),
                _ => Value::Unknown(Some(format!(
                    "{}{:02}:{:02}:{:02}",
                    if negative { "-" } else { "" },
                    days * 24 + hours as u32,
                    minutes,
                    seconds
                ))),
            }
        }
        MySQLValue::Bytes(v) => decode_bytes(v, column)?,
    })
}

fn decode_bytes(bytes: Vec<u8>, column: &Column) -> Result<Value> {
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);
    let binary = column.character_set() == BINARY_CHARSET;
    let text = || String::from_utf8_lossy(&bytes).into_owned();
    Ok(match column.column_type() {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            if unsigned {
                Value::UInt64(Some(<u64 as AsValue>::parse(text())?))
            } else {
                Value::Int64(Some(<i64 as AsValue>::parse(text())?))
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT => Value::Float32(Some(<f32 as AsValue>::parse(text())?)),
        ColumnType::MYSQL_TYPE_DOUBLE => Value::Float64(Some(<f64 as AsValue>::parse(text())?)),
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            Value::Decimal(Some(<Decimal as AsValue>::parse(text())?))
        }
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => {
            <Date as AsValue>::parse(text()).map_or_else(|_| Value::Unknown(Some(text())), |v| v.as_value())
        }
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => <PrimitiveDateTime as AsValue>::parse(text())
            .map_or_else(|_| Value::Unknown(Some(text())), |v| v.as_value()),
        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => {
            <Time as AsValue>::parse(text()).map_or_else(|_| Value::Unknown(Some(text())), |v| v.as_value())
        }
        ColumnType::MYSQL_TYPE_BIT | ColumnType::MYSQL_TYPE_GEOMETRY => {
            Value::Blob(Some(bytes.into()))
        }
        ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_STRING
        | ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB => {
            if binary {
                Value::Blob(Some(bytes.into()))
            } else {
                Value::Varchar(Some(String::from_utf8(bytes).map_err(|e| {
                    Error::msg(format!(
                        "Column `{}` contains invalid utf-8: {}",
                        column.name_str(),
                        e
                    ))
                })?))
            }
        }
        ColumnType::MYSQL_TYPE_JSON | ColumnType::MYSQL_TYPE_ENUM | ColumnType::MYSQL_TYPE_SET => {
            Value::Varchar(Some(text()))
        }
        _ => Value::Unknown(Some(text())),
    })
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> std::result::Result<Self, Self::Error> {
        type MySQLValue = mysql_async::Value;
        macro_rules! ensure_date_range {
            ($date:expr) => {{
                let year = $date.year();
                if (0..=9999).contains(&year) {
                    Ok(MySQLValue::Date(
                        year as _,
                        $date.month().into(),
                        $date.day(),
                        $date.hour(),
                        $date.minute(),
                        $date.second(),
                        $date.microsecond(),
                    ))
                } else {
                    Err(Error::msg(format!("Date {} is out of range for MySQL", $date)))
                }
            }};
        }
        Ok(match value.0 {
            _ if value.0.is_null() => MySQLValue::NULL,
            Value::Boolean(Some(v)) => MySQLValue::from(v),
            Value::Int8(Some(v)) => MySQLValue::from(v),
            Value::Int16(Some(v)) => MySQLValue::from(v),
            Value::Int32(Some(v)) => MySQLValue::from(v),
            Value::Int64(Some(v)) => MySQLValue::from(v),
            Value::UInt64(Some(v)) => MySQLValue::from(v),
            Value::Float32(Some(v)) => MySQLValue::from(v),
            Value::Float64(Some(v)) => MySQLValue::from(v),
            Value::Decimal(Some(v)) => MySQLValue::from(v),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => MySQLValue::from(v),
            Value::Blob(Some(v)) => MySQLValue::Bytes(v.into()),
            Value::Date(Some(v)) => MySQLValue::from(v),
            Value::Time(Some(v)) => MySQLValue::from(v),
            Value::Timestamp(Some(v)) => ensure_date_range!(v)?,
            Value::TimestampWithTimezone(Some(v)) => {
                let date_time = v.to_offset(UtcOffset::UTC);
                ensure_date_range!(date_time)?
            }
            Value::Uuid(Some(v)) => MySQLValue::from(v.to_string()),
            _ => {
                return Err(Error::msg(format!(
                    "Value `{:?}` is not supported by MySQL",
                    value.0
                )));
            }
        })
    }
}
