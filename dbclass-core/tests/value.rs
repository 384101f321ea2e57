#[cfg(test)]
mod tests {
    use dbclass_core::{AsValue, Value};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::macros::{date, datetime, time};

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Null.is_null());
        assert!(Value::Int32(None).is_null());
        assert!(!Value::Varchar(Some("".into())).is_null());
        assert_eq!(Value::Int32(None), Value::Int32(None));
        assert_ne!(Value::Int32(None), Value::Int64(None));
        assert_eq!(Value::Decimal(Some(Decimal::ONE)).as_null(), Value::Decimal(None));
        assert_eq!(Value::from(None::<i64>), Value::Int64(None));
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value(Value::Varchar(None)).unwrap(),
            None
        );
        assert!(i32::try_from_value(Value::Null).is_err());
        assert!(String::try_from_value(Value::Varchar(None)).is_err());
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Boolean(Some(false)));
        assert_ne!(val, Value::Boolean(None));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert!(bool::try_from_value(val).unwrap());
        assert!(bool::try_from_value(1i16.into()).unwrap());
        assert!(bool::try_from_value(8i32.into()).unwrap());
        assert!(!bool::try_from_value(0i64.into()).unwrap());
        assert!(bool::try_from_value("1".into()).unwrap());
        assert!(!bool::try_from_value("false".into()).unwrap());
        assert!(bool::try_from_value(0.5f32.into()).is_err());
        assert!(bool::try_from_value("maybe".into()).is_err());
    }

    #[test]
    fn value_integers() {
        assert_eq!(Value::from(-5i16), Value::Int16(Some(-5)));
        assert_eq!(Value::from(42i32), Value::Int32(Some(42)));
        assert_eq!(Value::from(1i64 << 40), Value::Int64(Some(1 << 40)));
        assert_eq!(Value::from(u64::MAX), Value::UInt64(Some(u64::MAX)));
        assert_eq!(Value::from(-8i8), Value::Int8(Some(-8)));
        assert_eq!(i8::try_from_value(Value::Int32(Some(97))).unwrap(), 97);
        assert!(i8::try_from_value(Value::Int16(Some(200))).is_err());
        assert_eq!(i64::try_from_value(Value::Int8(Some(-1))).unwrap(), -1);

        assert_eq!(i64::try_from_value(Value::Int16(Some(-7))).unwrap(), -7);
        assert_eq!(i32::try_from_value(Value::Boolean(Some(true))).unwrap(), 1);
        assert_eq!(i16::try_from_value(Value::Int64(Some(300))).unwrap(), 300);
        assert!(i16::try_from_value(Value::Int64(Some(70_000))).is_err());
        assert!(u64::try_from_value(Value::Int32(Some(-1))).is_err());
        assert!(i64::try_from_value(Value::UInt64(Some(u64::MAX))).is_err());

        // Decimals only when integral
        let integral = Decimal::from_str("12.000").unwrap();
        assert_eq!(i32::try_from_value(integral.into()).unwrap(), 12);
        let fractional = Decimal::from_str("12.5").unwrap();
        assert!(i32::try_from_value(fractional.into()).is_err());

        // Text is parsed and trimmed
        assert_eq!(i64::try_from_value(" 123 ".into()).unwrap(), 123);
        assert_eq!(<u64 as AsValue>::parse("18446744073709551615").unwrap(), u64::MAX);
        assert!(i32::try_from_value("12abc".into()).is_err());
        assert!(i32::try_from_value(Value::Float64(Some(1.0))).is_err());
    }

    #[test]
    fn value_floats() {
        assert_eq!(Value::from(0.25f32), Value::Float32(Some(0.25)));
        assert_eq!(Value::from(0.25f64), Value::Float64(Some(0.25)));
        assert_eq!(f64::try_from_value(Value::Int32(Some(3))).unwrap(), 3.0);
        assert_eq!(f32::try_from_value(Value::Float64(Some(1.5))).unwrap(), 1.5);
        assert_eq!(
            f64::try_from_value(Decimal::from_str("2.75").unwrap().into()).unwrap(),
            2.75
        );
        assert_eq!(f64::try_from_value("-0.5".into()).unwrap(), -0.5);
        assert!(f64::try_from_value(Value::Boolean(Some(true))).is_err());
    }

    #[test]
    fn value_decimal() {
        let price = Decimal::from_str("1234.56").unwrap();
        assert_eq!(Value::from(price), Value::Decimal(Some(price)));
        assert_eq!(Decimal::try_from_value("1234.56".into()).unwrap(), price);
        assert_eq!(
            Decimal::try_from_value(Value::Int64(Some(7))).unwrap(),
            Decimal::from(7)
        );
        assert_eq!(
            Decimal::try_from_value(Value::Float64(Some(0.5))).unwrap(),
            Decimal::from_str("0.5").unwrap()
        );
        assert!(Decimal::try_from_value("1,5".into()).is_err());
    }

    #[test]
    fn value_text_and_blob() {
        assert_eq!(Value::from("Zoë"), Value::Varchar(Some("Zoë".into())));
        assert_eq!(Value::from(String::from("abc")), Value::Varchar(Some("abc".into())));
        assert_eq!(String::try_from_value(Value::Int32(Some(5))).unwrap(), "5");
        assert_eq!(
            String::try_from_value(Value::Unknown(Some("(1,2)".into()))).unwrap(),
            "(1,2)"
        );
        assert_eq!(
            String::try_from_value(Value::Blob(Some(b"raw".to_vec().into()))).unwrap(),
            "raw"
        );
        let blob = Value::from(vec![0u8, 1, 254, 255]);
        assert_eq!(blob, Value::Blob(Some([0u8, 1, 254, 255].into())));
        assert_eq!(Vec::<u8>::try_from_value(blob).unwrap(), [0, 1, 254, 255]);
        assert_eq!(Vec::<u8>::try_from_value("abc".into()).unwrap(), b"abc");
    }

    #[test]
    fn value_time() {
        assert_eq!(
            time::Date::try_from_value("2024-02-29".into()).unwrap(),
            date!(2024 - 02 - 29)
        );
        assert!(time::Date::try_from_value("2023-02-29".into()).is_err());
        assert_eq!(
            time::Time::try_from_value("23:59:58".into()).unwrap(),
            time!(23:59:58)
        );
        assert_eq!(
            time::PrimitiveDateTime::try_from_value("2025-07-15 10:00:00".into()).unwrap(),
            datetime!(2025-07-15 10:00:00)
        );
        assert_eq!(
            time::PrimitiveDateTime::try_from_value(date!(2025 - 07 - 15).into()).unwrap(),
            datetime!(2025-07-15 00:00:00)
        );
        assert_eq!(
            time::OffsetDateTime::try_from_value(datetime!(2025-07-15 10:00:00).into()).unwrap(),
            datetime!(2025-07-15 10:00:00 UTC)
        );
    }

    #[test]
    fn value_uuid() {
        let id = uuid::Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(Value::from(id), Value::Uuid(Some(id)));
        assert_eq!(
            uuid::Uuid::try_from_value("67e55044-10b1-426f-9247-bb680e5fe0c8".into()).unwrap(),
            id
        );
        assert!(uuid::Uuid::try_from_value("not-a-uuid".into()).is_err());
    }

    #[test]
    fn value_try_as() {
        assert_eq!(
            Value::from("42").try_as(&Value::Int32(None)).unwrap(),
            Value::Int32(Some(42))
        );
        assert_eq!(
            Value::from("0.50").try_as(&Value::Decimal(None)).unwrap(),
            Value::Decimal(Some(Decimal::from_str("0.50").unwrap()))
        );
        assert_eq!(
            Value::from("1999-12-31").try_as(&Value::Date(None)).unwrap(),
            Value::Date(Some(date!(1999 - 12 - 31)))
        );
        assert_eq!(
            Value::from(7i64).try_as(&Value::Varchar(None)).unwrap(),
            Value::Varchar(Some("7".into()))
        );
        // Unknown targets keep the value
        assert_eq!(
            Value::from(true).try_as(&Value::Null).unwrap(),
            Value::Boolean(Some(true))
        );
        // Nulls take the target type
        assert_eq!(
            Value::Null.try_as(&Value::Int64(None)).unwrap(),
            Value::Int64(None)
        );
        assert_eq!(
            Value::Varchar(None).try_as(&Value::Date(None)).unwrap(),
            Value::Date(None)
        );
        let error = Value::from("abc").try_as(&Value::Int16(None)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Cannot convert value `abc` (varchar) into i16"
        );
        assert!(Value::from(100_000i32).try_as(&Value::Int16(None)).is_err());
        assert_eq!(
            Value::from("65").try_as(&Value::Int8(None)).unwrap(),
            Value::Int8(Some(65))
        );
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int32(None).to_string(), "NULL");
        assert_eq!(Value::from(-3i32).to_string(), "-3");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from("John").to_string(), "John");
        assert_eq!(
            Value::from(Decimal::from_str("0.50").unwrap()).to_string(),
            "0.50"
        );
        assert_eq!(Value::from(vec![0u8, 171, 255]).to_string(), "\\x00ABFF");
        assert_eq!(Value::from(date!(2024 - 02 - 29)).to_string(), "2024-02-29");
    }
}
