use crate::decode_value;
use dbclass_core::{Row, RowLabeled, RowNames};
use mysql_async::FromRowError;

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
        let values: dbclass_core::Result<Row> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let value = row
                    .take::<mysql_async::Value, _>(i)
                    .unwrap_or(mysql_async::Value::NULL);
                decode_value(value, column)
            })
            .collect();
        match values {
            Ok(values) => Ok(RowWrap(RowLabeled::new(names, values))),
            Err(e) => {
                log::error!("{:#}", e);
                Err(FromRowError(row))
            }
        }
    }
}
