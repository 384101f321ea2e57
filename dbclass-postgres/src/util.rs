use crate::ValueHolder;
use dbclass_core::{Error, Result, Row, RowLabeled, RowNames, Value};
use tokio_postgres::SimpleQueryRow;

pub(crate) fn labels_of(columns: &[tokio_postgres::Column]) -> RowNames {
    columns.iter().map(|c| c.name().to_string()).collect()
}

pub(crate) fn row_to_dbclass_row(row: tokio_postgres::Row) -> Result<Row> {
    (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(..) => {
                let col = &row.columns()[i];
                Err(Error::msg(format!(
                    "Could not deserialize column {} `{}`: {}",
                    i,
                    col.name(),
                    col.type_()
                )))
            }
        })
        .collect()
}

/// Rows of the simple query protocol carry only text.
pub(crate) fn simple_row_to_dbclass_row(row: SimpleQueryRow) -> RowLabeled {
    let labels: RowNames = row.columns().iter().map(|c| c.name().to_string()).collect();
    let values: Row = (0..row.len())
        .map(|i| row.get(i).map_or(Value::Null, |v| Value::Varchar(Some(v.into()))))
        .collect();
    RowLabeled::new(labels, values)
}
