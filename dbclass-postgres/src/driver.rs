use crate::{PostgresConnection, PostgresPrepared};
use dbclass_core::{Dbms, Driver, PlaceholderStyle};

#[derive(Clone, Copy, Default)]
pub struct PostgresDriver {}

impl Driver for PostgresDriver {
    type Connection = PostgresConnection;
    type Prepared = PostgresPrepared;

    const NAME: &'static str = "postgres";
    const PLACEHOLDER: PlaceholderStyle = PlaceholderStyle::Dollar;

    fn handles(dbms: Dbms) -> bool {
        dbms == Dbms::PostgreSQL
    }
}
