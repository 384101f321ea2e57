use crate::{MySQLConnection, MySQLPrepared};
use dbclass_core::{Dbms, Driver, PlaceholderStyle};

#[derive(Clone, Copy, Default)]
pub struct MySQLDriver;

impl Driver for MySQLDriver {
    type Connection = MySQLConnection;
    type Prepared = MySQLPrepared;

    const NAME: &'static str = "mysql";
    const PLACEHOLDER: PlaceholderStyle = PlaceholderStyle::QuestionMark;

    fn handles(dbms: Dbms) -> bool {
        dbms.is_mysql()
    }
}
