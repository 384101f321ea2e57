use dbclass_core::{Connection, DbConfig, Driver, Error, Executor, Params, Result, ResultSet};
#[cfg(feature = "mysql")]
use dbclass_mysql::{MySQLConnection, MySQLDriver};
#[cfg(feature = "postgres")]
use dbclass_postgres::{PostgresConnection, PostgresDriver};

/// Open connection to one of the compiled in backends.
pub(crate) enum Backend {
    #[cfg(feature = "mysql")]
    MySQL(MySQLConnection),
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnection),
}

macro_rules! dispatch {
    ($backend:expr, $connection:ident => $body:expr) => {
        match $backend {
            #[cfg(feature = "mysql")]
            Backend::MySQL($connection) => $body,
            #[cfg(feature = "postgres")]
            Backend::Postgres($connection) => $body,
        }
    };
}

impl Backend {
    pub(crate) async fn connect(config: &DbConfig) -> Result<Self> {
        let url = config.to_url();
        #[cfg(feature = "mysql")]
        if MySQLDriver::handles(config.dbms) {
            return Ok(Backend::MySQL(MySQLConnection::connect(url.into()).await?));
        }
        #[cfg(feature = "postgres")]
        if PostgresDriver::handles(config.dbms) {
            return Ok(Backend::Postgres(
                PostgresConnection::connect(url.into()).await?,
            ));
        }
        Err(Error::msg(format!(
            "Support for {} was not enabled at compile time",
            config.dbms
        )))
    }

    pub(crate) async fn disconnect(self) -> Result<()> {
        dispatch!(self, connection => connection.disconnect().await)
    }

    pub(crate) async fn run_named(&mut self, sql: &str, params: &Params) -> Result<ResultSet> {
        dispatch!(self, connection => connection.run_named(sql, params).await)
    }

    pub(crate) async fn run_script(&mut self, sql: String) -> Result<ResultSet> {
        dispatch!(self, connection => connection.run_script(sql).await)
    }

    pub(crate) async fn last_insert_id(&mut self) -> Result<Option<i64>> {
        dispatch!(self, connection => connection.last_insert_id().await)
    }
}
