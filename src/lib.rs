//! Named-parameter statements over MySQL/MariaDB and PostgreSQL with the
//! errors captured instead of returned. See [`Db`].

#[cfg(not(any(feature = "mysql", feature = "postgres")))]
compile_error!("enable at least one of the `mysql` or `postgres` features");

mod backend;
mod db;

pub use db::*;
pub use dbclass_core::*;
#[cfg(feature = "mysql")]
pub use dbclass_mysql as mysql;
#[cfg(feature = "postgres")]
pub use dbclass_postgres as postgres;
