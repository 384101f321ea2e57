mod containers;
mod errors;
mod script;
mod types;
mod users;

pub use containers::{init_mysql, init_postgres};

use crate::{errors::errors, script::script, types::types, users::users};
use dbclass::Db;
use log::LevelFilter;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the whole behavioural suite on a connected `Db`.
pub async fn execute_tests(db: &mut Db) {
    assert!(
        db.is_connected(),
        "The database is not connected: {}",
        db.err_message()
    );
    users(db).await;
    script(db).await;
    types(db).await;
    errors(db).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
