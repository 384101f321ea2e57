mod as_value;
mod config;
mod connection;
mod driver;
mod dump;
mod executor;
mod params;
mod prepared;
mod query;
mod util;
mod value;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use config::*;
pub use connection::*;
pub use driver::*;
pub use dump::*;
pub use executor::*;
pub use params::*;
pub use prepared::*;
pub use query::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
