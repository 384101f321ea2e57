use crate::{Executor, Result};
use std::{borrow::Cow, future::Future};

pub trait Connection: Executor {
    /// Open a connection to the given url, the scheme must match the driver name.
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send
    where
        Self: Sized;

    /// Close the connection gracefully.
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}
