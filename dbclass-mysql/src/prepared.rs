use crate::ValueWrap;
use dbclass_core::{Error, Prepared, Result, Value, truncate_long};
use mysql_async::Statement;
use std::{
    fmt::{self, Display},
    mem,
};

#[derive(Debug)]
pub struct MySQLPrepared {
    pub(crate) statement: Statement,
    pub(crate) sql: String,
    pub(crate) params: Vec<Option<Value>>,
    pub(crate) index: u64,
}

impl MySQLPrepared {
    pub(crate) fn new(statement: Statement, sql: String) -> Self {
        let len = statement.num_params() as usize;
        Self {
            statement,
            sql,
            params: vec![None; len],
            index: 0,
        }
    }
    pub(crate) fn take_params(&mut self) -> Result<mysql_async::Params> {
        if let Some(i) = self.params.iter().position(Option::is_none) {
            return Err(Error::msg(format!("The parameter {} was not set", i)));
        }
        self.index = 0;
        if self.params.is_empty() {
            return Ok(mysql_async::Params::Empty);
        }
        let len = self.params.len();
        Ok(mysql_async::Params::Positional(
            mem::replace(&mut self.params, vec![None; len])
                .into_iter()
                .flatten()
                .map(|v| ValueWrap(v).try_into())
                .collect::<Result<_>>()?,
        ))
    }
}

impl Prepared for MySQLPrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.params.fill(None);
        self.index = 0;
        Ok(self)
    }
    fn bind(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        self.bind_index(value, self.index)?;
        Ok(self)
    }
    fn bind_index(&mut self, value: impl Into<Value>, index: u64) -> Result<&mut Self> {
        let len = self.params.len();
        let target = self.params.get_mut(index as usize).ok_or(Error::msg(format!(
            "Index {index} cannot be bound, the query has only {} parameters",
            len
        )))?;
        *target = Some(value.into());
        self.index = index + 1;
        Ok(self)
    }
    fn param_count(&self) -> usize {
        self.params.len()
    }
}

impl Display for MySQLPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
