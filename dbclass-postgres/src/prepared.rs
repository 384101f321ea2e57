use crate::{ValueHolder, postgres_type_to_value};
use dbclass_core::{Error, Prepared, Result, Value, truncate_long};
use std::{
    fmt::{self, Display},
    mem,
};
use tokio_postgres::Statement;

pub struct PostgresPrepared {
    pub(crate) statement: Statement,
    pub(crate) sql: String,
    pub(crate) params: Vec<Option<Value>>,
    pub(crate) index: u64,
}

impl PostgresPrepared {
    pub(crate) fn new(statement: Statement, sql: String) -> Self {
        let len = statement.params().len();
        Self {
            statement,
            sql,
            params: vec![None; len],
            index: 0,
        }
    }
    /// Take the bound values, each one coerced to the type the server inferred for it.
    ///
    /// Parameters are sent in binary format, a non null value for a type
    /// without a mapping is rejected.
    pub(crate) fn take_params(&mut self) -> Result<Vec<ValueHolder>> {
        if let Some(i) = self.params.iter().position(Option::is_none) {
            return Err(Error::msg(format!("The parameter {} was not set", i)));
        }
        self.index = 0;
        let len = self.params.len();
        mem::replace(&mut self.params, vec![None; len])
            .into_iter()
            .flatten()
            .zip(self.statement.params())
            .enumerate()
            .map(|(i, (value, ty))| {
                let target = postgres_type_to_value(ty);
                if matches!(target, Value::Null) && !value.is_null() {
                    return Err(Error::msg(format!(
                        "The parameter {} has type `{}` which cannot be bound, cast the parameter in the query (e.g. `CAST(:name AS text)::{}`)",
                        i + 1,
                        ty,
                        ty
                    )));
                }
                Ok(ValueHolder(value.try_as(&target)?))
            })
            .collect()
    }
}

impl Prepared for PostgresPrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.params.fill(None);
        self.index = 0;
        Ok(self)
    }
    fn bind(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        self.bind_index(value, self.index)
    }
    fn bind_index(&mut self, value: impl Into<Value>, index: u64) -> Result<&mut Self> {
        let len = self.params.len();
        let Some(target) = self.params.get_mut(index as usize) else {
            return Err(Error::msg(format!(
                "Index {index} cannot be bound, the query has only {len} parameters"
            )));
        };
        *target = Some(value.into());
        self.index = index + 1;
        Ok(self)
    }
    fn param_count(&self) -> usize {
        self.params.len()
    }
}

impl Display for PostgresPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
