use crate::{
    Driver, NamedQuery, Params, Query, QueryResult, Result, ResultSet, RowLabeled, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn prepare(
        &mut self,
        query: String,
    ) -> impl Future<Output = Result<Query<Self::Driver>>> + Send;

    /// General method to send any query and return any result type (either row or count).
    ///
    /// A `Query::Raw` goes through the text protocol and can contain several statements.
    fn run<'s>(
        &'s mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's;

    /// Identifier generated by the last insert on this connection, if any.
    fn last_insert_id(&mut self) -> impl Future<Output = Result<Option<i64>>> + Send;

    /// Execute the query and returns the rows.
    fn fetch<'s>(
        &'s mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send + 's {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }

    /// Prepare `sql` written with `:name` placeholders, bind `params` by name and run it.
    fn run_named(
        &mut self,
        sql: &str,
        params: &Params,
    ) -> impl Future<Output = Result<ResultSet>> + Send {
        async move {
            let named = NamedQuery::parse(sql, <Self::Driver as Driver>::PLACEHOLDER);
            let values = named.resolve(params)?;
            let mut query = self.prepare(named.sql).await?;
            for value in values {
                query.bind(value)?;
            }
            self.run(query).try_collect().await
        }
    }

    /// Run unparameterized SQL, possibly made of several statements.
    fn run_script(&mut self, sql: String) -> impl Future<Output = Result<ResultSet>> + Send {
        self.run(Query::Raw(sql)).try_collect()
    }
}
