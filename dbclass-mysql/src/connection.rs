use crate::{MySQLDriver, MySQLPrepared, RowWrap};
use async_stream::try_stream;
use dbclass_core::{
    Connection, Driver, Error, ErrorContext, Executor, Query, QueryResult, Result, RowsAffected,
    redact,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use mysql_async::{Conn, Opts, OptsBuilder, prelude::Queryable};
use std::{borrow::Cow, sync::Arc};
use url::Url;

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

impl Executor for MySQLConnection {
    type Driver = MySQLDriver;

    async fn prepare(&mut self, query: String) -> Result<Query<Self::Driver>> {
        let statement = self
            .connection
            .prep(query.as_str())
            .await
            .map_err(|e| {
                let e = Error::new(e).context(format!(
                    "While preparing the query:\n{}",
                    truncate_long!(query)
                ));
                log::error!("{:#}", e);
                e
            })?;
        Ok(Query::Prepared(MySQLPrepared::new(statement, query)))
    }

    fn run<'s>(
        &'s mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        let context = Arc::new(format!("While running the query:\n{}", query));
        try_stream! {
            match query {
                Query::Raw(sql) => {
                    let mut result = self.connection.query_iter(sql).await?;
                    while let Some(mut stream) = result.stream::<RowWrap>().await? {
                        while let Some(row) = stream.next().await.transpose()? {
                            yield QueryResult::Row(row.0)
                        }
                    }
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: result.affected_rows(),
                        last_affected_id: result.last_insert_id().map(|v| v as _),
                    });
                }
                Query::Prepared(mut prepared) => {
                    let params = prepared.take_params()?;
                    let mut result = self
                        .connection
                        .exec_iter(&prepared.statement, params)
                        .await?;
                    while let Some(mut stream) = result.stream::<RowWrap>().await? {
                        while let Some(row) = stream.next().await.transpose()? {
                            yield QueryResult::Row(row.0)
                        }
                    }
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: result.affected_rows(),
                        last_affected_id: result.last_insert_id().map(|v| v as _),
                    });
                }
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }

    async fn last_insert_id(&mut self) -> Result<Option<i64>> {
        Ok(self.connection.last_insert_id().map(|v| v as _))
    }
}

impl Connection for MySQLConnection {
    async fn connect(url: Cow<'static, str>) -> Result<MySQLConnection> {
        let context = || {
            format!(
                "While trying to connect to `{}`",
                truncate_long!(redact(&url))
            )
        };
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut url = Url::parse(&url).with_context(context)?;
        let charset = take_url_param(&mut url, "charset");
        let opts = Opts::from_url(url.as_str()).with_context(context)?;
        let mut builder = OptsBuilder::from_opts(opts);
        if let Some(charset) = charset {
            if charset.is_empty()
                || !charset
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                let error = Error::msg(format!("Invalid charset `{}`", charset)).context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            builder = builder.init(vec![format!("SET NAMES {}", charset)]);
        }
        let connection = Conn::new(builder).await.map_err(|e| {
            let e = Error::new(e).context(context());
            log::error!("{:#}", e);
            e
        })?;
        log::debug!("Connected to {}", redact(url.as_str()));
        Ok(MySQLConnection { connection })
    }

    async fn disconnect(self) -> Result<()> {
        self.connection.disconnect().await.map_err(|e| {
            let e = Error::new(e).context("While disconnecting from MySQL");
            log::error!("{:#}", e);
            e
        })
    }
}

/// Remove the query parameter `key` from the url and return its value.
fn take_url_param(url: &mut Url, key: &str) -> Option<String> {
    let mut value = None;
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    if let Some(pos) = pairs.iter().position(|(k, _)| k == key) {
        let (_, v) = pairs.remove(pos);
        value = Some(v);
    }
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    value
}
