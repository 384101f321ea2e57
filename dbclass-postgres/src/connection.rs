use crate::{
    PostgresDriver, PostgresPrepared,
    util::{labels_of, row_to_dbclass_row, simple_row_to_dbclass_row},
};
use async_stream::try_stream;
use dbclass_core::{
    Connection, Error, ErrorContext, Executor, Query, QueryResult, Result, RowLabeled, RowNames,
    RowsAffected, redact,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use openssl::ssl::{SslConnector, SslFiletype, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use std::{borrow::Cow, env, path::Path, pin::pin, sync::Arc};
use tokio::{spawn, task::JoinHandle};
use tokio_postgres::{NoTls, SimpleQueryMessage, config::SslMode};
use url::Url;

pub struct PostgresConnection {
    pub(crate) client: tokio_postgres::Client,
    pub(crate) handle: JoinHandle<()>,
}

impl Executor for PostgresConnection {
    type Driver = PostgresDriver;

    async fn prepare(&mut self, sql: String) -> Result<Query<Self::Driver>> {
        let sql = sql.trim_end().trim_end_matches(';').to_string();
        let statement = self.client.prepare(&sql).await.map_err(|e| {
            let e = Error::new(e).context(format!(
                "While preparing the query:\n{}",
                truncate_long!(sql)
            ));
            log::error!("{:#}", e);
            e
        })?;
        Ok(Query::Prepared(PostgresPrepared::new(statement, sql)))
    }

    fn run<'s>(
        &'s mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        let context = Arc::new(format!("While running the query:\n{}", query));
        try_stream! {
            match query {
                Query::Raw(sql) => {
                    let stream = self.client.simple_query_raw(&sql).await?;
                    let mut stream = pin!(stream);
                    while let Some(message) = stream.next().await.transpose()? {
                        match message {
                            SimpleQueryMessage::Row(row) => {
                                yield QueryResult::Row(simple_row_to_dbclass_row(row))
                            }
                            SimpleQueryMessage::CommandComplete(rows_affected) => {
                                yield QueryResult::Affected(RowsAffected {
                                    rows_affected,
                                    last_affected_id: None,
                                })
                            }
                            _ => {}
                        }
                    }
                }
                Query::Prepared(mut prepared) => {
                    let params = prepared.take_params()?;
                    let stream = self.client.query_raw(&prepared.statement, params).await?;
                    let mut stream = pin!(stream);
                    let mut labels: Option<RowNames> = None;
                    while let Some(row) = stream.next().await.transpose()? {
                        let labels = labels
                            .get_or_insert_with(|| labels_of(row.columns()))
                            .clone();
                        yield QueryResult::Row(RowLabeled::new(labels, row_to_dbclass_row(row)?))
                    }
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: stream.rows_affected().unwrap_or_default(),
                        last_affected_id: None,
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

    /// Value of `LASTVAL()`, `None` when no sequence was used in this session.
    async fn last_insert_id(&mut self) -> Result<Option<i64>> {
        match self.client.query_one("SELECT LASTVAL()", &[]).await {
            Ok(row) => Ok(row.try_get::<_, Option<i64>>(0)?),
            Err(e) => {
                log::debug!("No last insert id available: {}", e);
                Ok(None)
            }
        }
    }
}

impl Connection for PostgresConnection {
    async fn connect(url: Cow<'static, str>) -> Result<PostgresConnection> {
        let context = || {
            format!(
                "While trying to connect to `{}`",
                truncate_long!(redact(&url))
            )
        };
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            let error =
                Error::msg("Postgres connection url must start with `postgres://`").context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut url = Url::parse(&url).with_context(context)?;
        let mut ssl_param = |key: &str, env_var: &str| {
            take_url_param(&mut url, key).or_else(|| env::var(env_var).ok())
        };
        let sslmode = ssl_param("sslmode", "PGSSLMODE").unwrap_or("disable".into());
        let sslrootcert = ssl_param("sslrootcert", "PGSSLROOTCERT");
        let sslcert = ssl_param("sslcert", "PGSSLCERT");
        let sslkey = ssl_param("sslkey", "PGSSLKEY");
        let mut config: tokio_postgres::Config = url.as_str().parse().with_context(context)?;
        let connect_error = |e: tokio_postgres::Error| {
            let e = Error::new(e).context(context());
            log::error!("{:#}", e);
            e
        };
        let (client, handle) = if sslmode == "disable" {
            let (client, connection) = config.connect(NoTls).await.map_err(connect_error)?;
            let handle = spawn(async move {
                if let Err(e) = connection.await
                    && !e.is_closed()
                {
                    log::error!("Postgres connection error: {:#}", e);
                }
            });
            (client, handle)
        } else {
            let mut builder = SslConnector::builder(SslMethod::tls()).with_context(context)?;
            if let Some(path) = sslrootcert.as_deref().map(Path::new)
                && path.exists()
            {
                builder.set_ca_file(path).with_context(context)?;
            }
            if let Some(path) = sslcert.as_deref().map(Path::new)
                && path.exists()
            {
                builder
                    .set_certificate_chain_file(path)
                    .with_context(context)?;
            }
            if let Some(path) = sslkey.as_deref().map(Path::new)
                && path.exists()
            {
                builder
                    .set_private_key_file(path, SslFiletype::PEM)
                    .with_context(context)?;
            }
            match &*sslmode {
                "allow" | "prefer" | "require" => builder.set_verify(SslVerifyMode::NONE),
                "verify-ca" | "verify-full" => builder.set_verify(SslVerifyMode::PEER),
                _ => {
                    let error = Error::msg(format!("Unknown sslmode `{}`", sslmode))
                        .context(context());
                    log::error!("{:#}", error);
                    return Err(error);
                }
            }
            let mut connector = MakeTlsConnector::new(builder.build());
            if sslmode != "verify-full" {
                connector.set_callback(|config, _| {
                    config.set_verify_hostname(false);
                    Ok(())
                });
            }
            config.ssl_mode(match &*sslmode {
                "allow" | "prefer" => SslMode::Prefer,
                _ => SslMode::Require,
            });
            let (client, connection) = config.connect(connector).await.map_err(connect_error)?;
            let handle = spawn(async move {
                if let Err(e) = connection.await
                    && !e.is_closed()
                {
                    log::error!("Postgres connection error: {:#}", e);
                }
            });
            (client, handle)
        };
        log::debug!("Connected to {}", redact(url.as_str()));
        Ok(Self { client, handle })
    }

    async fn disconnect(self) -> Result<()> {
        drop(self.client);
        self.handle.await.map_err(|e| {
            let e = Error::new(e).context("While disconnecting from Postgres");
            log::error!("{:#}", e);
            e
        })
    }
}

/// Remove the query parameter `key` from the url and return its value.
fn take_url_param(url: &mut Url, key: &str) -> Option<String> {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let value = pairs
        .iter()
        .position(|(k, _)| k == key)
        .map(|pos| pairs.remove(pos).1);
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    value
}
