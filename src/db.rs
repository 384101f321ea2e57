use crate::backend::Backend;
use dbclass_core::{
    DbConfig, Dbms, Error, Params, QueryDump, Result, ResultSet, RowLabeled, Value, truncate_long,
};
use std::fmt::{self, Display};

const NOT_CONNECTED: &str = "Not connected to the database";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
    Script,
}

impl Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryKind::Select => "select",
            QueryKind::Insert => "insert",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
            QueryKind::Script => "script",
        })
    }
}

/// Database handle with captured errors.
///
/// Queries are written with `:name` placeholders, the values are staged with
/// [`Db::add_param_to_bind`] and stay staged until [`Db::empty_params`].
/// Every query method returns `true` on success. On failure it returns
/// `false` and the reason is available from [`Db::err_message`].
///
/// ```no_run
/// # async fn example() -> dbclass::Result<()> {
/// use dbclass::Db;
///
/// let mut db = Db::connect_with("mysql", "shop", "localhost", "user", "secret").await?;
/// db.add_param_to_bind("id", 5);
/// if db.select("select * from users where id = :id").await {
///     while let Some(row) = db.next_row() {
///         println!("{}", row);
///     }
/// } else {
///     eprintln!("{}", db.err_message());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Db {
    config: DbConfig,
    backend: Option<Backend>,
    params: Params,
    result: ResultSet,
    err_message: String,
    last_id: Option<i64>,
    rows_affected: u64,
    query_dump: QueryDump,
}

impl Db {
    /// Store the configuration and try to connect.
    ///
    /// A connection failure does not fail the constructor, check
    /// [`Db::is_connected`] and [`Db::err_message`].
    pub async fn new(config: DbConfig) -> Self {
        let mut db = Self {
            config,
            backend: None,
            params: Params::new(),
            result: ResultSet::default(),
            err_message: String::new(),
            last_id: None,
            rows_affected: 0,
            query_dump: QueryDump::default(),
        };
        db.connect().await;
        db
    }

    /// Like [`Db::new`], the dbms is one of [`Db::list_handled_dbms`].
    pub async fn connect_with(
        dbms: &str,
        dbname: &str,
        host: &str,
        login: &str,
        password: &str,
    ) -> Result<Self> {
        let dbms = dbms.parse::<Dbms>().map_err(|e| {
            log::error!("{:#}", e);
            e
        })?;
        Ok(Self::new(DbConfig::new(dbms, dbname, host, login, password)).await)
    }

    /// Like [`Db::new`], with the configuration read from a connection url.
    pub async fn from_url(url: &str) -> Result<Self> {
        let config = DbConfig::from_url(url).map_err(|e| {
            log::error!("{:#}", e);
            e
        })?;
        Ok(Self::new(config).await)
    }

    /// Comma separated names of the accepted DBMSs.
    pub fn list_handled_dbms() -> String {
        Dbms::list_handled()
    }

    /// (Re)open the connection with the current configuration.
    pub async fn connect(&mut self) -> bool {
        self.disconnect().await;
        self.err_message.clear();
        match Backend::connect(&self.config).await {
            Ok(backend) => {
                log::info!("Connected to {}", self.config);
                self.backend = Some(backend);
                true
            }
            Err(e) => {
                self.capture(e);
                false
            }
        }
    }

    /// Close the connection, if any.
    pub async fn disconnect(&mut self) {
        if let Some(backend) = self.backend.take() {
            match backend.disconnect().await {
                Ok(()) => log::info!("Disconnected from {}", self.config),
                Err(e) => log::warn!("{:#}", e),
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Message of the last failure, empty after a successful operation.
    pub fn err_message(&self) -> &str {
        &self.err_message
    }

    /// Trace of the last successful statement, only recorded in debug mode.
    pub fn query_dump(&self) -> &str {
        self.query_dump.as_str()
    }

    /// Identifier generated by the last successful [`Db::insert`].
    pub fn last_id(&self) -> Option<i64> {
        self.last_id
    }

    /// Rows changed by the last statement.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn set_dbms(&mut self, dbms: Dbms) {
        self.config.dbms = dbms;
    }
    pub fn set_dbname(&mut self, dbname: impl Into<String>) {
        self.config.dbname = dbname.into();
    }
    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.config.charset = charset.into();
    }
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.config.host = host.into();
    }
    pub fn set_port(&mut self, port: u16) {
        self.config.port = port;
    }
    pub fn set_login(&mut self, login: impl Into<String>) {
        self.config.login = login.into();
    }
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.config.password = password.into();
    }
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Forget every staged parameter.
    pub fn empty_params(&mut self) {
        self.params.clear();
    }

    /// Stage the value of the placeholder `:name` for the next statements.
    pub fn add_param_to_bind(&mut self, name: impl AsRef<str>, value: impl Into<Value>) {
        self.params.push(name, value);
    }

    pub async fn select(&mut self, sql: &str) -> bool {
        self.run(QueryKind::Select, sql).await
    }

    /// Run an insert and capture the generated identifier.
    pub async fn insert(&mut self, sql: &str) -> bool {
        self.run(QueryKind::Insert, sql).await
    }

    pub async fn update(&mut self, sql: &str) -> bool {
        self.run(QueryKind::Update, sql).await
    }

    pub async fn delete(&mut self, sql: &str) -> bool {
        self.run(QueryKind::Delete, sql).await
    }

    /// Run a script. Without staged parameters it can contain several
    /// statements.
    pub async fn exec_script(&mut self, sql: &str) -> bool {
        self.run(QueryKind::Script, sql).await
    }

    /// Next row produced by the last statement.
    pub fn next_row(&mut self) -> Option<RowLabeled> {
        self.result.next_row()
    }

    async fn run(&mut self, kind: QueryKind, sql: &str) -> bool {
        self.result = ResultSet::default();
        self.rows_affected = 0;
        self.err_message.clear();
        if kind == QueryKind::Insert {
            self.last_id = None;
        }
        let Some(backend) = self.backend.as_mut() else {
            self.capture(Error::msg(NOT_CONNECTED));
            return false;
        };
        log::debug!("Running {} statement:\n{}", kind, truncate_long!(sql));
        let result = if kind == QueryKind::Script && self.params.is_empty() {
            backend.run_script(sql.to_string()).await
        } else {
            backend.run_named(sql, &self.params).await
        };
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.capture(e);
                return false;
            }
        };
        if kind == QueryKind::Insert {
            self.last_id = match result.affected.last_affected_id {
                Some(id) if id > 0 => Some(id),
                _ => backend.last_insert_id().await.unwrap_or_else(|e| {
                    log::warn!("{:#}", e);
                    None
                }),
            };
        }
        self.rows_affected = result.affected.rows_affected;
        self.result = result;
        if self.config.debug {
            self.query_dump = QueryDump::new(sql, &self.params);
        }
        true
    }

    fn capture(&mut self, error: Error) {
        self.err_message = format!("{:#}", error);
        log::error!("{}", self.err_message);
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        if self.backend.take().is_some() {
            log::debug!("Dropped the connection to {}", self.config);
        }
    }
}
