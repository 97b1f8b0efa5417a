use tracing::debug;

use crate::bind::{self, BoundStatement, PlaceholderStyle};
use crate::error::DalError;
use crate::executor::{DatabaseHandle, StatementExecutor};
use crate::results::{ResultSet, Row};
use crate::store::{TemplateSource, TemplateStore};
use crate::types::Params;

/// The two-operation data-access facade.
///
/// Bundles a template source, the parameter binder, and a database handle
/// into `query_row` and `query`. The instance is immutable after
/// construction and holds no state of its own between calls; sharing across
/// threads is governed by what the handle and source allow.
///
/// ```rust,no_run
/// # #[cfg(feature = "sqlite")]
/// # fn demo() -> Result<(), sql_dal::DalError> {
/// use sql_dal::{Dal, Params, PlaceholderStyle, SqlValue, Vfs};
///
/// let vfs = Vfs::load_files("sqls")?;
/// let conn = sql_dal::rusqlite::Connection::open_in_memory()
///     .map_err(|e| sql_dal::DalError::ConfigError(e.to_string()))?;
/// let dal = Dal::new(conn, vfs, PlaceholderStyle::Sqlite);
///
/// let mut params = Params::new();
/// params.insert("first_name".to_string(), SqlValue::Text("bearpig".into()));
/// let row = dal.query_row("select_customer.sql", Some(&params))?;
/// # let _ = row;
/// # Ok(())
/// # }
/// ```
pub struct Dal<H: DatabaseHandle> {
    db: H,
    source: Option<Box<dyn TemplateSource>>,
    style: PlaceholderStyle,
}

impl<H: DatabaseHandle> Dal<H> {
    /// Create a facade over a database handle and a template source.
    pub fn new(db: H, source: impl TemplateSource + 'static, style: PlaceholderStyle) -> Self {
        Self {
            db,
            source: Some(Box::new(source)),
            style,
        }
    }

    /// Create a facade with no template source configured. Every operation
    /// fails with `ConfigError` without touching the database.
    pub fn without_source(db: H, style: PlaceholderStyle) -> Self {
        Self {
            db,
            source: None,
            style,
        }
    }

    /// Resolve `name`, bind `params`, execute, and return a single row
    /// handle. Zero matching rows is the empty row state, not an error.
    ///
    /// # Errors
    ///
    /// The first failing stage's error is returned verbatim: `ConfigError`,
    /// `NotFound`/`ReadError`, `MissingParameter`, `PrepareError`, or
    /// `ExecError`.
    pub fn query_row(&self, name: &str, params: Option<&Params>) -> Result<Row, DalError> {
        let bound = self.resolve(name, params)?;
        StatementExecutor::new(&self.db).fetch_row(&bound.sql, &bound.args)
    }

    /// Resolve `name`, bind `params`, execute, and return a row-set handle
    /// (possibly empty).
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Dal::query_row`].
    pub fn query(&self, name: &str, params: Option<&Params>) -> Result<ResultSet, DalError> {
        let bound = self.resolve(name, params)?;
        StatementExecutor::new(&self.db).fetch_rows(&bound.sql, &bound.args)
    }

    // Load and bind stages; nothing here touches the database.
    fn resolve(&self, name: &str, params: Option<&Params>) -> Result<BoundStatement, DalError> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| DalError::ConfigError("no template source configured".to_string()))?;
        let text = TemplateStore::new(source).load(name)?;
        debug!(template = name, bytes = text.len(), "template resolved");
        let bound = bind::bind(&text, params, self.style)?;
        debug!(template = name, args = bound.args.len(), "statement bound");
        Ok(bound)
    }
}
