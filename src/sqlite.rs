use std::sync::Arc;

use rusqlite::ToSql;
use rusqlite::types::Value;

use crate::error::DalError;
use crate::executor::{DatabaseHandle, PreparedStatement};
use crate::results::{ResultSet, Row};
use crate::types::SqlValue;

/// Convert a single `SqlValue` to a rusqlite `Value`.
#[must_use]
pub fn sql_value_to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::Json(jval) => Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `DalError::ExecError` if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, DalError> {
    let value: Value = row
        .get(idx)
        .map_err(|e| DalError::ExecError(e.to_string()))?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Statement prepared against a `rusqlite::Connection`.
pub struct SqliteStatement<'c> {
    stmt: rusqlite::Statement<'c>,
}

impl DatabaseHandle for rusqlite::Connection {
    fn prepare<'h>(&'h self, sql: &str) -> Result<Box<dyn PreparedStatement + 'h>, DalError> {
        let stmt = rusqlite::Connection::prepare(self, sql)
            .map_err(|e| DalError::PrepareError(e.to_string()))?;
        Ok(Box::new(SqliteStatement { stmt }))
    }
}

impl PreparedStatement for SqliteStatement<'_> {
    /// Only the first row is stepped; the rest of the result is never
    /// fetched. A DML statement still runs and yields the empty state.
    fn query_row(&mut self, args: &[SqlValue]) -> Result<Row, DalError> {
        let values: Vec<Value> = args.iter().map(sql_value_to_sqlite).collect();
        let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();

        let column_names = self.shared_column_names();
        let col_count = column_names.len();

        let mut rows_iter = self
            .stmt
            .query(&param_refs[..])
            .map_err(|e| DalError::ExecError(e.to_string()))?;

        match rows_iter
            .next()
            .map_err(|e| DalError::ExecError(e.to_string()))?
        {
            None => Ok(Row::empty()),
            Some(row) => {
                let mut row_values = Vec::with_capacity(col_count);
                for i in 0..col_count {
                    row_values.push(sqlite_extract_value(row, i)?);
                }
                Ok(Row::new(column_names, row_values))
            }
        }
    }

    /// Only SELECT statements report rows; a DML statement still runs, it
    /// just produces an empty set.
    fn query(&mut self, args: &[SqlValue]) -> Result<ResultSet, DalError> {
        let values: Vec<Value> = args.iter().map(sql_value_to_sqlite).collect();
        let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();

        let column_names = self.shared_column_names();
        let col_count = column_names.len();

        let mut rows_iter = self
            .stmt
            .query(&param_refs[..])
            .map_err(|e| DalError::ExecError(e.to_string()))?;

        let mut result_set = ResultSet::with_capacity(10);
        result_set.set_column_names(column_names);

        while let Some(row) = rows_iter
            .next()
            .map_err(|e| DalError::ExecError(e.to_string()))?
        {
            let mut row_values = Vec::with_capacity(col_count);
            for i in 0..col_count {
                row_values.push(sqlite_extract_value(row, i)?);
            }
            result_set.add_row_values(row_values);
        }

        Ok(result_set)
    }
}

impl SqliteStatement<'_> {
    fn shared_column_names(&self) -> Arc<Vec<String>> {
        Arc::new(
            self.stmt
                .column_names()
                .iter()
                .map(std::string::ToString::to_string)
                .collect(),
        )
    }
}
