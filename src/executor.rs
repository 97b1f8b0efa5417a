use crate::error::DalError;
use crate::results::{ResultSet, Row};
use crate::types::SqlValue;

/// Capability interface for a connection-like database handle.
///
/// Implementations map driver-side prepare failures to
/// `DalError::PrepareError`; a test double can record calls and inject
/// failures without a real database.
pub trait DatabaseHandle {
    /// Prepare `sql` for execution.
    ///
    /// # Errors
    ///
    /// Returns `DalError::PrepareError` when the driver rejects the text.
    fn prepare<'h>(&'h self, sql: &str) -> Result<Box<dyn PreparedStatement + 'h>, DalError>;
}

/// Shared references delegate, so a caller can keep inspecting a handle
/// (e.g. a recording test double) after the facade takes it.
impl<T: DatabaseHandle + ?Sized> DatabaseHandle for &T {
    fn prepare<'h>(&'h self, sql: &str) -> Result<Box<dyn PreparedStatement + 'h>, DalError> {
        (**self).prepare(sql)
    }
}

/// A statement prepared by a `DatabaseHandle`, executable with ordered
/// positional arguments. Implementations map execution failures to
/// `DalError::ExecError`.
pub trait PreparedStatement {
    /// Execute and return the first matching row, or the empty row state
    /// when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns `DalError::ExecError` when execution fails.
    fn query_row(&mut self, args: &[SqlValue]) -> Result<Row, DalError>;

    /// Execute and return the full result set.
    ///
    /// # Errors
    ///
    /// Returns `DalError::ExecError` when execution fails.
    fn query(&mut self, args: &[SqlValue]) -> Result<ResultSet, DalError>;
}

impl std::fmt::Debug for dyn PreparedStatement + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PreparedStatement")
    }
}

/// Execution shape for `StatementExecutor::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Return a single row handle.
    Single,
    /// Return a row-set handle.
    Multi,
}

/// Result of `StatementExecutor::run`, shaped by the requested mode.
#[derive(Debug, Clone)]
pub enum Fetched {
    Row(Row),
    Rows(ResultSet),
}

/// Drives the prepare, bind, execute sequence against a database handle.
///
/// Statement lifetime is scoped to the call: every invocation prepares
/// fresh state, and nothing is cached or retried here.
pub struct StatementExecutor<'h> {
    handle: &'h dyn DatabaseHandle,
}

impl<'h> StatementExecutor<'h> {
    #[must_use]
    pub fn new(handle: &'h dyn DatabaseHandle) -> Self {
        Self { handle }
    }

    /// Prepare and execute in the requested mode.
    ///
    /// # Errors
    ///
    /// Returns `DalError::PrepareError` or `DalError::ExecError` from the
    /// corresponding stage.
    pub fn run(
        &self,
        sql: &str,
        args: &[SqlValue],
        mode: FetchMode,
    ) -> Result<Fetched, DalError> {
        match mode {
            FetchMode::Single => self.fetch_row(sql, args).map(Fetched::Row),
            FetchMode::Multi => self.fetch_rows(sql, args).map(Fetched::Rows),
        }
    }

    /// Prepare `sql` and execute for a single row.
    ///
    /// # Errors
    ///
    /// Returns `DalError::PrepareError` or `DalError::ExecError`.
    pub fn fetch_row(&self, sql: &str, args: &[SqlValue]) -> Result<Row, DalError> {
        self.prepare(sql)?.query_row(args)
    }

    /// Prepare `sql` and execute for a row set.
    ///
    /// # Errors
    ///
    /// Returns `DalError::PrepareError` or `DalError::ExecError`.
    pub fn fetch_rows(&self, sql: &str, args: &[SqlValue]) -> Result<ResultSet, DalError> {
        self.prepare(sql)?.query(args)
    }

    // Empty text is rejected here so an empty template surfaces the same
    // way on every backend.
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement + 'h>, DalError> {
        if sql.trim().is_empty() {
            return Err(DalError::PrepareError("empty SQL text".to_string()));
        }
        self.handle.prepare(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct RecordingHandle {
        prepare_calls: Cell<usize>,
        prepare_ok: bool,
    }

    impl RecordingHandle {
        fn new(prepare_ok: bool) -> Self {
            Self {
                prepare_calls: Cell::new(0),
                prepare_ok,
            }
        }
    }

    struct NoopStatement;

    impl PreparedStatement for NoopStatement {
        fn query_row(&mut self, _args: &[SqlValue]) -> Result<Row, DalError> {
            Ok(Row::empty())
        }

        fn query(&mut self, _args: &[SqlValue]) -> Result<ResultSet, DalError> {
            Ok(ResultSet::default())
        }
    }

    impl DatabaseHandle for RecordingHandle {
        fn prepare<'h>(
            &'h self,
            _sql: &str,
        ) -> Result<Box<dyn PreparedStatement + 'h>, DalError> {
            self.prepare_calls.set(self.prepare_calls.get() + 1);
            if self.prepare_ok {
                Ok(Box::new(NoopStatement))
            } else {
                Err(DalError::PrepareError("rejected by driver".to_string()))
            }
        }
    }

    #[test]
    fn empty_text_fails_before_the_handle_is_touched() {
        let handle = RecordingHandle::new(true);
        let exec = StatementExecutor::new(&handle);
        let err = exec.fetch_row("   \n", &[]).unwrap_err();
        assert!(matches!(err, DalError::PrepareError(_)));
        assert_eq!(handle.prepare_calls.get(), 0);
    }

    #[test]
    fn prepare_failure_propagates() {
        let handle = RecordingHandle::new(false);
        let exec = StatementExecutor::new(&handle);
        let err = exec.fetch_rows("select 1", &[]).unwrap_err();
        assert!(matches!(err, DalError::PrepareError(_)));
        assert_eq!(handle.prepare_calls.get(), 1);
    }

    #[test]
    fn run_dispatches_on_mode() {
        let handle = RecordingHandle::new(true);
        let exec = StatementExecutor::new(&handle);
        assert!(matches!(
            exec.run("select 1", &[], FetchMode::Single).unwrap(),
            Fetched::Row(_)
        ));
        assert!(matches!(
            exec.run("select 1", &[], FetchMode::Multi).unwrap(),
            Fetched::Rows(_)
        ));
    }
}
