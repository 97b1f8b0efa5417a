use std::cell::Cell;

use sql_dal::{
    Dal, DalError, DatabaseHandle, Params, PlaceholderStyle, PreparedStatement, ResultSet, Row,
    SqlValue, Vfs,
};

/// Test double for the database collaborator: records prepare calls and
/// injects failures at either stage.
struct MockDb {
    prepare_calls: Cell<usize>,
    prepare_ok: bool,
    exec_ok: bool,
}

impl MockDb {
    fn new() -> Self {
        Self {
            prepare_calls: Cell::new(0),
            prepare_ok: true,
            exec_ok: true,
        }
    }

    fn failing_prepare() -> Self {
        Self {
            prepare_ok: false,
            ..Self::new()
        }
    }

    fn failing_exec() -> Self {
        Self {
            exec_ok: false,
            ..Self::new()
        }
    }
}

struct MockStatement {
    exec_ok: bool,
}

impl PreparedStatement for MockStatement {
    fn query_row(&mut self, _args: &[SqlValue]) -> Result<Row, DalError> {
        if self.exec_ok {
            Ok(Row::empty())
        } else {
            Err(DalError::ExecError("constraint violation".to_string()))
        }
    }

    fn query(&mut self, _args: &[SqlValue]) -> Result<ResultSet, DalError> {
        if self.exec_ok {
            Ok(ResultSet::default())
        } else {
            Err(DalError::ExecError("connection lost".to_string()))
        }
    }
}

impl DatabaseHandle for MockDb {
    fn prepare<'h>(&'h self, _sql: &str) -> Result<Box<dyn PreparedStatement + 'h>, DalError> {
        self.prepare_calls.set(self.prepare_calls.get() + 1);
        if self.prepare_ok {
            Ok(Box::new(MockStatement {
                exec_ok: self.exec_ok,
            }))
        } else {
            Err(DalError::PrepareError("syntax error".to_string()))
        }
    }
}

fn fixtures() -> Vfs {
    Vfs::load_files("tests/fixtures/sqls").unwrap()
}

fn customer_params() -> Params {
    let mut params = Params::new();
    params.insert(
        "first_name".to_string(),
        SqlValue::Text("bearpig".to_string()),
    );
    params.insert("last_name".to_string(), SqlValue::Text("man".to_string()));
    params.insert(
        "address".to_string(),
        SqlValue::Blob(br#"{"test": "foo"}"#.to_vec()),
    );
    params
}

#[test]
fn no_template_source_is_a_config_error() {
    let db = MockDb::new();
    let dal = Dal::without_source(&db, PlaceholderStyle::Postgres);

    let err = dal.query_row("", None).unwrap_err();
    assert!(matches!(err, DalError::ConfigError(_)));
    assert!(err.is_pre_database());

    let err = dal.query("anything.sql", None).unwrap_err();
    assert!(matches!(err, DalError::ConfigError(_)));

    assert_eq!(db.prepare_calls.get(), 0);
}

#[test]
fn nonexistent_template_never_touches_the_database() {
    let db = MockDb::new();
    let dal = Dal::new(&db, fixtures(), PlaceholderStyle::Postgres);

    let err = dal.query_row("manbearpig.sql", None).unwrap_err();
    assert!(matches!(err, DalError::NotFound(_)));
    let err = dal.query("manbearpig.sql", None).unwrap_err();
    assert!(matches!(err, DalError::NotFound(_)));

    assert_eq!(db.prepare_calls.get(), 0);
}

#[test]
fn empty_template_surfaces_as_a_prepare_error() {
    let db = MockDb::new();
    let dal = Dal::new(&db, fixtures(), PlaceholderStyle::Postgres);

    let params = Params::new();
    let err = dal.query_row("test.sql", Some(&params)).unwrap_err();
    assert!(matches!(err, DalError::PrepareError(_)));
    // rejected before the handle saw the text
    assert_eq!(db.prepare_calls.get(), 0);
}

#[test]
fn prepare_rejection_propagates_verbatim() {
    let dal = Dal::new(
        MockDb::failing_prepare(),
        fixtures(),
        PlaceholderStyle::Postgres,
    );

    let params = customer_params();
    let err = dal.query_row("insert_customer.sql", Some(&params)).unwrap_err();
    match err {
        DalError::PrepareError(msg) => assert_eq!(msg, "syntax error"),
        other => panic!("expected PrepareError, got {other:?}"),
    }
}

#[test]
fn exec_failure_propagates_verbatim() {
    let dal = Dal::new(
        MockDb::failing_exec(),
        fixtures(),
        PlaceholderStyle::Postgres,
    );

    let params = customer_params();
    let err = dal.query_row("insert_customer.sql", Some(&params)).unwrap_err();
    assert!(matches!(err, DalError::ExecError(_)));
    assert!(!err.is_pre_database());

    let err = dal.query("select_all_customer.sql", None).unwrap_err();
    assert!(matches!(err, DalError::ExecError(_)));
}

#[test]
fn missing_parameter_fails_before_any_database_interaction() {
    let db = MockDb::new();
    let dal = Dal::new(&db, fixtures(), PlaceholderStyle::Postgres);

    let mut params = Params::new();
    params.insert(
        "first_name".to_string(),
        SqlValue::Text("bearpig".to_string()),
    );
    let err = dal.query_row("insert_customer.sql", Some(&params)).unwrap_err();
    match &err {
        // placeholders bind in textual order, so `last_name` fails first
        DalError::MissingParameter(name) => assert_eq!(name, "last_name"),
        other => panic!("expected MissingParameter, got {other:?}"),
    }
    assert!(err.is_pre_database());
    assert_eq!(db.prepare_calls.get(), 0);
}

#[test]
fn parameterless_template_with_nil_params_succeeds() {
    let dal = Dal::new(MockDb::new(), fixtures(), PlaceholderStyle::Postgres);

    let rows = dal.query("select_all_customer.sql", None).unwrap();
    assert!(rows.results.is_empty());

    let row = dal.query_row("select_all_customer.sql", None).unwrap();
    assert!(row.is_empty());
}

#[test]
fn full_pipeline_reaches_the_handle_exactly_once() {
    let db = MockDb::new();
    let dal = Dal::new(&db, fixtures(), PlaceholderStyle::Postgres);

    let params = customer_params();
    dal.query_row("insert_customer.sql", Some(&params)).unwrap();
    assert_eq!(db.prepare_calls.get(), 1);
}
