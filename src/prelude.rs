//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::bind::{BoundStatement, PlaceholderStyle, bind};
pub use crate::dal::Dal;
pub use crate::error::DalError;
pub use crate::executor::{
    DatabaseHandle, FetchMode, Fetched, PreparedStatement, StatementExecutor,
};
pub use crate::results::{ResultSet, Row};
pub use crate::store::{TemplateSource, TemplateStore};
pub use crate::types::{Params, SqlValue};
pub use crate::vfs::Vfs;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteStatement, sql_value_to_sqlite, sqlite_extract_value};
