//! Named-SQL templating and execution layer.
//!
//! Application code asks for a logical SQL file name plus a named parameter
//! mapping; this crate resolves the template from a virtual file store,
//! rewrites `:name` placeholders into the positional form of the target
//! driver, prepares the statement, and executes it for a single row or a
//! row set. The file store and the database handle are capability
//! interfaces, so both can be swapped for test doubles.
//!
//! Not a query builder, not an ORM, and not a migration tool: templates are
//! pre-written SQL text, and this crate only binds and runs them.

pub mod bind;
pub mod dal;
pub mod error;
pub mod executor;
pub mod results;
pub mod store;
pub mod types;
pub mod vfs;

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Re-export of the bundled driver so callers and tests can open
/// connections without declaring their own dependency.
#[cfg(feature = "sqlite")]
pub use rusqlite;

pub mod prelude;

pub use bind::{BoundStatement, PlaceholderStyle, bind};
pub use dal::Dal;
pub use error::DalError;
pub use executor::{DatabaseHandle, FetchMode, Fetched, PreparedStatement, StatementExecutor};
pub use results::{ResultSet, Row};
pub use store::{TemplateSource, TemplateStore};
pub use types::{Params, SqlValue};
pub use vfs::Vfs;
