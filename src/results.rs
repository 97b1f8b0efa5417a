use std::sync::Arc;

use crate::types::SqlValue;

/// A single row handle returned by `query_row`.
///
/// "No matching rows" is a retrievable state, not an error: the handle is
/// simply empty and every lookup returns `None`.
#[derive(Debug, Clone, Default)]
pub struct Row {
    /// Column names, shared with the result set the row came from
    column_names: Arc<Vec<String>>,
    /// The values for this row, in column order
    values: Vec<SqlValue>,
}

impl Row {
    /// Create a row from its column names and values.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// The empty state: a query matched zero rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this handle holds no row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column names for this row.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Get a value by column name, or `None` if the column is absent
    /// (including the empty-row state).
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        let idx = self.column_names.iter().position(|col| col == column_name)?;
        self.values.get(idx)
    }

    /// Get a value by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }
}

/// A result set returned by `query`.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Row>,
    /// The number of rows returned or affected
    pub rows_affected: usize,
    /// Column names shared by all rows
    column_names: Option<Arc<Vec<String>>>,
}

impl ResultSet {
    /// Create a result set with preallocated row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
        }
    }

    /// Set the column names shared by all rows in this result set.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_names = Some(column_names);
    }

    /// Column names for this result set, if any row metadata was seen.
    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row built from the shared column names.
    ///
    /// Values are dropped if `set_column_names` has not been called yet.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        if let Some(column_names) = &self.column_names {
            self.results.push(Row::new(column_names.clone(), values));
            self.rows_affected += 1;
        }
    }

    /// Take the first row out of the result set, or the empty state.
    #[must_use]
    pub fn into_first_row(mut self) -> Row {
        if self.results.is_empty() {
            Row::empty()
        } else {
            self.results.swap_remove(0)
        }
    }
}
