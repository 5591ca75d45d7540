//! Blocks and tables: the shape exchanged with the STAR file reader/writer.
//!
//! A [`Block`] is one save frame; its [`Table`]s are either "free" (one row of
//! tag/value pairs) or "loop" (N rows). Columns hold raw wire text aligned by
//! index with `column_names`.

use serde::{Deserialize, Serialize};

/// A named group of aligned columns within a block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Whether this is a free (single row tag/value) table.
    pub free: bool,
    /// Full wire tag names, e.g. `_Citation.ID`.
    pub column_names: Vec<String>,
    /// One column of wire text per tag name.
    pub columns: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub fn new(free: bool) -> Self {
        Table {
            free,
            column_names: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Append a column.
    pub fn push_column(&mut self, name: String, values: Vec<String>) {
        self.column_names.push(name);
        self.columns.push(values);
    }

    /// Index of a column by its full tag name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|n| n == name)
    }

    /// Column values by full tag name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.column_index(name)
            .and_then(|i| self.columns.get(i))
            .map(Vec::as_slice)
    }

    /// First value of a column, as used for free-table tags.
    #[must_use]
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.column(name)
            .and_then(|c| c.first())
            .map(String::as_str)
    }

    /// Number of rows (length of the longest column).
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether every column has the same length.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        let n = self.nrows();
        self.columns.len() == self.column_names.len() && self.columns.iter().all(|c| c.len() == n)
    }
}

/// One save frame: an ordered sequence of tables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Save frame name (written as `save_<name>`).
    pub name: String,
    /// Tables in file order.
    pub tables: Vec<Table>,
}

impl Block {
    /// Create an empty block with the given save frame name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Block {
            name: name.into(),
            tables: Vec::new(),
        }
    }
}
