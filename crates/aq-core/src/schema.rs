//! Per-request schema snapshot
//!
//! A [`Schema`] is an ordered list of tables, each with its ordered column
//! descriptors. Table order is the order the provider returned them in and
//! drives first-match table detection, so it is preserved exactly.

use crate::error::{CoreError, CoreResult};
use crate::table_name::TableName;
use serde::Serialize;

/// A single column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    /// Column name as reported by the database
    pub name: String,

    /// Declared data type, when the provider knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl ColumnDef {
    /// Create a column descriptor without type information
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
        }
    }

    /// Create a column descriptor with a declared data type
    pub fn typed(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type.into()),
        }
    }
}

impl From<&str> for ColumnDef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ColumnDef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A table and its ordered columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Table name
    pub name: TableName,

    /// Columns in ordinal position order
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Column names in ordinal order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Exact (case-sensitive) column membership test
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

/// Immutable snapshot of table → ordered columns for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    tables: Vec<TableSchema>,
}

impl Schema {
    /// Build a schema from `(table, columns)` pairs, keeping their order.
    ///
    /// Fails on empty names or a table listed twice.
    pub fn from_tables<T, S, I, C>(tables: T) -> CoreResult<Self>
    where
        T: IntoIterator<Item = (S, I)>,
        S: AsRef<str>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnDef>,
    {
        let mut builder = SchemaBuilder::default();
        for (table, columns) in tables {
            let table = table.as_ref();
            builder.add_table(table)?;
            for column in columns {
                builder.push_column(table, column.into())?;
            }
        }
        Ok(builder.build())
    }

    /// Tables in provider order
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Look up a table by exact name
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Whether a table with this exact name exists
    pub fn contains_table(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the snapshot has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Render as one line per table: `Table t has columns: a, b`
    pub fn to_text(&self) -> String {
        self.tables
            .iter()
            .map(|t| {
                format!(
                    "Table {} has columns: {}",
                    t.name,
                    t.column_names().collect::<Vec<_>>().join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Accumulates `(table, column)` rows into a [`Schema`].
///
/// Rows arrive the way `information_schema.columns` returns them: grouped by
/// table, in ordinal position order.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: Vec<TableSchema>,
}

impl SchemaBuilder {
    /// Register an empty table. Fails if it already exists.
    pub fn add_table(&mut self, table: &str) -> CoreResult<&mut Self> {
        let name = TableName::try_new(table).ok_or(CoreError::EmptyName { kind: "table" })?;
        if self.tables.iter().any(|t| t.name == name) {
            return Err(CoreError::DuplicateTable {
                name: name.into_inner(),
            });
        }
        self.tables.push(TableSchema {
            name,
            columns: Vec::new(),
        });
        Ok(self)
    }

    /// Append a column to `table`, creating the table on first sight
    pub fn push_column(&mut self, table: &str, column: ColumnDef) -> CoreResult<&mut Self> {
        if column.name.is_empty() {
            return Err(CoreError::EmptyName { kind: "column" });
        }
        match self.tables.iter().position(|t| t.name == table) {
            Some(idx) => self.tables[idx].columns.push(column),
            None => {
                self.add_table(table)?;
                if let Some(last) = self.tables.last_mut() {
                    last.columns.push(column);
                }
            }
        }
        Ok(self)
    }

    /// Finish the snapshot
    pub fn build(self) -> Schema {
        Schema {
            tables: self.tables,
        }
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
