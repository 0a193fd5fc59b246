//! Generic DB2 SQL generation.
//!
//! [`Dialect`] is the seam platform adapters build on: they hold a dialect
//! and call through it for every behavior they do not override.
//! [`Db2Dialect`] is the stock DB2 implementation.

use crate::connection::ColumnDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transaction isolation levels a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    /// Commitment control disabled (IBM i only).
    NoCommit,
}

pub trait Dialect: Send + Sync {
    /// Quote a value as an SQL string literal.
    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    fn quote_table_name(&self, name: &str) -> String;

    fn quote_column_name(&self, name: &str) -> String;

    /// SQL phrase for each supported isolation level.
    fn isolation_levels(&self) -> BTreeMap<IsolationLevel, &'static str>;

    fn truncate_sql(&self, table: &str) -> String;

    /// Column type as it appears in DDL, including size attributes.
    fn type_to_sql(&self, column: &ColumnDescriptor) -> String;

    /// `ALTER TABLE .. ADD COLUMN` for `column_name` with the type,
    /// default and nullability of `definition`.
    fn add_column_sql(
        &self,
        table: &str,
        column_name: &str,
        definition: &ColumnDescriptor,
    ) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.quote_table_name(table),
            self.quote_column_name(column_name),
            self.type_to_sql(definition)
        );
        if let Some(default) = &definition.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        if !definition.nullable {
            sql.push_str(" NOT NULL");
        }
        sql
    }

    fn remove_column_sql(&self, table: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_table_name(table),
            self.quote_column_name(column_name)
        )
    }

    fn emulate_booleans(&self) -> bool;
}

/// Stock DB2 behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Db2Dialect {
    emulate_booleans: bool,
}

impl Default for Db2Dialect {
    fn default() -> Self {
        Self {
            emulate_booleans: true,
        }
    }
}

impl Db2Dialect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emulate_booleans(mut self, emulate: bool) -> Self {
        self.emulate_booleans = emulate;
        self
    }
}

impl Dialect for Db2Dialect {
    // DB2 folds unquoted identifiers to upper case; names are passed through.
    fn quote_table_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn quote_column_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn isolation_levels(&self) -> BTreeMap<IsolationLevel, &'static str> {
        BTreeMap::from([
            (IsolationLevel::ReadUncommitted, "READ UNCOMMITTED"),
            (IsolationLevel::ReadCommitted, "READ COMMITTED"),
            (IsolationLevel::RepeatableRead, "REPEATABLE READ"),
            (IsolationLevel::Serializable, "SERIALIZABLE"),
        ])
    }

    fn truncate_sql(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {} IMMEDIATE", self.quote_table_name(table))
    }

    fn type_to_sql(&self, column: &ColumnDescriptor) -> String {
        let type_name = column.type_name.trim().to_ascii_uppercase();
        let sized = match type_name.as_str() {
            "BOOLEAN" if self.emulate_booleans => return "SMALLINT".to_string(),
            "DECIMAL" | "NUMERIC" => column
                .precision
                .map(|p| format!("({},{})", p, column.scale.unwrap_or(0))),
            "CHAR" | "CHARACTER" | "VARCHAR" | "GRAPHIC" | "VARGRAPHIC" | "BINARY"
            | "VARBINARY" | "CLOB" | "BLOB" | "DBCLOB" => {
                column.limit.map(|limit| format!("({})", limit))
            }
            _ => None,
        };
        match sized {
            Some(size) => type_name + &size,
            None => type_name,
        }
    }

    fn emulate_booleans(&self) -> bool {
        self.emulate_booleans
    }
}
