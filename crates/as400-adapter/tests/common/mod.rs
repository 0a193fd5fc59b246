//! Scripted in-memory connection shared by the adapter integration tests.
//!
//! Every call is recorded in order as a short string so tests can assert on
//! the exact round trips the adapter made.

#![allow(dead_code)]

use as400_adapter::As400Adapter;
use as400_core::As400Config;
use as400_runtime::{
    ColumnDescriptor, Connection, IndexDescriptor, Row, TableDescriptor,
};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
pub struct FakeConnection {
    /// Every round trip, in order.
    pub calls: Vec<String>,
    /// Value returned by `VALUES CURRENT_SCHEMA`; `None` returns no row.
    pub current_schema: Option<String>,
    pub version: (i32, i32),
    pub tables: Vec<TableDescriptor>,
    pub columns: BTreeMap<String, Vec<ColumnDescriptor>>,
    pub primary_keys: BTreeMap<String, Vec<String>>,
    pub existing: Vec<(String, String)>,
    /// Statements containing any of these fragments fail.
    pub failing: Vec<String>,
    /// Statements containing this fragment hang until the caller gives up.
    pub stalling: Option<String>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self {
            current_schema: Some("MYLIB".to_string()),
            version: (7, 4),
            ..Default::default()
        }
    }

    pub fn with_current_schema(mut self, schema: &str) -> Self {
        self.current_schema = Some(schema.to_string());
        self
    }

    pub fn with_version(mut self, major: i32, minor: i32) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn with_columns(mut self, table: &str, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns.insert(table.to_string(), columns);
        self
    }

    pub fn with_primary_key(mut self, table: &str, keys: &[&str]) -> Self {
        self.primary_keys
            .insert(table.to_string(), keys.iter().map(|k| k.to_string()).collect());
        self
    }

    pub fn with_table(mut self, schema: &str, name: &str) -> Self {
        self.existing.push((schema.to_string(), name.to_string()));
        self.tables.push(TableDescriptor::new(Some(schema), name));
        self
    }

    pub fn stalling_on(mut self, fragment: &str) -> Self {
        self.stalling = Some(fragment.to_string());
        self
    }

    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.failing.push(fragment.to_string());
        self
    }

    /// Only the `execute` calls, without the `execute: ` prefix.
    pub fn executed(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| c.strip_prefix("execute: "))
            .map(str::to_string)
            .collect()
    }

    pub fn remote_calls(&self) -> usize {
        self.calls.len()
    }
}

#[async_trait]
impl Connection for FakeConnection {
    async fn execute(&mut self, sql: &str, _name: Option<&str>) -> anyhow::Result<u64> {
        self.calls.push(format!("execute: {}", sql));
        if self.stalling.as_deref().is_some_and(|f| sql.contains(f)) {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        }
        if let Some(fragment) = self.failing.iter().find(|f| sql.contains(f.as_str())) {
            anyhow::bail!("SQL7008 statement failed on '{}'", fragment);
        }
        Ok(1)
    }

    async fn select_one(&mut self, sql: &str) -> anyhow::Result<Option<Row>> {
        self.calls.push(format!("select_one: {}", sql));
        Ok(self.current_schema.as_ref().map(|schema| {
            let mut row = Row::new();
            row.insert("00001".to_string(), serde_json::json!(schema));
            row
        }))
    }

    async fn tables(
        &mut self,
        _catalog: Option<&str>,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<TableDescriptor>> {
        self.calls.push(format!("tables: {:?}", schema));
        Ok(self
            .tables
            .iter()
            .filter(|t| schema.is_none() || t.schema.as_deref() == schema)
            .cloned()
            .collect())
    }

    async fn table_exists(&mut self, name: &str, schema: Option<&str>) -> anyhow::Result<bool> {
        self.calls.push(format!("table_exists: {} {:?}", name, schema));
        Ok(self.existing.iter().any(|(s, t)| {
            t.eq_ignore_ascii_case(name) && Some(s.as_str()) == schema
        }))
    }

    async fn indexes(
        &mut self,
        table: &str,
        name: Option<&str>,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<IndexDescriptor>> {
        self.calls
            .push(format!("indexes: {} {:?} {:?}", table, name, schema));
        Ok(vec![IndexDescriptor {
            table: table.to_string(),
            name: format!("{}_PK", table),
            unique: true,
            columns: self.primary_keys.get(table).cloned().unwrap_or_default(),
        }])
    }

    async fn columns(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<ColumnDescriptor>> {
        self.calls.push(format!("columns: {} {:?}", table, schema));
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn primary_keys(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<String>> {
        self.calls
            .push(format!("primary_keys: {} {:?}", table, schema));
        Ok(self.primary_keys.get(table).cloned().unwrap_or_default())
    }

    async fn database_major_version(&mut self) -> anyhow::Result<i32> {
        self.calls.push("major_version".to_string());
        Ok(self.version.0)
    }

    async fn database_minor_version(&mut self) -> anyhow::Result<i32> {
        self.calls.push("minor_version".to_string());
        Ok(self.version.1)
    }

    async fn begin_transaction(&mut self) -> anyhow::Result<()> {
        self.calls.push("begin".to_string());
        Ok(())
    }
}

/// Adapter with an explicit schema (SQL naming).
pub fn sql_naming_adapter(conn: FakeConnection) -> As400Adapter<FakeConnection> {
    As400Adapter::new(
        conn,
        As400Config {
            schema: Some("MYLIB".to_string()),
            ..Default::default()
        },
    )
}

/// Adapter whose session reports `*LIBL`.
pub fn system_naming_adapter(
    conn: FakeConnection,
    current_library: Option<&str>,
) -> As400Adapter<FakeConnection> {
    As400Adapter::new(
        conn.with_current_schema("*LIBL"),
        As400Config {
            current_library: current_library.map(str::to_string),
            ..Default::default()
        },
    )
}

pub const ARM: [&str; 2] = [
    "CALL qsys2.qcmdexc('CHGJOB INQMSGRPY(*SYSRPYL)')",
    "CALL qsys2.qcmdexc('ADDRPYLE SEQNBR(9876) MSGID(CPA32B2) RPY(''I'')')",
];

pub const DISARM: [&str; 2] = [
    "CALL qsys2.qcmdexc('CHGJOB INQMSGRPY(*DFT)')",
    "CALL qsys2.qcmdexc('RMVRPYLE SEQNBR(9876)')",
];

/// `sql` bracketed by the arm and disarm commands.
pub fn guarded(sql: &str) -> Vec<String> {
    ARM.iter()
        .copied()
        .chain(std::iter::once(sql))
        .chain(DISARM.iter().copied())
        .map(str::to_string)
        .collect()
}
