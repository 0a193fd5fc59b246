use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single result row keyed by column label.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Table entry returned by catalog enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default = "default_table_type")]
    pub table_type: String,
}

fn default_table_type() -> String {
    "TABLE".to_string()
}

impl TableDescriptor {
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.into(),
            table_type: default_table_type(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub table: String,
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

/// Column metadata as reported by the driver.
///
/// `default` holds the default expression verbatim (e.g. `0` or `'N'`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDescriptor {
    /// A nullable column of the given type with no size attributes.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            limit: None,
            precision: None,
            scale: None,
            nullable: true,
            default: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Server release as reported by database metadata (e.g. 7.2 for V7R2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DatabaseVersion {
    pub major: i32,
    pub minor: i32,
}

impl DatabaseVersion {
    pub fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }

    pub fn at_least(&self, major: i32, minor: i32) -> bool {
        *self >= Self::new(major, minor)
    }
}

/// The JDBC-like connectivity layer.
///
/// Every method is a single round trip on one session. Methods take
/// `&mut self` so a session can never have two statements in flight.
#[async_trait]
pub trait Connection: Send {
    /// Execute a statement and return the affected row count.
    /// `name` is a label used for logging only.
    async fn execute(&mut self, sql: &str, name: Option<&str>) -> anyhow::Result<u64>;

    /// Fetch the first row of a query, if any.
    async fn select_one(&mut self, sql: &str) -> anyhow::Result<Option<Row>>;

    async fn tables(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<TableDescriptor>>;

    async fn table_exists(&mut self, name: &str, schema: Option<&str>) -> anyhow::Result<bool>;

    async fn indexes(
        &mut self,
        table: &str,
        name: Option<&str>,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<IndexDescriptor>>;

    async fn columns(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<ColumnDescriptor>>;

    /// Primary-key column names in key order.
    async fn primary_keys(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> anyhow::Result<Vec<String>>;

    async fn database_major_version(&mut self) -> anyhow::Result<i32>;

    async fn database_minor_version(&mut self) -> anyhow::Result<i32>;

    /// Leave auto-commit mode until the next commit or rollback.
    async fn begin_transaction(&mut self) -> anyhow::Result<()>;
}
