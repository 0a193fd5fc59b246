//! IBM i (AS/400) dialect adapter.
//!
//! [`As400Adapter`] wraps a [`Connection`] and a base [`Dialect`] and
//! overrides the behaviors that differ on IBM i:
//!
//! - schema resolution and system naming (`*LIBL`)
//! - table listing and existence checks that never scan every library
//! - TRUNCATE gated on V7R2
//! - column rename emulated with add/copy/drop
//! - the `NO COMMIT` isolation level
//! - table-altering DDL wrapped in the auto-confirm sequence so the
//!   `CPA32B2` inquiry message never blocks the job

use as400_core::{ADAPTER_NAME, As400Config, DriverKind};
use as400_runtime::{Connection, DatabaseVersion, Db2Dialect, Dialect, IsolationLevel};
use std::collections::BTreeMap;

mod ddl;
pub mod error;
mod schema;
pub mod system;

pub use error::As400Error;

pub type Result<T> = std::result::Result<T, As400Error>;

/// One IBM i session.
///
/// All operations take `&mut self`: the auto-confirm sequence must run its
/// commands back to back on the same session.
pub struct As400Adapter<C: Connection, D: Dialect = Db2Dialect> {
    connection: C,
    dialect: D,
    config: As400Config,
    /// `CURRENT_SCHEMA`, resolved once.
    schema: Option<String>,
    /// Set while the reply-list override may be active on the job.
    auto_confirm_leaked: bool,
}

impl<C: Connection> As400Adapter<C> {
    /// Adapter over the stock DB2 dialect.
    pub fn new(connection: C, config: As400Config) -> Self {
        let dialect = Db2Dialect::new().with_emulate_booleans(config.emulate_booleans);
        Self::with_dialect(connection, dialect, config)
    }
}

impl<C: Connection, D: Dialect> As400Adapter<C, D> {
    pub fn with_dialect(connection: C, dialect: D, config: As400Config) -> Self {
        Self {
            connection,
            dialect,
            config,
            schema: None,
            auto_confirm_leaked: false,
        }
    }

    pub fn adapter_name(&self) -> &'static str {
        ADAPTER_NAME
    }

    pub fn driver(&self) -> DriverKind {
        self.config.driver
    }

    pub fn emulate_booleans(&self) -> bool {
        self.dialect.emulate_booleans()
    }

    pub fn config(&self) -> &As400Config {
        &self.config
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    /// True if the session may still answer `CPA32B2` automatically: a
    /// disarm step failed, a partial arm could not be undone, or an
    /// auto-confirm call was dropped before it finished. Hosts should
    /// discard such a connection.
    pub fn auto_confirm_leaked(&self) -> bool {
        self.auto_confirm_leaked
    }

    /// Session setup: `SET SCHEMA` for an explicit schema (switches to SQL
    /// naming) and `CHGCURLIB` for a configured current library.
    pub async fn configure_connection(&mut self) -> Result<()> {
        // Both values are spliced into statements.
        self.config
            .validate()
            .map_err(|e| As400Error::Configuration(e.to_string()))?;

        if let Some(schema) = self.config.explicit_schema() {
            let sql = format!("SET SCHEMA {}", schema);
            self.connection.execute(&sql, Some("Set Schema")).await?;
            tracing::info!(schema = %schema, "schema set");
        }
        if let Some(library) = self.config.current_library().map(str::to_string) {
            let command = format!("CHGCURLIB CURLIB({})", library);
            self.execute_system_command(&command).await?;
            tracing::info!(library = %library, "current library changed");
        }
        Ok(())
    }

    pub async fn os400_version(&mut self) -> Result<DatabaseVersion> {
        let major = self.connection.database_major_version().await?;
        let minor = self.connection.database_minor_version().await?;
        Ok(DatabaseVersion::new(major, minor))
    }

    /// Base DB2 isolation levels plus `NO COMMIT`.
    pub fn isolation_levels(&self) -> BTreeMap<IsolationLevel, &'static str> {
        let mut levels = self.dialect.isolation_levels();
        levels.insert(IsolationLevel::NoCommit, "NO COMMIT");
        levels
    }

    pub async fn begin_isolated_transaction(&mut self, level: IsolationLevel) -> Result<()> {
        let phrase = self.isolation_levels().get(&level).copied().ok_or_else(|| {
            As400Error::Unsupported(format!("isolation level {:?}", level))
        })?;
        self.connection.begin_transaction().await?;
        let sql = format!("SET TRANSACTION ISOLATION LEVEL {}", phrase);
        self.connection
            .execute(&sql, Some("Transaction Isolation"))
            .await?;
        Ok(())
    }

    /// True when the caller must fetch the key from a sequence before
    /// inserting. IBM i can only report `IDENTITY_VAL_LOCAL` for tables
    /// with a primary key.
    pub async fn needs_prefetched_key(&mut self, table: Option<&str>) -> Result<bool> {
        let Some(table) = table else {
            return Ok(true);
        };
        let schema = self.required_schema("look up primary keys").await?;
        let keys = self.connection.primary_keys(table, Some(&schema)).await?;
        Ok(keys.is_empty())
    }
}
