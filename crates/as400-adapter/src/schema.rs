//! Schema resolution and catalog lookups.
//!
//! In system naming mode `CURRENT_SCHEMA` is `*LIBL`: there is no single
//! schema and objects resolve through the job's library list. Catalog calls
//! then fall back to the current library so they never walk every library
//! on the system.

use crate::{As400Adapter, As400Error, Result};
use as400_core::SYSTEM_NAMING_SCHEMA;
use as400_runtime::{Connection, Dialect, IndexDescriptor, TableDescriptor};

const CURRENT_SCHEMA_QUERY: &str = "VALUES CURRENT_SCHEMA";

/// Label the driver gives the first unnamed column of a `VALUES` row.
const FIRST_COLUMN_LABEL: &str = "00001";

impl<C: Connection, D: Dialect> As400Adapter<C, D> {
    /// The session's `CURRENT_SCHEMA`, resolved on first call and cached for
    /// the life of the adapter.
    pub async fn resolve_schema(&mut self) -> Result<String> {
        if let Some(schema) = &self.schema {
            return Ok(schema.clone());
        }

        let schema = match self.config.explicit_schema() {
            Some(schema) => schema.to_string(),
            None => self.query_current_schema().await?,
        };
        tracing::debug!(schema = %schema, "resolved current schema");
        self.schema = Some(schema.clone());
        Ok(schema)
    }

    pub async fn is_system_naming(&mut self) -> Result<bool> {
        Ok(self.resolve_schema().await? == SYSTEM_NAMING_SCHEMA)
    }

    /// The schema callers should see: never `*LIBL`. Under system naming this
    /// is the configured current library, or `None` without one.
    pub async fn effective_schema(&mut self) -> Result<Option<String>> {
        let schema = self.resolve_schema().await?;
        if schema == SYSTEM_NAMING_SCHEMA {
            Ok(self.config.current_library().map(str::to_string))
        } else {
            Ok(Some(schema))
        }
    }

    pub async fn list_tables(&mut self, name: Option<&str>) -> Result<Vec<TableDescriptor>> {
        let system_naming = self.is_system_naming().await?;

        let mut filter = name;
        if system_naming {
            filter = filter.or_else(|| self.config.current_library());
            if filter.is_none() {
                return Err(As400Error::Configuration(
                    "cannot enumerate tables without a current library".to_string(),
                ));
            }
        }

        Ok(self.connection.tables(None, filter).await?)
    }

    /// Existence check restricted to the effective schema.
    pub async fn table_exists(&mut self, name: Option<&str>) -> Result<bool> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(false);
        };

        let schema = self.required_schema("check table existence").await?;
        Ok(self.connection.table_exists(name, Some(&schema)).await?)
    }

    /// The effective schema for lookups that must stay inside one library.
    pub(crate) async fn required_schema(&mut self, action: &str) -> Result<String> {
        self.effective_schema().await?.ok_or_else(|| {
            As400Error::Configuration(format!(
                "cannot {} without a schema or current library",
                action
            ))
        })
    }

    pub async fn indexes(
        &mut self,
        table: &str,
        name: Option<&str>,
    ) -> Result<Vec<IndexDescriptor>> {
        let schema = self.effective_schema().await?;
        Ok(self
            .connection
            .indexes(table, name, schema.as_deref())
            .await?)
    }

    async fn query_current_schema(&mut self) -> Result<String> {
        let row = self
            .connection
            .select_one(CURRENT_SCHEMA_QUERY)
            .await?
            .ok_or_else(|| {
                As400Error::UnexpectedResult(format!("{} returned no row", CURRENT_SCHEMA_QUERY))
            })?;

        let value = row
            .get(FIRST_COLUMN_LABEL)
            .or_else(|| if row.len() == 1 { row.values().next() } else { None })
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                As400Error::UnexpectedResult(format!(
                    "{} returned no schema name: {:?}",
                    CURRENT_SCHEMA_QUERY, row
                ))
            })?;

        // CHAR columns come back blank padded.
        Ok(value.trim_end().to_string())
    }
}
