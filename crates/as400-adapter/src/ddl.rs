use crate::{As400Adapter, As400Error, Result};
use as400_runtime::{ColumnDescriptor, Connection, Dialect};

impl<C: Connection, D: Dialect> As400Adapter<C, D> {
    /// TRUNCATE exists from IBM i 7.2 on.
    pub async fn truncate(&mut self, table: &str) -> Result<()> {
        let version = self.os400_version().await?;
        if !version.at_least(7, 2) {
            return Err(As400Error::Unsupported(format!(
                "TRUNCATE requires IBM i 7.2 or later, server is {}.{}",
                version.major, version.minor
            )));
        }

        let sql = self.dialect.truncate_sql(table);
        self.connection.execute(&sql, Some("Truncate")).await?;
        Ok(())
    }

    pub async fn add_column(
        &mut self,
        table: &str,
        column_name: &str,
        definition: &ColumnDescriptor,
    ) -> Result<()> {
        let sql = self.dialect.add_column_sql(table, column_name, definition);
        self.execute_table_change(&sql, table, Some("Add Column"))
            .await?;
        Ok(())
    }

    pub async fn remove_column(&mut self, table: &str, column_name: &str) -> Result<()> {
        let sql = self.dialect.remove_column_sql(table, column_name);
        self.execute_table_change(&sql, table, Some("Remove Column"))
            .await?;
        Ok(())
    }

    /// There is no RENAME COLUMN: add a copy, move the data, drop the old one.
    ///
    /// Not atomic. If the copy or the drop fails both columns remain.
    pub async fn rename_column(
        &mut self,
        table: &str,
        column_name: &str,
        new_name: &str,
    ) -> Result<()> {
        let schema = self.effective_schema().await?;
        let column = self
            .connection
            .columns(table, schema.as_deref())
            .await?
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(column_name))
            .ok_or_else(|| As400Error::ColumnNotFound {
                table: table.to_string(),
                column: column_name.to_string(),
            })?;

        self.add_column(table, new_name, &column).await?;

        // WITH NC: no commitment control for the copy.
        let sql = format!(
            "UPDATE {} SET {} = {} WITH NC",
            self.dialect.quote_table_name(table),
            self.dialect.quote_column_name(new_name),
            self.dialect.quote_column_name(column_name)
        );
        self.connection.execute(&sql, Some("Rename Column")).await?;

        self.remove_column(table, column_name).await?;
        tracing::info!(table = %table, from = %column_name, to = %new_name, "column renamed");
        Ok(())
    }
}
