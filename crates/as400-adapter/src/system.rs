//! CL commands run through `QSYS2.QCMDEXC`, and the auto-confirm sequence.
//!
//! Some DDL (dropping a column from a journaled file, for one) makes the
//! system send inquiry message `CPA32B2`. A batch job waits for an operator
//! reply and the connection hangs. The auto-confirm sequence points the job
//! at the system reply list, adds an entry answering `CPA32B2` with `I`,
//! runs the statement and then removes both again.

use crate::{As400Adapter, As400Error, Result};
use as400_runtime::{Connection, Dialect};

pub const USE_REPLY_LIST: &str = "CHGJOB INQMSGRPY(*SYSRPYL)";
pub const ADD_REPLY_ENTRY: &str = "ADDRPYLE SEQNBR(9876) MSGID(CPA32B2) RPY('I')";
pub const USE_DEFAULT_REPLY: &str = "CHGJOB INQMSGRPY(*DFT)";
pub const REMOVE_REPLY_ENTRY: &str = "RMVRPYLE SEQNBR(9876)";

const ARM_COMMANDS: &str =
    "CHGJOB INQMSGRPY(*SYSRPYL) and ADDRPYLE SEQNBR(9876) MSGID(CPA32B2) RPY('I')";
const DISARM_COMMANDS: &str = "CHGJOB INQMSGRPY(*DFT) and RMVRPYLE SEQNBR(9876)";

/// The SQL statement that runs `command` on the server.
pub fn system_command_sql<D: Dialect + ?Sized>(dialect: &D, command: &str) -> String {
    format!("CALL qsys2.qcmdexc({})", dialect.quote_string(command))
}

impl<C: Connection, D: Dialect> As400Adapter<C, D> {
    /// Run a CL command. Failures are reported as authority problems, which
    /// is what they almost always are.
    pub async fn execute_system_command(&mut self, command: &str) -> Result<()> {
        self.run_system_command(command)
            .await
            .map_err(|source| As400Error::unauthorized(command, source))
    }

    /// Run `sql` with `CPA32B2` answered automatically.
    ///
    /// The override is removed whether or not the statement succeeds. If the
    /// statement fails, its error is returned even when removing the override
    /// also fails; that second failure is logged and recorded in
    /// [`As400Adapter::auto_confirm_leaked`].
    ///
    /// The leak flag is raised before the first arm command and only lowered
    /// once the override is known to be gone, so a call that is dropped
    /// before completion (a timeout, a losing `select!` branch) leaves it set.
    pub async fn execute_with_auto_confirm(
        &mut self,
        sql: &str,
        name: Option<&str>,
    ) -> Result<u64> {
        self.arm_auto_confirm().await?;

        tracing::debug!(sql = %sql, "executing with auto-confirm");
        let outcome = self.connection.execute(sql, name).await;

        let disarmed = self.disarm_auto_confirm().await;

        match (outcome, disarmed) {
            (Ok(count), Ok(())) => Ok(count),
            (Ok(_), Err(disarm_err)) => Err(disarm_err),
            (Err(exec_err), Ok(())) => Err(exec_err.into()),
            (Err(exec_err), Err(disarm_err)) => {
                tracing::error!(
                    error = %disarm_err,
                    "auto-confirm cleanup failed after statement error"
                );
                Err(exec_err.into())
            }
        }
    }

    /// Hook for every statement that alters a table.
    pub async fn execute_table_change(
        &mut self,
        sql: &str,
        table: &str,
        name: Option<&str>,
    ) -> Result<u64> {
        tracing::debug!(table = %table, "table change");
        self.execute_with_auto_confirm(sql, name).await
    }

    async fn arm_auto_confirm(&mut self) -> Result<()> {
        let was_leaked = self.auto_confirm_leaked;
        self.auto_confirm_leaked = true;

        if let Err(source) = self.run_system_command(USE_REPLY_LIST).await {
            // Nothing was changed on the job.
            self.auto_confirm_leaked = was_leaked;
            return Err(As400Error::unauthorized(ARM_COMMANDS, source));
        }
        if let Err(source) = self.run_system_command(ADD_REPLY_ENTRY).await {
            // Do not leave the job on the reply list with no entry for us.
            match self.run_system_command(USE_DEFAULT_REPLY).await {
                Ok(()) => self.auto_confirm_leaked = was_leaked,
                Err(reset) => {
                    tracing::warn!(error = %reset, "could not restore default inquiry reply");
                }
            }
            return Err(As400Error::unauthorized(ARM_COMMANDS, source));
        }
        Ok(())
    }

    /// Both commands are attempted; the first failure is returned.
    async fn disarm_auto_confirm(&mut self) -> Result<()> {
        let reply_mode = self.run_system_command(USE_DEFAULT_REPLY).await;
        let entry = self.run_system_command(REMOVE_REPLY_ENTRY).await;

        let failure = match (reply_mode, entry) {
            (Ok(()), Ok(())) => {
                self.auto_confirm_leaked = false;
                return Ok(());
            }
            (Err(first), Err(second)) => {
                tracing::warn!(error = %second, command = REMOVE_REPLY_ENTRY, "disarm failed");
                first
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => e,
        };

        self.auto_confirm_leaked = true;
        tracing::warn!(error = %failure, "auto-confirm override may still be active");
        Err(As400Error::unauthorized(DISARM_COMMANDS, failure))
    }

    async fn run_system_command(&mut self, command: &str) -> anyhow::Result<()> {
        let sql = system_command_sql(&self.dialect, command);
        self.connection.execute(&sql, Some("System Command")).await?;
        Ok(())
    }
}
