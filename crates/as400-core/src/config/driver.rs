//! JDBC driver selection.

use serde::{Deserialize, Serialize};

/// Which IBM driver the host framework should load for the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// IBM Toolbox for Java (jt400), usable from any host.
    #[default]
    Toolbox,
    /// Native JDBC driver, only available when running on the IBM i itself.
    Native,
}

impl DriverKind {
    /// Fully qualified driver class name.
    pub fn driver_class(&self) -> &'static str {
        match self {
            DriverKind::Toolbox => "com.ibm.as400.access.AS400JDBCDriver",
            DriverKind::Native => "com.ibm.db2.jdbc.app.DB2Driver",
        }
    }
}
