//! Collaborator interfaces for the AS/400 adapter.
//!
//! - [`connection`]: the JDBC-like connectivity layer the adapter talks to
//! - [`dialect`]: the generic DB2 dialect the adapter builds on

pub mod connection;
pub mod dialect;

pub use connection::{
    ColumnDescriptor, Connection, DatabaseVersion, IndexDescriptor, Row, TableDescriptor,
};
pub use dialect::{Db2Dialect, Dialect, IsolationLevel};
