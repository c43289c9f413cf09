//! Command handlers. Each opens its own connection through `context::open`.

pub mod hierarchy;
pub mod list;
pub mod records;
pub mod shell;

use miette::{IntoDiagnostic, Result};
use staffdb_core::db::Connection;
use staffdb_core::{EmployeeService, SqliteEmployeeRepository};

pub(crate) type Service<'conn> = EmployeeService<SqliteEmployeeRepository<'conn>>;

pub(crate) fn service(conn: &Connection) -> Result<Service<'_>> {
    let repo = SqliteEmployeeRepository::try_new(conn).into_diagnostic()?;
    Ok(EmployeeService::new(repo))
}
