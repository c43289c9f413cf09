//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and hierarchy-edge queries over the `employees` table.
//! - Execute list queries composed by `crate::query`.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - Hierarchy queries return rows ordered by `id ASC`.
//! - Column identifiers in SQL text are fixed strings; values are bound.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::employee::{
    parse_date, Employee, EmployeeId, EmployeePatch, EmployeeRow, NewEmployee, DATE_FORMAT,
};
use crate::query::QueryCondition;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    full_name,
    position,
    hire_date,
    salary,
    manager_id
FROM employees";

const EMPLOYEE_LIST_SQL: &str = "SELECT
    e.id AS id,
    e.full_name AS full_name,
    e.position AS position,
    e.hire_date AS hire_date,
    e.salary AS salary,
    e.manager_id AS manager_id,
    b.full_name AS manager_name
FROM employees e
LEFT JOIN employees b ON e.manager_id = b.id";

// Stays well below SQLITE_MAX_VARIABLE_NUMBER on every supported build.
const MAX_IDS_PER_QUERY: usize = 500;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target employee does not exist.
    NotFound(EmployeeId),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required column is missing from the `employees` table.
    MissingRequiredColumn(&'static str),
}

impl RepoError {
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_foreign_key_violation())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "employee repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredColumn(column) => write!(
                f,
                "employee repository requires column `{column}` in table `employees`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for employee records.
pub trait EmployeeRepository {
    /// Inserts one employee and returns the assigned id.
    fn insert_employee(&self, employee: &NewEmployee) -> RepoResult<EmployeeId>;
    /// Writes the supplied patch fields.
    fn update_employee(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<()>;
    /// Physically deletes one employee.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    /// Loads one employee by id.
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Returns whether the id exists.
    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool>;
    /// Runs a composed list query (`condition` + ORDER BY body).
    fn list_employees(
        &self,
        condition: &QueryCondition,
        order_by: &str,
    ) -> RepoResult<Vec<EmployeeRow>>;
    /// Loads every employee whose manager is one of `manager_ids`.
    fn direct_reports(&self, manager_ids: &[EmployeeId]) -> RepoResult<Vec<Employee>>;
    /// Counts employees reporting directly to `id`.
    fn count_direct_reports(&self, id: EmployeeId) -> RepoResult<u64>;
    /// Runs `work` as one atomic unit: commit on `Ok`, rollback on `Err`.
    fn with_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed employee repository.
#[derive(Clone, Copy)]
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert_employee(&self, employee: &NewEmployee) -> RepoResult<EmployeeId> {
        self.conn.execute(
            "INSERT INTO employees (
                full_name,
                position,
                hire_date,
                salary,
                manager_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                employee.full_name.as_str(),
                employee.position.as_str(),
                employee.hire_date.format(DATE_FORMAT).to_string(),
                employee.salary,
                employee.manager_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_employee(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<()> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(full_name) = patch.full_name.as_ref() {
            assignments.push("full_name = ?");
            bind_values.push(Value::Text(full_name.clone()));
        }
        if let Some(position) = patch.position.as_ref() {
            assignments.push("position = ?");
            bind_values.push(Value::Text(position.clone()));
        }
        if let Some(hire_date) = patch.hire_date {
            assignments.push("hire_date = ?");
            bind_values.push(Value::Text(hire_date.format(DATE_FORMAT).to_string()));
        }
        if let Some(salary) = patch.salary {
            assignments.push("salary = ?");
            bind_values.push(Value::Integer(salary));
        }
        if let Some(manager_id) = patch.manager_id {
            assignments.push("manager_id = ?");
            bind_values.push(manager_id.map_or(Value::Null, Value::Integer));
        }
        if assignments.is_empty() {
            return Err(RepoError::InvalidData(
                "employee update requires at least one field".to_string(),
            ));
        }

        let sql = format!(
            "UPDATE employees
             SET {},
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool> {
        let exists: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM employees WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(exists.is_some())
    }

    fn list_employees(
        &self,
        condition: &QueryCondition,
        order_by: &str,
    ) -> RepoResult<Vec<EmployeeRow>> {
        let sql = format!(
            "{EMPLOYEE_LIST_SQL} WHERE {} ORDER BY {order_by};",
            condition.sql()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(condition.params().iter()))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let employee = parse_employee_row(row)?;
            items.push(EmployeeRow {
                id: employee.id,
                full_name: employee.full_name,
                position: employee.position,
                hire_date: employee.hire_date,
                salary: employee.salary,
                manager_id: employee.manager_id,
                manager_name: row.get("manager_name")?,
            });
        }
        Ok(items)
    }

    fn direct_reports(&self, manager_ids: &[EmployeeId]) -> RepoResult<Vec<Employee>> {
        let mut reports = Vec::new();
        for chunk in manager_ids.chunks(MAX_IDS_PER_QUERY) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = self.conn.prepare(&format!(
                "{EMPLOYEE_SELECT_SQL}
                 WHERE manager_id IN ({placeholders})
                 ORDER BY id ASC;"
            ))?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                reports.push(parse_employee_row(row)?);
            }
        }
        if manager_ids.len() > MAX_IDS_PER_QUERY {
            reports.sort_by_key(|employee| employee.id);
        }
        Ok(reports)
    }

    fn count_direct_reports(&self, id: EmployeeId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM employees WHERE manager_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative report count `{count}`")))
    }

    fn with_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = work()?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    let hire_date_text: String = row.get("hire_date")?;
    let hire_date = parse_date(&hire_date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid hire date `{hire_date_text}` in employees.hire_date for id {id}"
        ))
    })?;

    Ok(Employee {
        id,
        full_name: row.get("full_name")?,
        position: row.get("position")?,
        hire_date,
        salary: row.get("salary")?,
        manager_id: row.get("manager_id")?,
    })
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut present = Vec::new();
    let mut stmt = conn.prepare("PRAGMA table_info(employees);")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }

    for column in [
        "id",
        "full_name",
        "position",
        "hire_date",
        "salary",
        "manager_id",
    ] {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn(column));
        }
    }

    Ok(())
}
