//! Error taxonomy surfaced by employee services.

use crate::model::employee::{EmployeeId, EmployeeValidationError};
use crate::query::QueryError;
use crate::repo::employee_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from employee and hierarchy service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Missing or malformed record fields; lists every violation.
    Validation(EmployeeValidationError),
    /// Malformed filter/sort input.
    Query(QueryError),
    /// Referenced employee does not exist.
    NotFound(EmployeeId),
    /// Delete blocked because other employees report to the target.
    ReferentialConflict { id: EmployeeId, dependents: u64 },
    /// The manager graph loops through this employee.
    CycleDetected(EmployeeId),
    /// Store/driver failure; the current operation was rolled back.
    Store(RepoError),
}

impl ServiceError {
    /// Stable machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Query(_) => "invalid_query",
            Self::NotFound(_) => "not_found",
            Self::ReferentialConflict { .. } => "referential_conflict",
            Self::CycleDetected(_) => "cycle_detected",
            Self::Store(_) => "store_error",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid employee data: {err}"),
            Self::Query(err) => write!(f, "invalid query: {err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::ReferentialConflict { id, dependents } => write!(
                f,
                "employee {id} still manages {dependents} employee(s); reassign them first"
            ),
            Self::CycleDetected(id) => {
                write!(f, "manager hierarchy contains a cycle through employee {id}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<QueryError> for ServiceError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<EmployeeValidationError> for ServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}
