//! Core domain logic for staffdb: employee records, query composition and
//! manager hierarchy resolution over SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::employee::{
    Employee, EmployeeDraft, EmployeeField, EmployeeId, EmployeePatch, EmployeePatchDraft,
    EmployeeRow, EmployeeValidationError, FieldError, NewEmployee,
};
pub use model::hierarchy::{nest, HierarchyEntry, HierarchyNode};
pub use query::{
    build_condition, parse_raw_filters, DateExpr, EmployeeFilter, FilterKind, ListState,
    QueryCondition, QueryError, SortDirection, SortField, SortSpec,
};
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use service::employee_service::EmployeeService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::hierarchy_service::HierarchyResolver;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
