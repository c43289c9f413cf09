//! Employee use-case service: record mutations and list queries.
//!
//! # Responsibility
//! - Validate and apply create/update/delete, each as one transaction.
//! - Compose list queries from session `ListState` or raw conditions.
//!
//! # Invariants
//! - A set `manager_id` must reference an existing employee.
//! - Updates never make an employee its own direct or transitive manager.
//! - Deleting an employee with direct reports is rejected, never cascaded.

use super::error::{ServiceError, ServiceResult};
use super::hierarchy_service::HierarchyResolver;
use super::log_outcome;
use crate::model::employee::{
    Employee, EmployeeDraft, EmployeeField, EmployeeId, EmployeePatch, EmployeePatchDraft,
    EmployeeRow, EmployeeValidationError, NewEmployee,
};
use crate::query::{build_condition, order_by_clause, ListState, QueryCondition, SortSpec};
use crate::repo::employee_repo::EmployeeRepository;
use std::time::Instant;

/// Employee service facade.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Hierarchy queries over the same repository.
    pub fn hierarchy(&self) -> HierarchyResolver<'_, R> {
        HierarchyResolver::new(&self.repo)
    }

    /// Creates one employee and returns its new id.
    pub fn create(&self, employee: &NewEmployee) -> ServiceResult<EmployeeId> {
        let started_at = Instant::now();
        let result = self.create_inner(employee);
        log_outcome("employee_create", started_at, &result);
        result
    }

    /// Parses raw form input, then creates.
    pub fn create_from_draft(&self, draft: &EmployeeDraft) -> ServiceResult<EmployeeId> {
        let employee = draft.parse()?;
        self.create(&employee)
    }

    /// Applies a partial update.
    pub fn update(&self, id: EmployeeId, patch: &EmployeePatch) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.update_inner(id, patch);
        log_outcome("employee_update", started_at, &result);
        result
    }

    /// Parses raw partial input, then updates.
    pub fn update_from_draft(
        &self,
        id: EmployeeId,
        draft: &EmployeePatchDraft,
    ) -> ServiceResult<()> {
        let patch = draft.parse()?;
        self.update(id, &patch)
    }

    /// Physically deletes one employee.
    pub fn delete(&self, id: EmployeeId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.delete_inner(id);
        log_outcome("employee_delete", started_at, &result);
        result
    }

    pub fn get(&self, id: EmployeeId) -> ServiceResult<Employee> {
        self.repo
            .get_employee(id)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Loads the list view for the session's current filter and sort.
    pub fn list(&self, state: &ListState) -> ServiceResult<Vec<EmployeeRow>> {
        self.list_where(state, &QueryCondition::always())
    }

    /// Like `list`, further narrowed by `extra` (e.g. raw CLI comparisons).
    ///
    /// Subordinate resolution and the row query share one transaction.
    pub fn list_where(
        &self,
        state: &ListState,
        extra: &QueryCondition,
    ) -> ServiceResult<Vec<EmployeeRow>> {
        let started_at = Instant::now();
        let result = self.repo.with_transaction(|| {
            let condition = build_condition(state.filter(), |manager_id| {
                self.hierarchy().subordinate_ids(manager_id)
            })?
            .and(extra.clone());
            self.repo
                .list_employees(&condition, &state.order_by())
                .map_err(ServiceError::from)
        });
        log_outcome("employee_list", started_at, &result);
        result
    }

    /// Loads the list view for an already composed condition.
    pub fn list_with(
        &self,
        condition: &QueryCondition,
        sort: Option<SortSpec>,
    ) -> ServiceResult<Vec<EmployeeRow>> {
        let started_at = Instant::now();
        let result = self
            .repo
            .list_employees(condition, &order_by_clause(sort))
            .map_err(ServiceError::from);
        log_outcome("employee_list", started_at, &result);
        result
    }

    fn create_inner(&self, employee: &NewEmployee) -> ServiceResult<EmployeeId> {
        let employee = employee.normalized();
        employee.validate()?;
        self.repo.with_transaction(|| {
            if let Some(manager_id) = employee.manager_id {
                self.ensure_manager_exists(manager_id)?;
            }
            self.repo
                .insert_employee(&employee)
                .map_err(ServiceError::from)
        })
    }

    fn update_inner(&self, id: EmployeeId, patch: &EmployeePatch) -> ServiceResult<()> {
        let patch = patch.normalized();
        patch.validate()?;
        self.repo.with_transaction(|| {
            if !self.repo.employee_exists(id)? {
                return Err(ServiceError::NotFound(id));
            }
            if let Some(Some(manager_id)) = patch.manager_id {
                self.ensure_manager_exists(manager_id)?;
                if self.hierarchy().would_create_cycle(id, manager_id)? {
                    return Err(ServiceError::CycleDetected(id));
                }
            }
            self.repo
                .update_employee(id, &patch)
                .map_err(ServiceError::from)
        })
    }

    fn delete_inner(&self, id: EmployeeId) -> ServiceResult<()> {
        self.repo.with_transaction(|| {
            if !self.repo.employee_exists(id)? {
                return Err(ServiceError::NotFound(id));
            }
            let dependents = self.repo.count_direct_reports(id)?;
            if dependents > 0 {
                return Err(ServiceError::ReferentialConflict { id, dependents });
            }
            self.repo.delete_employee(id).map_err(|err| {
                if err.is_foreign_key_violation() {
                    ServiceError::ReferentialConflict { id, dependents: 0 }
                } else {
                    ServiceError::from(err)
                }
            })
        })
    }

    fn ensure_manager_exists(&self, manager_id: EmployeeId) -> ServiceResult<()> {
        if self.repo.employee_exists(manager_id)? {
            return Ok(());
        }
        Err(ServiceError::Validation(EmployeeValidationError::single(
            EmployeeField::ManagerId,
            format!("employee {manager_id} does not exist"),
        )))
    }
}
