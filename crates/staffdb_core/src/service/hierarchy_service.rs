//! Manager/subordinate hierarchy resolution.
//!
//! # Responsibility
//! - Compute transitive subordinates of a manager.
//! - Materialize the subordinate tree of any employee with level depth.
//! - Walk management chains upward for display and cycle checks.
//!
//! # Invariants
//! - Expansion is level by level: one `direct_reports` query per level.
//! - Every id is expanded at most once; a revisit is `CycleDetected`.
//! - Tree output is ordered `level ASC, id ASC`.

use super::error::{ServiceError, ServiceResult};
use super::log_outcome;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::hierarchy::{nest, HierarchyEntry, HierarchyNode};
use crate::repo::employee_repo::EmployeeRepository;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

/// Read-only hierarchy queries over one repository.
pub struct HierarchyResolver<'r, R: EmployeeRepository> {
    repo: &'r R,
}

impl<'r, R: EmployeeRepository> HierarchyResolver<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// All direct and indirect reports of `manager_id`, excluding itself.
    ///
    /// # Errors
    /// - `NotFound` when `manager_id` does not exist.
    /// - `CycleDetected` when the reports graph loops back.
    pub fn subordinate_ids(&self, manager_id: EmployeeId) -> ServiceResult<BTreeSet<EmployeeId>> {
        let started_at = Instant::now();
        let result = self.collect_subordinate_ids(manager_id);
        log_outcome("hierarchy_subordinates", started_at, &result);
        result
    }

    /// Subordinate tree rooted at `root_id` (root at level 1).
    ///
    /// A root without reports yields exactly one entry.
    pub fn hierarchy_tree(&self, root_id: EmployeeId) -> ServiceResult<Vec<HierarchyEntry>> {
        let started_at = Instant::now();
        let result = self.collect_tree(root_id);
        log_outcome("hierarchy_tree", started_at, &result);
        result
    }

    /// Same as `hierarchy_tree`, folded into nested nodes.
    pub fn hierarchy_nodes(&self, root_id: EmployeeId) -> ServiceResult<HierarchyNode> {
        let entries = self.hierarchy_tree(root_id)?;
        nest(&entries).ok_or(ServiceError::NotFound(root_id))
    }

    /// Managers of `id` from the direct manager up to the forest root.
    pub fn management_chain(&self, id: EmployeeId) -> ServiceResult<Vec<Employee>> {
        let employee = self
            .repo
            .get_employee(id)?
            .ok_or(ServiceError::NotFound(id))?;

        let mut chain = Vec::new();
        let mut visited = HashSet::from([employee.id]);
        let mut cursor = employee.manager_id;
        while let Some(current) = cursor {
            if !visited.insert(current) {
                return Err(ServiceError::CycleDetected(current));
            }
            let manager = self
                .repo
                .get_employee(current)?
                .ok_or(ServiceError::NotFound(current))?;
            cursor = manager.manager_id;
            chain.push(manager);
        }
        Ok(chain)
    }

    /// Returns whether making `candidate_manager` the manager of `employee_id`
    /// would close a loop.
    pub fn would_create_cycle(
        &self,
        employee_id: EmployeeId,
        candidate_manager: EmployeeId,
    ) -> ServiceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_manager);
        while let Some(current) = cursor {
            if current == employee_id {
                return Ok(true);
            }
            if !visited.insert(current) {
                return Ok(true);
            }
            let manager = self
                .repo
                .get_employee(current)?
                .ok_or(ServiceError::NotFound(current))?;
            cursor = manager.manager_id;
        }
        Ok(false)
    }

    fn collect_subordinate_ids(
        &self,
        manager_id: EmployeeId,
    ) -> ServiceResult<BTreeSet<EmployeeId>> {
        if !self.repo.employee_exists(manager_id)? {
            return Err(ServiceError::NotFound(manager_id));
        }
        let descendants = self.expand(manager_id)?;
        Ok(descendants.into_iter().map(|(employee, _)| employee.id).collect())
    }

    fn collect_tree(&self, root_id: EmployeeId) -> ServiceResult<Vec<HierarchyEntry>> {
        let root = self
            .repo
            .get_employee(root_id)?
            .ok_or(ServiceError::NotFound(root_id))?;
        let descendants = self.expand(root.id)?;

        let mut entries = Vec::with_capacity(descendants.len() + 1);
        entries.push(to_entry(root, 1));
        entries.extend(
            descendants
                .into_iter()
                .map(|(employee, level)| to_entry(employee, level)),
        );
        Ok(entries)
    }

    /// Breadth-first expansion below `root_id`; returns `(employee, level)`
    /// with the root's direct reports at level 2.
    fn expand(&self, root_id: EmployeeId) -> ServiceResult<Vec<(Employee, u32)>> {
        let mut visited = HashSet::from([root_id]);
        let mut frontier = vec![root_id];
        let mut level = 1;
        let mut found = Vec::new();

        while !frontier.is_empty() {
            let reports = self.repo.direct_reports(&frontier)?;
            level += 1;
            frontier = Vec::with_capacity(reports.len());
            for employee in reports {
                if !visited.insert(employee.id) {
                    return Err(ServiceError::CycleDetected(employee.id));
                }
                frontier.push(employee.id);
                found.push((employee, level));
            }
        }
        Ok(found)
    }
}

fn to_entry(employee: Employee, level: u32) -> HierarchyEntry {
    HierarchyEntry {
        id: employee.id,
        full_name: employee.full_name,
        position: employee.position,
        manager_id: employee.manager_id,
        level,
    }
}
