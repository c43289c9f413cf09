//! Employee record, write inputs and field validation.
//!
//! # Responsibility
//! - Define `Employee` plus create (`NewEmployee`) and partial update
//!   (`EmployeePatch`) inputs.
//! - Convert raw form/CLI text (`EmployeeDraft`, `EmployeePatchDraft`) into
//!   typed inputs, collecting every field violation instead of the first.
//!
//! # Invariants
//! - `full_name` and `position` are non-empty after trim.
//! - `salary` is a non-negative whole number.
//! - `manager_id`, when set, is a positive id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable employee identifier assigned by the store.
pub type EmployeeId = i64;

/// Date format used for `hire_date` input and persistence.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: i64,
    /// `None` means the employee is a root of the org forest.
    pub manager_id: Option<EmployeeId>,
}

/// Flat list read model: one employee joined with its manager's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub id: EmployeeId,
    pub full_name: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: i64,
    pub manager_id: Option<EmployeeId>,
    pub manager_name: Option<String>,
}

/// Editable employee fields, used to attribute validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeField {
    FullName,
    Position,
    HireDate,
    Salary,
    ManagerId,
}

impl EmployeeField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Position => "position",
            Self::HireDate => "hire_date",
            Self::Salary => "salary",
            Self::ManagerId => "manager_id",
        }
    }
}

impl Display for EmployeeField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: EmployeeField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: EmployeeField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation failure carrying every violated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeValidationError {
    pub errors: Vec<FieldError>,
}

impl EmployeeValidationError {
    pub fn single(field: EmployeeField, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Returns whether any violation is attributed to `field`.
    pub fn has_field(&self, field: EmployeeField) -> bool {
        self.errors.iter().any(|err| err.field == field)
    }

    fn from_errors(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no fields to update");
        }
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl Error for EmployeeValidationError {}

/// Typed input for creating one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub full_name: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: i64,
    pub manager_id: Option<EmployeeId>,
}

impl NewEmployee {
    /// Checks field constraints that typing alone does not guarantee.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        let mut errors = Vec::new();
        check_text(&mut errors, EmployeeField::FullName, &self.full_name);
        check_text(&mut errors, EmployeeField::Position, &self.position);
        check_salary(&mut errors, self.salary);
        if let Some(manager_id) = self.manager_id {
            check_manager_id(&mut errors, manager_id);
        }
        EmployeeValidationError::from_errors(errors)
    }

    /// Returns a copy with text fields trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            position: self.position.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Partial update: only `Some` fields are written.
///
/// `manager_id` is doubly optional: `Some(None)` clears the manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<i64>,
    pub manager_id: Option<Option<EmployeeId>>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.position.is_none()
            && self.hire_date.is_none()
            && self.salary.is_none()
            && self.manager_id.is_none()
    }

    /// Validates supplied fields; an empty patch is itself a violation.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.is_empty() {
            return Err(EmployeeValidationError { errors: Vec::new() });
        }
        let mut errors = Vec::new();
        if let Some(full_name) = self.full_name.as_deref() {
            check_text(&mut errors, EmployeeField::FullName, full_name);
        }
        if let Some(position) = self.position.as_deref() {
            check_text(&mut errors, EmployeeField::Position, position);
        }
        if let Some(salary) = self.salary {
            check_salary(&mut errors, salary);
        }
        if let Some(Some(manager_id)) = self.manager_id {
            check_manager_id(&mut errors, manager_id);
        }
        EmployeeValidationError::from_errors(errors)
    }

    /// Returns a copy with supplied text fields trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            full_name: self.full_name.as_deref().map(|v| v.trim().to_string()),
            position: self.position.as_deref().map(|v| v.trim().to_string()),
            ..self.clone()
        }
    }
}

/// Raw, untyped create input as typed by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<String>,
    pub salary: Option<String>,
    pub manager_id: Option<String>,
}

impl EmployeeDraft {
    /// Parses and validates every field, reporting all violations together.
    pub fn parse(&self) -> Result<NewEmployee, EmployeeValidationError> {
        let mut errors = Vec::new();

        let full_name = required_text(&mut errors, EmployeeField::FullName, &self.full_name);
        let position = required_text(&mut errors, EmployeeField::Position, &self.position);
        let hire_date = match non_blank(&self.hire_date) {
            Some(value) => parse_hire_date(&mut errors, value),
            None => {
                errors.push(FieldError::new(EmployeeField::HireDate, "is required"));
                None
            }
        };
        let salary = match non_blank(&self.salary) {
            Some(value) => parse_salary(&mut errors, value),
            None => {
                errors.push(FieldError::new(EmployeeField::Salary, "is required"));
                None
            }
        };
        let manager_id = match non_blank(&self.manager_id) {
            Some(value) => parse_manager_id(&mut errors, value),
            None => None,
        };

        EmployeeValidationError::from_errors(errors)?;
        match (full_name, position, hire_date, salary) {
            (Some(full_name), Some(position), Some(hire_date), Some(salary)) => Ok(NewEmployee {
                full_name,
                position,
                hire_date,
                salary,
                manager_id,
            }),
            _ => Err(EmployeeValidationError { errors: Vec::new() }),
        }
    }
}

/// Raw, untyped partial update input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatchDraft {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<String>,
    pub salary: Option<String>,
    pub manager_id: Option<String>,
    /// Explicitly detach the employee from its manager.
    pub clear_manager: bool,
}

impl EmployeePatchDraft {
    pub fn parse(&self) -> Result<EmployeePatch, EmployeeValidationError> {
        let mut errors = Vec::new();
        let mut patch = EmployeePatch::default();

        if let Some(full_name) = self.full_name.as_deref() {
            check_text(&mut errors, EmployeeField::FullName, full_name);
            patch.full_name = Some(full_name.trim().to_string());
        }
        if let Some(position) = self.position.as_deref() {
            check_text(&mut errors, EmployeeField::Position, position);
            patch.position = Some(position.trim().to_string());
        }
        if let Some(hire_date) = self.hire_date.as_deref() {
            patch.hire_date = parse_hire_date(&mut errors, hire_date);
        }
        if let Some(salary) = self.salary.as_deref() {
            patch.salary = parse_salary(&mut errors, salary);
        }
        match (self.manager_id.as_deref(), self.clear_manager) {
            (Some(_), true) => errors.push(FieldError::new(
                EmployeeField::ManagerId,
                "cannot both set and clear the manager",
            )),
            (Some(value), false) => {
                patch.manager_id = parse_manager_id(&mut errors, value).map(Some);
            }
            (None, true) => patch.manager_id = Some(None),
            (None, false) => {}
        }

        EmployeeValidationError::from_errors(errors)?;
        if patch.is_empty() {
            return Err(EmployeeValidationError { errors: Vec::new() });
        }
        Ok(patch)
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn required_text(
    errors: &mut Vec<FieldError>,
    field: EmployeeField,
    value: &Option<String>,
) -> Option<String> {
    match non_blank(value) {
        Some(value) => Some(value.to_string()),
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

fn check_text(errors: &mut Vec<FieldError>, field: EmployeeField, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be blank"));
    }
}

fn check_salary(errors: &mut Vec<FieldError>, salary: i64) {
    if salary < 0 {
        errors.push(FieldError::new(
            EmployeeField::Salary,
            "must not be negative",
        ));
    }
}

fn check_manager_id(errors: &mut Vec<FieldError>, manager_id: EmployeeId) {
    if manager_id <= 0 {
        errors.push(FieldError::new(
            EmployeeField::ManagerId,
            "must be a positive employee id",
        ));
    }
}

fn parse_hire_date(errors: &mut Vec<FieldError>, value: &str) -> Option<NaiveDate> {
    let parsed = parse_date(value);
    if parsed.is_none() {
        errors.push(FieldError::new(
            EmployeeField::HireDate,
            format!("`{}` is not a YYYY-MM-DD date", value.trim()),
        ));
    }
    parsed
}

fn parse_salary(errors: &mut Vec<FieldError>, value: &str) -> Option<i64> {
    match value.trim().parse::<i64>() {
        Ok(salary) => {
            check_salary(errors, salary);
            Some(salary)
        }
        Err(_) => {
            errors.push(FieldError::new(
                EmployeeField::Salary,
                format!("`{}` is not a whole number", value.trim()),
            ));
            None
        }
    }
}

fn parse_manager_id(errors: &mut Vec<FieldError>, value: &str) -> Option<EmployeeId> {
    match value.trim().parse::<EmployeeId>() {
        Ok(id) => {
            check_manager_id(errors, id);
            Some(id)
        }
        Err(_) => {
            errors.push(FieldError::new(
                EmployeeField::ManagerId,
                format!("`{}` is not an employee id", value.trim()),
            ));
            None
        }
    }
}
