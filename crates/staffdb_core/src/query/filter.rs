//! Closed filter vocabulary for employee lists.
//!
//! # Invariants
//! - Exactly one filter is active at a time.
//! - Parsing never falls back to `All` on bad input; it returns `QueryError`.
//! - Range payloads are stored normalized (`min <= max`, `start <= end`).

use super::date_expr::DateExpr;
use super::{QueryError, QueryResult};
use crate::model::employee::EmployeeId;
use std::fmt::{Display, Formatter};

/// Name of one filter in the closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    All,
    PositionContains,
    SalaryAbove,
    SalaryBelow,
    SalaryBetween,
    HiredAfter,
    HiredBefore,
    HiredBetween,
    Manager,
}

impl FilterKind {
    pub const ALL: [FilterKind; 9] = [
        FilterKind::All,
        FilterKind::PositionContains,
        FilterKind::SalaryAbove,
        FilterKind::SalaryBelow,
        FilterKind::SalaryBetween,
        FilterKind::HiredAfter,
        FilterKind::HiredBefore,
        FilterKind::HiredBetween,
        FilterKind::Manager,
    ];

    /// Stable slug used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::PositionContains => "position",
            Self::SalaryAbove => "salary-above",
            Self::SalaryBelow => "salary-below",
            Self::SalaryBetween => "salary-between",
            Self::HiredAfter => "hired-after",
            Self::HiredBefore => "hired-before",
            Self::HiredBetween => "hired-between",
            Self::Manager => "manager",
        }
    }

    /// Short usage hint for the expected input.
    pub fn usage(self) -> &'static str {
        match self {
            Self::All => "no value",
            Self::PositionContains => "text, case-insensitive substring",
            Self::SalaryAbove | Self::SalaryBelow => "whole number",
            Self::SalaryBetween => "two whole numbers, e.g. 50000,200000",
            Self::HiredAfter | Self::HiredBefore => "YYYY, YYYY-MM or YYYY-MM-DD",
            Self::HiredBetween => "two dates, e.g. 2019,2021-06",
            Self::Manager => "manager employee id (all transitive reports)",
        }
    }

    pub fn parse(name: &str) -> QueryResult<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| QueryError::UnknownFilterKind(name.trim().to_string()))
    }
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active list filter with its typed payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmployeeFilter {
    #[default]
    All,
    PositionContains(String),
    SalaryAbove(i64),
    SalaryBelow(i64),
    SalaryBetween { min: i64, max: i64 },
    HiredAfter(DateExpr),
    HiredBefore(DateExpr),
    HiredBetween { start: DateExpr, end: DateExpr },
    /// All transitive subordinates of the given manager.
    Subordinates(EmployeeId),
}

impl EmployeeFilter {
    /// Parses raw user input for the selected filter kind.
    pub fn parse(kind: FilterKind, input: &str) -> QueryResult<Self> {
        let value = input.trim();
        if kind == FilterKind::All {
            return Ok(Self::All);
        }
        if value.is_empty() {
            return Err(QueryError::MissingValue(kind));
        }

        let filter = match kind {
            FilterKind::All => Self::All,
            FilterKind::PositionContains => Self::PositionContains(value.to_string()),
            FilterKind::SalaryAbove => Self::SalaryAbove(parse_salary(value)?),
            FilterKind::SalaryBelow => Self::SalaryBelow(parse_salary(value)?),
            FilterKind::SalaryBetween => {
                let [first, second] = split_pair(kind, value)?;
                Self::salary_between(parse_salary(first)?, parse_salary(second)?)
            }
            FilterKind::HiredAfter => Self::HiredAfter(DateExpr::parse(value)?),
            FilterKind::HiredBefore => Self::HiredBefore(DateExpr::parse(value)?),
            FilterKind::HiredBetween => {
                let [first, second] = split_pair(kind, value)?;
                Self::hired_between(DateExpr::parse(first)?, DateExpr::parse(second)?)
            }
            FilterKind::Manager => {
                let id = value.parse::<EmployeeId>().map_err(|_| QueryError::InvalidNumber {
                    field: "manager id",
                    value: value.to_string(),
                })?;
                Self::Subordinates(id)
            }
        };
        Ok(filter)
    }

    /// Parses `kind` or `kind:value` (e.g. `salary-between:50000,90000`).
    pub fn parse_spec(spec: &str) -> QueryResult<Self> {
        match spec.split_once(':') {
            Some((kind, value)) => Self::parse(FilterKind::parse(kind)?, value),
            None => Self::parse(FilterKind::parse(spec)?, ""),
        }
    }

    /// Salary range with bounds given in any order.
    pub fn salary_between(a: i64, b: i64) -> Self {
        Self::SalaryBetween {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Hire-date range with expressions given in any order.
    pub fn hired_between(a: DateExpr, b: DateExpr) -> Self {
        if b.first_day() < a.first_day() {
            Self::HiredBetween { start: b, end: a }
        } else {
            Self::HiredBetween { start: a, end: b }
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::All => FilterKind::All,
            Self::PositionContains(_) => FilterKind::PositionContains,
            Self::SalaryAbove(_) => FilterKind::SalaryAbove,
            Self::SalaryBelow(_) => FilterKind::SalaryBelow,
            Self::SalaryBetween { .. } => FilterKind::SalaryBetween,
            Self::HiredAfter(_) => FilterKind::HiredAfter,
            Self::HiredBefore(_) => FilterKind::HiredBefore,
            Self::HiredBetween { .. } => FilterKind::HiredBetween,
            Self::Subordinates(_) => FilterKind::Manager,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl Display for EmployeeFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all employees"),
            Self::PositionContains(text) => write!(f, "position contains \"{text}\""),
            Self::SalaryAbove(value) => write!(f, "salary > {value}"),
            Self::SalaryBelow(value) => write!(f, "salary < {value}"),
            Self::SalaryBetween { min, max } => write!(f, "salary between {min} and {max}"),
            Self::HiredAfter(date) => write!(f, "hired after {date}"),
            Self::HiredBefore(date) => write!(f, "hired before {date}"),
            Self::HiredBetween { start, end } => write!(f, "hired between {start} and {end}"),
            Self::Subordinates(id) => write!(f, "subordinates of #{id}"),
        }
    }
}

fn parse_salary(value: &str) -> QueryResult<i64> {
    let value = value.trim();
    value.parse::<i64>().map_err(|_| QueryError::InvalidNumber {
        field: "salary",
        value: value.to_string(),
    })
}

fn split_pair(kind: FilterKind, value: &str) -> QueryResult<[&str; 2]> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [first, second] => Ok([*first, *second]),
        _ => Err(QueryError::WrongValueCount {
            kind,
            expected: 2,
            actual: parts.len(),
        }),
    }
}
