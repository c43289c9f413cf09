//! Query composition for employee list views.
//!
//! # Responsibility
//! - Turn a closed vocabulary of filter kinds and sort keys into a
//!   parameterized SQL condition plus ORDER BY clause.
//! - Hold per-session list state (active filter and sort).
//! - Parse the looser `field OP value` dialect used by the CLI.
//!
//! # Invariants
//! - User-supplied values only ever reach SQL as bound parameters.
//! - Column identifiers only come from closed enums in this module.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod condition;
pub mod date_expr;
pub mod filter;
pub mod raw;
pub mod sort;
pub mod state;

pub use condition::{build_condition, QueryCondition};
pub use date_expr::{DateExpr, DatePrecision};
pub use filter::{EmployeeFilter, FilterKind};
pub use raw::{parse_raw_filters, RawColumn, RawFilter, RawOperator};
pub use sort::{order_by_clause, SortDirection, SortField, SortSpec};
pub use state::ListState;

pub type QueryResult<T> = Result<T, QueryError>;

/// Malformed filter or sort input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Filter name is not part of the closed vocabulary.
    UnknownFilterKind(String),
    /// Filter requires a value but none was given.
    MissingValue(FilterKind),
    /// Value is not a whole number.
    InvalidNumber { field: &'static str, value: String },
    /// Value is not `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    InvalidDate(String),
    /// `YYYY-MM` form with a month outside 1..=12.
    InvalidMonth(String),
    /// Wrong count of comma-separated values.
    WrongValueCount {
        kind: FilterKind,
        expected: usize,
        actual: usize,
    },
    /// Sort key is not part of the closed vocabulary.
    UnknownSortField(String),
    /// Sort direction other than `asc` / `desc`.
    UnknownSortDirection(String),
    /// Raw filter references a column outside the whitelist.
    UnknownColumn(String),
    /// Raw filter has no recognized comparison operator.
    MissingOperator(String),
    /// Raw filter uses an operator that does not apply to its value.
    UnsupportedOperator { column: String, operator: String },
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFilterKind(name) => write!(f, "unknown filter `{name}`"),
            Self::MissingValue(kind) => write!(f, "filter `{kind}` requires a value"),
            Self::InvalidNumber { field, value } => {
                write!(f, "{field} must be a whole number, got `{value}`")
            }
            Self::InvalidDate(value) => write!(
                f,
                "invalid date `{value}`; expected YYYY, YYYY-MM or YYYY-MM-DD"
            ),
            Self::InvalidMonth(value) => write!(f, "invalid month in `{value}`"),
            Self::WrongValueCount {
                kind,
                expected,
                actual,
            } => write!(
                f,
                "filter `{kind}` expects {expected} comma-separated values, got {actual}"
            ),
            Self::UnknownSortField(name) => write!(f, "cannot sort by `{name}`"),
            Self::UnknownSortDirection(name) => {
                write!(f, "unknown sort direction `{name}`; expected asc or desc")
            }
            Self::UnknownColumn(name) => write!(f, "unknown column `{name}`"),
            Self::MissingOperator(expr) => write!(
                f,
                "no operator in filter `{expr}`; supported: =, !=, >, <, >=, <="
            ),
            Self::UnsupportedOperator { column, operator } => {
                write!(f, "operator `{operator}` is not supported for `{column}` here")
            }
        }
    }
}

impl Error for QueryError {}
