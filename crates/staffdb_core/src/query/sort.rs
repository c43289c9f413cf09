//! Sortable columns and ORDER BY rendering.

use super::{QueryError, QueryResult};
use std::fmt::{Display, Formatter};

/// Sortable list column. Each maps to exactly one column reference in the
/// list query (`e` = employee, `b` = joined manager row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    FullName,
    Position,
    HireDate,
    Salary,
    ManagerName,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::FullName,
        SortField::Position,
        SortField::HireDate,
        SortField::Salary,
        SortField::ManagerName,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FullName => "full_name",
            Self::Position => "position",
            Self::HireDate => "hire_date",
            Self::Salary => "salary",
            Self::ManagerName => "manager_name",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "e.id",
            Self::FullName => "e.full_name",
            Self::Position => "e.position",
            Self::HireDate => "e.hire_date",
            Self::Salary => "e.salary",
            Self::ManagerName => "b.full_name",
        }
    }

    pub fn parse(name: &str) -> QueryResult<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "id" => Ok(Self::Id),
            "full_name" | "name" => Ok(Self::FullName),
            "position" => Ok(Self::Position),
            "hire_date" => Ok(Self::HireDate),
            "salary" => Ok(Self::Salary),
            "manager_name" | "manager" | "boss_name" => Ok(Self::ManagerName),
            _ => Err(QueryError::UnknownSortField(name.trim().to_string())),
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn parse(name: &str) -> QueryResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(QueryError::UnknownSortDirection(name.trim().to_string())),
        }
    }
}

/// One active sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

impl Display for SortSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql().to_lowercase())
    }
}

/// Renders the ORDER BY clause (without the keyword).
///
/// `e.id ASC` is always the final key so equal sort values keep a stable
/// order and toggling a field twice reproduces the original sequence.
pub fn order_by_clause(sort: Option<SortSpec>) -> String {
    match sort {
        None => "e.id ASC".to_string(),
        Some(SortSpec {
            field: SortField::Id,
            direction,
        }) => format!("e.id {}", direction.as_sql()),
        Some(SortSpec { field, direction }) => {
            format!("{} {}, e.id ASC", field.column(), direction.as_sql())
        }
    }
}
