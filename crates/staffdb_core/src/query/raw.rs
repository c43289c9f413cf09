//! Raw `field OP value` filter dialect used by `staffdb list --filter`.
//!
//! This is a separate, looser surface than `EmployeeFilter`: users name
//! table columns directly. Columns are still whitelisted and values are
//! still bound parameters.

use super::condition::{date_value, QueryCondition};
use super::{QueryError, QueryResult};
use crate::model::employee::parse_date;
use rusqlite::types::Value;
use std::fmt::{Display, Formatter};

/// Comparison operators, in the order they are searched for in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawOperator {
    Ne,
    Ge,
    Le,
    Eq,
    Gt,
    Lt,
}

impl RawOperator {
    const SCAN_ORDER: [RawOperator; 6] = [
        RawOperator::Ne,
        RawOperator::Ge,
        RawOperator::Le,
        RawOperator::Eq,
        RawOperator::Gt,
        RawOperator::Lt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

/// Columns addressable from the raw dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawColumn {
    Id,
    FullName,
    Position,
    HireDate,
    Salary,
    ManagerId,
}

impl RawColumn {
    pub fn parse(name: &str) -> QueryResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "full_name" => Ok(Self::FullName),
            "position" => Ok(Self::Position),
            "hire_date" => Ok(Self::HireDate),
            "salary" => Ok(Self::Salary),
            "boss_id" | "manager_id" => Ok(Self::ManagerId),
            _ => Err(QueryError::UnknownColumn(name.trim().to_string())),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "e.id",
            Self::FullName => "e.full_name",
            Self::Position => "e.position",
            Self::HireDate => "e.hire_date",
            Self::Salary => "e.salary",
            Self::ManagerId => "e.manager_id",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FullName => "full_name",
            Self::Position => "position",
            Self::HireDate => "hire_date",
            Self::Salary => "salary",
            Self::ManagerId => "manager_id",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Self::Id | Self::Salary | Self::ManagerId)
    }
}

/// One parsed raw comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFilter {
    pub column: RawColumn,
    pub operator: RawOperator,
    /// `None` means SQL NULL (`manager_id=null`).
    pub value: Option<Value>,
}

impl RawFilter {
    pub fn parse(expr: &str) -> QueryResult<Self> {
        let (operator, field, raw_value) = RawOperator::SCAN_ORDER
            .into_iter()
            .find_map(|op| {
                expr.split_once(op.as_str())
                    .map(|(field, value)| (op, field.trim(), value.trim()))
            })
            .ok_or_else(|| QueryError::MissingOperator(expr.trim().to_string()))?;

        let column = RawColumn::parse(field)?;

        if column == RawColumn::ManagerId && raw_value.eq_ignore_ascii_case("null") {
            return match operator {
                RawOperator::Eq | RawOperator::Ne => Ok(Self {
                    column,
                    operator,
                    value: None,
                }),
                _ => Err(QueryError::UnsupportedOperator {
                    column: column.name().to_string(),
                    operator: operator.as_str().to_string(),
                }),
            };
        }

        let value = if column.is_numeric() {
            let number = raw_value
                .parse::<i64>()
                .map_err(|_| QueryError::InvalidNumber {
                    field: column.name(),
                    value: raw_value.to_string(),
                })?;
            Value::Integer(number)
        } else if column == RawColumn::HireDate {
            let date = parse_date(raw_value)
                .ok_or_else(|| QueryError::InvalidDate(raw_value.to_string()))?;
            date_value(date)
        } else {
            Value::Text(raw_value.to_string())
        };

        Ok(Self {
            column,
            operator,
            value: Some(value),
        })
    }

    pub fn to_condition(&self) -> QueryCondition {
        match (&self.value, self.operator) {
            (None, RawOperator::Ne) => {
                QueryCondition::new(format!("{} IS NOT NULL", self.column.column()), Vec::new())
            }
            (None, _) => {
                QueryCondition::new(format!("{} IS NULL", self.column.column()), Vec::new())
            }
            (Some(value), operator) => QueryCondition::new(
                format!("{} {} ?", self.column.column(), operator.as_str()),
                vec![value.clone()],
            ),
        }
    }
}

impl Display for RawFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            None => "null".to_string(),
            Some(Value::Integer(number)) => number.to_string(),
            Some(Value::Text(text)) => text.clone(),
            Some(other) => format!("{other:?}"),
        };
        write!(f, "{}{}{}", self.column.name(), self.operator.as_str(), value)
    }
}

/// Parses every expression and AND-combines them.
pub fn parse_raw_filters<S: AsRef<str>>(exprs: &[S]) -> QueryResult<QueryCondition> {
    let conditions = exprs
        .iter()
        .map(|expr| RawFilter::parse(expr.as_ref()).map(|filter| filter.to_condition()))
        .collect::<QueryResult<Vec<_>>>()?;
    Ok(QueryCondition::all(conditions))
}
