//! Parameterized WHERE-condition builder.

use super::date_expr::DatePrecision;
use super::filter::EmployeeFilter;
use crate::model::employee::{EmployeeId, DATE_FORMAT};
use chrono::NaiveDate;
use rusqlite::types::Value;
use std::collections::BTreeSet;

// UNION (not UNION ALL) keeps the recursion finite on cyclic data.
const SUBORDINATES_SQL: &str = "e.id IN (
    WITH RECURSIVE sub(id) AS (
        SELECT id FROM employees WHERE manager_id = ?
        UNION
        SELECT c.id FROM employees c JOIN sub ON c.manager_id = sub.id
    )
    SELECT id FROM sub
)";

/// SQL boolean predicate over the list query aliases, with anonymous `?`
/// placeholders bound positionally from `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    sql: String,
    params: Vec<Value>,
}

impl QueryCondition {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Matches every row.
    pub fn always() -> Self {
        Self::new("1 = 1", Vec::new())
    }

    /// Matches no row.
    pub fn never() -> Self {
        Self::new("1 = 0", Vec::new())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_unrestricted(&self) -> bool {
        self.sql == "1 = 1"
    }

    /// Conjunction; `always()` operands are elided.
    pub fn and(self, other: QueryCondition) -> Self {
        if self.is_unrestricted() {
            return other;
        }
        if other.is_unrestricted() {
            return self;
        }
        let mut params = self.params;
        params.extend(other.params);
        Self {
            sql: format!("({}) AND ({})", self.sql, other.sql),
            params,
        }
    }

    pub fn all(conditions: impl IntoIterator<Item = QueryCondition>) -> Self {
        conditions
            .into_iter()
            .fold(Self::always(), |acc, condition| acc.and(condition))
    }

    fn compare(column: &str, operator: &str, value: Value) -> Self {
        Self::new(format!("{column} {operator} ?"), vec![value])
    }

    /// Transitive reports of `manager_id`, resolved inside SQLite so the
    /// statement binds one value regardless of team size.
    fn subordinates_of(manager_id: EmployeeId) -> Self {
        Self::new(SUBORDINATES_SQL, vec![Value::Integer(manager_id)])
    }
}

pub(crate) fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format(DATE_FORMAT).to_string())
}

/// Builds the condition for one typed filter.
///
/// `resolve_subordinates` is only called for `EmployeeFilter::Subordinates`
/// and its error is returned unchanged; every other variant is infallible.
pub fn build_condition<F, E>(
    filter: &EmployeeFilter,
    resolve_subordinates: F,
) -> Result<QueryCondition, E>
where
    F: FnOnce(EmployeeId) -> Result<BTreeSet<EmployeeId>, E>,
{
    let condition = match filter {
        EmployeeFilter::All => QueryCondition::always(),
        EmployeeFilter::PositionContains(needle) => QueryCondition::new(
            "instr(casefold(e.position), ?) > 0",
            vec![Value::Text(needle.to_lowercase())],
        ),
        EmployeeFilter::SalaryAbove(value) => {
            QueryCondition::compare("e.salary", ">", Value::Integer(*value))
        }
        EmployeeFilter::SalaryBelow(value) => {
            QueryCondition::compare("e.salary", "<", Value::Integer(*value))
        }
        EmployeeFilter::SalaryBetween { min, max } => QueryCondition::new(
            "e.salary BETWEEN ? AND ?",
            vec![Value::Integer(*min), Value::Integer(*max)],
        ),
        EmployeeFilter::HiredAfter(date) => match date.precision() {
            DatePrecision::Day => {
                QueryCondition::compare("e.hire_date", ">", date_value(date.first_day()))
            }
            _ => QueryCondition::compare("e.hire_date", ">=", date_value(date.first_day())),
        },
        EmployeeFilter::HiredBefore(date) => QueryCondition::compare(
            "e.hire_date",
            "<",
            date_value(date.exclusive_upper_bound()),
        ),
        EmployeeFilter::HiredBetween { start, end } => QueryCondition::new(
            "e.hire_date BETWEEN ? AND ?",
            vec![date_value(start.first_day()), date_value(end.last_day())],
        ),
        EmployeeFilter::Subordinates(manager_id) => {
            if resolve_subordinates(*manager_id)?.is_empty() {
                QueryCondition::never()
            } else {
                QueryCondition::subordinates_of(*manager_id)
            }
        }
    };
    Ok(condition)
}
