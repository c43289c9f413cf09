//! Partial/full date expressions used by hire-date filters.
//!
//! A date expression is `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. Partial forms
//! cover a whole period; bounds are resolved at parse time so the builder
//! never has to handle out-of-range calendar arithmetic.

use super::{QueryError, QueryResult};
use crate::model::employee::parse_date;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").expect("valid year regex"));
static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("valid year-month regex"));
static FULL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid full date regex"));

/// Granularity of a parsed date expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

/// A resolved `YYYY` / `YYYY-MM` / `YYYY-MM-DD` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateExpr {
    precision: DatePrecision,
    first_day: NaiveDate,
    last_day: NaiveDate,
    next_period: NaiveDate,
}

impl DateExpr {
    pub fn parse(input: &str) -> QueryResult<Self> {
        let value = input.trim();

        if let Some(caps) = YEAR_RE.captures(value) {
            let year = parse_year(&caps[1], value)?;
            return Self::resolve(
                DatePrecision::Year,
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
                NaiveDate::from_ymd_opt(year + 1, 1, 1),
                value,
            );
        }

        if let Some(caps) = YEAR_MONTH_RE.captures(value) {
            let year = parse_year(&caps[1], value)?;
            let month: u32 = caps[2]
                .parse()
                .map_err(|_| QueryError::InvalidMonth(value.to_string()))?;
            if !(1..=12).contains(&month) {
                return Err(QueryError::InvalidMonth(value.to_string()));
            }
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)
            };
            return Self::resolve(
                DatePrecision::Month,
                NaiveDate::from_ymd_opt(year, month, 1),
                next.and_then(|date| date.pred_opt()),
                next,
                value,
            );
        }

        if FULL_DATE_RE.is_match(value) {
            let date = parse_date(value).ok_or_else(|| QueryError::InvalidDate(value.to_string()))?;
            return Ok(Self::day(date));
        }

        Err(QueryError::InvalidDate(value.to_string()))
    }

    /// Expression covering exactly one day.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            precision: DatePrecision::Day,
            first_day: date,
            last_day: date,
            next_period: date,
        }
    }

    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    /// First day covered (Jan 1 / 1st of month / the date).
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last day covered (Dec 31 / last day of month / the date).
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Exclusive upper bound for "before" semantics.
    ///
    /// Next Jan 1 for a year, 1st of next month for a month. For a full
    /// date this is the date itself, compared with strict less-than.
    pub fn exclusive_upper_bound(&self) -> NaiveDate {
        self.next_period
    }

    fn resolve(
        precision: DatePrecision,
        first_day: Option<NaiveDate>,
        last_day: Option<NaiveDate>,
        next_period: Option<NaiveDate>,
        raw: &str,
    ) -> QueryResult<Self> {
        match (first_day, last_day, next_period) {
            (Some(first_day), Some(last_day), Some(next_period)) => Ok(Self {
                precision,
                first_day,
                last_day,
                next_period,
            }),
            _ => Err(QueryError::InvalidDate(raw.to_string())),
        }
    }
}

impl Display for DateExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.precision {
            DatePrecision::Year => write!(f, "{}", self.first_day.format("%Y")),
            DatePrecision::Month => write!(f, "{}", self.first_day.format("%Y-%m")),
            DatePrecision::Day => write!(f, "{}", self.first_day.format("%Y-%m-%d")),
        }
    }
}

fn parse_year(text: &str, raw: &str) -> QueryResult<i32> {
    text.parse()
        .map_err(|_| QueryError::InvalidDate(raw.to_string()))
}
