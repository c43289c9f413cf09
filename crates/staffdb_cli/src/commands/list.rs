//! `staffdb list`

use super::service;
use crate::args::{GlobalOpts, ListArgs};
use crate::{context, render};
use miette::{IntoDiagnostic, Result};
use staffdb_core::{
    parse_raw_filters, EmployeeFilter, ListState, SortDirection, SortField, SortSpec,
};

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let sort = sort_spec(args.sort.as_deref(), args.desc)?;
    let filter = match args.where_spec.as_deref() {
        Some(spec) => EmployeeFilter::parse_spec(spec).into_diagnostic()?,
        None => EmployeeFilter::All,
    };
    let raw = parse_raw_filters(args.filters.as_slice()).into_diagnostic()?;

    let conn = context::open(global)?;
    let service = service(&conn)?;

    let mut state = ListState::new().with_filter(filter);
    if let Some(sort) = sort {
        state = state.with_sort(sort);
    }
    let rows = service.list_where(&state, &raw).into_diagnostic()?;

    println!("{}", render::rows(&rows, args.output)?);
    Ok(())
}

fn sort_spec(field: Option<&str>, desc: bool) -> Result<Option<SortSpec>> {
    let Some(field) = field else {
        return Ok(None);
    };
    let field = SortField::parse(field).into_diagnostic()?;
    let direction = if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    Ok(Some(SortSpec { field, direction }))
}

#[cfg(test)]
mod tests {
    use super::sort_spec;
    use staffdb_core::{SortField, SortSpec};

    #[test]
    fn sort_spec_maps_desc_flag() {
        assert_eq!(sort_spec(None, false).unwrap(), None);
        assert_eq!(
            sort_spec(Some("boss_name"), true).unwrap(),
            Some(SortSpec::desc(SortField::ManagerName))
        );
        assert!(sort_spec(Some("bonus"), false).is_err());
    }
}
