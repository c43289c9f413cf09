//! `staffdb subordinates|tree`

use super::service;
use crate::args::{GlobalOpts, IdArg, TreeArgs};
use crate::{context, render};
use miette::{IntoDiagnostic, Result};
use staffdb_core::{EmployeeFilter, ListState};

pub fn subordinates(args: IdArg, global: &GlobalOpts) -> Result<()> {
    let conn = context::open(global)?;
    let state = ListState::new().with_filter(EmployeeFilter::Subordinates(args.id));
    let rows = service(&conn)?.list(&state).into_diagnostic()?;
    println!("{}", render::rows(&rows, args.output)?);
    Ok(())
}

pub fn tree(args: TreeArgs, global: &GlobalOpts) -> Result<()> {
    let conn = context::open(global)?;
    let service = service(&conn)?;
    let resolver = service.hierarchy();

    let output = if args.flat {
        render::flat_tree(&resolver.hierarchy_tree(args.id).into_diagnostic()?)
    } else {
        render::tree(&resolver.hierarchy_nodes(args.id).into_diagnostic()?)
    };
    println!("{output}");
    Ok(())
}
