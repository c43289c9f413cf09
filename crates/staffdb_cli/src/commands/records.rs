//! `staffdb add|update|delete|show`

use super::service;
use crate::args::{AddArgs, GlobalOpts, IdArg, OutputFormat, UpdateArgs};
use crate::{context, render};
use log::info;
use miette::{IntoDiagnostic, Result};

pub fn add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let conn = context::open(global)?;
    let id = service(&conn)?
        .create_from_draft(&args.to_draft())
        .into_diagnostic()?;
    info!("event=cli_add module=cli status=ok employee_id={id}");
    println!("Added employee {id}");
    Ok(())
}

pub fn update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let conn = context::open(global)?;
    service(&conn)?
        .update_from_draft(args.id, &args.to_draft())
        .into_diagnostic()?;
    println!("Updated employee {}", args.id);
    Ok(())
}

pub fn delete(args: IdArg, global: &GlobalOpts) -> Result<()> {
    let conn = context::open(global)?;
    service(&conn)?.delete(args.id).into_diagnostic()?;
    println!("Deleted employee {}", args.id);
    Ok(())
}

pub fn show(args: IdArg, global: &GlobalOpts) -> Result<()> {
    let conn = context::open(global)?;
    let service = service(&conn)?;
    let employee = service.get(args.id).into_diagnostic()?;
    let chain = service
        .hierarchy()
        .management_chain(args.id)
        .into_diagnostic()?;

    match args.output {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "employee": employee,
                "management_chain": chain,
            });
            println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        }
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{}", render::employee_card(&employee, &chain));
        }
    }
    Ok(())
}
