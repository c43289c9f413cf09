//! `staffdb shell`: line-oriented session holding one `ListState`.
//!
//! A failing command prints its error and leaves the session state as it was.

use super::{service, Service};
use crate::args::{GlobalOpts, OutputFormat};
use crate::{context, render};
use miette::{IntoDiagnostic, Result};
use staffdb_core::{
    EmployeeFilter, EmployeeId, FilterKind, ListState, QueryError, SortDirection, SortField,
};
use std::io::{BufRead, Write};

const PROMPT: &str = "staffdb> ";

const HELP: &str = "\
commands:
  filter <kind> <value>      set the active filter (see `kinds`)
  filter all                 clear the filter
  sort <field>               toggle sort on a column
  sort <field> asc|desc      sort explicitly
  sort off                   back to id order
  show                       list employees for the current filter and sort
  tree <id>                  print the reporting tree below an employee
  kinds                      list filter kinds
  help                       this text
  quit                       leave the shell";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Noop,
    Filter(EmployeeFilter),
    ToggleSort(SortField),
    SetSort(SortField, SortDirection),
    ClearSort,
    Show,
    Tree(EmployeeId),
    Kinds,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Noop),
            "filter" => {
                let (kind, value) = match rest.split_once(char::is_whitespace) {
                    Some((kind, value)) => (kind, value),
                    None => (rest, ""),
                };
                if kind.is_empty() {
                    return Err("usage: filter <kind> <value>".to_string());
                }
                let kind = FilterKind::parse(kind).map_err(query_message)?;
                EmployeeFilter::parse(kind, value)
                    .map(Self::Filter)
                    .map_err(query_message)
            }
            "sort" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(word), None, None) if word.eq_ignore_ascii_case("off") => {
                        Ok(Self::ClearSort)
                    }
                    (Some(field), None, None) => SortField::parse(field)
                        .map(Self::ToggleSort)
                        .map_err(query_message),
                    (Some(field), Some(direction), None) => {
                        let field = SortField::parse(field).map_err(query_message)?;
                        let direction = SortDirection::parse(direction).map_err(query_message)?;
                        Ok(Self::SetSort(field, direction))
                    }
                    _ => Err("usage: sort <field> [asc|desc]".to_string()),
                }
            }
            "show" | "list" => Ok(Self::Show),
            "tree" => rest
                .parse::<EmployeeId>()
                .map(Self::Tree)
                .map_err(|_| "usage: tree <id>".to_string()),
            "kinds" => Ok(Self::Kinds),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}

fn query_message(err: QueryError) -> String {
    err.to_string()
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    let conn = context::open(global)?;
    let service = service(&conn)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(&service, stdin.lock(), stdout.lock())
}

/// Drives the session until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    service: &Service<'_>,
    input: R,
    mut out: W,
) -> Result<()> {
    let mut state = ListState::new();
    write!(out, "{PROMPT}").into_diagnostic()?;
    out.flush().into_diagnostic()?;

    for line in input.lines() {
        let line = line.into_diagnostic()?;
        match ShellCommand::parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => {
                if let Err(message) = execute(service, &mut state, command, &mut out) {
                    writeln!(out, "error: {message}").into_diagnostic()?;
                }
            }
            Err(message) => writeln!(out, "error: {message}").into_diagnostic()?,
        }
        write!(out, "{PROMPT}").into_diagnostic()?;
        out.flush().into_diagnostic()?;
    }
    writeln!(out).into_diagnostic()?;
    Ok(())
}

fn execute<W: Write>(
    service: &Service<'_>,
    state: &mut ListState,
    command: ShellCommand,
    out: &mut W,
) -> std::result::Result<(), String> {
    let text = match command {
        ShellCommand::Noop | ShellCommand::Quit => return Ok(()),
        ShellCommand::Filter(filter) => {
            let mut next = state.clone();
            next.set_filter(filter);
            let listing = list(service, &next)?;
            *state = next;
            format!("filter: {}\n{listing}", state.filter())
        }
        ShellCommand::ToggleSort(field) => {
            let mut next = state.clone();
            let spec = next.toggle_sort(field);
            let listing = list(service, &next)?;
            *state = next;
            format!("sort: {spec}\n{listing}")
        }
        ShellCommand::SetSort(field, direction) => {
            state.set_sort(field, direction);
            list(service, state)?
        }
        ShellCommand::ClearSort => {
            state.clear_sort();
            list(service, state)?
        }
        ShellCommand::Show => list(service, state)?,
        ShellCommand::Tree(id) => {
            let node = service
                .hierarchy()
                .hierarchy_nodes(id)
                .map_err(|err| err.to_string())?;
            render::tree(&node)
        }
        ShellCommand::Kinds => FilterKind::ALL
            .iter()
            .map(|kind| format!("  {:<16}{}", kind.as_str(), kind.usage()))
            .collect::<Vec<_>>()
            .join("\n"),
        ShellCommand::Help => HELP.to_string(),
    };
    writeln!(out, "{text}").map_err(|err| err.to_string())
}

fn list(service: &Service<'_>, state: &ListState) -> std::result::Result<String, String> {
    let rows = service.list(state).map_err(|err| err.to_string())?;
    render::rows(&rows, OutputFormat::Table).map_err(|err| err.to_string())
}
