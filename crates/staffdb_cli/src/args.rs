//! CLI argument definitions using clap derive

use clap::{Args, Parser, Subcommand, ValueEnum};
use staffdb_core::{EmployeeDraft, EmployeeId, EmployeePatchDraft};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "staffdb")]
#[command(author, version, about = "Employee records with manager hierarchy")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalOpts {
    /// SQLite database file (default: <data dir>/staffdb.sqlite3)
    #[arg(long, global = true, env = "STAFFDB_DB")]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "STAFFDB_LOG")]
    pub log_level: Option<String>,

    /// Directory for rolling log files (default: <data dir>/logs)
    #[arg(long, global = true, env = "STAFFDB_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Echo warnings and errors to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List employees with optional filter and sort
    List(ListArgs),

    /// Add a new employee
    Add(AddArgs),

    /// Update fields of an existing employee
    Update(UpdateArgs),

    /// Delete an employee without direct reports
    Delete(IdArg),

    /// Show one employee and their management chain
    Show(IdArg),

    /// List all direct and indirect reports of a manager
    Subordinates(IdArg),

    /// Print the reporting tree below an employee
    Tree(TreeArgs),

    /// Interactive session with a persistent filter and sort
    Shell,
}

/// Output format for list-style commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Sort column: id, full_name, position, hire_date, salary, manager_name
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Raw comparison, e.g. salary>=50000 or boss_id=null (repeatable, AND-combined)
    #[arg(long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Named filter as kind:value, e.g. salary-between:50000,200000
    #[arg(long = "where", value_name = "KIND:VALUE")]
    pub where_spec: Option<String>,

    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long = "full_name", alias = "full-name")]
    pub full_name: Option<String>,

    #[arg(long)]
    pub position: Option<String>,

    /// Hire date as YYYY-MM-DD
    #[arg(long = "hire_date", alias = "hire-date")]
    pub hire_date: Option<String>,

    #[arg(long)]
    pub salary: Option<String>,

    /// Manager's employee id
    #[arg(long = "boss_id", visible_alias = "manager_id")]
    pub boss_id: Option<String>,
}

impl AddArgs {
    pub fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            full_name: self.full_name.clone(),
            position: self.position.clone(),
            hire_date: self.hire_date.clone(),
            salary: self.salary.clone(),
            manager_id: self.boss_id.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: EmployeeId,

    #[arg(long = "full_name", alias = "full-name")]
    pub full_name: Option<String>,

    #[arg(long)]
    pub position: Option<String>,

    #[arg(long = "hire_date", alias = "hire-date")]
    pub hire_date: Option<String>,

    #[arg(long)]
    pub salary: Option<String>,

    #[arg(long = "boss_id", visible_alias = "manager_id", conflicts_with = "no_boss")]
    pub boss_id: Option<String>,

    /// Detach the employee from their manager
    #[arg(long = "no_boss", alias = "no-boss")]
    pub no_boss: bool,
}

impl UpdateArgs {
    pub fn to_draft(&self) -> EmployeePatchDraft {
        EmployeePatchDraft {
            full_name: self.full_name.clone(),
            position: self.position.clone(),
            hire_date: self.hire_date.clone(),
            salary: self.salary.clone(),
            manager_id: self.boss_id.clone(),
            clear_manager: self.no_boss,
        }
    }
}

#[derive(Args, Debug)]
pub struct IdArg {
    pub id: EmployeeId,

    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    pub id: EmployeeId,

    /// Print `level id name` lines instead of a drawn tree
    #[arg(long)]
    pub flat: bool,
}
