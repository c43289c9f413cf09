//! `staffdb` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and dispatch to command handlers.
//! - Render core errors as diagnostics on stderr with a non-zero exit.

mod args;
mod commands;
mod context;
mod render;

use args::{Cli, Commands};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::List(args) => commands::list::run(args, &global),
        Commands::Add(args) => commands::records::add(args, &global),
        Commands::Update(args) => commands::records::update(args, &global),
        Commands::Delete(args) => commands::records::delete(args, &global),
        Commands::Show(args) => commands::records::show(args, &global),
        Commands::Subordinates(args) => commands::hierarchy::subordinates(args, &global),
        Commands::Tree(args) => commands::hierarchy::tree(args, &global),
        Commands::Shell => commands::shell::run(&global),
    }
}
