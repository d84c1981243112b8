//! doctree CLI - outline, render and page through local documents
//!
//! This is the main entry point for the doctree command-line interface.
//! Each command lives in its own module under `commands`.

use anyhow::Result;
use clap::Parser;

mod args;
mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};
use commands::{FindRequest, WindowRequest};
use utils::logging::initialize_logging;
use utils::session::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    execute_command(cli)
}

fn execute_command(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::List { dir, format } => {
            let mut session = Session::open(&dir, config, None)?;
            commands::list_documents(&mut session, format.format)?;
        },

        Commands::Tree { document, format } => {
            let mut session = Session::open(&document.dir, config, document.depth_mode.map(Into::into))?;
            commands::show_tree(&mut session, &document.doc, format.format)?;
        },

        Commands::Render { document, style } => {
            let mut session = Session::open(&document.dir, config, document.depth_mode.map(Into::into))?;
            commands::render(&mut session, &document.doc, style)?;
        },

        Commands::Preview { document, mode } => {
            let mut session = Session::open(&document.dir, config, document.depth_mode.map(Into::into))?;
            commands::preview(&mut session, &document.doc, mode)?;
        },

        Commands::Window {
            document,
            pagination,
            tree,
            all,
            format,
        } => {
            let mut session = Session::open(&document.dir, config, document.depth_mode.map(Into::into))?;
            let request = WindowRequest {
                pagination,
                tree,
                all,
                format: format.format,
            };
            commands::show_window(&mut session, &document.doc, &request)?;
        },

        Commands::Find {
            document,
            target,
            context,
            case_sensitive,
            tree,
            limit,
            format,
        } => {
            let mut session = Session::open(&document.dir, config, document.depth_mode.map(Into::into))?;
            let request = FindRequest {
                target,
                context,
                case_sensitive,
                tree,
                limit,
                format: format.format,
            };
            commands::find(&mut session, &document.doc, &request)?;
        },
    }

    Ok(())
}
