//! Command-line surface for the budget reports.
//!
//! Parsing lives here; [`commands`] turns a parsed [`Args`] into output text so the handlers can
//! be tested without a terminal.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// research-budget: budget reports over the projects of research groups.
///
/// Reads the database named by `DATABASE_URL` (a local `SQLite` file by default).
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Builds arguments for a command, as the parser would.
    #[must_use]
    pub const fn new(command: Command) -> Self {
        Self { command }
    }

    /// The requested subcommand.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a budget report.
    ///
    /// Without --filter the entries are grouped by the report's dimension and summed. With
    /// --filter only the entries matching that faculty, group, seedbed, line item, project id or
    /// start year are listed.
    Report {
        /// Report type: by_faculty, by_group, by_seedbed, by_year, by_line_item or by_project
        /// (por_facultad, por_grupo, ... are accepted too)
        report_type: String,

        /// Only list the entries matching this value (see the `options` command)
        #[arg(long)]
        filter: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the values a report type can be filtered by.
    Options {
        /// Report type, as for `report`
        report_type: String,
    },
    /// Import budget entries from a Latin-1 encoded CSV file.
    ///
    /// The first column names the line item and the second the project number. Amounts are
    /// read from the valor_inicial, disponibilidad, egreso and reserva columns. Nothing is
    /// imported if any row fails.
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Create the faculties, groups, seedbeds and line items listed in a catalog file.
    Seed {
        /// Path to the catalog TOML file
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,
    },
}
