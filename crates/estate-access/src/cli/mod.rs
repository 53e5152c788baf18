//! Command-line interface for estate-access.
//!
//! This module provides the CLI structure and command handlers for the
//! `estatectl` binary.

mod commands;
mod handlers;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AccessTypeArg, AddCommand, ColumnArg, ConfigCommand, DashboardCommand, DeleteCommand,
    EditCommand, FilterArg, ListCommand, LoginCommand, OrderArg, PrefsCommand, ResidentsCommand,
    StatusCommand,
};
pub use handlers::execute;
pub use render::Style;

/// estatectl - Manage access to a gated estate
///
/// Keeps track of residents, visitors, and staff: who they are, which house
/// they belong to, and when they last came through the gate.
#[derive(Debug, Parser)]
#[command(name = "estatectl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in as the estate administrator
    Login(LoginCommand),

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show access counts
    Dashboard(DashboardCommand),

    /// Manage residents, visitors, and staff
    #[command(subcommand)]
    Residents(ResidentsCommand),

    /// Show the store location and what it holds
    Status(StatusCommand),

    /// View or change display preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Check whether the command needs a logged-in user.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            Self::Login(_) | Self::Status(_) | Self::Prefs(_) | Self::Config(_)
        )
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
