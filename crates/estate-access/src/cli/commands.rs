//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};

use crate::resident::{parse_timestamp, AccessType, ResidentField};
use crate::view::{AccessFilter, SortOrder};

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Resident management commands.
#[derive(Debug, Subcommand)]
pub enum ResidentsCommand {
    /// List residents, applying any search, filter, sort, or page changes
    List(ListCommand),

    /// Add a resident
    Add(AddCommand),

    /// Edit a resident
    Edit(EditCommand),

    /// Delete a resident
    Delete(DeleteCommand),
}

/// List command arguments.
///
/// Every option changes the saved view, so the next `list` shows the same
/// page until something else changes it.
#[derive(Debug, Default, Args)]
pub struct ListCommand {
    /// Search by name or house number (empty string clears)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter by access type
    #[arg(short = 't', long = "type", value_enum)]
    pub filter: Option<FilterArg>,

    /// Sort by column
    #[arg(long, value_enum)]
    pub sort_by: Option<ColumnArg>,

    /// Sort direction
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Sort by column, flipping the direction if it is already sorted on
    #[arg(long, value_enum, conflicts_with_all = ["sort_by", "order"])]
    pub toggle_sort: Option<ColumnArg>,

    /// Go to page N
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Clear search and filter, sort by name ascending, first page
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Full name
    #[arg(short, long)]
    pub name: String,

    /// House number
    #[arg(long)]
    pub house: String,

    /// Access type
    #[arg(short = 't', long, value_enum)]
    pub access_type: AccessTypeArg,

    /// Last visit (e.g. "2025-10-27T14:30:00Z", "2025-10-27 14:30"); defaults to now
    #[arg(long, value_parser = parse_last_visit)]
    pub last_visit: Option<DateTime<Utc>>,
}

/// Edit command arguments. Only the given fields change.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Resident id
    pub id: String,

    /// New full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New house number
    #[arg(long)]
    pub house: Option<String>,

    /// New access type
    #[arg(short = 't', long, value_enum)]
    pub access_type: Option<AccessTypeArg>,

    /// New last visit
    #[arg(long, value_parser = parse_last_visit)]
    pub last_visit: Option<DateTime<Utc>>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Resident id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Display preference commands.
#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Show current preferences
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Toggle between light and dark theme
    Theme,

    /// Show or hide the navigation sidebar
    Sidebar,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Access type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AccessTypeArg {
    /// Lives on the estate
    Resident,
    /// Temporary access
    Visitor,
    /// Works on the estate
    Staff,
}

impl From<AccessTypeArg> for AccessType {
    fn from(arg: AccessTypeArg) -> Self {
        match arg {
            AccessTypeArg::Resident => Self::Resident,
            AccessTypeArg::Visitor => Self::Visitor,
            AccessTypeArg::Staff => Self::Staff,
        }
    }
}

/// Access type filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Every access type
    All,
    /// Residents only
    Resident,
    /// Visitors only
    Visitor,
    /// Staff only
    Staff,
}

impl From<FilterArg> for AccessFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Resident => Self::Only(AccessType::Resident),
            FilterArg::Visitor => Self::Only(AccessType::Visitor),
            FilterArg::Staff => Self::Only(AccessType::Staff),
        }
    }
}

/// Sortable column argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColumnArg {
    /// Full name
    Name,
    /// House number
    #[value(alias = "house")]
    HouseNumber,
    /// Access type
    #[value(alias = "type")]
    AccessType,
    /// Last visit time
    LastVisit,
}

impl From<ColumnArg> for ResidentField {
    fn from(arg: ColumnArg) -> Self {
        match arg {
            ColumnArg::Name => Self::Name,
            ColumnArg::HouseNumber => Self::HouseNumber,
            ColumnArg::AccessType => Self::AccessType,
            ColumnArg::LastVisit => Self::LastVisit,
        }
    }
}

/// Sort direction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => Self::Asc,
            OrderArg::Desc => Self::Desc,
        }
    }
}

fn parse_last_visit(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("invalid date and time: '{value}'"))
}
