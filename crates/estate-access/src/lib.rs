//! `estate-access` - Access management for a gated estate
//!
//! This library keeps a list of residents, visitors, and staff in a local
//! key-value store and provides the state layer an admin front end drives:
//! mocked login, dashboard counts, and resident CRUD with search, filter,
//! sort, and pagination.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod resident;
pub mod state;
pub mod stats;
pub mod storage;
pub mod view;

pub use api::{Latency, LocalResidentApi, ResidentApi};
pub use auth::AuthUser;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use resident::{AccessType, NewResident, Resident, ResidentField, ResidentUpdate};
pub use state::{AppState, AuthState, PersistedState, ResidentsState, ThemeState, UiState};
pub use stats::DashboardStats;
pub use storage::{Storage, StorageStats};
pub use view::{AccessFilter, ResidentPage, SortOrder, ViewState};
