//! Application state.
//!
//! Each piece of state owns its in-memory fields and exposes actions that
//! mutate them. A subset of every piece survives between runs through
//! [`PersistedState`], stored as a JSON document under a fixed key.

mod auth;
mod preferences;
mod residents;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::Storage;

pub use auth::{AuthSnapshot, AuthState, AUTH_KEY};
pub use preferences::{ThemeState, UiState, THEME_KEY, UI_KEY};
pub use residents::{Modal, ResidentsSnapshot, ResidentsState, RESIDENTS_STATE_KEY};

/// State with a persisted subset.
pub trait PersistedState {
    /// Storage key of the snapshot document.
    const KEY: &'static str;

    /// The persisted subset.
    type Snapshot: Serialize + DeserializeOwned;

    /// Capture the persisted subset.
    fn snapshot(&self) -> Self::Snapshot;

    /// Replace the persisted subset with `snapshot`.
    fn restore(&mut self, snapshot: Self::Snapshot);

    /// Restore from `storage`.
    ///
    /// Returns whether a snapshot was applied. A missing snapshot leaves the
    /// state untouched; so does a corrupt one, after a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    fn load(&mut self, storage: &Storage) -> Result<bool> {
        match storage.get_json::<Self::Snapshot>(Self::KEY) {
            Ok(Some(snapshot)) => {
                self.restore(snapshot);
                debug!("Restored {}", Self::KEY);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(Error::Json(err)) => {
                warn!("Ignoring unreadable {} ({err}); using defaults", Self::KEY);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Write the persisted subset to `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    fn save(&self, storage: &Storage) -> Result<()> {
        storage.set_json(Self::KEY, &self.snapshot())?;
        debug!("Saved {}", Self::KEY);
        Ok(())
    }
}

/// Every piece of application state, loaded together.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Login session.
    pub auth: AuthState,
    /// Resident list and its view.
    pub residents: ResidentsState,
    /// Color scheme.
    pub theme: ThemeState,
    /// Layout chrome.
    pub ui: UiState,
}

impl AppState {
    /// Fresh state using the configured defaults.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            auth: AuthState::default(),
            residents: ResidentsState::new(config.residents.items_per_page),
            theme: ThemeState::default(),
            ui: UiState::default(),
        }
    }

    /// Load every persisted snapshot from `storage`.
    ///
    /// The configured page size always wins over a persisted one.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage query fails.
    pub fn load(config: &Config, storage: &Storage) -> Result<Self> {
        let mut state = Self::new(config);
        state.auth.load(storage)?;
        state.residents.load(storage)?;
        state.theme.load(storage)?;
        state.ui.load(storage)?;
        state.residents.view.items_per_page = config.residents.items_per_page;
        Ok(state)
    }

    /// Save every persisted snapshot to `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage write fails.
    pub fn save(&self, storage: &Storage) -> Result<()> {
        self.auth.save(storage)?;
        self.residents.save(storage)?;
        self.theme.save(storage)?;
        self.ui.save(storage)?;
        Ok(())
    }
}
