//! Resident list state: the loaded records, the list view, and the
//! add/edit modal and delete confirmation.
//!
//! Updates and deletes apply locally first and roll back if the store
//! rejects them. The list and the view are persisted; dialogs are not.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::PersistedState;
use crate::api::ResidentApi;
use crate::error::{Error, Result};
use crate::resident::{NewResident, Resident, ResidentField, ResidentUpdate};
use crate::view::{self, AccessFilter, ResidentPage, SortOrder, ViewState};

/// Storage key of the resident list snapshot.
pub const RESIDENTS_STATE_KEY: &str = "residents-storage";

/// The add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    /// No form open.
    #[default]
    Closed,
    /// Creating a new resident.
    Add,
    /// Editing the given resident.
    Edit(Resident),
}

/// Resident list, its view, and the dialogs acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentsState {
    /// Canonical list as last seen from the access layer.
    pub residents: Vec<Resident>,
    /// Set while an access layer call is in flight.
    pub is_loading: bool,
    /// Message from the last failed action.
    pub error: Option<String>,
    /// Search, filter, sort, and page settings.
    pub view: ViewState,
    /// Add/edit form state.
    pub modal: Modal,
    /// Id awaiting delete confirmation.
    pub delete_target: Option<String>,
}

/// Persisted part of [`ResidentsState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentsSnapshot {
    /// Canonical list.
    #[serde(default)]
    pub residents: Vec<Resident>,
    /// View settings.
    #[serde(flatten)]
    pub view: ViewState,
}

impl Default for ResidentsState {
    fn default() -> Self {
        Self::new(view::DEFAULT_ITEMS_PER_PAGE)
    }
}

impl ResidentsState {
    /// Empty state showing `items_per_page` rows per page.
    ///
    /// Starts out loading, since nothing has been fetched yet.
    #[must_use]
    pub fn new(items_per_page: usize) -> Self {
        Self {
            residents: Vec::new(),
            is_loading: true,
            error: None,
            view: ViewState::with_items_per_page(items_per_page),
            modal: Modal::Closed,
            delete_target: None,
        }
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn fail(&mut self, action: &str, err: &Error) {
        warn!("Failed to {action}: {err}");
        self.is_loading = false;
        self.error = Some(err.to_string());
    }

    // === Data actions ===

    /// Replace the list with a fresh read from `api`.
    ///
    /// # Errors
    ///
    /// Returns the access layer error, which is also recorded in `error`.
    pub async fn load_residents(&mut self, api: &dyn ResidentApi) -> Result<()> {
        self.begin();
        match api.fetch_residents().await {
            Ok(residents) => {
                debug!("Loaded {} residents", residents.len());
                self.residents = residents;
                self.is_loading = false;
                Ok(())
            }
            Err(err) => {
                self.fail("load residents", &err);
                Err(err)
            }
        }
    }

    /// Create a resident and prepend it once the store has assigned an id.
    ///
    /// Closes the form on success.
    ///
    /// # Errors
    ///
    /// Returns the access layer error, which is also recorded in `error`.
    pub async fn add_resident(&mut self, api: &dyn ResidentApi, new: NewResident) -> Result<Resident> {
        self.begin();
        match api.add_resident(new).await {
            Ok(created) => {
                info!("Added resident {} ({})", created.name, created.id);
                self.residents.insert(0, created.clone());
                self.is_loading = false;
                self.modal = Modal::Closed;
                Ok(created)
            }
            Err(err) => {
                self.fail("add resident", &err);
                Err(err)
            }
        }
    }

    /// Update a resident in place.
    ///
    /// The change is applied to the in-memory list before the access layer
    /// answers and rolled back if it fails. Closes the form on success.
    ///
    /// # Errors
    ///
    /// Returns the access layer error, which is also recorded in `error`.
    pub async fn update_resident(
        &mut self,
        api: &dyn ResidentApi,
        id: &str,
        update: ResidentUpdate,
    ) -> Result<Resident> {
        self.begin();
        let previous = self.residents.clone();

        let local = update.clone().normalized();
        if let Some(resident) = self.residents.iter_mut().find(|r| r.id == id) {
            local.apply_to(resident);
        }

        match api.update_resident(id, update).await {
            Ok(updated) => {
                info!("Updated resident {}", updated.id);
                if let Some(resident) = self.residents.iter_mut().find(|r| r.id == id) {
                    *resident = updated.clone();
                }
                self.is_loading = false;
                self.modal = Modal::Closed;
                Ok(updated)
            }
            Err(err) => {
                self.residents = previous;
                self.fail("update resident", &err);
                Err(err)
            }
        }
    }

    /// Delete a resident.
    ///
    /// The record leaves the in-memory list before the access layer answers
    /// and comes back if it fails. Returns whether the store held the id.
    ///
    /// # Errors
    ///
    /// Returns the access layer error, which is also recorded in `error`.
    pub async fn delete_resident(&mut self, api: &dyn ResidentApi, id: &str) -> Result<bool> {
        self.begin();
        let previous = self.residents.clone();
        self.residents.retain(|r| r.id != id);

        match api.delete_resident(id).await {
            Ok(removed) => {
                if removed {
                    info!("Deleted resident {id}");
                }
                self.is_loading = false;
                if self.delete_target.as_deref() == Some(id) {
                    self.delete_target = None;
                }
                Ok(removed)
            }
            Err(err) => {
                self.residents = previous;
                self.fail("delete resident", &err);
                Err(err)
            }
        }
    }

    /// Delete the resident awaiting confirmation and close the dialog.
    ///
    /// Returns `false` without touching the store when nothing awaits
    /// confirmation.
    ///
    /// # Errors
    ///
    /// Returns the access layer error; the dialog is closed either way.
    pub async fn confirm_delete(&mut self, api: &dyn ResidentApi) -> Result<bool> {
        let Some(id) = self.delete_target.take() else {
            return Ok(false);
        };
        self.delete_resident(api, &id).await
    }

    // === Filter actions ===

    /// Search by name or house number. Returns to the first page.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.view.search_query = query.into();
        self.view.current_page = 1;
    }

    /// Filter by access type. Returns to the first page.
    pub fn set_filter_type(&mut self, filter: AccessFilter) {
        self.view.filter_type = filter;
        self.view.current_page = 1;
    }

    /// Sort by `sort_by` in `sort_order`. Returns to the first page.
    pub fn set_sorting(&mut self, sort_by: ResidentField, sort_order: SortOrder) {
        self.view.sort_by = sort_by;
        self.view.sort_order = sort_order;
        self.view.current_page = 1;
    }

    /// Column header click: flip the direction of the active column, or
    /// sort a new column ascending.
    pub fn toggle_sort(&mut self, column: ResidentField) {
        let order = if self.view.sort_by == column {
            self.view.sort_order.toggled()
        } else {
            SortOrder::Asc
        };
        self.set_sorting(column, order);
    }

    /// Clear search and filter, sort by name ascending, first page.
    pub fn reset_filters(&mut self) {
        self.view = ViewState::with_items_per_page(self.view.items_per_page);
    }

    // === Pagination ===

    /// Go to `page`, clamped to the pages the current view has.
    pub fn set_current_page(&mut self, page: usize) {
        let total = view::total_pages(
            self.view.filtered(&self.residents).len(),
            self.view.items_per_page,
        );
        self.view.current_page = view::clamp_page(page, total);
    }

    /// The page the current view shows.
    #[must_use]
    pub fn page(&self) -> ResidentPage {
        view::derive_page(self)
    }

    // === Dialogs ===

    /// Open the add form, or the edit form for the resident with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no loaded resident has that id.
    pub fn open_modal(&mut self, edit_id: Option<&str>) -> Result<()> {
        self.modal = match edit_id {
            None => Modal::Add,
            Some(id) => Modal::Edit(self.find(id).cloned().ok_or_else(|| Error::not_found(id))?),
        };
        Ok(())
    }

    /// Close the add/edit form.
    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Ask for confirmation before deleting `id`.
    pub fn open_delete_confirm(&mut self, id: impl Into<String>) {
        self.delete_target = Some(id.into());
    }

    /// Dismiss the delete confirmation.
    pub fn close_delete_confirm(&mut self) {
        self.delete_target = None;
    }

    /// Dismiss the last error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Look up a loaded resident.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Resident> {
        self.residents.iter().find(|r| r.id == id)
    }
}

impl PersistedState for ResidentsState {
    const KEY: &'static str = RESIDENTS_STATE_KEY;
    type Snapshot = ResidentsSnapshot;

    fn snapshot(&self) -> ResidentsSnapshot {
        ResidentsSnapshot {
            residents: self.residents.clone(),
            view: self.view.clone(),
        }
    }

    fn restore(&mut self, snapshot: ResidentsSnapshot) {
        self.residents = snapshot.residents;
        self.view = snapshot.view;
        self.view.items_per_page = self.view.items_per_page.max(1);
    }
}
