//! Record access layer.
//!
//! [`ResidentApi`] is the seam where a real network API would plug in. The
//! only implementation today, [`LocalResidentApi`], keeps the resident list
//! as a single JSON document in [`Storage`] and sleeps before each call to
//! behave like a remote service.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::resident::{seed_residents, NewResident, Resident, ResidentUpdate};
use crate::storage::Storage;

/// Storage key of the resident list document.
pub const RESIDENTS_KEY: &str = "residents";

/// CRUD operations over the resident collection.
#[async_trait]
pub trait ResidentApi: Send + Sync {
    /// Read every resident.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    async fn fetch_residents(&self) -> Result<Vec<Resident>>;

    /// Validate and store a new resident, returning it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for invalid form data, or a storage error.
    async fn add_resident(&self, new: NewResident) -> Result<Resident>;

    /// Merge `update` into the resident with `id` and return the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, [`Error::Validation`]
    /// for invalid fields, or a storage error.
    async fn update_resident(&self, id: &str, update: ResidentUpdate) -> Result<Resident>;

    /// Delete the resident with `id`.
    ///
    /// Returns `true` if a record was removed, `false` if none had that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    async fn delete_resident(&self, id: &str) -> Result<bool>;
}

/// Simulated round-trip times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// Delay before a bulk read completes.
    pub fetch: Duration,
    /// Delay before a create, update, or delete completes.
    pub mutate: Duration,
}

impl Latency {
    /// No delay at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            fetch: Duration::ZERO,
            mutate: Duration::ZERO,
        }
    }

    /// Delays taken from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            fetch: config.fetch_delay(),
            mutate: config.mutate_delay(),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// [`ResidentApi`] backed by the local key-value store.
#[derive(Debug, Clone)]
pub struct LocalResidentApi {
    storage: Arc<Mutex<Storage>>,
    latency: Latency,
}

impl LocalResidentApi {
    /// Create an access layer over `storage`.
    #[must_use]
    pub fn new(storage: Arc<Mutex<Storage>>, latency: Latency) -> Self {
        Self { storage, latency }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Storage>> {
        self.storage
            .lock()
            .map_err(|_| Error::internal("storage lock poisoned"))
    }

    fn write_list(storage: &Storage, residents: &[Resident]) -> Result<()> {
        storage.set_json(RESIDENTS_KEY, residents)?;
        debug!("Persisted {} residents", residents.len());
        Ok(())
    }
}

/// Read the stored list, seeding an empty store.
///
/// A corrupt document yields the sample list without overwriting what is
/// stored. Records repeating an earlier id are dropped.
fn read_list(storage: &Storage) -> Result<Vec<Resident>> {
    let residents = match storage.get_json::<Vec<Resident>>(RESIDENTS_KEY) {
        Ok(Some(residents)) => residents,
        Ok(None) => {
            let seeded = seed_residents();
            info!("Initializing empty store with {} sample residents", seeded.len());
            LocalResidentApi::write_list(storage, &seeded)?;
            seeded
        }
        Err(Error::Json(err)) => {
            warn!("Stored resident list is unreadable ({err}); using sample data");
            seed_residents()
        }
        Err(err) => return Err(err),
    };

    let mut seen = HashSet::new();
    let total = residents.len();
    let unique: Vec<Resident> = residents
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    if unique.len() != total {
        warn!(
            "Dropped {} residents with duplicate ids",
            total - unique.len()
        );
    }
    Ok(unique)
}

fn fresh_id(existing: &[Resident]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if existing.iter().all(|r| r.id != id) {
            return id;
        }
    }
}

#[async_trait]
impl ResidentApi for LocalResidentApi {
    async fn fetch_residents(&self) -> Result<Vec<Resident>> {
        simulate(self.latency.fetch).await;
        let storage = self.lock()?;
        read_list(&storage)
    }

    async fn add_resident(&self, new: NewResident) -> Result<Resident> {
        simulate(self.latency.mutate).await;
        let new = new.normalized();
        new.validate()?;

        let storage = self.lock()?;
        let mut residents = read_list(&storage)?;
        let resident = Resident::from_new(fresh_id(&residents), new);
        residents.insert(0, resident.clone());
        Self::write_list(&storage, &residents)?;

        info!("Added resident {} ({})", resident.id, resident.name);
        Ok(resident)
    }

    async fn update_resident(&self, id: &str, update: ResidentUpdate) -> Result<Resident> {
        simulate(self.latency.mutate).await;
        let update = update.normalized();
        update.validate()?;

        let storage = self.lock()?;
        let mut residents = read_list(&storage)?;
        let resident = residents
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found(id))?;
        update.apply_to(resident);
        let updated = resident.clone();
        Self::write_list(&storage, &residents)?;

        info!("Updated resident {}", updated.id);
        Ok(updated)
    }

    async fn delete_resident(&self, id: &str) -> Result<bool> {
        simulate(self.latency.mutate).await;
        let storage = self.lock()?;
        let mut residents = read_list(&storage)?;
        let before = residents.len();
        residents.retain(|r| r.id != id);
        let removed = residents.len() != before;
        Self::write_list(&storage, &residents)?;

        if removed {
            info!("Deleted resident {id}");
        } else {
            debug!("Delete of unknown resident {id} was a no-op");
        }
        Ok(removed)
    }
}
