//! Listing which periods and sectors have stored photos.

use ds_core::{EntryKind, Period, Sector, StorageLayout};

use crate::{ImageStore, StorageError};

/// Read-only view over the photos in a store.
#[derive(Debug)]
pub struct Catalog<'a, S> {
    store: &'a S,
    layout: &'a StorageLayout,
}

impl<'a, S: ImageStore> Catalog<'a, S> {
    pub const fn new(store: &'a S, layout: &'a StorageLayout) -> Self {
        Self { store, layout }
    }

    /// Periods with a directory under the data root, most recent first.
    ///
    /// Directories whose names are not `YYYY-MM` are ignored. A missing data
    /// root means nothing has been stored yet and yields an empty list.
    ///
    /// # Errors
    ///
    /// Transport failures propagate.
    pub async fn list_periods(&self) -> Result<Vec<Period>, StorageError> {
        let entries = match self.store.list_children(self.layout.root()).await {
            Ok(entries) => entries,
            Err(StorageError::NotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut periods: Vec<Period> = entries
            .into_iter()
            .filter(|e| e.kind == EntryKind::Dir)
            .filter_map(|e| e.name.parse().ok())
            .collect();
        periods.sort_unstable_by(|a, b| b.cmp(a));
        periods.dedup();
        Ok(periods)
    }

    /// Sectors with a stored photo for `period`, sorted by name.
    ///
    /// # Errors
    ///
    /// Transport failures propagate. A period without photos yields an empty list.
    pub async fn list_sectors(&self, period: Period) -> Result<Vec<Sector>, StorageError> {
        let entries = match self.store.list_children(&self.layout.period_dir(period)).await {
            Ok(entries) => entries,
            Err(StorageError::NotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut sectors: Vec<Sector> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .filter_map(|e| StorageLayout::parse_entry_name(&e.name))
            .collect();
        sectors.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(sectors)
    }

    /// The two most recent periods, as (older, newer), for a default comparison.
    /// With a single stored period, that period is used for both sides.
    ///
    /// # Errors
    ///
    /// See [`Self::list_periods`].
    pub async fn latest_pair(&self) -> Result<Option<(Period, Period)>, StorageError> {
        let periods = self.list_periods().await?;
        Ok(match periods.as_slice() {
            [newer, older, ..] => Some((*older, *newer)),
            [only] => Some((*only, *only)),
            [] => None,
        })
    }
}
