//! Baseline resolution: find the stored photo a new capture is compared against.

use ds_core::{Period, Sector, StorageLayout, StoredImage};

use crate::{ImageStore, StorageError};

/// Outcome of looking up a baseline.
///
/// Absence is an ordinary outcome, not an error: the first capture of a
/// sector never has anything to compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Baseline {
    Found(StoredImage),
    Unavailable { sector: Sector, period: Period },
}

impl Baseline {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub const fn image(&self) -> Option<&StoredImage> {
        match self {
            Self::Found(image) => Some(image),
            Self::Unavailable { .. } => None,
        }
    }

    /// The period that was looked up.
    #[must_use]
    pub const fn period(&self) -> Period {
        match self {
            Self::Found(image) => image.period,
            Self::Unavailable { period, .. } => *period,
        }
    }
}

/// Looks up baselines in a store using a [`StorageLayout`].
#[derive(Debug)]
pub struct BaselineResolver<'a, S> {
    store: &'a S,
    layout: &'a StorageLayout,
}

impl<'a, S: ImageStore> BaselineResolver<'a, S> {
    pub const fn new(store: &'a S, layout: &'a StorageLayout) -> Self {
        Self { store, layout }
    }

    /// Fetch the photo stored for (`sector`, `period`).
    ///
    /// # Errors
    ///
    /// Transport and decoding failures propagate. A missing photo yields
    /// [`Baseline::Unavailable`].
    pub async fn resolve(&self, sector: &Sector, period: Period) -> Result<Baseline, StorageError> {
        let path = self.layout.path_for(sector, period);
        match self.store.read(&path).await {
            Ok(bytes) => {
                tracing::debug!(%sector, %period, size = bytes.len(), "baseline found");
                Ok(Baseline::Found(StoredImage {
                    sector: sector.clone(),
                    period,
                    bytes,
                }))
            }
            Err(StorageError::NotFound { .. }) => {
                tracing::debug!(%sector, %period, "no baseline stored");
                Ok(Baseline::Unavailable {
                    sector: sector.clone(),
                    period,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve against `period`, or the month before `current` when `None`.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_or_previous(
        &self,
        sector: &Sector,
        period: Option<Period>,
        current: Period,
    ) -> Result<Baseline, StorageError> {
        self.resolve(sector, period.unwrap_or_else(|| current.previous()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectImageStore;
    use pretty_assertions::assert_eq;

    fn bed() -> Sector {
        Sector::new("Bed").unwrap()
    }

    fn period(s: &str) -> Period {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn missing_photo_is_unavailable() {
        let store = ObjectImageStore::in_memory();
        let layout = StorageLayout::default();
        let baseline = BaselineResolver::new(&store, &layout)
            .resolve(&bed(), period("2024-12"))
            .await
            .unwrap();
        assert!(!baseline.is_available());
        assert_eq!(
            baseline,
            Baseline::Unavailable {
                sector: bed(),
                period: period("2024-12")
            }
        );
    }

    #[tokio::test]
    async fn stored_photo_is_found() {
        let store = ObjectImageStore::in_memory();
        let layout = StorageLayout::default();
        store
            .write("data/2024-12/Bed.jpg", b"december bed", "m")
            .await
            .unwrap();

        let baseline = BaselineResolver::new(&store, &layout)
            .resolve(&bed(), period("2024-12"))
            .await
            .unwrap();
        let image = baseline.image().unwrap();
        assert_eq!(image.bytes, b"december bed");
        assert_eq!(image.period, period("2024-12"));
    }

    #[tokio::test]
    async fn defaults_to_previous_month() {
        let store = ObjectImageStore::in_memory();
        let layout = StorageLayout::default();
        store
            .write("data/2024-12/Bed.jpg", b"december bed", "m")
            .await
            .unwrap();

        let resolver = BaselineResolver::new(&store, &layout);
        let baseline = resolver
            .resolve_or_previous(&bed(), None, period("2025-01"))
            .await
            .unwrap();
        assert_eq!(baseline.period(), period("2024-12"));
        assert!(baseline.is_available());

        let explicit = resolver
            .resolve_or_previous(&bed(), Some(period("2024-06")), period("2025-01"))
            .await
            .unwrap();
        assert_eq!(explicit.period(), period("2024-06"));
        assert!(!explicit.is_available());
    }
}
