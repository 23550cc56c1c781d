use std::path::Path;

use anyhow::Context;
use ds_config::{DsConfig, StorageBackend};
use ds_core::{Period, Sector, StorageLayout};
use ds_storage::ConfiguredStore;

/// Shared application resources initialized once at startup.
#[derive(Debug)]
pub struct AppContext {
    pub config: DsConfig,
    pub layout: StorageLayout,
    pub store: ConfiguredStore,
    pub sectors: Vec<Sector>,
    /// The period new photos are stored under, fixed for the whole invocation.
    pub current: Period,
}

impl AppContext {
    /// Build the storage backend and read the values every command needs.
    pub fn init(project_root: &Path, config: DsConfig) -> anyhow::Result<Self> {
        let store = ConfiguredStore::from_config(&config, project_root).with_context(|| {
            match config.storage.backend {
                StorageBackend::Github => String::from(
                    "GitHub storage is not configured (set DIFFSHAME_GITHUB__TOKEN, \
                     DIFFSHAME_GITHUB__OWNER and DIFFSHAME_GITHUB__REPO, or use storage.backend = \"local\")",
                ),
                StorageBackend::Local => format!(
                    "failed to open local photo directory {}",
                    project_root.join(&config.storage.local_path).display()
                ),
            }
        })?;
        let sectors = config.sectors().context("invalid general.sectors")?;
        let layout = config.layout();
        let current = Period::current();

        tracing::debug!(
            project = %project_root.display(),
            backend = %store.backend(),
            root = layout.root(),
            %current,
            "app context ready"
        );

        Ok(Self {
            config,
            layout,
            store,
            sectors,
            current,
        })
    }

    /// Look up a sector by name among the configured ones, ignoring case.
    pub fn sector(&self, name: &str) -> anyhow::Result<Sector> {
        let wanted = name.trim();
        self.sectors
            .iter()
            .find(|sector| sector.as_str().eq_ignore_ascii_case(wanted))
            .cloned()
            .with_context(|| {
                let known = self
                    .sectors
                    .iter()
                    .map(Sector::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("unknown sector '{wanted}' (configured: {known})")
            })
    }
}

#[cfg(test)]
mod tests {
    use ds_config::{DsConfig, StorageBackend};

    use super::AppContext;

    fn local_context() -> (tempfile::TempDir, AppContext) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = DsConfig::default();
        config.storage.backend = StorageBackend::Local;
        let ctx = AppContext::init(dir.path(), config).expect("local context");
        (dir, ctx)
    }

    #[test]
    fn local_backend_creates_photo_directory() {
        let (dir, ctx) = local_context();
        assert_eq!(ctx.store.backend(), StorageBackend::Local);
        assert!(dir.path().join(".diffshame/photos").is_dir());
        assert_eq!(ctx.sectors.len(), 4);
    }

    #[test]
    fn unconfigured_github_backend_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AppContext::init(dir.path(), DsConfig::default())
            .expect_err("github needs credentials");
        assert!(format!("{err:#}").contains("DIFFSHAME_GITHUB__TOKEN"));
    }

    #[test]
    fn sector_lookup_ignores_case() {
        let (_dir, ctx) = local_context();
        assert_eq!(ctx.sector("north wall").expect("known").as_str(), "North Wall");
        let err = ctx.sector("Garage").expect_err("unknown");
        assert!(err.to_string().contains("configured: Desk, Bed, Closet, North Wall"));
    }
}
