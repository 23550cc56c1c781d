use std::path::Path;

use anyhow::Context;
use ds_config::DsConfig;

/// Load `.env` and the layered config for `project_root`, and validate it.
pub fn load_config(project_root: &Path) -> anyhow::Result<DsConfig> {
    let config =
        DsConfig::load_with_dotenv_from(project_root).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    tracing::debug!(root = %project_root.display(), "configuration loaded");
    Ok(config)
}
