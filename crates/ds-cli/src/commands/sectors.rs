use anyhow::Context;
use ds_core::Sector;
use ds_storage::Catalog;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SectorsArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SectorRow {
    sector: Sector,
    /// Whether the sector is in `general.sectors`; stored photos may predate a rename.
    configured: bool,
}

/// `dsh sectors`: the configured sectors, or the sectors stored for `--period`.
pub async fn handle(
    args: &SectorsArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let Some(period) = args.period else {
        return output(&ctx.sectors, flags.format);
    };

    let stored = Catalog::new(&ctx.store, &ctx.layout)
        .list_sectors(period)
        .await
        .with_context(|| format!("failed to list sectors for {period}"))?;

    let rows = stored
        .into_iter()
        .map(|sector| SectorRow {
            configured: ctx.sectors.contains(&sector),
            sector,
        })
        .collect::<Vec<_>>();

    output(&rows, flags.format)
}
