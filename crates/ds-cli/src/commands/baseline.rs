use anyhow::Context;
use ds_core::Sector;
use ds_storage::BaselineResolver;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BaselineArgs;
use crate::commands::shared::PhotoStatus;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct BaselineReport {
    sector: Sector,
    path: String,
    #[serde(flatten)]
    photo: PhotoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<String>,
}

/// `dsh baseline`: resolve the photo a new capture would be compared with.
pub async fn handle(
    args: &BaselineArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let sector = ctx.sector(&args.sector)?;

    let spinner = Progress::spinner(&format!("Looking up baseline for {sector}"));
    let resolved = BaselineResolver::new(&ctx.store, &ctx.layout)
        .resolve_or_previous(&sector, args.period, ctx.current)
        .await;
    let baseline = match resolved {
        Ok(baseline) => {
            spinner.finish_clear();
            baseline
        }
        Err(error) => {
            spinner.finish_err("lookup failed");
            return Err(anyhow::Error::new(error).context("failed to resolve baseline"));
        }
    };

    let mut written_to = None;
    if let (Some(out), Some(image)) = (&args.out, baseline.image()) {
        tokio::fs::write(out, &image.bytes)
            .await
            .with_context(|| format!("failed to write baseline to {}", out.display()))?;
        written_to = Some(out.display().to_string());
    } else if args.out.is_some() {
        tracing::warn!(%sector, period = %baseline.period(), "no baseline stored; nothing written");
    }

    let report = BaselineReport {
        path: ctx.layout.path_for(&sector, baseline.period()),
        sector,
        photo: PhotoStatus::from(&baseline),
        written_to,
    };
    output(&report, flags.format)
}
