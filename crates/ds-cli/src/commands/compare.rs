use ds_analysis::VisionModel;
use ds_core::{Period, Sector};
use ds_flow::CompareFlow;
use ds_storage::{Baseline, ImageStore};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CompareArgs;
use crate::commands::shared::{AnalysisSummary, PhotoStatus, analysis_pipeline};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct CompareReport {
    sector: Sector,
    before: PhotoStatus,
    after: PhotoStatus,
    #[serde(flatten)]
    summary: AnalysisSummary,
}

/// `dsh compare`: analyze two stored photos of a sector.
///
/// Missing periods default to the two most recent ones in storage. When
/// either photo is absent the report says so and no analysis is attempted.
pub async fn handle(
    args: &CompareArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let sector = ctx.sector(&args.sector)?;
    let pipeline = analysis_pipeline(&ctx.config, args.timeout)?;
    let mut flow = CompareFlow::new(&ctx.store, ctx.layout.clone(), pipeline);

    let (before, after) = choose_periods(&flow, args, ctx).await?;

    let spinner = Progress::spinner(&format!("Loading {sector} for {before} and {after}"));
    if let Err(error) = flow.select(sector.clone(), before, after).await {
        spinner.finish_err("loading failed");
        return Err(anyhow::Error::new(error).context("failed to load photos"));
    }
    spinner.finish_clear();

    let summary = if flow.can_analyze() {
        let spinner = Progress::spinner(&format!("Comparing {sector}"));
        match flow.analyze().await {
            Ok(result) => {
                spinner.finish_clear();
                AnalysisSummary::completed(result)
            }
            Err(error) => {
                spinner.finish_err("analysis failed");
                AnalysisSummary::failed(&error)
            }
        }
    } else {
        tracing::warn!(%sector, "a photo is missing; skipping analysis");
        AnalysisSummary::skipped("a photo is missing")
    };

    let status = |baseline: Option<&Baseline>, period: Period| {
        baseline.map_or(
            PhotoStatus {
                period,
                found: false,
                bytes: None,
            },
            PhotoStatus::from,
        )
    };
    let report = CompareReport {
        before: status(flow.before(), before.min(after)),
        after: status(flow.after(), before.max(after)),
        sector,
        summary,
    };
    output(&report, flags.format)?;

    match report.summary.failure() {
        Some(message) => anyhow::bail!("analysis failed: {message}"),
        None => Ok(()),
    }
}

async fn choose_periods<S, M>(
    flow: &CompareFlow<S, M>,
    args: &CompareArgs,
    ctx: &AppContext,
) -> anyhow::Result<(Period, Period)>
where
    S: ImageStore,
    M: VisionModel,
{
    if let (Some(before), Some(after)) = (args.before, args.after) {
        return Ok((before, after));
    }

    let Some((latest_before, latest_after)) = flow.default_periods().await? else {
        anyhow::bail!("no stored periods under '{}'", ctx.layout.root());
    };
    Ok((
        args.before.unwrap_or(latest_before),
        args.after.unwrap_or(latest_after),
    ))
}
