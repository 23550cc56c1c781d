use std::time::Duration;

use anyhow::Context;
use ds_analysis::VisionModel;
use ds_capture::ImageFileDevice;
use ds_core::{FlowState, Period, Sector};
use ds_flow::{CaptureFlow, FlowOptions};
use ds_storage::ImageStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CaptureArgs;
use crate::commands::shared::{AnalysisSummary, analysis_pipeline};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Frames read before giving up on a source that yields nothing.
const CAPTURE_ATTEMPTS: u32 = 3;
const CAPTURE_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Serialize)]
struct CaptureReport {
    sector: Sector,
    period: Period,
    baseline_period: Period,
    baseline_found: bool,
    width: u32,
    height: u32,
    bytes: usize,
    state: FlowState,
    #[serde(flatten)]
    summary: AnalysisSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_path: Option<String>,
}

/// `dsh capture`: drive one pass of the capture flow with a file-backed camera.
///
/// Select, capture, optionally analyze against the baseline, optionally
/// store. Without a baseline the analysis is skipped and reported as such. An
/// analysis failure is reported and still allows `--accept`; without
/// `--accept` it makes the command fail after the report is printed.
pub async fn handle(
    args: &CaptureArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let sector = ctx.sector(&args.sector)?;
    let pipeline = analysis_pipeline(&ctx.config, args.timeout)?;
    let options = FlowOptions::from_config(&ctx.config, ctx.current);
    let device = ImageFileDevice::new(args.source.clone());
    let mut flow = CaptureFlow::new(device, &ctx.store, pipeline, options);

    let spinner = Progress::spinner(&format!("Looking up baseline for {sector}"));
    let (baseline_period, baseline_found) = match flow.select(sector.clone(), args.compare).await {
        Ok(selection) => (selection.baseline.period(), selection.baseline.is_available()),
        Err(error) => {
            spinner.finish_err("lookup failed");
            return Err(anyhow::Error::new(error).context("failed to resolve baseline"));
        }
    };
    spinner.finish_clear();
    if !baseline_found {
        tracing::info!(
            %sector,
            period = %baseline_period,
            "no baseline; this capture starts the history"
        );
    }

    flow.start_capture()
        .await
        .with_context(|| format!("failed to open capture source {}", args.source.display()))?;
    take_still(&mut flow, args).await?;

    let (width, height, bytes) = flow
        .still()
        .map(|still| (still.width(), still.height(), still.bytes().len()))
        .context("capture finished without a still")?;

    let summary = if args.analyze && flow.can_analyze() {
        let spinner = Progress::spinner(&format!("Comparing {sector} with {baseline_period}"));
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
    } else if args.analyze {
        tracing::warn!(%sector, period = %baseline_period, "no baseline; skipping analysis");
        AnalysisSummary::skipped(format!(
            "no {sector} photo for {baseline_period} to compare against"
        ))
    } else {
        AnalysisSummary::default()
    };

    let mut stored_path = None;
    if args.accept {
        let spinner = Progress::spinner(&format!("Storing {sector} for {}", ctx.current));
        match flow.accept().await {
            Ok(path) => {
                spinner.finish_ok(&format!("Stored {path}"));
                stored_path = Some(path);
            }
            Err(error) => {
                spinner.finish_err("upload failed");
                return Err(anyhow::Error::new(error).context("failed to store capture"));
            }
        }
    }

    let report = CaptureReport {
        sector,
        period: ctx.current,
        baseline_period,
        baseline_found,
        width,
        height,
        bytes,
        state: flow.state(),
        summary,
        stored_path,
    };
    output(&report, flags.format)?;

    match report.summary.failure() {
        Some(message) if !args.accept => anyhow::bail!("analysis failed: {message}"),
        _ => Ok(()),
    }
}

async fn take_still<S, M>(
    flow: &mut CaptureFlow<ImageFileDevice, S, M>,
    args: &CaptureArgs,
) -> anyhow::Result<()>
where
    S: ImageStore,
    M: VisionModel,
{
    for attempt in 1..=CAPTURE_ATTEMPTS {
        if flow.capture().await? {
            return Ok(());
        }
        tracing::debug!(attempt, "no frame yet");
        if attempt < CAPTURE_ATTEMPTS {
            tokio::time::sleep(CAPTURE_RETRY_DELAY).await;
        }
    }

    flow.back_to_selection();
    anyhow::bail!(
        "no frame could be read from {} after {CAPTURE_ATTEMPTS} attempts",
        args.source.display()
    )
}

#[cfg(test)]
mod tests {
    use ds_capture::Frame;
    use ds_config::{DsConfig, StorageBackend};

    use super::handle;
    use crate::cli::root_commands::CaptureArgs;
    use crate::cli::{GlobalFlags, OutputFormat};
    use crate::context::AppContext;

    #[tokio::test]
    async fn first_capture_with_analyze_skips_instead_of_failing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = DsConfig::default();
        config.storage.backend = StorageBackend::Local;
        let ctx = AppContext::init(dir.path(), config).expect("local context");

        let still = Frame::new(2, 2, vec![200; 16]).encode_jpeg().expect("jpeg");
        let source = dir.path().join("desk.jpg");
        std::fs::write(&source, still.bytes()).expect("write source");

        let args = CaptureArgs {
            sector: "Desk".into(),
            source,
            compare: None,
            analyze: true,
            accept: false,
            timeout: None,
        };
        let flags = GlobalFlags {
            format: OutputFormat::Json,
            quiet: true,
            verbose: false,
            project: None,
        };
        handle(&args, &ctx, &flags)
            .await
            .expect("a missing baseline is not an analysis failure");
    }
}
