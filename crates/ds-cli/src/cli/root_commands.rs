use std::path::PathBuf;

use clap::{Args, Subcommand};
use ds_core::Period;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List periods with stored photos, most recent first.
    Periods,
    /// List configured sectors, or the sectors stored for a period.
    Sectors(SectorsArgs),
    /// Fetch the stored photo a new capture would be compared with.
    Baseline(BaselineArgs),
    /// Photograph a sector, optionally analyze it against its baseline, and store it.
    Capture(CaptureArgs),
    /// Compare two stored photos of a sector.
    Compare(CompareArgs),
    /// Show which configuration sections are set (secrets redacted).
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct SectorsArgs {
    /// List sectors with a stored photo for this period (YYYY-MM).
    #[arg(long)]
    pub period: Option<Period>,
}

#[derive(Clone, Debug, Args)]
pub struct BaselineArgs {
    /// Sector name.
    pub sector: String,

    /// Period to look up (YYYY-MM). Defaults to last month.
    #[arg(long)]
    pub period: Option<Period>,

    /// Write the photo to this file when found.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct CaptureArgs {
    /// Sector name.
    pub sector: String,

    /// Image file used as the camera.
    #[arg(long)]
    pub source: PathBuf,

    /// Baseline period to compare against (YYYY-MM). Defaults to last month.
    #[arg(long)]
    pub compare: Option<Period>,

    /// Analyze the capture against the baseline.
    #[arg(long)]
    pub analyze: bool,

    /// Store the capture as this month's photo.
    #[arg(long)]
    pub accept: bool,

    /// Analysis deadline in seconds (overrides gemini.timeout_secs).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

#[derive(Clone, Debug, Args)]
pub struct CompareArgs {
    /// Sector name.
    pub sector: String,

    /// Earlier period (YYYY-MM). Defaults to the second most recent stored period.
    #[arg(long)]
    pub before: Option<Period>,

    /// Later period (YYYY-MM). Defaults to the most recent stored period.
    #[arg(long)]
    pub after: Option<Period>,

    /// Analysis deadline in seconds (overrides gemini.timeout_secs).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}
