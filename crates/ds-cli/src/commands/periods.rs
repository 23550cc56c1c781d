use ds_storage::Catalog;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// `dsh periods`: periods with stored photos, most recent first.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let spinner = Progress::spinner("Listing stored periods");
    let periods = match Catalog::new(&ctx.store, &ctx.layout).list_periods().await {
        Ok(periods) => {
            spinner.finish_clear();
            periods
        }
        Err(error) => {
            spinner.finish_err("listing failed");
            return Err(anyhow::Error::new(error).context("failed to list stored periods"));
        }
    };

    output(&periods, flags.format)
}
