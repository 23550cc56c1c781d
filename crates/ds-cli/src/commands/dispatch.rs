use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Periods => commands::periods::handle(ctx, flags).await,
        Commands::Sectors(args) => commands::sectors::handle(&args, ctx, flags).await,
        Commands::Baseline(args) => commands::baseline::handle(&args, ctx, flags).await,
        Commands::Capture(args) => commands::capture::handle(&args, ctx, flags).await,
        Commands::Compare(args) => commands::compare::handle(&args, ctx, flags).await,
        Commands::Config => unreachable!("config is pre-dispatched in main"),
    }
}
