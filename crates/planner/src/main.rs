use anyhow::Result;
use clap::Parser;
use planner::cmd;
use planner::config::Cli;
use planner::config::Commands;
use utils::version;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();
    utils::logging::init();

    tracing::debug!("planner {}", &**version::VERSION);

    match cli.command {
        Commands::Estimate(args) => cmd::run_estimate(&args, cli.mode),
        Commands::Manifest(args) => cmd::run_manifest(&args, cli.mode),
        Commands::Plan(args) => cmd::run_plan(&args, cli.mode),
        Commands::Catalog(args) => cmd::run_catalog(&args),
        Commands::Serve(args) => {
            if cli.mode.is_some() {
                tracing::warn!("--mode has no effect on serve; requests carry their own mode");
            }
            cmd::run_serve(args).await
        }
    }
}
