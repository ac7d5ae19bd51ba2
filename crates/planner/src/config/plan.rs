use std::path::PathBuf;

use clap::Args;
use clap::ValueEnum;

/// Rendering for command output. The manifest subcommand always prints YAML
/// text and ignores this.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(
        short,
        long,
        env = "PLANNER_REQUEST",
        value_name = "PATH",
        help = "Deployment request file (YAML or JSON), or `-` to read from stdin"
    )]
    pub request: PathBuf,

    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Write the result to this file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml, help = "Output format")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Write the catalog to this file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml, help = "Output format")]
    pub format: OutputFormat,
}
