use api_types::DeploymentMode;
use clap::Parser;
use clap::Subcommand;
use utils::version;

use crate::config::plan::CatalogArgs;
use crate::config::plan::PlanArgs;
use crate::config::serve::ServeArgs;

/// Size GPU allocations for model-serving workloads and render the
/// Kubernetes manifests that run them.
#[derive(Parser, Debug)]
#[command(about, long_about, version = &**version::VERSION)]
pub struct Cli {
    /// Force the deployment mode regardless of what the request says
    #[arg(long, global = true, env = "PLANNER_MODE")]
    pub mode: Option<DeploymentMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate the GPU allocation for a request
    Estimate(PlanArgs),
    /// Render the Deployment and Service manifest for a request. An
    /// `allocation` object in the request file is rendered as given.
    Manifest(PlanArgs),
    /// Print the full deployment plan for a request
    Plan(PlanArgs),
    /// List the GPU types, sharing modes, priorities and data centers a
    /// request may name
    Catalog(CatalogArgs),
    /// Serve the planner over HTTP
    Serve(ServeArgs),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::CommandFactory;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plan_arguments() {
        let cli = Cli::try_parse_from([
            "planner",
            "--mode",
            "manual",
            "plan",
            "-r",
            "request.yaml",
            "-o",
            "plan.json",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.mode, Some(DeploymentMode::Manual));
        let Commands::Plan(args) = cli.command else {
            panic!("expected plan subcommand");
        };
        assert_eq!(args.request, PathBuf::from("request.yaml"));
        assert_eq!(args.output, Some(PathBuf::from("plan.json")));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn global_mode_after_subcommand() {
        let cli =
            Cli::try_parse_from(["planner", "estimate", "-r", "-", "--mode", "auto"]).unwrap();

        assert_eq!(cli.mode, Some(DeploymentMode::Automatic));
        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate subcommand");
        };
        assert_eq!(args.format, OutputFormat::Yaml);
        assert_eq!(args.output, None);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["planner", "--mode", "hybrid", "plan", "-r", "x"]).is_err());
    }

    #[test]
    fn parses_catalog_arguments() {
        let cli = Cli::try_parse_from(["planner", "catalog", "--format", "json"]).unwrap();
        let Commands::Catalog(args) = cli.command else {
            panic!("expected catalog subcommand");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output, None);
    }

    #[test]
    fn serve_has_default_listen_address() {
        let cli = Cli::try_parse_from(["planner", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve subcommand");
        };
        assert_eq!(args.listen, "0.0.0.0:8080");
    }
}
