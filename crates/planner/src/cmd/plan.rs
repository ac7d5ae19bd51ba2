use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use api_types::DeploymentMode;
use api_types::DeploymentRequest;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::api::EstimateResponse;
use crate::api::ManifestInput;
use crate::config::OutputFormat;
use crate::config::PlanArgs;
use crate::request;

/// Print the estimated allocation and memory breakdown.
pub fn run_estimate(args: &PlanArgs, mode: Option<DeploymentMode>) -> Result<()> {
    let request = load_request(args, mode)?;
    if request.is_manual() {
        warn!("request is in manual mode; estimating anyway");
    }
    let response = EstimateResponse::for_request(&request);
    info!(allocation = %response.allocation, "estimated allocation");
    write_output(args.output.as_deref(), &render(&response, args.format)?)
}

/// Print the manifest for the supplied allocation, or for the one the
/// request resolves to.
pub fn run_manifest(args: &PlanArgs, mode: Option<DeploymentMode>) -> Result<()> {
    let mut input: ManifestInput = request::load_document(&args.request)
        .map_err(|e| anyhow::anyhow!("Failed to load deployment request: {e:?}"))?;
    if let Some(mode) = mode {
        input.request.mode = mode;
    }
    let allocation = input.allocation();
    info!(mode = %input.request.mode, %allocation, "rendering manifest");
    let manifest = sizing::synthesize(&input.request, &allocation);
    write_output(args.output.as_deref(), manifest.as_str())
}

/// Print the full deployment plan.
pub fn run_plan(args: &PlanArgs, mode: Option<DeploymentMode>) -> Result<()> {
    let request = load_request(args, mode)?;
    let plan = sizing::plan(&request);
    write_output(args.output.as_deref(), &render(&plan, args.format)?)
}

fn load_request(args: &PlanArgs, mode: Option<DeploymentMode>) -> Result<DeploymentRequest> {
    let mut request = request::load(&args.request)
        .map_err(|e| anyhow::anyhow!("Failed to load deployment request: {e:?}"))?;
    if let Some(mode) = mode {
        request.mode = mode;
    }
    Ok(request)
}

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(value).context("serialize JSON output")?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).context("serialize YAML output"),
    }
}

pub(crate) fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}
