use api_types::DeploymentRequest;
use poem::handler;
use poem::web::Json;
use poem::IntoResponse;
use sizing::DeploymentPlan;
use tracing::info;
use utils::version;

use super::types::Catalog;
use super::types::EstimateResponse;
use super::types::HealthResponse;
use super::types::ManifestInput;

/// Content type of rendered manifests.
pub const MANIFEST_CONTENT_TYPE: &str = "application/yaml";

/// Estimate the GPU allocation for a request
#[handler]
pub async fn estimate(Json(request): Json<DeploymentRequest>) -> Json<EstimateResponse> {
    let response = EstimateResponse::for_request(&request);
    info!(
        model = %request.model_name,
        allocation = %response.allocation,
        total_gb = response.memory_estimate.total_gb,
        "estimate requested"
    );
    Json(response)
}

/// Render the manifest for a request. A supplied `allocation` is used as is;
/// otherwise the request's deployment mode decides.
#[handler]
pub async fn manifest(Json(input): Json<ManifestInput>) -> impl IntoResponse {
    let allocation = input.allocation();
    info!(
        mode = %input.request.mode,
        %allocation,
        supplied = input.allocation.is_some(),
        "manifest requested"
    );
    sizing::synthesize(&input.request, &allocation)
        .into_string()
        .with_content_type(MANIFEST_CONTENT_TYPE)
}

#[handler]
pub async fn plan(Json(request): Json<DeploymentRequest>) -> Json<DeploymentPlan> {
    Json(sizing::plan(&request))
}

/// GPU types, sharing modes, priorities and data centers a request may name
#[handler]
pub async fn catalog() -> Json<Catalog> {
    Json(Catalog::new())
}

#[handler]
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: version::VERSION.as_str(),
    })
}
