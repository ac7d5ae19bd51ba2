//! End-to-end planning: resolve the allocation for a request and render
//! everything a caller needs to review or apply the deployment.

use api_types::DeploymentMode;
use api_types::DeploymentRequest;
use api_types::GpuAllocation;
use api_types::PriorityClass;
use serde::Serialize;
use tracing::info;

use crate::estimator;
use crate::estimator::MemoryEstimate;
use crate::manifest;
use crate::manifest::ManifestDocument;
use crate::resources::ResourceReservation;

/// Everything derived from one request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPlan {
    pub service_name: String,
    pub namespace: String,
    pub mode: DeploymentMode,
    pub allocation: GpuAllocation,
    /// Present only when the allocation was estimated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_estimate: Option<MemoryEstimate>,
    pub reservation: ResourceReservation,
    pub priority: PriorityClass,
    pub endpoint: String,
    pub manifest: ManifestDocument,
}

/// The allocation a request runs with: estimated in automatic mode, taken
/// from the manual fields otherwise.
pub fn resolve_allocation(request: &DeploymentRequest) -> GpuAllocation {
    match request.mode {
        DeploymentMode::Automatic => estimator::estimate(request),
        DeploymentMode::Manual => request.manual_allocation(),
    }
}

pub fn plan(request: &DeploymentRequest) -> DeploymentPlan {
    let (allocation, memory_estimate) = match request.mode {
        DeploymentMode::Automatic => {
            let memory = estimator::estimate_memory(request);
            (estimator::select_tier(memory.total_gb), Some(memory))
        }
        DeploymentMode::Manual => (request.manual_allocation(), None),
    };

    let service_name = manifest::service_identity(request).to_string();
    info!(
        service = %service_name,
        namespace = %request.namespace,
        mode = %request.mode,
        %allocation,
        "planned deployment"
    );

    DeploymentPlan {
        service_name,
        namespace: request.namespace.clone(),
        mode: request.mode,
        allocation,
        memory_estimate,
        reservation: ResourceReservation::for_allocation(&allocation),
        priority: request.effective_priority(),
        endpoint: manifest::service_endpoint(request),
        manifest: manifest::synthesize(request, &allocation),
    }
}
