use api_types::DeploymentRequest;
use api_types::GpuAllocation;
use api_types::GpuType;
use api_types::PriorityClass;
use api_types::SharingMode;
use api_types::DATA_CENTERS;
use api_types::MAX_MANUAL_GPU_COUNT;
use serde::de::Error as _;
use serde::Deserialize;
use serde::Serialize;
use sizing::MemoryEstimate;
use sizing::ResourceReservation;

/// Result of estimating a request, ignoring its deployment mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub allocation: GpuAllocation,
    pub memory_estimate: MemoryEstimate,
    pub reservation: ResourceReservation,
}

impl EstimateResponse {
    pub fn for_request(request: &DeploymentRequest) -> Self {
        let memory_estimate = sizing::estimate_memory(request);
        let allocation = sizing::estimator::select_tier(memory_estimate.total_gb);
        Self {
            allocation,
            memory_estimate,
            reservation: ResourceReservation::for_allocation(&allocation),
        }
    }
}

/// Input for manifest rendering: the request fields, plus an optional
/// `allocation` key that replaces the allocation the request would resolve to.
#[derive(Debug, Clone, Default)]
pub struct ManifestInput {
    pub request: DeploymentRequest,
    pub allocation: Option<GpuAllocation>,
}

#[derive(Deserialize)]
struct AllocationField {
    #[serde(default)]
    allocation: Option<GpuAllocation>,
}

// Read from one buffered document twice; `#[serde(flatten)]` drops the
// request's field aliases.
impl<'de> Deserialize<'de> for ManifestInput {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = serde_json::Value::deserialize(deserializer)?;
        let request = DeploymentRequest::deserialize(&document).map_err(D::Error::custom)?;
        let AllocationField { allocation } =
            AllocationField::deserialize(&document).map_err(D::Error::custom)?;
        Ok(Self {
            request,
            allocation,
        })
    }
}

impl ManifestInput {
    pub fn allocation(&self) -> GpuAllocation {
        self.allocation
            .unwrap_or_else(|| sizing::resolve_allocation(&self.request))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuTypeEntry {
    pub name: GpuType,
    pub memory_gb: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceEntry<T> {
    pub value: T,
    pub label: &'static str,
    pub description: &'static str,
}

/// Values a deployment request can choose from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub gpu_types: Vec<GpuTypeEntry>,
    pub sharing_modes: Vec<ChoiceEntry<SharingMode>>,
    pub priority_classes: Vec<ChoiceEntry<PriorityClass>>,
    pub data_centers: Vec<&'static str>,
    pub max_manual_gpu_count: u32,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            gpu_types: GpuType::ALL
                .into_iter()
                .map(|name| GpuTypeEntry {
                    name,
                    memory_gb: name.memory_gb(),
                })
                .collect(),
            sharing_modes: SharingMode::ALL
                .into_iter()
                .map(|value| ChoiceEntry {
                    value,
                    label: value.label(),
                    description: value.description(),
                })
                .collect(),
            priority_classes: PriorityClass::ALL
                .into_iter()
                .map(|value| ChoiceEntry {
                    value,
                    label: value.label(),
                    description: value.description(),
                })
                .collect(),
            data_centers: DATA_CENTERS.to_vec(),
            max_manual_gpu_count: MAX_MANUAL_GPU_COUNT,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of `GET /healthz`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
