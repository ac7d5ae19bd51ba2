//! GPU memory estimation and tier selection.
//!
//! Demand is modelled as half-precision weights plus a KV-cache term plus a
//! fixed runtime overhead. The KV-cache term uses a hidden size of 5120 and 40
//! layers regardless of the actual model architecture.

use api_types::DeploymentRequest;
use api_types::GpuAllocation;
use api_types::GpuType;
use api_types::ModelParams;
use api_types::SharingMode;
use serde::Serialize;
use tracing::debug;
use tracing::trace;

const KV_HIDDEN_SIZE: f64 = 5120.0;
const KV_LAYERS: f64 = 40.0;
/// Key and value tensors per token.
const KV_TENSORS: f64 = 2.0;
const BYTES_PER_GB: f64 = (1u64 << 30) as f64;

/// Runtime and framework overhead added to every estimate, in GB.
pub const RUNTIME_OVERHEAD_GB: f64 = 4.0;
/// Footprint used when the model size cannot be determined.
pub const DEFAULT_FOOTPRINT_GB: f64 = 14.0;
pub const DEFAULT_BATCH_SIZE: i64 = 1;
pub const DEFAULT_SEQUENCE_LENGTH: i64 = 512;

/// Tiers considered by the estimator, largest first, with the per-device
/// capacity used for counting.
///
/// These are sizing thresholds, not physical capacities; L40S counts as 24 GB
/// here but reserves host memory against [`GpuType::memory_gb`].
const SIZING_TIERS: [(GpuType, f64); 4] = [
    (GpuType::H100, 80.0),
    (GpuType::A100, 40.0),
    (GpuType::L40S, 24.0),
    (GpuType::T4, 16.0),
];

/// Substrings looked for in model names, longest first so that "13b" wins
/// over "3b".
const NAME_PATTERNS: [(&str, ModelParams); 10] = [
    ("405b", ModelParams::P405B),
    ("175b", ModelParams::P175B),
    ("70b", ModelParams::P70B),
    ("65b", ModelParams::P65B),
    ("34b", ModelParams::P34B),
    ("33b", ModelParams::P33B),
    ("13b", ModelParams::P13B),
    ("7b", ModelParams::P7B),
    ("3b", ModelParams::P3B),
    ("1b", ModelParams::P1B),
];

/// Breakdown of the estimated GPU memory demand, in GB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEstimate {
    pub model_gb: f64,
    pub kv_cache_gb: f64,
    pub overhead_gb: f64,
    pub total_gb: f64,
}

/// Half-precision weight footprint of a parameter tier.
pub const fn footprint_gb(params: ModelParams) -> f64 {
    match params {
        ModelParams::P1B => 2.0,
        ModelParams::P3B => 6.0,
        ModelParams::P7B => 14.0,
        ModelParams::P13B => 26.0,
        ModelParams::P33B => 66.0,
        ModelParams::P34B => 68.0,
        ModelParams::P65B => 130.0,
        ModelParams::P70B => 140.0,
        ModelParams::P175B => 350.0,
        ModelParams::P405B => 810.0,
        ModelParams::Unknown => DEFAULT_FOOTPRINT_GB,
    }
}

/// Guess the parameter tier from a model name such as
/// `meta-llama/Llama-2-7b-chat-hf`.
pub fn params_from_model_name(model_name: &str) -> Option<ModelParams> {
    let name = model_name.to_ascii_lowercase();
    NAME_PATTERNS
        .iter()
        .find(|(pattern, _)| name.contains(pattern))
        .map(|&(_, params)| params)
}

/// Weight footprint for a request: the explicit tier if given, otherwise a
/// tier guessed from the model name, otherwise the 7B default.
pub fn model_footprint_gb(request: &DeploymentRequest) -> f64 {
    match request.model_params {
        Some(params) => footprint_gb(params),
        None => params_from_model_name(&request.model_name)
            .map(footprint_gb)
            .unwrap_or(DEFAULT_FOOTPRINT_GB),
    }
}

/// KV-cache footprint for the given workload shape. Non-positive inputs are
/// replaced by the defaults.
pub fn kv_cache_gb(batch_size: i64, sequence_length: i64) -> f64 {
    let batch_size = if batch_size > 0 {
        batch_size
    } else {
        DEFAULT_BATCH_SIZE
    };
    let sequence_length = if sequence_length > 0 {
        sequence_length
    } else {
        DEFAULT_SEQUENCE_LENGTH
    };

    batch_size as f64 * sequence_length as f64 * KV_TENSORS * KV_HIDDEN_SIZE * KV_LAYERS
        / BYTES_PER_GB
}

/// Estimate the GPU memory needed to serve the request.
pub fn estimate_memory(request: &DeploymentRequest) -> MemoryEstimate {
    let model_gb = model_footprint_gb(request);
    let kv_cache_gb = kv_cache_gb(request.batch_size, request.sequence_length);
    let total_gb = model_gb + kv_cache_gb + RUNTIME_OVERHEAD_GB;

    MemoryEstimate {
        model_gb,
        kv_cache_gb,
        overhead_gb: RUNTIME_OVERHEAD_GB,
        total_gb,
    }
}

/// Pick the GPU tier and device count for a total demand in GB.
///
/// The first tier whose capacity is exceeded wins; demand of 16 GB or less
/// gets a single T4.
pub fn select_tier(total_gb: f64) -> GpuAllocation {
    for (gpu_type, capacity_gb) in SIZING_TIERS {
        if total_gb > capacity_gb {
            let count = device_count(total_gb, capacity_gb);
            trace!(%gpu_type, capacity_gb, count, "tier threshold exceeded");
            return GpuAllocation::new(gpu_type, count, SharingMode::Full);
        }
    }
    GpuAllocation::new(GpuType::T4, 1, SharingMode::Full)
}

/// Devices of `capacity_gb` needed to hold `total_gb`, saturating at
/// `u32::MAX` for demands no cluster could satisfy.
fn device_count(total_gb: f64, capacity_gb: f64) -> u32 {
    let count = (total_gb / capacity_gb).ceil();
    if count >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        count as u32
    }
}

/// Size a deployment automatically. Never fails; missing or odd inputs fall
/// back to defaults.
pub fn estimate(request: &DeploymentRequest) -> GpuAllocation {
    let memory = estimate_memory(request);
    let allocation = select_tier(memory.total_gb);

    debug!(
        model_gb = memory.model_gb,
        kv_cache_gb = memory.kv_cache_gb,
        total_gb = memory.total_gb,
        %allocation,
        "estimated GPU allocation"
    );

    allocation
}
