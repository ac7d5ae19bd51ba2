use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::lenient;
use crate::GpuAllocation;
use crate::GpuType;
use crate::ParseEnumError;
use crate::SharingMode;

/// Maximum number of devices a manual allocation may ask for.
pub const MAX_MANUAL_GPU_COUNT: u32 = 8;

/// How the GPU allocation of a deployment is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeploymentMode {
    /// Size the deployment from the model and workload shape.
    #[default]
    Automatic,
    /// Use the GPU type, count and placement given by the caller.
    Manual,
}

impl DeploymentMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Automatic => "auto",
            DeploymentMode::Manual => "manual",
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "automatic" => Ok(DeploymentMode::Automatic),
            "manual" => Ok(DeploymentMode::Manual),
            _ => Err(ParseEnumError::new("deployment mode", s)),
        }
    }
}

string_enum!(DeploymentMode);

/// Scheduling priority requested for a manual deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriorityClass {
    Premium,
    #[default]
    Standard,
    Spot,
}

impl PriorityClass {
    pub const ALL: [PriorityClass; 3] = [
        PriorityClass::Premium,
        PriorityClass::Standard,
        PriorityClass::Spot,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::Premium => "premium",
            PriorityClass::Standard => "standard",
            PriorityClass::Spot => "spot",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            PriorityClass::Premium => "Premium",
            PriorityClass::Standard => "Standard",
            PriorityClass::Spot => "Spot",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            PriorityClass::Premium => "Highest priority, non-preemptible",
            PriorityClass::Standard => "Normal priority",
            PriorityClass::Spot => "Low cost, can be preempted",
        }
    }
}

impl FromStr for PriorityClass {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "premium" => Ok(PriorityClass::Premium),
            "standard" => Ok(PriorityClass::Standard),
            "spot" => Ok(PriorityClass::Spot),
            _ => Err(ParseEnumError::new("priority class", s)),
        }
    }
}

string_enum!(PriorityClass);

/// Parameter-count tier of a model.
///
/// Tiers that are not recognised deserialize to [`ModelParams::Unknown`]
/// rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelParams {
    P1B,
    P3B,
    P7B,
    P13B,
    P33B,
    P34B,
    P65B,
    P70B,
    P175B,
    P405B,
    Unknown,
}

impl ModelParams {
    /// Every known tier, smallest first.
    pub const KNOWN: [ModelParams; 10] = [
        ModelParams::P1B,
        ModelParams::P3B,
        ModelParams::P7B,
        ModelParams::P13B,
        ModelParams::P33B,
        ModelParams::P34B,
        ModelParams::P65B,
        ModelParams::P70B,
        ModelParams::P175B,
        ModelParams::P405B,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ModelParams::P1B => "1B",
            ModelParams::P3B => "3B",
            ModelParams::P7B => "7B",
            ModelParams::P13B => "13B",
            ModelParams::P33B => "33B",
            ModelParams::P34B => "34B",
            ModelParams::P65B => "65B",
            ModelParams::P70B => "70B",
            ModelParams::P175B => "175B",
            ModelParams::P405B => "405B",
            ModelParams::Unknown => "unknown",
        }
    }
}

impl FromStr for ModelParams {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModelParams::KNOWN
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseEnumError::new("model size", s))
    }
}

impl Serialize for ModelParams {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or(ModelParams::Unknown))
    }
}

impl std::fmt::Display for ModelParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied description of a model deployment.
///
/// Fields missing from an input document take the deploy form's defaults.
/// Numeric fields accept numbers or numeric strings; see the crate's lenient
/// deserializers for how unreadable values are treated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentRequest {
    pub service_name: String,
    pub namespace: String,
    pub model_name: String,
    #[serde(
        deserialize_with = "lenient::model_params",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_params: Option<ModelParams>,
    #[serde(deserialize_with = "lenient::integer")]
    pub batch_size: i64,
    #[serde(alias = "seqLen", deserialize_with = "lenient::integer")]
    pub sequence_length: i64,
    #[serde(deserialize_with = "lenient::integer")]
    pub max_tokens: i64,
    #[serde(deserialize_with = "lenient::float")]
    pub temperature: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub top_p: f64,
    pub container_image: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub port: i32,
    #[serde(alias = "replicas", deserialize_with = "lenient::integer")]
    pub replica_count: i32,
    pub mode: DeploymentMode,

    // Only consulted in manual mode.
    pub gpu_type: GpuType,
    #[serde(deserialize_with = "lenient::integer")]
    pub gpu_count: i64,
    #[serde(alias = "gpuMode")]
    pub gpu_sharing_mode: SharingMode,
    #[serde(alias = "priority")]
    pub priority_class: PriorityClass,
    #[serde(alias = "preferredDC")]
    pub preferred_data_center: String,
}

impl Default for DeploymentRequest {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            namespace: "default".to_string(),
            model_name: String::new(),
            model_params: None,
            batch_size: 1,
            sequence_length: 512,
            max_tokens: 2048,
            temperature: 0.7,
            top_p: 0.9,
            container_image: "vllm/vllm-openai:latest".to_string(),
            port: 8000,
            replica_count: 1,
            mode: DeploymentMode::Automatic,
            gpu_type: GpuType::H100,
            gpu_count: 1,
            gpu_sharing_mode: SharingMode::Full,
            priority_class: PriorityClass::Standard,
            preferred_data_center: "us-east-1".to_string(),
        }
    }
}

impl DeploymentRequest {
    pub const fn is_manual(&self) -> bool {
        matches!(self.mode, DeploymentMode::Manual)
    }

    /// The allocation spelled out by the manual-mode fields, with the device
    /// count clamped to `1..=8`.
    pub fn manual_allocation(&self) -> GpuAllocation {
        let count = self.gpu_count.clamp(1, i64::from(MAX_MANUAL_GPU_COUNT)) as u32;
        GpuAllocation::new(self.gpu_type, count, self.gpu_sharing_mode)
    }

    /// Priority the workload runs with; automatic deployments always run at
    /// standard priority.
    pub const fn effective_priority(&self) -> PriorityClass {
        match self.mode {
            DeploymentMode::Automatic => PriorityClass::Standard,
            DeploymentMode::Manual => self.priority_class,
        }
    }
}
