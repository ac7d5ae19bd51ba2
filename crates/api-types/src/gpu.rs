use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::lenient;
use crate::ParseEnumError;

/// GPU hardware class used as the sizing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GpuType {
    H100,
    A100,
    L40S,
    A10,
    T4,
    V100,
}

impl GpuType {
    /// Every tier, in the order the deploy form lists them.
    pub const ALL: [GpuType; 6] = [
        GpuType::H100,
        GpuType::A100,
        GpuType::L40S,
        GpuType::A10,
        GpuType::T4,
        GpuType::V100,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            GpuType::H100 => "H100",
            GpuType::A100 => "A100",
            GpuType::L40S => "L40S",
            GpuType::A10 => "A10",
            GpuType::T4 => "T4",
            GpuType::V100 => "V100",
        }
    }

    /// Physical memory of a single device in GB.
    pub const fn memory_gb(&self) -> u32 {
        match self {
            GpuType::H100 => 80,
            GpuType::A100 => 40,
            GpuType::L40S => 48,
            GpuType::A10 => 24,
            GpuType::T4 => 16,
            GpuType::V100 => 32,
        }
    }
}

impl FromStr for GpuType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H100" => Ok(GpuType::H100),
            "A100" => Ok(GpuType::A100),
            "L40S" => Ok(GpuType::L40S),
            "A10" => Ok(GpuType::A10),
            "T4" => Ok(GpuType::T4),
            "V100" => Ok(GpuType::V100),
            _ => Err(ParseEnumError::new("GPU type", s)),
        }
    }
}

string_enum!(GpuType);

/// Whether a workload receives whole GPUs or a partitioned slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SharingMode {
    #[default]
    Full,
    Fractional,
}

impl SharingMode {
    pub const ALL: [SharingMode; 2] = [SharingMode::Full, SharingMode::Fractional];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SharingMode::Full => "full",
            SharingMode::Fractional => "fractional",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            SharingMode::Full => "Full GPU",
            SharingMode::Fractional => "Fractional (MIG)",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            SharingMode::Full => "Dedicated GPU access",
            SharingMode::Fractional => "Shared GPU slice",
        }
    }
}

impl FromStr for SharingMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(SharingMode::Full),
            "fractional" | "mig" => Ok(SharingMode::Fractional),
            _ => Err(ParseEnumError::new("sharing mode", s)),
        }
    }
}

string_enum!(SharingMode);

/// A concrete GPU allocation, either estimated or echoed from manual input.
///
/// The device count is never below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuAllocation {
    gpu_type: GpuType,
    #[serde(deserialize_with = "lenient::gpu_count")]
    gpu_count: u32,
    #[serde(default)]
    sharing_mode: SharingMode,
}

impl GpuAllocation {
    /// Create an allocation, raising a zero count to one.
    pub fn new(gpu_type: GpuType, gpu_count: u32, sharing_mode: SharingMode) -> Self {
        Self {
            gpu_type,
            gpu_count: gpu_count.max(1),
            sharing_mode,
        }
    }

    pub const fn gpu_type(&self) -> GpuType {
        self.gpu_type
    }

    pub const fn gpu_count(&self) -> u32 {
        self.gpu_count
    }

    pub const fn sharing_mode(&self) -> SharingMode {
        self.sharing_mode
    }
}

impl fmt::Display for GpuAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x {} ({})",
            self.gpu_count, self.gpu_type, self.sharing_mode
        )
    }
}
