//! Host resources reserved alongside a GPU allocation.

use api_types::GpuAllocation;
use serde::Serialize;

/// Memory headroom over raw GPU memory, as a percentage.
const MEMORY_HEADROOM_PERCENT: u64 = 120;
const CPU_CORES_PER_GPU: u32 = 8;
const MAX_CPU_CORES: u32 = 64;

/// Memory and CPU requested for the workload container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReservation {
    pub memory_gb: u64,
    pub cpu_cores: u32,
}

impl ResourceReservation {
    pub fn for_allocation(allocation: &GpuAllocation) -> Self {
        Self {
            memory_gb: memory_reservation_gb(allocation),
            cpu_cores: cpu_reservation(allocation),
        }
    }
}

/// `ceil(gpu_memory * count * 1.2)`, computed in integers so that exact
/// products are not rounded up by floating point error.
pub fn memory_reservation_gb(allocation: &GpuAllocation) -> u64 {
    let raw_gb = u64::from(allocation.gpu_type().memory_gb()) * u64::from(allocation.gpu_count());
    (raw_gb * MEMORY_HEADROOM_PERCENT).div_ceil(100)
}

/// Eight cores per GPU, capped at 64.
pub fn cpu_reservation(allocation: &GpuAllocation) -> u32 {
    allocation
        .gpu_count()
        .saturating_mul(CPU_CORES_PER_GPU)
        .min(MAX_CPU_CORES)
}

#[cfg(test)]
mod tests {
    use api_types::GpuType;
    use api_types::SharingMode;
    use similar_asserts::assert_eq;

    use super::*;

    fn allocation(gpu_type: GpuType, count: u32) -> GpuAllocation {
        GpuAllocation::new(gpu_type, count, SharingMode::Full)
    }

    #[test]
    fn two_a100() {
        let reservation = ResourceReservation::for_allocation(&allocation(GpuType::A100, 2));
        assert_eq!(
            reservation,
            ResourceReservation {
                memory_gb: 96,
                cpu_cores: 16,
            }
        );
    }

    #[test]
    fn memory_rounds_up_fractional_headroom() {
        // 16 * 1.2 = 19.2
        assert_eq!(memory_reservation_gb(&allocation(GpuType::T4, 1)), 20);
        // 24 * 3 * 1.2 = 86.4
        assert_eq!(memory_reservation_gb(&allocation(GpuType::A10, 3)), 87);
        // 48 * 1.2 = 57.6
        assert_eq!(memory_reservation_gb(&allocation(GpuType::L40S, 1)), 58);
    }

    #[test]
    fn memory_uses_physical_capacity() {
        assert_eq!(memory_reservation_gb(&allocation(GpuType::H100, 8)), 768);
        assert_eq!(memory_reservation_gb(&allocation(GpuType::V100, 5)), 192);
    }

    #[test]
    fn cpu_is_capped() {
        assert_eq!(cpu_reservation(&allocation(GpuType::H100, 1)), 8);
        assert_eq!(cpu_reservation(&allocation(GpuType::H100, 8)), 64);
        assert_eq!(cpu_reservation(&allocation(GpuType::H100, 11)), 64);
        assert_eq!(cpu_reservation(&allocation(GpuType::H100, u32::MAX)), 64);
    }
}
