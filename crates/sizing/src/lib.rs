//! GPU sizing and deployment manifest synthesis.
//!
//! The crate exposes two pure, total functions:
//!
//! - [`estimate`]: map a [`DeploymentRequest`] to a [`GpuAllocation`] from the
//!   model size and workload shape.
//! - [`synthesize`]: render a request plus any allocation (estimated or
//!   manual) into a [`ManifestDocument`].
//!
//! Neither function fails. Missing or unusable input is normalized to a
//! default rather than rejected; validating requests is up to the caller.
//!
//! [`plan`] ties both together for front-ends that want the allocation,
//! reservations, endpoint and manifest in one value.
//!
//! [`DeploymentRequest`]: api_types::DeploymentRequest
//! [`GpuAllocation`]: api_types::GpuAllocation

pub mod estimator;
pub mod manifest;
pub mod plan;
pub mod resources;

pub use estimator::estimate;
pub use estimator::estimate_memory;
pub use estimator::MemoryEstimate;
pub use manifest::synthesize;
pub use manifest::ManifestDocument;
pub use plan::plan;
pub use plan::resolve_allocation;
pub use plan::DeploymentPlan;
pub use resources::ResourceReservation;
