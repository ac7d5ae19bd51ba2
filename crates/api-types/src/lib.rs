//! Shared API type definitions
//!
//! This crate contains the data model shared by the sizing core and the planner
//! front-ends: the caller-supplied [`DeploymentRequest`], the resolved
//! [`GpuAllocation`], and the small enums (GPU tiers, sharing modes, priority
//! classes) that both sides agree on.

/// Implements `Display`, `Serialize` and `Deserialize` for an enum in terms of
/// its `as_str` and `FromStr` implementations.
macro_rules! string_enum {
    ($ty:ident) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                value.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

mod gpu;
mod lenient;
mod request;

pub use gpu::GpuAllocation;
pub use gpu::GpuType;
pub use gpu::SharingMode;
pub use request::DeploymentMode;
pub use request::DeploymentRequest;
pub use request::ModelParams;
pub use request::PriorityClass;
pub use request::MAX_MANUAL_GPU_COUNT;

/// Data centers offered for manual placement.
pub const DATA_CENTERS: [&str; 4] = ["us-east-1", "us-west-2", "eu-central-1", "ap-south-1"];

/// Error returned when a string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: `{value}`")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
