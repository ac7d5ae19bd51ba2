//! Command layer - Entry points for the planner subcommands

pub mod catalog;
pub mod plan;
pub mod serve;

pub use catalog::run_catalog;
pub use plan::run_estimate;
pub use plan::run_manifest;
pub use plan::run_plan;
pub use serve::run_serve;
