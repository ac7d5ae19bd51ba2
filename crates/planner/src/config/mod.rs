pub mod cli;
pub mod plan;
pub mod serve;

pub use cli::Cli;
pub use cli::Commands;
pub use plan::CatalogArgs;
pub use plan::OutputFormat;
pub use plan::PlanArgs;
pub use serve::ServeArgs;
