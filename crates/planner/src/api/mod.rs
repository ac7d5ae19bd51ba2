//! HTTP adapter over the sizing core
//!
//! # API Endpoints
//!
//! - `POST /v1/estimate` - GPU allocation and memory breakdown for a request
//! - `POST /v1/manifest` - Deployment and Service manifest, as YAML text
//! - `POST /v1/plan` - Full deployment plan
//! - `GET /v1/catalog` - Choices a request may name
//! - `GET /healthz` - Liveness check
//!
//! Every `POST` endpoint takes a deployment request as its JSON body. Field
//! values are read leniently, the same way request files are. The manifest
//! endpoint also accepts an `allocation` object that is rendered as given.

pub mod errors;
pub mod handlers;
pub mod server;
pub mod types;

pub use errors::ApiError;
pub use server::routes;
pub use server::ApiServer;
pub use types::Catalog;
pub use types::EstimateResponse;
pub use types::ManifestInput;
