//! Command-line and HTTP front-ends for GPU sizing and manifest synthesis.

pub mod api;
pub mod cmd;
pub mod config;
pub mod request;
