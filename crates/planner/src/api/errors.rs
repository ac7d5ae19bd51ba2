use core::error::Error;

/// API errors
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    #[display("Failed to bind {listen_addr}")]
    BindFailed { listen_addr: String },
    #[display("Server error: {message}")]
    ServerError { message: String },
}

impl Error for ApiError {}
