use thiserror::Error;
use tinkerdb_core::config::ConfigError;
use tinkerdb_core::logging::LoggingError;
use tinkerdb_core::metrics::MetricsError;
use tinkerdb_core::StoreError;
use tonic::Status;

/// API-level errors.
///
/// The key-value RPCs report empty identifiers in the response body rather
/// than through this type; only the admin service and server startup use it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Reflection setup failed: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),

    #[error("Failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

impl From<ApiError> for Status {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput(e) => Status::invalid_argument(e.to_string()),
            other => Status::internal(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
