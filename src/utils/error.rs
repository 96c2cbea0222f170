use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The controller was asked to seed its state a second time
    #[error("Telemetry controller is already initialized")]
    AlreadyInitialized,

    /// Traffic lookback window outside the supported range
    #[error("Traffic window of {0} minutes exceeds the maximum of {1} minutes")]
    InvalidWindow(u32, u32),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dashboard service task is no longer running
    #[error("Dashboard service has stopped")]
    ServiceStopped,

    /// Error from JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for application
pub type AppResult<T> = Result<T, AppError>;
