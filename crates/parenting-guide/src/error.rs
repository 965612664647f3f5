use mcp_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("invalid library JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unsupported library payload: {0}")]
    UnsupportedPayload(String),

    #[error("library load failed: {0}")]
    LoadFailed(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("query must not be empty")]
    EmptyQuery,
}
