/// Error types shared across MCP server crates.
///
/// These errors represent failures talking to the upstream data source. Application-specific
/// errors should be defined in each server crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned error: status={status} body={body}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}
