/// Plain HTTP client for the externally hosted guidance table.
///
/// One GET per call, no retries. The body is returned as text so callers can
/// fingerprint it before parsing.
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::error::CommonError;

#[derive(Clone, Debug)]
pub struct SourceClientConfig {
    pub url: String,
    /// `None` leaves the request without a deadline.
    pub timeout: Option<Duration>,
    pub max_error_body_bytes: usize,
}

#[derive(Clone)]
pub struct SourceClient {
    config: SourceClientConfig,
    http: reqwest::Client,
}

impl SourceClient {
    pub fn new(config: SourceClientConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent("mcp-servers/parenting-guide")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &SourceClientConfig {
        &self.config
    }

    /// Fetch the source body.
    ///
    /// A `t=<millis>` parameter is appended so intermediate caches never serve a stale table.
    pub async fn fetch_text(&self) -> Result<String, CommonError> {
        let mut request = self
            .http
            .get(&self.config.url)
            .query(&[("t", cache_buster())])
            .header(reqwest::header::CACHE_CONTROL, "no-store");
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(CommonError::UpstreamStatus { status, body });
        }

        let body = resp.text().await?;
        debug!(bytes = body.len(), %status, "source fetched");
        Ok(body)
    }
}

fn cache_buster() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_millis()
        .to_string()
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}
