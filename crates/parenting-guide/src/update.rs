/// Update service for the guidance library.
///
/// Fetches the source table, fingerprints the body, and parses it into a
/// [`Library`]. Swapping the result into the store is the store's job.
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::AppError;
use crate::model::Library;
use crate::parser;
use mcp_common::http::SourceClient;

pub struct UpdateService {
    client: SourceClient,
}

impl UpdateService {
    pub fn new(client: SourceClient) -> Self {
        Self { client }
    }

    /// Fetch and parse the full library. Never touches shared state.
    pub async fn fetch_library(&self) -> Result<Library, AppError> {
        let body = self.client.fetch_text().await?;
        let fingerprint = fingerprint(&body);
        let entries = parser::parse_library(&body)?;

        let short = &fingerprint[..12];
        info!(
            url = %self.client.config().url,
            entries = entries.len(),
            fingerprint = short,
            "library fetched"
        );

        Ok(Library {
            entries,
            fingerprint: Some(fingerprint),
            loaded_at_ms: Some(now_ms()),
        })
    }
}

/// Hex SHA-256 of the raw response body.
pub fn fingerprint(body: &str) -> String {
    let hash = Sha256::digest(body.as_bytes());
    format!("{:x}", hash)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_millis() as u64
}
