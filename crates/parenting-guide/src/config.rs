use std::time::Duration;

use mcp_common::http::SourceClientConfig;

use crate::error::AppError;

pub const DEFAULT_RESULT_LIMIT: usize = 3;
const MAX_RESULT_LIMIT: usize = 3;
const DEFAULT_MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Application configuration loaded explicitly from environment variables.
///
/// The library URL has no default; everything else does.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the JSON endpoint serving the guidance table.
    pub library_url: String,
    /// Per-request deadline for the library fetch. `None` means no deadline.
    pub fetch_timeout: Option<Duration>,
    pub max_error_body_bytes: usize,
    /// Number of ranked entries returned per query (1..=3).
    pub result_limit: usize,
    /// Whether to fetch the library once at startup.
    pub preload: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GUIDE_LIBRARY_URL`: http(s) URL of the guidance table
    ///
    /// Optional:
    /// - `GUIDE_FETCH_TIMEOUT_SECS`: fetch deadline (unset = none)
    /// - `GUIDE_MAX_ERROR_BODY_BYTES` (default: 8192)
    /// - `GUIDE_RESULT_LIMIT` (default: 3, clamped to 1..=3)
    /// - `GUIDE_PRELOAD` (default: true)
    pub fn from_env() -> Result<Self, AppError> {
        let library_url = std::env::var("GUIDE_LIBRARY_URL").map_err(|_| {
            AppError::Config("GUIDE_LIBRARY_URL environment variable is required".to_string())
        })?;
        Self::from_parts(
            library_url,
            std::env::var("GUIDE_FETCH_TIMEOUT_SECS").ok().as_deref(),
            std::env::var("GUIDE_MAX_ERROR_BODY_BYTES").ok().as_deref(),
            std::env::var("GUIDE_RESULT_LIMIT").ok().as_deref(),
            std::env::var("GUIDE_PRELOAD").ok().as_deref(),
        )
    }

    fn from_parts(
        library_url: String,
        fetch_timeout: Option<&str>,
        max_error_body_bytes: Option<&str>,
        result_limit: Option<&str>,
        preload: Option<&str>,
    ) -> Result<Self, AppError> {
        let library_url = library_url.trim().to_string();
        if !(library_url.starts_with("http://") || library_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "GUIDE_LIBRARY_URL must be an http(s) URL, got '{library_url}'"
            )));
        }

        let fetch_timeout = fetch_timeout
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    AppError::Config(format!("GUIDE_FETCH_TIMEOUT_SECS is not a number: '{raw}'"))
                })
            })
            .transpose()?;

        let max_error_body_bytes = max_error_body_bytes
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_ERROR_BODY_BYTES);

        let result_limit = result_limit
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_RESULT_LIMIT)
            .clamp(1, MAX_RESULT_LIMIT);

        let preload = match preload.map(|s| s.trim().to_ascii_lowercase()) {
            None => true,
            Some(v) => !matches!(v.as_str(), "0" | "false" | "no" | "off"),
        };

        Ok(Self {
            library_url,
            fetch_timeout,
            max_error_body_bytes,
            result_limit,
            preload,
        })
    }

    pub fn source_client_config(&self) -> SourceClientConfig {
        SourceClientConfig {
            url: self.library_url.clone(),
            timeout: self.fetch_timeout,
            max_error_body_bytes: self.max_error_body_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://script.example.com/exec";

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = Config::from_parts(URL.to_string(), None, None, None, None).unwrap();
        assert_eq!(config.library_url, URL);
        assert_eq!(config.fetch_timeout, None);
        assert_eq!(config.max_error_body_bytes, 8 * 1024);
        assert_eq!(config.result_limit, 3);
        assert!(config.preload);
    }

    #[test]
    fn result_limit_is_clamped() {
        let high = Config::from_parts(URL.to_string(), None, None, Some("10"), None).unwrap();
        assert_eq!(high.result_limit, 3);
        let low = Config::from_parts(URL.to_string(), None, None, Some("0"), None).unwrap();
        assert_eq!(low.result_limit, 1);
        let one = Config::from_parts(URL.to_string(), None, None, Some("1"), None).unwrap();
        assert_eq!(one.result_limit, 1);
    }

    #[test]
    fn rejects_non_http_url() {
        let err = Config::from_parts("file:///tmp/lib.json".to_string(), None, None, None, None)
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn parses_timeout_and_preload_flag() {
        let config =
            Config::from_parts(URL.to_string(), Some("15"), Some("128"), None, Some("off")).unwrap();
        assert_eq!(config.fetch_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.max_error_body_bytes, 128);
        assert!(!config.preload);
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_parts(URL.to_string(), Some("soon"), None, None, None).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
