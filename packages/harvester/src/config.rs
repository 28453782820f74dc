//! Configuration constants and the runtime configuration for the harvester.
//!
//! [`HarvesterConfig`] is the single owner of the store path: the update
//! driver, the `render` command and the HTTP server all read it from here.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{HarvesterError, Result};

/// Remotive remote-jobs endpoint.
pub const REMOTIVE_API_URL: &str = "https://remotive.com/api/remote-jobs";

/// HTTP timeout in seconds for the single upstream request.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Default location of the job store, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "data/remotive_jobs.json";

/// Default listen address for the `serve` command.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Browser-like user agent.
///
/// Remotive has been observed to reject requests carrying the default
/// identifiers of HTTP libraries.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.45 Safari/537.36";

/// Top-level key present in every well-formed Remotive response.
pub const LEGAL_NOTICE_KEY: &str = "0-legal-notice";

/// `Name: value` header argument.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([!#$%&'*+.^_`|~0-9A-Za-z-]+)\s*:\s*(.*)$").expect("valid regex"));

/// Runtime configuration shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvesterConfig {
    /// Base URL of the remote-jobs endpoint.
    pub api_url: String,

    /// Path of the JSON job store.
    pub store_path: PathBuf,

    /// Request timeout for the upstream fetch.
    pub timeout: Duration,

    /// Request headers, in sending order. Later entries win on name clashes.
    pub headers: Vec<(String, String)>,

    /// Listen address for the `serve` command.
    pub bind_addr: SocketAddr,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            api_url: REMOTIVE_API_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            headers: default_headers(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

impl HarvesterConfig {
    /// Build a configuration from the environment, falling back to defaults.
    ///
    /// Recognised variables: `REMOTIVE_API_URL`, `JOBS_STORE_PATH`,
    /// `JOBS_HTTP_TIMEOUT_SECS` and `JOBS_BIND_ADDR`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("REMOTIVE_API_URL") {
            config = config.with_api_url(url);
        }

        if let Ok(path) = std::env::var("JOBS_STORE_PATH") {
            config = config.with_store_path(path);
        }

        if let Ok(secs) = std::env::var("JOBS_HTTP_TIMEOUT_SECS") {
            config = config.with_timeout(parse_timeout_secs(&secs)?);
        }

        if let Ok(addr) = std::env::var("JOBS_BIND_ADDR") {
            config = config.with_bind_addr(&addr)?;
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_store_path(mut self, store_path: impl Into<PathBuf>) -> Self {
        self.store_path = store_path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bind_addr(mut self, addr: &str) -> Result<Self> {
        self.bind_addr = addr
            .parse()
            .map_err(|_| HarvesterError::Config(format!("invalid bind address: {addr}")))?;
        Ok(self)
    }

    /// Add or replace a request header. Names compare case-insensitively.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Directory holding the store file, if the path has one.
    pub fn store_dir(&self) -> Option<&Path> {
        self.store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Headers sent with every upstream request unless overridden.
pub fn default_headers() -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_string(), BROWSER_USER_AGENT.to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]
}

/// Parse a timeout given in whole seconds. Zero is rejected.
pub fn parse_timeout_secs(value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(HarvesterError::Config(format!(
            "invalid timeout: {value} (expected a positive number of seconds)"
        ))),
    }
}

/// Parse a `Name: value` header argument.
///
/// # Examples
/// ```
/// use remoteboard_harvester::config::parse_header_arg;
///
/// let (name, value) = parse_header_arg("Accept-Language: en-US").unwrap();
/// assert_eq!(name, "Accept-Language");
/// assert_eq!(value, "en-US");
/// assert!(parse_header_arg("no colon here").is_err());
/// ```
pub fn parse_header_arg(arg: &str) -> Result<(String, String)> {
    let caps = HEADER_PATTERN
        .captures(arg.trim())
        .ok_or_else(|| HarvesterError::InvalidHeader(arg.to_string()))?;
    Ok((caps[1].to_string(), caps[2].trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarvesterConfig::default();
        assert_eq!(config.api_url, REMOTIVE_API_URL);
        assert_eq!(config.store_path, PathBuf::from("data/remotive_jobs.json"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(config
            .headers
            .iter()
            .any(|(n, v)| n == "User-Agent" && v.starts_with("Mozilla/5.0")));
    }

    #[test]
    fn test_with_header_replaces_case_insensitively() {
        let config = HarvesterConfig::default().with_header("user-agent", "curl/8.0");

        let agents: Vec<_> = config
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case("user-agent"))
            .collect();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].1, "curl/8.0");
        assert!(config.headers.iter().any(|(n, _)| n == "Accept"));
    }

    #[test]
    fn test_with_bind_addr_invalid() {
        assert!(HarvesterConfig::default().with_bind_addr("not-an-addr").is_err());
        assert!(HarvesterConfig::default()
            .with_bind_addr("0.0.0.0:9000")
            .is_ok());
    }

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_timeout_secs(" 5 ").unwrap(), Duration::from_secs(5));
        assert!(matches!(
            parse_timeout_secs("0"),
            Err(HarvesterError::Config(_))
        ));
        assert!(matches!(
            parse_timeout_secs("ten"),
            Err(HarvesterError::Config(_))
        ));
        assert!(parse_timeout_secs("-1").is_err());
    }

    #[test]
    fn test_store_dir() {
        let config = HarvesterConfig::default();
        assert_eq!(config.store_dir(), Some(Path::new("data")));

        let bare = HarvesterConfig::default().with_store_path("jobs.json");
        assert_eq!(bare.store_dir(), None);
    }

    #[test]
    fn test_parse_header_arg() {
        assert_eq!(
            parse_header_arg("X-Token:abc").unwrap(),
            ("X-Token".to_string(), "abc".to_string())
        );
        assert_eq!(
            parse_header_arg("  Accept :  text/html  ").unwrap(),
            ("Accept".to_string(), "text/html".to_string())
        );
        assert!(parse_header_arg(": value").is_err());
        assert!(parse_header_arg("Bad Name: value").is_err());
    }
}
