//! HTTP client wrapper for talking to the upstream job API.
//!
//! One request per call, bounded by the configured timeout. No retries.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

use crate::config::HarvesterConfig;
use crate::error::{HarvesterError, Result};

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` with the configured timeout and every
/// configured header installed as a default header.
pub fn create_client(config: &HarvesterConfig) -> Result<Client> {
    let headers = build_headers(&config.headers)?;
    let client = Client::builder()
        .timeout(config.timeout)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Convert `(name, value)` pairs into a header map. Later pairs replace
/// earlier ones with the same name.
pub fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HarvesterError::InvalidHeader(format!("{name}: {value}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| HarvesterError::InvalidHeader(format!("{name}: {value}")))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Download the body of `url` with a single GET request.
///
/// Anything other than `200 OK` is reported as
/// [`HarvesterError::UnexpectedStatus`].
pub fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().map_err(|e| {
        if e.is_timeout() {
            tracing::error!(url, error = %e, "Request timed out");
        } else {
            tracing::error!(url, error = %e, "Request failed");
        }
        HarvesterError::Http(e)
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::error!(
            url,
            status = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("unknown"),
            "Unexpected response status"
        );
        return Err(HarvesterError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response.bytes()?;
    Ok(bytes.to_vec())
}
