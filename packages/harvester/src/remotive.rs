//! Remotive API client.
//!
//! The endpoint returns an envelope of the form
//! `{"0-legal-notice": "...", "job-count": N, "jobs": [...]}`. Only the `jobs`
//! array is used; the legal notice tells a valid empty answer apart from a
//! malformed one.

use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use crate::config::{HarvesterConfig, LEGAL_NOTICE_KEY};
use crate::error::{HarvesterError, Result};
use crate::http::download_bytes;
use crate::types::JobQuery;

/// Build the request URL for `query`.
///
/// Absent parameters are omitted; with no parameters the base URL is returned
/// unchanged.
///
/// # Examples
/// ```
/// use remoteboard_harvester::remotive::jobs_url;
/// use remoteboard_harvester::JobQuery;
///
/// let base = "https://remotive.com/api/remote-jobs";
/// assert_eq!(jobs_url(base, &JobQuery::new()).unwrap(), base);
/// assert_eq!(
///     jobs_url(base, &JobQuery::new().category("software-dev").limit(5)).unwrap(),
///     "https://remotive.com/api/remote-jobs?category=software-dev&limit=5"
/// );
/// ```
pub fn jobs_url(base_url: &str, query: &JobQuery) -> Result<String> {
    let params = query.params();
    if params.is_empty() {
        return Ok(base_url.to_string());
    }

    let mut url =
        Url::parse(base_url).map_err(|_| HarvesterError::InvalidUrl(base_url.to_string()))?;
    url.query_pairs_mut().extend_pairs(params);
    Ok(url.into())
}

/// Extract the raw job records from a response body.
///
/// # Returns
/// * the `jobs` array when present
/// * an empty vector when `jobs` is absent but the legal notice is present
/// * `Err` for invalid JSON, a non-object body, a non-array `jobs`, or a body
///   with neither key
pub fn parse_jobs_response(body: &[u8]) -> Result<Vec<Value>> {
    let payload: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to decode JSON response");
        HarvesterError::Json(e)
    })?;

    let Value::Object(mut envelope) = payload else {
        return Err(HarvesterError::InvalidResponse(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    match envelope.remove("jobs") {
        Some(Value::Array(jobs)) => Ok(jobs),
        Some(other) => Err(HarvesterError::InvalidResponse(format!(
            "'jobs' is not an array (found {})",
            json_kind(&other)
        ))),
        None if envelope.contains_key(LEGAL_NOTICE_KEY) => {
            tracing::warn!("'jobs' key not found in API response, treating as zero matches");
            Ok(Vec::new())
        }
        None => Err(HarvesterError::InvalidResponse(
            "'jobs' key not found in API response".to_string(),
        )),
    }
}

/// Fetch raw job records from the API.
///
/// # Arguments
/// * `client` - HTTP client to use (see [`crate::http::create_client`])
/// * `config` - Supplies the base URL
/// * `query` - Optional category, search term and limit
pub fn fetch_raw_jobs(
    client: &Client,
    config: &HarvesterConfig,
    query: &JobQuery,
) -> Result<Vec<Value>> {
    let url = jobs_url(&config.api_url, query)?;
    tracing::info!(%url, "Fetching jobs");

    let body = download_bytes(client, &url)?;
    let jobs = parse_jobs_response(&body)?;

    tracing::info!(count = jobs.len(), "Fetched raw job listings");
    Ok(jobs)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
