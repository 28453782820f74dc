//! Update driver: fetch, normalize and store in one batch run.

use std::fs;
use std::path::PathBuf;

use crate::config::HarvesterConfig;
use crate::error::Result;
use crate::http::create_client;
use crate::normalize::normalize_jobs;
use crate::remotive::fetch_raw_jobs;
use crate::store::save_jobs;
use crate::types::JobQuery;

/// Outcome of a successful update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Raw records returned by the API.
    pub fetched: usize,

    /// Listings written to the store.
    pub saved: usize,

    /// Records dropped during normalization, one message each.
    pub warnings: Vec<String>,

    /// Store file that was written.
    pub path: PathBuf,
}

impl UpdateSummary {
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.warnings.len()
    }
}

/// Fetch the latest jobs and replace the store with them.
///
/// A failed fetch returns the error before the store is touched, so the last
/// good snapshot survives. A successful fetch with zero jobs still replaces
/// the store, leaving an empty array.
///
/// # Arguments
/// * `config` - API URL, headers, timeout and store path
/// * `query` - Optional category, search term and limit
pub fn run_update(config: &HarvesterConfig, query: &JobQuery) -> Result<UpdateSummary> {
    tracing::info!(
        category = query.category.as_deref().unwrap_or("-"),
        search = query.search.as_deref().unwrap_or("-"),
        limit = query.limit,
        "Starting job update"
    );

    if let Some(dir) = config.store_dir() {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                tracing::error!(dir = %dir.display(), error = %e, "Could not create data directory");
                e
            })?;
            tracing::info!(dir = %dir.display(), "Created data directory");
        }
    }

    let client = create_client(config)?;

    let raw_jobs = fetch_raw_jobs(&client, config, query).map_err(|e| {
        tracing::error!(
            error = %e,
            "Failed to fetch jobs; the existing job data file will not be modified"
        );
        e
    })?;

    let normalized = normalize_jobs(&raw_jobs);
    if raw_jobs.is_empty() {
        tracing::info!("API returned no jobs; the job data file will be replaced with an empty list");
    }

    save_jobs(&normalized.listings, &config.store_path).map_err(|e| {
        tracing::error!(
            path = %config.store_path.display(),
            error = %e,
            "Failed to save jobs"
        );
        e
    })?;

    let summary = UpdateSummary {
        fetched: raw_jobs.len(),
        saved: normalized.listings.len(),
        warnings: normalized.warnings,
        path: config.store_path.clone(),
    };

    tracing::info!(
        fetched = summary.fetched,
        saved = summary.saved,
        skipped = summary.skipped(),
        "Job update completed"
    );
    Ok(summary)
}
