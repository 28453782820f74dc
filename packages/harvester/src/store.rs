//! Flat-file JSON store for job listings.
//!
//! The store holds exactly one snapshot: every save replaces the whole file.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::Result;
use crate::normalize::{lenient_text, record_label, ListingFields};
use crate::types::{JobListing, Normalized};

/// On-disk representation of a listing.
#[derive(Debug, Serialize, Deserialize)]
struct StoredJob {
    id: i64,
    title: String,
    company_name: String,
    remotive_url: String,
    category: String,
    publication_date: String,
    description_html: String,
    #[serde(default, deserialize_with = "lenient_text")]
    candidate_required_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    salary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    job_type: Option<String>,
}

impl From<&JobListing> for StoredJob {
    fn from(listing: &JobListing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            company_name: listing.company_name.clone(),
            remotive_url: listing.source_url.clone(),
            category: listing.category.clone(),
            publication_date: listing.publication_date.to_rfc3339(),
            description_html: listing.description_html.clone(),
            candidate_required_location: listing.location.clone(),
            salary: listing.salary.clone(),
            job_type: listing.job_type.clone(),
        }
    }
}

impl From<StoredJob> for ListingFields {
    fn from(stored: StoredJob) -> Self {
        Self {
            id: stored.id,
            title: stored.title,
            company_name: stored.company_name,
            category: stored.category,
            source_url: stored.remotive_url,
            publication_date: stored.publication_date,
            description_html: stored.description_html,
            location: stored.candidate_required_location,
            salary: stored.salary,
            job_type: stored.job_type,
        }
    }
}

/// What was found at the store path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// No file at the store path.
    Missing,

    /// The file exists but could not be read or is not a JSON array.
    Unreadable(String),

    /// The file parsed; invalid elements were dropped.
    Loaded(Normalized),
}

impl Snapshot {
    /// Whether a store file exists, readable or not.
    #[must_use]
    pub fn exists(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    /// The loaded listings, or an empty vector for a missing or unreadable
    /// store.
    #[must_use]
    pub fn into_listings(self) -> Vec<JobListing> {
        match self {
            Self::Loaded(normalized) => normalized.listings,
            Self::Missing | Self::Unreadable(_) => Vec::new(),
        }
    }
}

/// Render listings as the store's JSON document (4-space indented array).
pub fn to_store_json(listings: &[JobListing]) -> Result<Vec<u8>> {
    let stored: Vec<StoredJob> = listings.iter().map(StoredJob::from).collect();

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    stored.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Save listings to `path`, replacing any previous content.
///
/// Writes to a temp file in the same directory, syncs it, then renames it over
/// the target. Missing parent directories are created.
pub fn save_jobs(listings: &[JobListing], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let content = to_store_json(listings)?;
    let temp_file = temp_path(path);

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(&content)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        let _ = fs::remove_file(&temp_file);
        return Err(e.into());
    }

    tracing::info!(count = listings.len(), path = %path.display(), "Saved jobs");
    Ok(())
}

/// Read the store at `path`, reporting why nothing was loaded if so.
pub fn load_snapshot(path: &Path) -> Snapshot {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Job store not found");
            return Snapshot::Missing;
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read job store");
            return Snapshot::Unreadable(e.to_string());
        }
    };

    let document: Value = match serde_json::from_slice(&bytes) {
        Ok(document) => document,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Job store is not valid JSON");
            return Snapshot::Unreadable(format!("invalid JSON: {e}"));
        }
    };

    let Value::Array(records) = document else {
        tracing::warn!(path = %path.display(), "Job store does not contain a list");
        return Snapshot::Unreadable("top-level value is not an array".to_string());
    };

    let mut normalized = Normalized::default();
    for record in &records {
        let parsed = StoredJob::deserialize(record)
            .map_err(|e| e.to_string())
            .and_then(|stored| ListingFields::from(stored).into_listing());

        match parsed {
            Ok(listing) => normalized.listings.push(listing),
            Err(reason) => {
                let label = record_label(record);
                tracing::warn!(id = %label, %reason, "Skipping stored job");
                normalized.warnings.push(format!("Job {label}: {reason}"));
            }
        }
    }

    tracing::info!(
        count = normalized.listings.len(),
        skipped = normalized.skipped(),
        path = %path.display(),
        "Loaded jobs"
    );
    Snapshot::Loaded(normalized)
}

/// Load listings from `path`.
///
/// Never fails: a missing, unreadable or malformed store yields an empty
/// vector. Use [`load_snapshot`] to tell those cases apart.
pub fn load_jobs(path: &Path) -> Vec<JobListing> {
    load_snapshot(path).into_listings()
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jobs.json".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
