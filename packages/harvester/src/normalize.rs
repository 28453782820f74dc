//! Normalization of raw API records into [`JobListing`]s.
//!
//! Failures are per record: an invalid record is logged, noted in
//! [`Normalized::warnings`] and dropped. The batch as a whole never fails.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{parse_publication_date, JobListing, Normalized};

/// A record as delivered by the Remotive API.
#[derive(Debug, Deserialize)]
struct RawJob {
    id: i64,
    title: String,
    company_name: String,
    url: String,
    category: String,
    publication_date: String,
    description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    candidate_required_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    salary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    job_type: Option<String>,
}

/// Fields shared by API records and stored records, before validation.
pub(crate) struct ListingFields {
    pub id: i64,
    pub title: String,
    pub company_name: String,
    pub category: String,
    pub source_url: String,
    pub publication_date: String,
    pub description_html: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
}

impl From<RawJob> for ListingFields {
    fn from(raw: RawJob) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            company_name: raw.company_name,
            category: raw.category,
            source_url: raw.url,
            publication_date: raw.publication_date,
            description_html: raw.description,
            location: raw.candidate_required_location,
            salary: raw.salary,
            job_type: raw.job_type,
        }
    }
}

impl ListingFields {
    /// Check the text fields and parse the publication date.
    ///
    /// Returns the reason for rejection on failure.
    pub(crate) fn into_listing(self) -> std::result::Result<JobListing, String> {
        for (name, value) in [
            ("title", &self.title),
            ("company_name", &self.company_name),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(format!("empty required field '{name}'"));
            }
        }

        let publication_date = parse_publication_date(&self.publication_date).ok_or_else(|| {
            format!(
                "unparseable publication_date '{}'",
                self.publication_date
            )
        })?;

        Ok(JobListing {
            id: self.id,
            title: self.title,
            company_name: self.company_name,
            category: self.category,
            source_url: self.source_url,
            publication_date,
            description_html: self.description_html,
            location: self.location,
            salary: self.salary,
            job_type: self.job_type,
        })
    }
}

/// Accept a string, `null`, or a scalar for an optional text field.
///
/// Scalars are kept in their JSON text form; arrays and objects count as
/// absent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Best-effort identifier of a raw record for log messages.
pub(crate) fn record_label(record: &Value) -> String {
    match record.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => "Unknown ID".to_string(),
    }
}

/// Normalize a single raw API record.
pub fn normalize_job(record: &Value) -> std::result::Result<JobListing, String> {
    let raw = RawJob::deserialize(record).map_err(|e| e.to_string())?;
    ListingFields::from(raw).into_listing()
}

/// Normalize raw API records, dropping invalid ones.
///
/// Output order matches input order minus skipped records.
///
/// # Examples
/// ```
/// use remoteboard_harvester::normalize::normalize_jobs;
/// use serde_json::json;
///
/// let raw = vec![
///     json!({
///         "id": 1, "title": "Good Job", "company_name": "Company A",
///         "url": "http://example.com/1", "category": "dev",
///         "publication_date": "2023-01-01T12:00:00", "description": "<p>Desc</p>"
///     }),
///     json!({"id": 2, "title": "Job missing URL"}),
/// ];
/// let normalized = normalize_jobs(&raw);
/// assert_eq!(normalized.listings.len(), 1);
/// assert_eq!(normalized.skipped(), 1);
/// ```
pub fn normalize_jobs(records: &[Value]) -> Normalized {
    let mut normalized = Normalized::default();

    for record in records {
        match normalize_job(record) {
            Ok(listing) => normalized.listings.push(listing),
            Err(reason) => {
                let label = record_label(record);
                tracing::warn!(id = %label, %reason, "Skipping job");
                normalized
                    .warnings
                    .push(format!("Job {label}: {reason}"));
            }
        }
    }

    tracing::debug!(
        kept = normalized.listings.len(),
        skipped = normalized.skipped(),
        "Normalized job listings"
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn valid_record(id: i64) -> Value {
        json!({
            "id": id,
            "url": format!("https://remotive.com/remote-jobs/software-dev/job-{id}"),
            "title": "Senior Rust Engineer",
            "company_name": "Ferrous Systems",
            "company_logo": "https://remotive.com/job/1/logo",
            "category": "Software Development",
            "tags": ["rust", "tokio"],
            "job_type": "full_time",
            "publication_date": "2023-10-26T10:00:00",
            "candidate_required_location": "Europe",
            "salary": "$100000 - $140000",
            "description": "<p>Build things.</p>"
        })
    }

    #[test]
    fn test_normalize_valid_record() {
        let listing = normalize_job(&valid_record(7)).unwrap();

        assert_eq!(listing.id, 7);
        assert_eq!(listing.title, "Senior Rust Engineer");
        assert_eq!(
            listing.source_url,
            "https://remotive.com/remote-jobs/software-dev/job-7"
        );
        assert_eq!(listing.description_html, "<p>Build things.</p>");
        assert_eq!(listing.location.as_deref(), Some("Europe"));
        assert_eq!(listing.salary.as_deref(), Some("$100000 - $140000"));
        assert_eq!(listing.job_type.as_deref(), Some("full_time"));
        assert_eq!(
            listing.publication_date.to_rfc3339(),
            "2023-10-26T10:00:00+00:00"
        );
    }

    #[test]
    fn test_each_required_field_is_required() {
        for key in [
            "id",
            "title",
            "company_name",
            "url",
            "category",
            "publication_date",
            "description",
        ] {
            let mut record = valid_record(1);
            record.as_object_mut().unwrap().remove(key);
            let err = normalize_job(&record).unwrap_err();
            assert!(err.contains(key), "error for missing {key}: {err}");
        }
    }

    #[test]
    fn test_optional_fields_default_to_absent() {
        let mut record = valid_record(1);
        let obj = record.as_object_mut().unwrap();
        obj.remove("candidate_required_location");
        obj.remove("job_type");
        obj.insert("salary".to_string(), Value::Null);

        let listing = normalize_job(&record).unwrap();
        assert_eq!(listing.location, None);
        assert_eq!(listing.salary, None);
        assert_eq!(listing.job_type, None);
    }

    #[test]
    fn test_numeric_salary_is_kept_as_text() {
        let mut record = valid_record(1);
        record["salary"] = json!(85000);
        let listing = normalize_job(&record).unwrap();
        assert_eq!(listing.salary.as_deref(), Some("85000"));
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let mut record = valid_record(1);
        record["title"] = json!("   ");
        assert!(normalize_job(&record).unwrap_err().contains("title"));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let mut record = valid_record(3);
        record["publication_date"] = json!("invalid-date-format");
        let err = normalize_job(&record).unwrap_err();
        assert!(err.contains("invalid-date-format"));
    }

    #[test]
    fn test_zulu_date_is_accepted() {
        let mut record = valid_record(3);
        record["publication_date"] = json!("2023-10-26T10:00:00Z");
        let listing = normalize_job(&record).unwrap();
        assert_eq!(listing.publication_date.timestamp(), 1_698_314_400);
    }

    #[test]
    fn test_normalize_jobs_keeps_order_and_counts_drops() {
        let mut bad_date = valid_record(3);
        bad_date["publication_date"] = json!("invalid-date-format");
        let mut missing_title = valid_record(4);
        missing_title.as_object_mut().unwrap().remove("title");

        let records = vec![
            valid_record(1),
            json!({"id": 2, "title": "Job missing URL"}),
            bad_date,
            missing_title,
            valid_record(5),
            json!("not even an object"),
        ];

        let normalized = normalize_jobs(&records);
        let ids: Vec<i64> = normalized.listings.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(normalized.skipped(), 4);
        assert!(normalized.warnings[0].starts_with("Job 2:"));
        assert!(normalized.warnings[3].starts_with("Job Unknown ID:"));
    }

    #[test]
    fn test_normalize_empty_input() {
        let normalized = normalize_jobs(&[]);
        assert!(normalized.listings.is_empty());
        assert!(normalized.warnings.is_empty());
    }
}
