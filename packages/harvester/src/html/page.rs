//! Job list page rendering.

use std::collections::HashMap;

use serde::Serialize;
use tera::{Context, Tera, Value};

use super::salary::format_salary;
use crate::error::Result;
use crate::types::JobListing;

/// Template name; the `.html` suffix turns on Tera's autoescaping.
const PAGE_TEMPLATE_NAME: &str = "jobs.html";

/// Shown when the store file does not exist yet.
pub const MISSING_STORE_MESSAGE: &str =
    "Job data file not found. Please run 'remoteboard-harvester update' to populate it.";

/// Shown when the store exists but holds no listings.
pub const NO_JOBS_MESSAGE: &str =
    "No jobs found. Try running the update command or check the data file.";

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Remote Jobs</title>
    <style>
        body { font-family: sans-serif; margin: 20px; background-color: #f4f4f4; color: #333; }
        .container { max-width: 900px; margin: auto; background: white; padding: 20px; border-radius: 8px; box-shadow: 0 0 10px rgba(0,0,0,0.1); }
        h1 { text-align: center; }
        .job-card { border: 1px solid #ddd; padding: 15px; margin-bottom: 15px; border-radius: 5px; background-color: #fff; }
        .job-card h2 { margin-top: 0; color: #007bff; }
        .job-card p { margin: 5px 0; }
        .job-card .company { font-weight: bold; }
        .job-card .date { font-size: 0.9em; color: #666; }
        .job-card .source-link { display: block; margin-top: 10px; font-size: 0.9em; }
        .error-message { color: red; text-align: center; padding: 20px; background-color: #ffecec; border: 1px solid red; border-radius: 5px; }
        .empty-message { text-align: center; padding: 20px; background-color: #e9ecef; border: 1px solid #ced4da; border-radius: 5px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Job Listings</h1>
        {% if file_error %}
            <p class="error-message">{{ file_error }}</p>
        {% elif jobs %}
            {% for job in jobs %}
                <div class="job-card">
                    <h2>{{ job.title }}</h2>
                    <p><span class="company">{{ job.company_name }}</span> - <span class="category">{{ job.category }}</span>{% if job.job_type %} - <span class="job-type">{{ job.job_type }}</span>{% endif %}</p>
                    <p class="date">Published: {{ job.published }}</p>
                    {% if job.location %}
                        <p class="location">Location: {{ job.location }}</p>
                    {% endif %}
                    {% if job.salary %}
                        <p class="salary">Salary: {{ job.salary | format_salary }}</p>
                    {% endif %}
                    <details>
                        <summary>Description</summary>
                        <div class="description">{{ job.description_html | safe }}</div>
                    </details>
                    <a href="{{ job.source_url }}" target="_blank" rel="noopener" class="source-link">View on Remotive (Source)</a>
                </div>
            {% endfor %}
        {% else %}
            <p class="empty-message">{{ empty_message }}</p>
        {% endif %}
    </div>
</body>
</html>
"#;

/// Template view of one listing.
#[derive(Debug, Serialize)]
struct JobCard<'a> {
    title: &'a str,
    company_name: &'a str,
    category: &'a str,
    job_type: Option<&'a str>,
    published: String,
    location: Option<&'a str>,
    salary: Option<&'a str>,
    source_url: &'a str,
    description_html: &'a str,
}

impl<'a> From<&'a JobListing> for JobCard<'a> {
    fn from(listing: &'a JobListing) -> Self {
        Self {
            title: &listing.title,
            company_name: &listing.company_name,
            category: &listing.category,
            job_type: listing.job_type.as_deref(),
            published: listing.publication_date.format("%Y-%m-%d").to_string(),
            location: listing.location.as_deref(),
            salary: listing.salary.as_deref(),
            source_url: &listing.source_url,
            description_html: &listing.description_html,
        }
    }
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    file_error: Option<&'static str>,
    empty_message: &'static str,
    jobs: Vec<JobCard<'a>>,
}

/// Tera filter wrapping [`format_salary`].
fn format_salary_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let formatted = match value {
        Value::String(s) => format_salary(Some(s)),
        Value::Null => format_salary(None),
        other => format_salary(Some(&other.to_string())),
    };
    Ok(Value::String(formatted))
}

/// Renders the job list page. Build once and reuse.
#[derive(Clone)]
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
        tera.register_filter("format_salary", format_salary_filter);
        Ok(Self { tera })
    }

    /// Render the page.
    ///
    /// A missing store shows the instructional error regardless of
    /// `listings`; an existing store with no listings shows the empty state.
    pub fn render(&self, listings: &[JobListing], store_exists: bool) -> Result<String> {
        let view = PageView {
            file_error: (!store_exists).then_some(MISSING_STORE_MESSAGE),
            empty_message: NO_JOBS_MESSAGE,
            jobs: if store_exists {
                listings.iter().map(JobCard::from).collect()
            } else {
                Vec::new()
            },
        };

        let context = Context::from_serialize(&view)?;
        Ok(self.tera.render(PAGE_TEMPLATE_NAME, &context)?)
    }
}

/// Render the page with a one-off renderer.
pub fn render_page(listings: &[JobListing], store_exists: bool) -> Result<String> {
    PageRenderer::new()?.render(listings, store_exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_publication_date;

    fn listing(id: i64, salary: Option<&str>) -> JobListing {
        JobListing {
            id,
            title: format!("Backend Engineer {id}"),
            company_name: "Initech".to_string(),
            category: "Software Development".to_string(),
            source_url: format!("https://remotive.com/remote-jobs/{id}"),
            publication_date: parse_publication_date("2023-10-26T10:00:00Z").unwrap(),
            description_html: "<p>Ship <strong>code</strong></p>".to_string(),
            location: Some("Worldwide".to_string()),
            salary: salary.map(String::from),
            job_type: Some("full_time".to_string()),
        }
    }

    #[test]
    fn test_render_missing_store() {
        let html = render_page(&[listing(1, None)], false).unwrap();
        assert!(html.contains("error-message"));
        assert!(html.contains("remoteboard-harvester update"));
        assert!(!html.contains("job-card\""));
        assert!(!html.contains("Backend Engineer 1"));
    }

    #[test]
    fn test_render_empty_store() {
        let html = render_page(&[], true).unwrap();
        assert!(html.contains("empty-message"));
        assert!(html.contains("No jobs found."));
        assert!(!html.contains("error-message\">"));
    }

    #[test]
    fn test_render_listings_in_order() {
        let html = render_page(&[listing(1, Some("$45000-$65000")), listing(2, None)], true)
            .unwrap();

        let first = html.find("Backend Engineer 1").unwrap();
        let second = html.find("Backend Engineer 2").unwrap();
        assert!(first < second);

        assert!(html.contains("Initech"));
        assert!(html.contains("Published: 2023-10-26"));
        assert!(html.contains("Location: Worldwide"));
        assert!(html.contains("Salary: $45,000-$65,000"));
        assert_eq!(html.matches("class=\"salary\"").count(), 1);
        assert!(html.contains("full_time"));
    }

    #[test]
    fn test_render_escapes_text_but_not_description() {
        let mut job = listing(1, None);
        job.title = "<script>alert(1)</script>".to_string();

        let html = render_page(&[job], true).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<p>Ship <strong>code</strong></p>"));
    }

    #[test]
    fn test_format_salary_filter() {
        let args = HashMap::new();
        assert_eq!(
            format_salary_filter(&Value::String("100000".into()), &args).unwrap(),
            Value::String("100,000".into())
        );
        assert_eq!(
            format_salary_filter(&Value::Null, &args).unwrap(),
            Value::String("Salary not specified".into())
        );
    }

    #[test]
    fn test_renderer_is_reusable() {
        let renderer = PageRenderer::new().unwrap();
        let a = renderer.render(&[listing(1, None)], true).unwrap();
        let b = renderer.render(&[listing(1, None)], true).unwrap();
        assert_eq!(a, b);
    }
}
