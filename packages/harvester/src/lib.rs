//! Remoteboard Harvester - Fetch remote job listings from the Remotive API.
//!
//! Listings flow one way: network → normalize → disk → render. An update run
//! fetches the API once, normalizes the records and replaces the JSON store;
//! the presentation layer only ever reads that store.
//!
//! # Example
//!
//! ```
//! use remoteboard_harvester::html::format_salary;
//! use remoteboard_harvester::types::parse_publication_date;
//!
//! assert_eq!(format_salary(Some("$45000-$65000")), "$45,000-$65,000");
//! assert!(parse_publication_date("2023-10-26T10:00:00Z").is_some());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and [`HarvesterConfig`]
//! - [`types`]: Core data types (JobListing, JobQuery, Normalized)
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client construction and single-shot download
//! - [`remotive`]: Remotive API client
//! - [`normalize`]: Raw record validation and mapping
//! - [`store`]: JSON file store
//! - [`html`]: Page rendering and salary formatting
//! - [`harvester`]: Update driver
//! - [`server`]: HTTP surface for the rendered page
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod harvester;
pub mod html;
pub mod http;
pub mod normalize;
pub mod remotive;
pub mod server;
pub mod store;
pub mod types;

// Re-export main functions
pub use harvester::{run_update, UpdateSummary};
pub use html::render_page;
pub use normalize::normalize_jobs;
pub use remotive::fetch_raw_jobs;
pub use store::{load_jobs, save_jobs};

// Re-export commonly used items
pub use config::HarvesterConfig;
pub use error::{HarvesterError, Result};
pub use types::{JobListing, JobQuery, Normalized};
