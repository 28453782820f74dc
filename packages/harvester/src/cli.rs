//! Command-line interface for the harvester.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{parse_header_arg, HarvesterConfig};
use crate::error::Result;
use crate::harvester::run_update;
use crate::html::render_page;
use crate::server;
use crate::store::load_snapshot;
use crate::types::JobQuery;

/// Remoteboard Harvester - Fetch, store and render remote job listings.
#[derive(Parser)]
#[command(name = "remoteboard-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path of the JSON job store (default: data/remotive_jobs.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Base URL of the remote-jobs API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch jobs from the API and replace the store with them.
    Update {
        /// Job category (e.g., software-dev)
        #[arg(short, long)]
        category: Option<String>,

        /// Search term matched against titles and descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of jobs to fetch
        #[arg(short, long)]
        limit: Option<u32>,

        /// Extra request header as 'Name: value' (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request timeout in seconds (default: 10)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },

    /// Render the stored jobs as an HTML page.
    Render {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the stored jobs as an HTML page over HTTP.
    Serve {
        /// Listen address (default: 127.0.0.1:8000)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = base_config(&cli)?;

    match cli.command {
        Commands::Update {
            category,
            search,
            limit,
            headers,
            timeout,
        } => {
            let query = JobQuery {
                category,
                search,
                limit,
            };
            update_command(config, &query, &headers, timeout)
        }
        Commands::Render { output } => render_command(&config, output.as_deref()),
        Commands::Serve { bind } => serve_command(config, bind.as_deref()),
    }
}

/// Environment configuration overridden by the global flags.
fn base_config(cli: &Cli) -> Result<HarvesterConfig> {
    let mut config = HarvesterConfig::from_env()?;
    if let Some(store) = &cli.store {
        config = config.with_store_path(store);
    }
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url);
    }
    Ok(config)
}

/// Execute the update command.
fn update_command(
    mut config: HarvesterConfig,
    query: &JobQuery,
    headers: &[String],
    timeout: Option<u64>,
) -> Result<()> {
    // Validate header arguments before making HTTP requests
    for arg in headers {
        let (name, value) = parse_header_arg(arg)?;
        config = config.with_header(name, value);
    }
    if let Some(secs) = timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    println!(
        "{} jobs from {}",
        style("Fetching").bold(),
        style(&config.api_url).cyan()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Fetching, normalizing and saving jobs...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let summary = match run_update(&config, query) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            println!(
                "{} existing job data was left unchanged",
                style("Update failed:").red().bold()
            );
            return Err(e);
        }
    };

    pb.finish_and_clear();

    println!("  Fetched: {}", summary.fetched);
    println!("  Saved: {}", style(summary.saved).green());
    if summary.skipped() > 0 {
        println!("  Skipped: {}", style(summary.skipped()).yellow().bold());
    }

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        summary.path.display()
    );

    Ok(())
}

/// Execute the render command.
fn render_command(config: &HarvesterConfig, output: Option<&Path>) -> Result<()> {
    let snapshot = load_snapshot(&config.store_path);
    let exists = snapshot.exists();
    if !exists {
        tracing::warn!(
            path = %config.store_path.display(),
            "Jobs data file not found; run the update command to populate it"
        );
    }

    let html = render_page(&snapshot.into_listings(), exists)?;

    match output {
        Some(path) => {
            fs::write(path, html)?;
            eprintln!("{} {}", style("Rendered to:").green().bold(), path.display());
        }
        None => print!("{html}"),
    }

    Ok(())
}

/// Execute the serve command.
fn serve_command(mut config: HarvesterConfig, bind: Option<&str>) -> Result<()> {
    if let Some(addr) = bind {
        config = config.with_bind_addr(addr)?;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(config))
}
