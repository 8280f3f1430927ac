//! Print job postings from the hosted service, or the sample set, as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use jobboard::config::ClientSettings;
use jobboard::domain::ports::{FixtureJobSource, JobSource};
use jobboard::domain::{JobCatalogue, JobFilter, JobPosting};
use jobboard::outbound::rest::{RestClient, RestJobSource};
use jobboard::sample_data::{builtin_postings, postings_from_file};
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `list-jobs` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "list-jobs",
    about = "List job postings newest first, falling back to sample data when the service fails",
    version
)]
struct CliArgs {
    /// Only list featured postings, capped at the configured featured limit.
    #[arg(long)]
    featured: bool,
    /// Maximum number of postings to return.
    #[arg(long, value_name = "n")]
    limit: Option<usize>,
    /// Case-insensitive text matched against title, company, and description.
    #[arg(long, value_name = "text", default_value = "")]
    query: String,
    /// Case-insensitive text matched against location.
    #[arg(long, value_name = "text", default_value = "")]
    location: String,
}

#[derive(Serialize)]
struct Listing<'a> {
    source: jobboard::domain::FeedSource,
    count: usize,
    postings: &'a [JobPosting],
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = ClientSettings::load_from_iter([OsString::from("list-jobs")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let timeout = settings.request_timeout().map_err(io::Error::other)?;

    let fallback = match &settings.sample_catalogue_path {
        Some(path) => postings_from_file(path),
        None => builtin_postings(),
    }
    .map_err(io::Error::other)?;

    match settings.service_url().map_err(io::Error::other)? {
        Some(url) => {
            let client = RestClient::new(url, settings.api_key.clone().unwrap_or_default(), timeout)
                .map_err(io::Error::other)?;
            let source = Arc::new(RestJobSource::new(client));
            run(JobCatalogue::new(source, fallback).with_timeout(timeout), &args, &settings).await
        }
        None => {
            warn!("JOBBOARD_SERVICE_URL is not set; listing sample postings");
            let source = Arc::new(FixtureJobSource::new(fallback.clone()));
            run(JobCatalogue::new(source, fallback), &args, &settings).await
        }
    }
}

async fn run<S: JobSource>(
    catalogue: JobCatalogue<S>,
    args: &CliArgs,
    settings: &ClientSettings,
) -> io::Result<()> {
    let mut filter = if args.featured {
        JobFilter::featured().with_limit(settings.featured_limit)
    } else {
        JobFilter::all()
    };
    if let Some(limit) = args.limit {
        filter = filter.with_limit(limit);
    }

    let feed = catalogue.list_jobs_with_source(filter).await;
    let postings = catalogue.filter(&feed.postings, &args.query, &args.location);
    info!(source = ?feed.source, count = postings.len(), "listing ready");

    let listing = Listing {
        source: feed.source,
        count: postings.len(),
        postings: &postings,
    };
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &listing).map_err(io::Error::other)?;
    writeln!(stdout)
}
