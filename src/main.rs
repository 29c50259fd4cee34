//! surahcache - offline pre-cache and request interception for Quran.com
//! data.
//!
//! The binary is the platform adapter: it maps the worker lifecycle onto
//! subcommands. `install` pre-warms the two cache stores, `activate` purges
//! stale store generations, `get` runs one request through the interceptor,
//! and `status` reports store contents.

mod api;
mod cache;
mod config;
mod models;
mod worker;

use std::io;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::WorkerConfig;
use worker::fetcher::{Fetcher, HttpFetcher};
use worker::request::Request;
use worker::Worker;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: surahcache <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  install      pre-cache the app shell and target chapters");
    eprintln!("  activate     delete cache stores from old generations");
    eprintln!("  get <url>    serve one request through the interceptor");
    eprintln!("  status       show cache store entry counts");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = WorkerConfig::load()?;
    let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    let worker = Worker::open(config, fetcher.clone())?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("install") => {
            info!("install: pre-caching working set");
            worker.install().await?;
            println!(
                "Installed: {} static entries, {} scripture entries",
                worker.static_store().entry_count(),
                worker.scripture_store().entry_count()
            );
        }
        Some("activate") => {
            let deleted = worker.activate()?;
            if deleted.is_empty() {
                println!("Activated: no old cache stores to delete");
            } else {
                println!("Activated: deleted old cache stores: {}", deleted.join(", "));
            }
        }
        Some("get") if args.len() > 2 => {
            let url = &args[2];
            serve_one(&worker, &fetcher, url).await?;
        }
        Some("status") => {
            let config = worker.config();
            println!(
                "{}: {} entries",
                config.static_store_name,
                worker.static_store().entry_count()
            );
            println!(
                "{}: {} entries",
                config.scripture_store_name,
                worker.scripture_store().entry_count()
            );
        }
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Run one GET through the interceptor; a passthrough goes straight to the
/// network, exactly as the caller issued it.
async fn serve_one(worker: &Worker<HttpFetcher>, fetcher: &HttpFetcher, url: &str) -> Result<()> {
    let response = match worker.handle(Request::get(url)).await {
        Some(response) => response,
        None => {
            info!(url, "request not intercepted, passing through");
            fetcher.fetch(Request::get(url)).await?
        }
    };

    println!("{} {}", response.status, response.status_text);
    for (name, value) in &response.headers {
        println!("{}: {}", name, value);
    }
    println!("({} body bytes)", response.body.len());

    // Let background refreshes finish before the process exits.
    worker.drain().await;
    Ok(())
}
