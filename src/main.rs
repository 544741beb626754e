mod args;

use args::Args;
use clap::Parser;
use log::{error, info};
use monitor_stats::config::Config;
use monitor_stats::db::Database;
use monitor_stats::models::Metric;
use monitor_stats::reports::{Report, Reports};
use monitor_stats::source::cache::CachedCountSource;
use monitor_stats::source::CountSource;
use monitor_stats::tasks::cache_sweeper;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    let database = Database::connect(&config).await?;
    let report = Report::from(&args.report);

    let mut observers: Arc<dyn CountSource> = Arc::new(database.counts(Metric::Observers));
    let mut incidents: Arc<dyn CountSource> = Arc::new(database.counts(Metric::Incidents));

    // Only a repeating run benefits from caching
    if let (Some(ttl), Some(_)) = (config.cache_ttl, args.watch) {
        info!("Caching counts for {:?}", ttl);
        let cached_observers = Arc::new(CachedCountSource::new(observers, ttl));
        let cached_incidents = Arc::new(CachedCountSource::new(incidents, ttl));
        tokio::spawn(cache_sweeper::run(Arc::clone(&cached_observers), ttl));
        tokio::spawn(cache_sweeper::run(Arc::clone(&cached_incidents), ttl));
        observers = cached_observers;
        incidents = cached_incidents;
    }

    let reports = Reports::new(observers, incidents, config.fetch_timeout)
        .with_stage_forms(config.stage_forms.clone());

    match args.watch {
        Some(secs) => {
            let mut interval = interval(Duration::from_secs(secs.max(1)));
            loop {
                interval.tick().await;
                print_report(&reports, &report, &args.paging).await?;
            }
        }
        None => print_report(&reports, &report, &args.paging).await,
    }
}

async fn print_report(
    reports: &Reports,
    report: &Report,
    paging: &args::Paging,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let page = reports.run(report, paging.page, paging.page_size).await?;
    if page.is_past_end() {
        info!(
            "Page {} is past the last page ({} of {} items)",
            page.current_page, page.total_pages, page.total_items
        );
    }
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
